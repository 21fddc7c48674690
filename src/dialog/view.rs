//! View model of a dialog: what a host renders, without any DOM.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::Strings;
use crate::constants::{
    ATTR_ANNOTATION_ID, CLASS_HIDDEN, DATA_TYPE_CANCEL_DELETE, DATA_TYPE_CONFIRM_DELETE,
    DATA_TYPE_DELETE,
};
use crate::model::{Annotation, AnnotationId, Rect, Size};
use crate::surface::EventType;
use crate::util::{CaretPosition, avatar_html, format_comment_date, html_escape};

/// A textarea's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextArea {
    pub value: String,
    pub placeholder: String,
    pub active: bool,
    pub focused: bool,
    /// Cursor position in characters
    pub cursor: usize,
}

impl TextArea {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    /// Replace the text, as if typed by the user.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    /// Non-whitespace text is waiting to be posted.
    pub fn has_pending_text(&self) -> bool {
        !self.value.trim().is_empty()
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Drop the active marker, optionally clearing the text.
    pub fn reset(&mut self, clear_text: bool) {
        self.active = false;
        if clear_text {
            self.value.clear();
            self.cursor = 0;
        }
    }
}

/// One rendered comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub annotation_id: AnnotationId,
    /// Escaped display name
    pub user_name: String,
    /// Avatar markup (image or initials)
    pub avatar: String,
    /// Localized creation date
    pub created: String,
    /// Escaped comment text
    pub text: String,
    /// Trash icon shown
    pub delete_visible: bool,
    /// "Delete this annotation?" prompt shown
    pub confirmation_visible: bool,
}

impl CommentView {
    pub fn new(annotation: &Annotation, locale: &str, strings: &Strings) -> Self {
        let user_id = if annotation.user.id.is_empty() {
            "0".to_string()
        } else {
            html_escape(&annotation.user.id)
        };

        let user_name = if user_id == "0" {
            strings.posting_message.clone()
        } else {
            let escaped = html_escape(&annotation.user.name);
            if escaped.is_empty() {
                strings.anonymous_user_name.clone()
            } else {
                escaped
            }
        };

        let avatar_url = annotation
            .user
            .avatar_url
            .as_deref()
            .map(html_escape)
            .unwrap_or_default();

        Self {
            annotation_id: annotation.annotation_id.clone(),
            avatar: avatar_html(&avatar_url, &user_id, &user_name, &strings.profile_alt),
            user_name,
            created: format_comment_date(&annotation.created, locale),
            text: html_escape(&annotation.text),
            delete_visible: annotation.permissions.can_delete,
            confirmation_visible: false,
        }
    }

    /// Comment markup carrying the dialog's `data-type` commands.
    pub fn to_html(&self, strings: &Strings) -> String {
        let hidden = |visible: bool| if visible { "" } else { CLASS_HIDDEN };
        format!(
            r#"<div class="annotation-comment" {ATTR_ANNOTATION_ID}="{id}">
    <div class="profile-image-container">{avatar}</div>
    <div class="profile-container">
        <div class="user-name">{name}</div>
        <div class="comment-date">{created}</div>
    </div>
    <div class="comment-text">{text}</div>
    <button class="bp-btn-plain delete-comment-btn {delete_hidden}" data-type="{DATA_TYPE_DELETE}" title="{delete}"></button>
    <div class="delete-confirmation {confirm_hidden}">
        <div class="delete-confirmation-message">{message}</div>
        <div class="button-container">
            <button class="bp-btn cancel-delete-btn" data-type="{DATA_TYPE_CANCEL_DELETE}">{cancel}</button>
            <button class="bp-btn bp-btn-primary confirm-delete-btn" data-type="{DATA_TYPE_CONFIRM_DELETE}">{delete}</button>
        </div>
    </div>
</div>"#,
            id = html_escape(self.annotation_id.as_str()),
            avatar = self.avatar,
            name = self.user_name,
            created = self.created,
            text = self.text,
            delete_hidden = hidden(self.delete_visible),
            confirm_hidden = hidden(self.confirmation_visible),
            delete = strings.delete,
            cancel = strings.cancel,
            message = strings.delete_confirmation_message,
        )
    }
}

/// Section shown while a thread has no comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSection {
    pub visible: bool,
    pub textarea: TextArea,
}

/// Comment list plus reply box, shown once a thread has comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowSection {
    pub visible: bool,
    pub comments: Vec<CommentView>,
    pub reply: TextArea,
    /// Cancel/post row under the reply box
    pub reply_buttons_visible: bool,
    /// Times the comment list was scrolled to its last comment
    pub scrolled_to_bottom: usize,
}

impl ShowSection {
    pub fn comment(&self, id: &AnnotationId) -> Option<&CommentView> {
        self.comments.iter().find(|c| &c.annotation_id == id)
    }

    pub fn comment_mut(&mut self, id: &AnnotationId) -> Option<&mut CommentView> {
        self.comments.iter_mut().find(|c| &c.annotation_id == id)
    }
}

/// Save/delete toolbar of a drawing dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawingToolbar {
    /// "Save" is offered only for drawings not saved yet
    pub commit_visible: bool,
    pub delete_visible: bool,
    /// "<name> drew" label of a saved drawing
    pub label: Option<String>,
}

impl DrawingToolbar {
    pub fn new(annotations: &[Annotation], strings: &Strings) -> Self {
        match annotations.first() {
            None => Self {
                commit_visible: true,
                delete_visible: true,
                label: None,
            },
            Some(first) => Self {
                commit_visible: false,
                delete_visible: first.permissions.can_delete,
                label: Some(strings.who_drew.replace("{1}", &first.user.name)),
            },
        }
    }
}

/// Everything inside a dialog's root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogContent {
    pub create: CreateSection,
    pub show: ShowSection,
    pub toolbar: Option<DrawingToolbar>,
}

impl DialogContent {
    pub fn new(has_annotations: bool, strings: &Strings) -> Self {
        Self {
            create: CreateSection {
                visible: !has_annotations,
                textarea: TextArea::new(&strings.add_comment_placeholder),
            },
            show: ShowSection {
                visible: has_annotations,
                comments: Vec::new(),
                reply: TextArea::new(&strings.reply_placeholder),
                reply_buttons_visible: false,
                scrolled_to_bottom: 0,
            },
            toolbar: None,
        }
    }

    /// The textarea `show()` activates.
    pub fn primary_textarea(&self, has_annotations: bool) -> &TextArea {
        if has_annotations {
            &self.show.reply
        } else {
            &self.create.textarea
        }
    }

    pub fn primary_textarea_mut(&mut self, has_annotations: bool) -> &mut TextArea {
        if has_annotations {
            &mut self.show.reply
        } else {
            &mut self.create.textarea
        }
    }
}

/// A dialog's root element as placed in the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialogElement {
    /// Not carrying the hidden marker
    pub visible: bool,
    /// Inserted into the document
    pub attached: bool,
    /// Page element the dialog was attached to, if any
    pub page: Option<u32>,
    /// Listeners currently bound on the element
    pub listeners: Vec<EventType>,
    pub cannot_annotate: bool,
    /// Rendered above its anchor with the caret at the bottom
    pub flipped: bool,
    /// Mobile slide-in animation running
    pub animating: bool,
    pub left: f32,
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub caret: CaretPosition,
}

impl DialogElement {
    /// Fresh, detached element.
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn has_listener(&self, event: EventType) -> bool {
        self.listeners.contains(&event)
    }

    /// Bounding box given the rendered size and the container height.
    pub fn rect(&self, size: Size, container_height: f32) -> Rect {
        let top = match (self.top, self.bottom) {
            (Some(top), _) => top,
            (None, Some(bottom)) => container_height - bottom - size.height,
            (None, None) => 0.0,
        };
        Rect::new(self.left, top, size.width, size.height)
    }
}

/// Handle to a point thread's icon, shared between the thread and its dialog.
///
/// Only the icon's flipped marker is modelled: a flipped dialog hides the
/// upper half of the icon.
#[derive(Debug, Clone, Default)]
pub struct ThreadIcon {
    flipped: Rc<Cell<bool>>,
}

impl ThreadIcon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped.get()
    }

    pub fn set_flipped(&self, flipped: bool) {
        self.flipped.set(flipped);
    }
}
