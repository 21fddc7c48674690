//! Per-thread comment dialog state machine.
//!
//! A dialog owns two mutually exclusive sections: "create" while its thread
//! has no comments, "show" (comment list plus reply box) afterwards. User
//! actions leave the dialog as [`DialogEvent`]s; the owner drains them with
//! [`AnnotationDialog::drain_events`].

mod command;
mod mobile;
mod placement;
mod view;

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use command::DialogCommand;
pub use mobile::MobileDialogSlot;
pub use placement::{
    DialogLayout, DialogPositioner, DrawingPlacement, ManualPlacement, PlacementContext,
    PointPlacement, StaticLayout,
};
pub use view::{
    CommentView, CreateSection, DialogContent, DialogElement, DrawingToolbar, ShowSection,
    TextArea, ThreadIcon,
};

use crate::config::Strings;
use crate::constants::{ATTR_ANNOTATION_ID, DATA_TYPE_REPLY_TEXTAREA};
use crate::model::{Annotation, AnnotationId, Location};
use crate::surface::{ElementId, ElementInfo, EventType, KeyInput, Propagation};
use crate::util::{decode_keydown, find_closest_attribute, find_closest_data_type, is_rect_in_viewport};

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique dialog identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(pub u64);

impl DialogId {
    fn next() -> Self {
        Self(NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Data a dialog is constructed from.
#[derive(Debug, Clone)]
pub struct DialogData {
    pub annotated_element: ElementId,
    pub container: ElementId,
    pub location: Location,
    /// Comments already in the thread, empty for a new thread
    pub annotations: Vec<Annotation>,
    pub can_annotate: bool,
    pub locale: String,
    pub is_mobile: bool,
}

impl DialogData {
    pub fn new(annotated_element: ElementId, container: ElementId, location: Location) -> Self {
        Self {
            annotated_element,
            container,
            location,
            annotations: Vec::new(),
            can_annotate: true,
            locale: "en-US".to_string(),
            is_mobile: false,
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }
}

/// What a dialog asks of its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Post a comment (or save a drawing, with empty text)
    Create { text: String },
    /// Drop the unsaved thread
    Cancel,
    /// Delete a comment, or the whole drawing when no id is given
    Delete { annotation_id: Option<AnnotationId> },
    /// The pointer came back to a dialog holding unposted text
    CommentPending,
}

/// Input delivered to a dialog's bound listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogInput {
    /// Click anywhere inside the dialog; `path` is target first
    Click { path: Vec<ElementInfo> },
    KeyDown { key: KeyInput, path: Vec<ElementInfo> },
    MouseUp,
    Wheel,
    MouseEnter,
    MouseLeave,
    /// Close button of the shared mobile dialog
    CloseMobile,
}

impl DialogInput {
    fn event_type(&self) -> Option<EventType> {
        match self {
            DialogInput::Click { .. } => Some(EventType::Click),
            DialogInput::KeyDown { .. } => Some(EventType::KeyDown),
            DialogInput::MouseUp => Some(EventType::MouseUp),
            DialogInput::Wheel => Some(EventType::Wheel),
            DialogInput::MouseEnter => Some(EventType::MouseEnter),
            DialogInput::MouseLeave => Some(EventType::MouseLeave),
            DialogInput::CloseMobile => None,
        }
    }
}

/// Comment dialog for one thread.
pub struct AnnotationDialog {
    id: DialogId,
    annotated_element: ElementId,
    container: ElementId,
    location: Location,
    has_annotations: bool,
    can_annotate: bool,
    locale: String,
    is_mobile: bool,
    thread_number: Option<u32>,
    strings: Strings,
    positioner: Box<dyn DialogPositioner>,
    layout: Rc<dyn DialogLayout>,
    mobile_slot: Option<Rc<MobileDialogSlot>>,
    /// Root element; `None` until setup (desktop) or while not shown (mobile)
    element: Option<DialogElement>,
    /// Sections; `None` until setup
    content: Option<DialogContent>,
    thread_icon: Option<ThreadIcon>,
    events: Vec<DialogEvent>,
    position_count: usize,
}

impl AnnotationDialog {
    pub fn new(
        data: DialogData,
        positioner: Box<dyn DialogPositioner>,
        layout: Rc<dyn DialogLayout>,
    ) -> Self {
        Self {
            id: DialogId::next(),
            annotated_element: data.annotated_element,
            container: data.container,
            location: data.location,
            has_annotations: !data.annotations.is_empty(),
            can_annotate: data.can_annotate,
            locale: data.locale,
            is_mobile: data.is_mobile,
            thread_number: None,
            strings: Strings::default(),
            positioner,
            layout,
            mobile_slot: None,
            element: None,
            content: None,
            thread_icon: None,
            events: Vec::new(),
            position_count: 0,
        }
    }

    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.strings = strings;
        self
    }

    /// Container shared by all mobile dialogs of a viewer.
    pub fn with_mobile_slot(mut self, slot: Rc<MobileDialogSlot>) -> Self {
        self.mobile_slot = Some(slot);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn annotated_element(&self) -> ElementId {
        self.annotated_element
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn has_annotations(&self) -> bool {
        self.has_annotations
    }

    pub fn can_annotate(&self) -> bool {
        self.can_annotate
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn thread_number(&self) -> Option<u32> {
        self.thread_number
    }

    pub fn element(&self) -> Option<&DialogElement> {
        self.element.as_ref()
    }

    pub fn content(&self) -> Option<&DialogContent> {
        self.content.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        !self.is_evicted() && self.element.as_ref().is_some_and(|e| e.visible)
    }

    /// A mobile dialog whose place in the shared container was taken by
    /// another dialog.
    fn is_evicted(&self) -> bool {
        self.element.is_some()
            && self
                .mobile_slot
                .as_ref()
                .is_some_and(|slot| self.is_mobile && !slot.is_held_by(self.id))
    }

    /// Drop the element of an evicted dialog. Returns whether it was evicted.
    fn settle_eviction(&mut self) -> bool {
        if !self.is_evicted() {
            return false;
        }
        log::debug!("📱 Dialog {} lost the mobile container", self.id.0);
        self.unbind_dom_listeners();
        self.element = None;
        self.deactivate_reply(false);
        true
    }

    /// Mobile dialogs only take input while they sit in the shared container.
    fn takes_input(&mut self) -> bool {
        !self.settle_eviction() && !(self.is_mobile && self.element.is_none())
    }

    /// How many times the positioning strategy ran.
    pub fn position_count(&self) -> usize {
        self.position_count
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }

    /// Type into the create textarea.
    pub fn set_create_text(&mut self, text: &str) {
        if let Some(content) = self.content.as_mut() {
            content.create.textarea.set_value(text);
        }
    }

    /// Type into the reply textarea.
    pub fn set_reply_text(&mut self, text: &str) {
        if let Some(content) = self.content.as_mut() {
            content.show.reply.set_value(text);
        }
    }

    fn emit(&mut self, event: DialogEvent) {
        log::trace!("Dialog {} emits {:?}", self.id.0, event);
        self.events.push(event);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Build the dialog's sections and, on desktop, its root element.
    pub fn setup(&mut self, annotations: &[Annotation], thread_icon: Option<ThreadIcon>) {
        let mut content = DialogContent::new(!annotations.is_empty(), &self.strings);
        if self.positioner.has_drawing_toolbar() {
            content.toolbar = Some(DrawingToolbar::new(annotations, &self.strings));
        }
        self.content = Some(content);
        self.thread_icon = thread_icon;
        if let Some(first) = annotations.first() {
            self.thread_number = first.thread_number;
        }

        if !self.is_mobile {
            self.element = Some(DialogElement::new());
            self.bind_dom_listeners();
        }

        for annotation in annotations {
            self.add_annotation_element(annotation);
        }
    }

    /// Unbind listeners and detach the root element.
    pub fn destroy(&mut self) {
        if self.element.is_none() {
            return;
        }
        self.unbind_dom_listeners();
        if let Some(slot) = &self.mobile_slot {
            slot.release(self.id);
        }
        self.element = None;
        log::debug!("🗑️ Dialog {} destroyed", self.id.0);
    }

    /// Position (desktop) or transplant (mobile) and show the dialog.
    pub fn show(&mut self) {
        if self.content.is_none() {
            log::warn!("Dialog {} shown before setup", self.id.0);
            return;
        }

        if self.is_mobile {
            let Some(slot) = self.mobile_slot.clone() else {
                log::warn!("Mobile dialog {} shown without a shared container", self.id.0);
                return;
            };
            slot.acquire(self.id);
            let mut element = DialogElement::new();
            element.attached = true;
            element.animating = true;
            self.element = Some(element);
            self.bind_dom_listeners();
        }

        let (Some(content), Some(element)) = (self.content.as_ref(), self.element.as_ref()) else {
            return;
        };

        // Already open: positioning again would only make it jump
        let textarea = content.primary_textarea(self.has_annotations);
        if textarea.active && element.attached {
            return;
        }

        if !self.is_mobile {
            self.position();
        }

        if self.has_annotations {
            self.activate_reply();
        } else if let Some(content) = self.content.as_mut() {
            content.create.textarea.active = true;
        }

        if let Some(content) = self.content.as_mut() {
            content
                .primary_textarea_mut(self.has_annotations)
                .move_cursor_to_end();
        }

        if !self.can_annotate {
            if let Some(element) = self.element.as_mut() {
                element.cannot_annotate = true;
            }
        }

        if self.in_viewport() {
            let has_annotations = self.has_annotations;
            if let Some(content) = self.content.as_mut() {
                content.primary_textarea_mut(has_annotations).focused = true;
            }
        }
    }

    /// Hide the dialog, tearing down the shared container on mobile.
    pub fn hide(&mut self) {
        if self.settle_eviction() || !self.is_visible() {
            return;
        }

        if self.is_mobile {
            self.hide_mobile_dialog();
        }

        let was_flipped = match self.element.as_mut() {
            Some(element) => {
                element.visible = false;
                element.flipped
            }
            None => false,
        };
        self.deactivate_reply(false);

        if was_flipped {
            if let Some(icon) = &self.thread_icon {
                icon.set_flipped(false);
            }
        }
    }

    /// Reset the shared mobile container and cancel an unsaved thread.
    pub fn hide_mobile_dialog(&mut self) {
        if self.element.is_none() {
            return;
        }

        self.unbind_dom_listeners();
        if let Some(slot) = &self.mobile_slot {
            slot.release(self.id);
        }
        self.element = None;

        if !self.has_annotations {
            self.cancel_annotation();
        }
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub fn add_annotation(&mut self, annotation: &Annotation) {
        let Some(content) = self.content.as_mut() else {
            log::warn!("Dialog {} got an annotation before setup", self.id.0);
            return;
        };

        if !self.has_annotations {
            content.create.visible = false;
            content.show.visible = true;
            self.has_annotations = true;
        }

        self.add_annotation_element(annotation);
        self.deactivate_reply(true);
    }

    /// Remove a rendered comment. Returns whether it was found.
    pub fn remove_annotation(&mut self, annotation_id: &AnnotationId) -> bool {
        let Some(content) = self.content.as_mut() else {
            return false;
        };
        let before = content.show.comments.len();
        content
            .show
            .comments
            .retain(|c| &c.annotation_id != annotation_id);
        if content.show.comments.len() == before {
            return false;
        }
        self.deactivate_reply(false);
        true
    }

    fn add_annotation_element(&mut self, annotation: &Annotation) {
        let view = CommentView::new(annotation, &self.locale, &self.strings);
        if let Some(content) = self.content.as_mut() {
            content.show.comments.push(view);
        }
    }

    /// Emit the create textarea's text (or `text_override`) unless blank.
    pub fn post_annotation(&mut self, text_override: Option<&str>) {
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let text = match text_override {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => content.create.textarea.value.clone(),
        };
        if text.trim().is_empty() {
            return;
        }

        content.create.textarea.set_value("");
        self.emit(DialogEvent::Create { text });
    }

    /// Emit the reply textarea's text unless blank.
    pub fn post_reply(&mut self) {
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let text = content.show.reply.value.clone();
        if text.trim().is_empty() {
            return;
        }

        content.show.reply.set_value("");
        self.emit(DialogEvent::Create { text });
    }

    pub fn cancel_annotation(&mut self) {
        self.emit(DialogEvent::Cancel);
    }

    pub fn delete_annotation(&mut self, annotation_id: &AnnotationId) {
        self.emit(DialogEvent::Delete {
            annotation_id: Some(annotation_id.clone()),
        });
    }

    // ------------------------------------------------------------------
    // Reply box
    // ------------------------------------------------------------------

    pub fn activate_reply(&mut self) {
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let show = &mut content.show;
        if show.reply.active {
            return;
        }

        show.reply.active = true;
        show.reply_buttons_visible = true;
        show.scrolled_to_bottom += 1;
    }

    pub fn deactivate_reply(&mut self, clear_text: bool) {
        let in_viewport = self.in_viewport();
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let show = &mut content.show;

        show.reply.reset(clear_text);
        show.reply_buttons_visible = false;
        show.reply.focused = in_viewport && show.visible;
        show.scrolled_to_bottom += 1;
    }

    // ------------------------------------------------------------------
    // Delete confirmation
    // ------------------------------------------------------------------

    pub fn show_delete_confirmation(&mut self, annotation_id: &AnnotationId) {
        if let Some(comment) = self.comment_mut(annotation_id) {
            comment.delete_visible = false;
            comment.confirmation_visible = true;
        }
    }

    pub fn hide_delete_confirmation(&mut self, annotation_id: &AnnotationId) {
        if let Some(comment) = self.comment_mut(annotation_id) {
            comment.delete_visible = true;
            comment.confirmation_visible = false;
        }
    }

    fn comment_mut(&mut self, annotation_id: &AnnotationId) -> Option<&mut CommentView> {
        self.content.as_mut()?.show.comment_mut(annotation_id)
    }

    // ------------------------------------------------------------------
    // Input routing
    // ------------------------------------------------------------------

    /// Run the command named by `data_type`; unknown commands are ignored.
    pub fn click(&mut self, data_type: Option<&str>, annotation_id: Option<&str>) {
        if !self.takes_input() {
            return;
        }
        let Some(command) = data_type.and_then(DialogCommand::from_data_type) else {
            return;
        };
        let annotation_id = annotation_id.map(AnnotationId::from);
        if command.targets_comment() && annotation_id.is_none() {
            log::warn!("{} clicked outside of a comment", command.as_data_type());
            return;
        }

        match (command, annotation_id) {
            (DialogCommand::PostAnnotation, _) => self.post_annotation(None),
            (DialogCommand::CancelAnnotation, _) => {
                if self.is_mobile {
                    self.hide_mobile_dialog();
                } else {
                    self.cancel_annotation();
                }
                self.deactivate_reply(true);
            }
            (DialogCommand::ReplyTextarea, _) => self.activate_reply(),
            (DialogCommand::CancelReply, _) => self.deactivate_reply(true),
            (DialogCommand::PostReply, _) => self.post_reply(),
            (DialogCommand::ShowDeleteConfirmation, Some(id)) => self.show_delete_confirmation(&id),
            (DialogCommand::CancelDelete, Some(id)) => self.hide_delete_confirmation(&id),
            (DialogCommand::ConfirmDelete, Some(id)) => self.delete_annotation(&id),
            (DialogCommand::PostDrawing, _) => {
                self.emit(DialogEvent::Create {
                    text: String::new(),
                });
            }
            (DialogCommand::DeleteDrawing, _) => {
                self.emit(DialogEvent::Delete {
                    annotation_id: None,
                });
            }
            (_, None) => {}
        }
    }

    /// `Escape` hides; typing in the reply box keeps it active.
    pub fn keydown(&mut self, key: &KeyInput, target_data_type: Option<&str>) {
        if !self.takes_input() {
            return;
        }
        if decode_keydown(key) == "Escape" {
            self.hide();
        } else if target_data_type == Some(DATA_TYPE_REPLY_TEXTAREA) {
            self.activate_reply();
        }
    }

    pub fn mouse_enter(&mut self) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        if element.visible {
            return;
        }
        element.visible = true;

        let pending = self.content.as_ref().is_some_and(|c| {
            c.show.reply.has_pending_text() || c.create.textarea.has_pending_text()
        });
        if pending {
            self.emit(DialogEvent::CommentPending);
        }

        self.activate_reply();
    }

    /// Only dialogs with saved comments hide on mouse-out.
    pub fn mouse_leave(&mut self) {
        if self.has_annotations {
            self.hide();
        }
    }

    /// Deliver input to whichever listener is bound for it.
    pub fn handle_input(&mut self, input: DialogInput) -> Propagation {
        if self.settle_eviction() {
            return Propagation::Continue;
        }
        if let DialogInput::CloseMobile = input {
            let close_bound = self
                .mobile_slot
                .as_ref()
                .is_some_and(|slot| slot.is_held_by(self.id) && slot.close_listener_bound());
            if close_bound {
                self.hide_mobile_dialog();
            }
            return Propagation::Continue;
        }

        let bound = match (input.event_type(), self.element.as_ref()) {
            (Some(kind), Some(element)) => element.has_listener(kind),
            _ => false,
        };
        if !bound {
            return Propagation::Continue;
        }

        match input {
            DialogInput::Click { path } => {
                let data_type = find_closest_data_type(&path).map(str::to_string);
                let annotation_id =
                    find_closest_attribute(&path, ATTR_ANNOTATION_ID).map(str::to_string);
                self.click(data_type.as_deref(), annotation_id.as_deref());
                Propagation::Stop
            }
            DialogInput::KeyDown { key, path } => {
                let data_type = find_closest_data_type(&path).map(str::to_string);
                self.keydown(&key, data_type.as_deref());
                Propagation::Stop
            }
            DialogInput::MouseUp | DialogInput::Wheel => Propagation::Stop,
            DialogInput::MouseEnter => {
                self.mouse_enter();
                Propagation::Continue
            }
            DialogInput::MouseLeave => {
                self.mouse_leave();
                Propagation::Continue
            }
            DialogInput::CloseMobile => Propagation::Continue,
        }
    }

    fn bind_dom_listeners(&mut self) {
        let is_mobile = self.is_mobile;
        let Some(element) = self.element.as_mut() else {
            return;
        };
        element.listeners = vec![
            EventType::KeyDown,
            EventType::Click,
            EventType::MouseUp,
            EventType::Wheel,
        ];
        if !is_mobile {
            element.listeners.push(EventType::MouseEnter);
            element.listeners.push(EventType::MouseLeave);
        }
    }

    fn unbind_dom_listeners(&mut self) {
        if let Some(element) = self.element.as_mut() {
            element.listeners.clear();
        }
    }

    // ------------------------------------------------------------------
    // Positioning
    // ------------------------------------------------------------------

    /// Place the dialog against its thread's location.
    pub fn position(&mut self) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        self.positioner.position(PlacementContext {
            element,
            location: &self.location,
            layout: self.layout.as_ref(),
            thread_icon: self.thread_icon.as_ref(),
        });
        self.position_count += 1;
    }

    /// Place the dialog at a literal browser coordinate.
    pub fn position_at(&mut self, x: f32, y: f32) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        self.positioner.position_at(
            PlacementContext {
                element,
                location: &self.location,
                layout: self.layout.as_ref(),
                thread_icon: self.thread_icon.as_ref(),
            },
            x,
            y,
        );
        self.position_count += 1;
    }

    fn in_viewport(&self) -> bool {
        let Some(element) = self.element.as_ref() else {
            return false;
        };
        if !element.visible || !element.attached {
            return false;
        }
        let rect = element.rect(self.layout.dialog_size(), self.layout.container_height());
        is_rect_in_viewport(rect, self.layout.viewport_size())
    }
}
