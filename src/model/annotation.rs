//! Comment annotation records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a single comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub String);

impl AnnotationId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AnnotationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of annotation a thread holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationType {
    /// Comment pinned to a point
    #[default]
    Point,
    /// Plain text highlight
    Highlight,
    /// Text highlight with comments
    HighlightComment,
    /// Freehand drawing
    Draw,
}

impl AnnotationType {
    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationType::Point => "point",
            AnnotationType::Highlight => "highlight",
            AnnotationType::HighlightComment => "highlight-comment",
            AnnotationType::Draw => "draw",
        }
    }

    /// Whether this is one of the highlight types.
    pub fn is_highlight(&self) -> bool {
        matches!(
            self,
            AnnotationType::Highlight | AnnotationType::HighlightComment
        )
    }
}

/// Author of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id; `"0"` marks a comment that is still being posted
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// What the current user may do with a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Permissions {
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_edit: bool,
}

/// A single comment within a thread.
///
/// Threads own annotations; dialogs only render copies of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier
    #[serde(rename = "annotationID")]
    pub annotation_id: AnnotationId,
    /// Identifier of the owning thread
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Display number of the owning thread
    #[serde(default)]
    pub thread_number: Option<u32>,
    /// Comment text
    #[serde(default)]
    pub text: String,
    /// Author
    #[serde(default)]
    pub user: User,
    /// Permissions of the current user
    #[serde(default)]
    pub permissions: Permissions,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Annotation type
    #[serde(rename = "type", default)]
    pub kind: AnnotationType,
}

impl Annotation {
    /// Create a point comment authored now.
    pub fn new(id: impl Into<AnnotationId>, text: impl Into<String>, user: User) -> Self {
        Self {
            annotation_id: id.into(),
            thread_id: None,
            thread_number: None,
            text: text.into(),
            user,
            permissions: Permissions::default(),
            created: Utc::now(),
            kind: AnnotationType::Point,
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_thread_number(mut self, number: u32) -> Self {
        self.thread_number = Some(number);
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn with_kind(mut self, kind: AnnotationType) -> Self {
        self.kind = kind;
        self
    }
}
