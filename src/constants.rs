//! Global constants for the annotation layer.
//!
//! Class names and `data-type` values are part of the contract with the host
//! UI: markup produced here and markup produced by the host must agree on them.

// ============================================================================
// Marker classes
// ============================================================================

/// Marks an active textarea.
pub const CLASS_ACTIVE: &str = "bp-is-active";

/// Marks a hidden element.
pub const CLASS_HIDDEN: &str = "bp-is-hidden";

/// Marks a dialog whose owner may not reply, edit or delete.
pub const CLASS_CANNOT_ANNOTATE: &str = "cannot-annotate";

/// Marks a point dialog (and its thread icon) rendered above the anchor.
pub const CLASS_FLIPPED_DIALOG: &str = "bp-annotation-dialog-flipped";

/// Added to the annotated element while draw mode is registered.
pub const CLASS_ANNOTATION_DRAW_MODE: &str = "bp-draw-annotation-mode";

/// Added to the shared mobile dialog while it animates in.
pub const CLASS_ANIMATE_DIALOG: &str = "bp-animate-show-dialog";

pub const CLASS_ANNOTATION_DIALOG: &str = "bp-annotation-dialog";
pub const CLASS_ANNOTATION_CARET: &str = "bp-annotation-caret";
pub const CLASS_MOBILE_DIALOG_HEADER: &str = "bp-annotation-mobile-header";
pub const CLASS_DIALOG_CLOSE: &str = "bp-annotation-dialog-close";

// ============================================================================
// Command vocabulary (`data-type` attribute values)
// ============================================================================

pub const DATA_TYPE_ANNOTATION_DIALOG: &str = "annotation-dialog";
pub const DATA_TYPE_POST: &str = "post-annotation-btn";
pub const DATA_TYPE_CANCEL: &str = "cancel-annotation-btn";
pub const DATA_TYPE_REPLY_TEXTAREA: &str = "reply-textarea";
pub const DATA_TYPE_CANCEL_REPLY: &str = "cancel-reply-btn";
pub const DATA_TYPE_POST_REPLY: &str = "post-reply-btn";
pub const DATA_TYPE_DELETE: &str = "delete-btn";
pub const DATA_TYPE_CANCEL_DELETE: &str = "cancel-delete-btn";
pub const DATA_TYPE_CONFIRM_DELETE: &str = "confirm-delete-btn";
pub const DATA_TYPE_POST_DRAWING: &str = "post-drawing-btn";
pub const DATA_TYPE_DELETE_DRAWING: &str = "delete-drawing-btn";

/// Attribute carrying a comment's annotation id.
pub const ATTR_ANNOTATION_ID: &str = "data-annotation-id";

/// Attribute carrying the command name of an interactive element.
pub const ATTR_DATA_TYPE: &str = "data-type";

// ============================================================================
// Draw mode buttons
// ============================================================================

pub const SELECTOR_DRAW_CANCEL: &str = ".bp-btn-annotate-draw-cancel";
pub const SELECTOR_DRAW_POST: &str = ".bp-btn-annotate-draw-post";
pub const SELECTOR_DRAW_UNDO: &str = ".bp-btn-annotate-draw-undo";
pub const SELECTOR_DRAW_REDO: &str = ".bp-btn-annotate-draw-redo";

/// Header inserted into the annotator container when draw mode is registered.
pub const DRAW_MODE_HEADER: &str = r#"<div class="bp-annotate-draw-header bp-is-hidden">
    <button class="bp-btn-plain bp-btn-annotate-draw-undo" disabled>Undo</button>
    <button class="bp-btn-plain bp-btn-annotate-draw-redo" disabled>Redo</button>
    <button class="bp-btn-plain bp-btn-annotate-draw-cancel">Cancel</button>
    <button class="bp-btn-plain bp-btn-annotate-draw-post">Done</button>
</div>"#;

// ============================================================================
// Geometry
// ============================================================================

/// Half-size of the square searched around a pointer when selecting drawings.
pub const DRAW_BORDER_OFFSET: f32 = 5.0;

/// Padding above each document page.
pub const PAGE_PADDING_TOP: f32 = 15.0;

/// Height of the point annotation icon.
pub const POINT_ANNOTATION_ICON_HEIGHT: f32 = 31.0;

/// Height of the dot at the bottom of the point annotation icon.
pub const POINT_ANNOTATION_ICON_DOT_HEIGHT: f32 = 8.0;

/// Gap between the anchor point and the top of an unflipped point dialog.
pub const POINT_DIALOG_GAP: f32 = 7.0;

/// Minimum distance between the caret and either dialog edge.
pub const CARET_EDGE_INSET: f32 = 10.0;

/// Number of avatar colours cycled by user id.
pub const AVATAR_COLOR_COUNT: u64 = 9;

/// Page used for locations that do not carry one.
pub const DEFAULT_PAGE: u32 = 1;
