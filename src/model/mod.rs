//! Data models shared by dialogs and mode controllers.

mod annotation;
mod geometry;
mod thread;

pub use annotation::{Annotation, AnnotationId, AnnotationType, Permissions, User};
pub use geometry::{Bounds, Dimensions, Location, Point, Rect, Size};
pub use thread::{
    share, thread_id, SharedThread, SignalKind, ThreadEvent, ThreadHandle, ThreadId,
    ThreadSignal, ThreadState,
};
