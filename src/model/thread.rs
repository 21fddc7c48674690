//! Annotation thread collaborator interface.
//!
//! A thread groups the annotations sharing one location. Threads are owned by
//! the annotator; dialogs and mode controllers only hold shared handles.
//! Threads never call back into a controller: anything they emit is queued
//! and delivered by the host through `AnnotationMode::notify_thread`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::annotation::AnnotationType;
use super::geometry::{Bounds, Location};

/// Process-unique thread identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadId(pub u64);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread#{}", self.0)
    }
}

/// Lifecycle state of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadState {
    /// Not saved yet
    #[default]
    Pending,
    /// Not saved and a comment is being written
    PendingActive,
    /// Saved, pointer elsewhere
    Inactive,
    /// Saved, pointer over it
    Hover,
}

impl ThreadState {
    /// Whether the thread has not been saved yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, ThreadState::Pending | ThreadState::PendingActive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadState::Pending => "pending",
            ThreadState::PendingActive => "pending-active",
            ThreadState::Inactive => "inactive",
            ThreadState::Hover => "hover",
        }
    }
}

/// Payload of a thread's generic `threadevent` signal.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadEvent {
    /// The drawing's anchor point was fixed; fires once per thread
    LocationAssigned,
    /// The in-progress drawing should be saved; `location` is where drawing
    /// continues (e.g. after crossing onto another page)
    SoftCommit { location: Option<Location> },
    /// The thread's dialog asked for deletion
    DialogDelete,
    /// Number of undoable and redoable strokes changed
    AvailableActions { undo: usize, redo: usize },
    /// Any event a controller does not react to
    Other(String),
}

impl ThreadEvent {
    /// Event name as emitted on the wire.
    pub fn name(&self) -> &str {
        match self {
            ThreadEvent::LocationAssigned => "locationassigned",
            ThreadEvent::SoftCommit { .. } => "softcommit",
            ThreadEvent::DialogDelete => "dialogdelete",
            ThreadEvent::AvailableActions { .. } => "availableactions",
            ThreadEvent::Other(name) => name,
        }
    }
}

/// Everything a thread can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadSignal {
    /// Generic lifecycle event
    ThreadEvent(ThreadEvent),
    /// The thread was saved and its bounds are final
    AnnotationSaved,
    /// The thread was deleted
    AnnotationDelete,
}

impl ThreadSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            ThreadSignal::ThreadEvent(_) => SignalKind::ThreadEvent,
            ThreadSignal::AnnotationSaved => SignalKind::AnnotationSaved,
            ThreadSignal::AnnotationDelete => SignalKind::AnnotationDelete,
        }
    }
}

/// Signal names a controller can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    ThreadEvent,
    AnnotationSaved,
    AnnotationDelete,
}

/// Capability surface of an annotation thread.
pub trait ThreadHandle {
    fn id(&self) -> ThreadId;

    /// Anchor location, `None` until one has been assigned.
    fn location(&self) -> Option<Location>;

    fn state(&self) -> ThreadState;

    /// Extents of the drawn content, if any.
    fn bounds(&self) -> Option<Bounds> {
        None
    }

    fn handle_move(&mut self, _location: Option<Location>) {}
    fn handle_start(&mut self, _location: Option<Location>) {}
    fn handle_stop(&mut self, _location: Option<Location>) {}

    fn undo(&mut self) {}
    fn redo(&mut self) {}

    fn save_annotation(&mut self, kind: AnnotationType);
    fn cancel_unsaved_annotation(&mut self);

    /// Tear down locally without contacting the server.
    fn destroy(&mut self);

    /// Delete the thread remotely.
    fn delete_thread(&mut self);

    /// Render (or re-render) the thread.
    fn show(&mut self);

    fn draw_boundary(&mut self) {}
    fn clear_boundary(&mut self) {}
}

/// Shared, single-threaded handle to a thread.
pub type SharedThread = Rc<RefCell<dyn ThreadHandle>>;

/// Wrap a concrete thread into a [`SharedThread`].
pub fn share<T: ThreadHandle + 'static>(thread: T) -> SharedThread {
    Rc::new(RefCell::new(thread))
}

/// Identity of a shared thread.
pub fn thread_id(thread: &SharedThread) -> ThreadId {
    thread.borrow().id()
}
