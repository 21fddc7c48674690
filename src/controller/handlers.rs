//! Handler descriptors owned by a mode session.

use std::fmt;

use crate::model::{thread_id, SharedThread, ThreadId};
use crate::surface::{ElementId, EventType, SharedSurface};

/// What a bound handler does when its event fires.
///
/// Actions capture the thread that was current when handlers were set up, so
/// a stale descriptor can never act on a newer thread.
#[derive(Clone)]
pub enum ModeAction {
    /// Pointer moved over the annotated element
    Move(SharedThread),
    /// Pointer went down
    Start(SharedThread),
    /// Pointer went up or the touch ended
    Stop(SharedThread),
    /// Cancel button: drop the unsaved thread and leave the mode
    Cancel(SharedThread),
    /// Post button: save the thread and leave the mode
    Post(SharedThread),
    Undo(SharedThread),
    Redo(SharedThread),
}

impl ModeAction {
    pub fn name(&self) -> &'static str {
        match self {
            ModeAction::Move(_) => "move",
            ModeAction::Start(_) => "start",
            ModeAction::Stop(_) => "stop",
            ModeAction::Cancel(_) => "cancel",
            ModeAction::Post(_) => "post",
            ModeAction::Undo(_) => "undo",
            ModeAction::Redo(_) => "redo",
        }
    }

    pub fn thread(&self) -> &SharedThread {
        match self {
            ModeAction::Move(thread)
            | ModeAction::Start(thread)
            | ModeAction::Stop(thread)
            | ModeAction::Cancel(thread)
            | ModeAction::Post(thread)
            | ModeAction::Undo(thread)
            | ModeAction::Redo(thread) => thread,
        }
    }

    pub fn thread_id(&self) -> ThreadId {
        thread_id(self.thread())
    }
}

impl fmt::Debug for ModeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.thread_id())
    }
}

/// One pending or attached listener set.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    pub element: ElementId,
    /// Every event name shares the same action
    pub types: Vec<EventType>,
    pub action: ModeAction,
    /// Listeners currently added on the surface
    pub attached: bool,
}

impl HandlerDescriptor {
    pub fn new(element: ElementId, types: &[EventType], action: ModeAction) -> Self {
        Self {
            element,
            types: types.to_vec(),
            action,
            attached: false,
        }
    }

    /// Whether this descriptor reacts to `kind` on `element`.
    pub fn matches(&self, element: ElementId, kind: EventType) -> bool {
        self.attached && self.element == element && self.types.contains(&kind)
    }

    pub(crate) fn attach(&mut self, surface: &SharedSurface) {
        if self.attached {
            return;
        }
        let mut surface = surface.borrow_mut();
        for kind in &self.types {
            surface.add_event_listener(self.element, *kind);
        }
        self.attached = true;
    }

    pub(crate) fn detach(&mut self, surface: &SharedSurface) {
        if !self.attached {
            return;
        }
        let mut surface = surface.borrow_mut();
        for kind in &self.types {
            surface.remove_event_listener(self.element, *kind);
        }
        self.attached = false;
    }
}
