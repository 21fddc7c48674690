//! In-memory drawing thread.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::HistoryConfig;
use crate::model::{
    AnnotationType, Bounds, Location, ThreadEvent, ThreadHandle, ThreadId, ThreadSignal,
    ThreadState,
};

use super::history::{Stroke, StrokeHistory};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

fn next_thread_id() -> ThreadId {
    ThreadId(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed))
}

/// A freehand drawing thread that records what it is asked to do.
///
/// Signals are queued rather than delivered; the host drains them with
/// [`MemoryDrawingThread::take_signals`].
#[derive(Debug)]
pub struct MemoryDrawingThread {
    id: ThreadId,
    location: Option<Location>,
    state: ThreadState,
    history: StrokeHistory,
    stroke: Option<Stroke>,
    boundary_drawn: bool,
    show_count: usize,
    destroyed: bool,
    deleted: bool,
    saved_kind: Option<AnnotationType>,
    cancelled: bool,
    calls: Vec<&'static str>,
    signals: Vec<ThreadSignal>,
}

impl Default for MemoryDrawingThread {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MemoryDrawingThread {
    pub fn new(location: Option<Location>) -> Self {
        Self::with_history(location, HistoryConfig::default())
    }

    pub fn with_history(location: Option<Location>, config: HistoryConfig) -> Self {
        Self {
            id: next_thread_id(),
            location,
            state: ThreadState::Pending,
            history: StrokeHistory::with_config(config),
            stroke: None,
            boundary_drawn: false,
            show_count: 0,
            destroyed: false,
            deleted: false,
            saved_kind: None,
            cancelled: false,
            calls: Vec::new(),
            signals: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: ThreadState) -> Self {
        self.state = state;
        self
    }

    /// Add an already finished stroke.
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.history.push(stroke);
        self
    }

    /// Signals emitted since the last call.
    pub fn take_signals(&mut self) -> Vec<ThreadSignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn pending_signals(&self) -> &[ThreadSignal] {
        &self.signals
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn boundary_drawn(&self) -> bool {
        self.boundary_drawn
    }

    pub fn show_count(&self) -> usize {
        self.show_count
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn saved_kind(&self) -> Option<AnnotationType> {
        self.saved_kind
    }

    /// Names of the handle methods called, oldest first.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    fn emit(&mut self, signal: ThreadSignal) {
        log::trace!("{} queued {:?}", self.id, signal);
        self.signals.push(signal);
    }

    fn emit_available_actions(&mut self) {
        let (undo, redo) = (self.history.undo_count(), self.history.redo_count());
        self.emit(ThreadSignal::ThreadEvent(ThreadEvent::AvailableActions {
            undo,
            redo,
        }));
    }

    fn on_current_page(&self, location: &Location) -> bool {
        self.location
            .is_some_and(|anchor| anchor.page_or_default() == location.page_or_default())
    }
}

impl ThreadHandle for MemoryDrawingThread {
    fn id(&self) -> ThreadId {
        self.id
    }

    fn location(&self) -> Option<Location> {
        self.location
    }

    fn state(&self) -> ThreadState {
        self.state
    }

    fn bounds(&self) -> Option<Bounds> {
        self.history.bounds()
    }

    fn handle_move(&mut self, location: Option<Location>) {
        let Some(location) = location else {
            return;
        };
        if !self.on_current_page(&location) {
            return;
        }
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.points.push(location.point());
        }
    }

    fn handle_start(&mut self, location: Option<Location>) {
        self.calls.push("handle_start");
        let Some(location) = location else {
            return;
        };

        match self.location {
            None => {
                self.location = Some(location);
                self.emit(ThreadSignal::ThreadEvent(ThreadEvent::LocationAssigned));
            }
            // Drawing continues on another page: the current drawing is done
            Some(_) if !self.on_current_page(&location) => {
                if !self.history.is_empty() {
                    self.emit(ThreadSignal::ThreadEvent(ThreadEvent::SoftCommit {
                        location: Some(location),
                    }));
                }
                return;
            }
            Some(_) => {}
        }

        self.stroke = Some(Stroke::new(vec![location.point()]));
    }

    fn handle_stop(&mut self, location: Option<Location>) {
        self.calls.push("handle_stop");
        let Some(mut stroke) = self.stroke.take() else {
            return;
        };
        if let Some(location) = location.filter(|l| self.on_current_page(l)) {
            let point = location.point();
            if stroke.points.last() != Some(&point) {
                stroke.points.push(point);
            }
        }
        self.history.push(stroke);
        self.emit_available_actions();
    }

    fn undo(&mut self) {
        self.calls.push("undo");
        if self.history.undo() {
            self.emit_available_actions();
        }
    }

    fn redo(&mut self) {
        self.calls.push("redo");
        if self.history.redo() {
            self.emit_available_actions();
        }
    }

    fn save_annotation(&mut self, kind: AnnotationType) {
        self.calls.push("save_annotation");
        if self.history.is_empty() {
            log::debug!("Nothing drawn on {}, not saving", self.id);
            return;
        }
        self.stroke = None;
        self.state = ThreadState::Inactive;
        self.saved_kind = Some(kind);
        self.emit(ThreadSignal::AnnotationSaved);
    }

    fn cancel_unsaved_annotation(&mut self) {
        self.calls.push("cancel_unsaved_annotation");
        if !self.state.is_pending() {
            return;
        }
        self.cancelled = true;
        self.destroy();
    }

    fn destroy(&mut self) {
        self.calls.push("destroy");
        self.stroke = None;
        self.history.clear();
        self.boundary_drawn = false;
        self.destroyed = true;
    }

    fn delete_thread(&mut self) {
        self.calls.push("delete_thread");
        self.deleted = true;
        self.boundary_drawn = false;
        self.emit(ThreadSignal::AnnotationDelete);
    }

    fn show(&mut self) {
        self.show_count += 1;
    }

    fn draw_boundary(&mut self) {
        self.boundary_drawn = true;
    }

    fn clear_boundary(&mut self) {
        self.boundary_drawn = false;
    }
}
