//! Scenario tests driving dialogs and mode controllers through the in-memory
//! collaborators.

mod drawing_tests;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{HeaderMode, SelectionConfig, TieBreakMode};
use crate::controller::{AnnotationMode, DrawingModeController, SharedAnnotator};
use crate::memory::{pump_signals, MemoryAnnotator, MemoryDrawingThread, RecordingSurface, Stroke};
use crate::model::{
    AnnotationType, Bounds, Location, Point, ThreadHandle, ThreadId, ThreadState,
};
use crate::surface::{DomEvent, ElementId, EventType, Propagation, SharedSurface};

pub(crate) const ANNOTATED: ElementId = ElementId(1);
pub(crate) const CONTAINER: ElementId = ElementId(2);
pub(crate) const CANCEL_BUTTON: ElementId = ElementId(10);
pub(crate) const POST_BUTTON: ElementId = ElementId(11);
pub(crate) const UNDO_BUTTON: ElementId = ElementId(12);
pub(crate) const REDO_BUTTON: ElementId = ElementId(13);

/// Listeners one draw mode session attaches: pointer events on the annotated
/// element (2 + 2 + 3) plus one click per button.
pub(crate) const DRAW_SESSION_LISTENERS: usize = 11;

/// A draw mode controller wired to a recording surface and memory annotator.
pub(crate) struct DrawSession {
    pub surface: Rc<RefCell<RecordingSurface>>,
    pub annotator: Rc<RefCell<MemoryAnnotator>>,
    pub controller: DrawingModeController,
}

impl DrawSession {
    pub fn new(tie_break: TieBreakMode) -> Self {
        Self::with_header(tie_break, HeaderMode::Light)
    }

    pub fn with_header(tie_break: TieBreakMode, header: HeaderMode) -> Self {
        let surface = Rc::new(RefCell::new(RecordingSurface::new()));
        let shared_surface: SharedSurface = surface.clone();
        let annotator = Rc::new(RefCell::new(
            MemoryAnnotator::new(ANNOTATED, CONTAINER)
                .with_header_mode(header)
                .with_draw_buttons(CANCEL_BUTTON),
        ));
        let shared_annotator: SharedAnnotator = annotator.clone();

        let selection = SelectionConfig {
            tie_break,
            ..SelectionConfig::default()
        };
        let mut controller = DrawingModeController::new(shared_surface, &selection);
        controller.register_annotator(&shared_annotator);

        Self {
            surface,
            annotator,
            controller,
        }
    }

    /// Deliver every queued thread signal.
    pub fn pump(&mut self) -> usize {
        pump_signals(&self.annotator, &mut self.controller)
    }

    /// Pointer event on the annotated element, followed by a pump.
    pub fn pointer(&mut self, kind: EventType, x: f32, y: f32, page: u32) -> Propagation {
        let event = DomEvent::pointer(kind, x, y).on_page(page);
        let propagation = self.controller.dispatch_dom_event(ANNOTATED, &event);
        self.pump();
        propagation
    }

    /// One stroke from `from` to `to` on `page`.
    pub fn stroke(&mut self, from: (f32, f32), to: (f32, f32), page: u32) {
        self.pointer(EventType::MouseDown, from.0, from.1, page);
        self.pointer(EventType::MouseMove, to.0, from.1, page);
        self.pointer(EventType::MouseUp, to.0, to.1, page);
    }

    /// Click a toolbar button, followed by a pump.
    pub fn click(&mut self, button: ElementId) -> Propagation {
        let event = DomEvent::pointer(EventType::Click, 0.0, 0.0);
        let propagation = self.controller.dispatch_dom_event(button, &event);
        self.pump();
        propagation
    }

    /// Concrete handle of the controller's current thread.
    pub fn current(&self) -> Rc<RefCell<MemoryDrawingThread>> {
        let id = self
            .controller
            .current_thread()
            .map(|t| t.borrow().id())
            .expect("a bound session has a current thread");
        self.annotator.borrow().thread(id).expect("created by the annotator")
    }

    /// A saved drawing on `page` covering `bounds`, owned by the annotator.
    pub fn saved_drawing(&self, page: u32, bounds: Bounds) -> Rc<RefCell<MemoryDrawingThread>> {
        self.annotator
            .borrow_mut()
            .adopt(drawing(page, bounds).with_state(ThreadState::Inactive))
    }
}

/// An unsaved drawing with one stroke spanning `bounds`.
pub(crate) fn drawing(page: u32, bounds: Bounds) -> MemoryDrawingThread {
    let location = Location::new(bounds.min_x, bounds.min_y).on_page(page);
    MemoryDrawingThread::new(Some(location)).with_stroke(Stroke::new(vec![
        Point::new(bounds.min_x, bounds.min_y),
        Point::new(bounds.max_x, bounds.max_y),
    ]))
}

/// Thread recording every call into a journal shared with other threads, so
/// tests can assert on the order of calls across threads.
pub(crate) struct JournalThread {
    id: ThreadId,
    name: &'static str,
    location: Option<Location>,
    state: ThreadState,
    bounds: Option<Bounds>,
    journal: Rc<RefCell<Vec<String>>>,
}

impl JournalThread {
    pub fn new(id: u64, name: &'static str, journal: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            id: ThreadId(u64::MAX - id),
            name,
            location: None,
            state: ThreadState::Inactive,
            bounds: None,
            journal: Rc::clone(journal),
        }
    }

    pub fn at(mut self, page: u32, bounds: Bounds) -> Self {
        self.location = Some(Location::new(bounds.min_x, bounds.min_y).on_page(page));
        self.bounds = Some(bounds);
        self
    }

    fn record(&self, call: &str) {
        self.journal.borrow_mut().push(format!("{}.{}", self.name, call));
    }
}

impl ThreadHandle for JournalThread {
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
        self.bounds
    }

    fn save_annotation(&mut self, _kind: AnnotationType) {
        self.record("save_annotation");
    }

    fn cancel_unsaved_annotation(&mut self) {
        self.record("cancel_unsaved_annotation");
    }

    fn destroy(&mut self) {
        self.record("destroy");
    }

    fn delete_thread(&mut self) {
        self.record("delete_thread");
    }

    fn show(&mut self) {
        self.record("show");
    }

    fn draw_boundary(&mut self) {
        self.record("draw_boundary");
    }

    fn clear_boundary(&mut self) {
        self.record("clear_boundary");
    }
}
