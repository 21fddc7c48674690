//! Annotation mode sessions.
//!
//! A mode controller owns the listener wiring for one annotation mode and the
//! threads registered with it. Shared state lives in [`ModeCore`]; behaviour
//! is provided by [`AnnotationMode`], whose default methods implement the
//! generic session and whose hooks are overridden by specialised modes such
//! as [`DrawingModeController`].

mod drawing;
mod handlers;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

pub use drawing::DrawingModeController;
pub use handlers::{HandlerDescriptor, ModeAction};

use crate::config::HeaderMode;
use crate::model::{
    thread_id, Annotation, AnnotationType, Location, SharedThread, SignalKind, ThreadEvent,
    ThreadId, ThreadSignal,
};
use crate::surface::{DomEvent, ElementId, EventType, Propagation, SharedSurface};
use crate::util::event_to_location;

/// Capabilities a mode controller needs from its annotator.
pub trait AnnotatorFacade {
    fn create_annotation_thread(
        &mut self,
        annotations: Vec<Annotation>,
        location: Option<Location>,
        kind: AnnotationType,
    ) -> SharedThread;

    /// Resolve a pointer event to a location, `None` when it hit no page.
    fn location_from_event(&self, event: &DomEvent, kind: AnnotationType) -> Option<Location>;

    /// File a thread under its page in the annotator's own thread map.
    fn add_thread_to_map(&mut self, thread: &SharedThread);

    /// Viewer-specific wiring of a thread's events.
    fn bind_custom_listeners_on_thread(&mut self, thread: &SharedThread);

    fn annotate_button(&self, selector: &str) -> Option<ElementId>;

    /// Ask the annotator to enter or leave the mode for `kind`.
    fn toggle_annotation_handler(&mut self, kind: AnnotationType);

    fn annotated_element(&self) -> ElementId;

    fn container(&self) -> ElementId;

    fn header_mode(&self) -> HeaderMode;
}

/// Shared handle to an annotator.
pub type SharedAnnotator = Rc<RefCell<dyn AnnotatorFacade>>;

/// State shared by every mode controller.
pub struct ModeCore {
    annotator: Option<Weak<RefCell<dyn AnnotatorFacade>>>,
    surface: SharedSurface,
    threads: Vec<SharedThread>,
    handlers: Vec<HandlerDescriptor>,
    subscriptions: HashMap<ThreadId, Vec<SignalKind>>,
}

impl ModeCore {
    pub fn new(surface: SharedSurface) -> Self {
        Self {
            annotator: None,
            surface,
            threads: Vec::new(),
            handlers: Vec::new(),
            subscriptions: HashMap::new(),
        }
    }

    /// Keep a lookup-only reference; the annotator outlives nothing here.
    pub fn set_annotator(&mut self, annotator: &SharedAnnotator) {
        self.annotator = Some(Rc::downgrade(annotator));
    }

    /// The registered annotator, if any and still alive.
    pub fn annotator(&self) -> Option<SharedAnnotator> {
        self.annotator.as_ref().and_then(Weak::upgrade)
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn threads(&self) -> &[SharedThread] {
        &self.threads
    }

    pub fn handlers(&self) -> &[HandlerDescriptor] {
        &self.handlers
    }

    /// Queue a descriptor without attaching it. Missing elements are skipped.
    pub fn push_element_handler(
        &mut self,
        element: Option<ElementId>,
        types: &[EventType],
        action: ModeAction,
    ) {
        let Some(element) = element else {
            return;
        };
        self.handlers
            .push(HandlerDescriptor::new(element, types, action));
    }

    /// Attach every descriptor from `start` on.
    fn attach_from(&mut self, start: usize) {
        for handler in self.handlers.iter_mut().skip(start) {
            handler.attach(&self.surface);
        }
    }

    /// Pop and detach every descriptor, newest first.
    pub fn detach_all(&mut self) {
        while let Some(mut handler) = self.handlers.pop() {
            handler.detach(&self.surface);
        }
    }

    pub fn add_thread(&mut self, thread: &SharedThread) {
        let id = thread_id(thread);
        if !self.threads.iter().any(|t| thread_id(t) == id) {
            self.threads.push(Rc::clone(thread));
        }
    }

    pub fn remove_thread(&mut self, thread: &SharedThread) {
        let id = thread_id(thread);
        self.threads.retain(|t| thread_id(t) != id);
    }

    pub fn subscribe(&mut self, thread: ThreadId, kind: SignalKind) {
        let kinds = self.subscriptions.entry(thread).or_default();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    pub fn unsubscribe(&mut self, thread: ThreadId, kind: SignalKind) {
        if let Some(kinds) = self.subscriptions.get_mut(&thread) {
            kinds.retain(|k| *k != kind);
            if kinds.is_empty() {
                self.subscriptions.remove(&thread);
            }
        }
    }

    pub fn is_subscribed(&self, thread: ThreadId, kind: SignalKind) -> bool {
        self.subscriptions
            .get(&thread)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Generic thread wiring: the annotator's hook, then `threadevent`.
    pub fn bind_thread_events(&mut self, thread: &SharedThread) {
        if let Some(annotator) = self.annotator() {
            annotator.borrow_mut().bind_custom_listeners_on_thread(thread);
        }
        self.subscribe(thread_id(thread), SignalKind::ThreadEvent);
    }

    /// Insert header markup as the container's new first child.
    pub fn setup_header(&mut self, container: ElementId, markup: &str) {
        self.surface
            .borrow_mut()
            .insert_before_first_child(container, markup);
    }
}

/// One annotation mode session.
pub trait AnnotationMode {
    fn core(&self) -> &ModeCore;
    fn core_mut(&mut self) -> &mut ModeCore;

    /// Annotation type this mode creates.
    fn mode_type(&self) -> AnnotationType {
        AnnotationType::Point
    }

    fn register_annotator(&mut self, annotator: &SharedAnnotator) {
        self.core_mut().set_annotator(annotator);
    }

    /// Set up handlers and attach only the descriptors added by this call.
    fn bind_mode_listeners(&mut self) {
        let start = self.core().handlers.len();
        self.setup_handlers();
        self.core_mut().attach_from(start);
        log::debug!(
            "🔗 Bound {} {} mode handlers",
            self.core().handlers.len() - start,
            self.mode_type().as_str()
        );
    }

    fn unbind_mode_listeners(&mut self) {
        self.core_mut().detach_all();
        log::debug!("✂️ Unbound {} mode handlers", self.mode_type().as_str());
    }

    fn register_thread(&mut self, thread: &SharedThread) {
        self.core_mut().add_thread(thread);
    }

    fn unregister_thread(&mut self, thread: &SharedThread) {
        self.core_mut().remove_thread(thread);
    }

    fn bind_custom_listeners_on_thread(&mut self, thread: &SharedThread) {
        self.core_mut().bind_thread_events(thread);
    }

    fn unbind_custom_listeners_on_thread(&mut self, thread: &SharedThread) {
        self.core_mut()
            .unsubscribe(thread_id(thread), SignalKind::ThreadEvent);
    }

    fn push_element_handler(
        &mut self,
        element: Option<ElementId>,
        types: &[EventType],
        action: ModeAction,
    ) {
        self.core_mut().push_element_handler(element, types, action);
    }

    fn setup_header(&mut self, container: ElementId, markup: &str) {
        self.core_mut().setup_header(container, markup);
    }

    /// Populate handler descriptors for a new session.
    fn setup_handlers(&mut self) {}

    /// React to a thread's generic `threadevent`.
    fn handle_annotation_event(&mut self, _thread: &SharedThread, _event: ThreadEvent) {}

    fn remove_selection(&mut self) {}

    /// Perform a bound action for `event`.
    fn run_action(&mut self, action: &ModeAction, event: &DomEvent) -> Propagation {
        let Some(annotator) = self.core().annotator() else {
            log::warn!("{:?} fired without a registered annotator", action);
            return Propagation::Continue;
        };
        let mode_type = self.mode_type();
        let locate = |e: &DomEvent| {
            annotator
                .borrow()
                .location_from_event(e, AnnotationType::Point)
        };

        log::trace!("{:?} on {:?}", action, event.kind);
        match action {
            ModeAction::Move(thread) => {
                event_to_location(Some(event), locate, |loc| {
                    thread.borrow_mut().handle_move(loc)
                })
            }
            ModeAction::Start(thread) => {
                event_to_location(Some(event), locate, |loc| {
                    thread.borrow_mut().handle_start(loc)
                })
            }
            ModeAction::Stop(thread) => {
                event_to_location(Some(event), locate, |loc| {
                    thread.borrow_mut().handle_stop(loc)
                })
            }
            ModeAction::Cancel(thread) => {
                thread.borrow_mut().cancel_unsaved_annotation();
                annotator.borrow_mut().toggle_annotation_handler(mode_type);
                Propagation::Continue
            }
            ModeAction::Post(thread) => {
                thread.borrow_mut().save_annotation(mode_type);
                annotator.borrow_mut().toggle_annotation_handler(mode_type);
                Propagation::Continue
            }
            ModeAction::Undo(thread) => {
                thread.borrow_mut().undo();
                Propagation::Continue
            }
            ModeAction::Redo(thread) => {
                thread.borrow_mut().redo();
                Propagation::Continue
            }
        }
    }

    /// Route a host event to every attached descriptor listening for it.
    fn dispatch_dom_event(&mut self, element: ElementId, event: &DomEvent) -> Propagation {
        let Some(kind) = event.kind else {
            return Propagation::Continue;
        };
        let actions: Vec<ModeAction> = self
            .core()
            .handlers
            .iter()
            .filter(|h| h.matches(element, kind))
            .map(|h| h.action.clone())
            .collect();

        let mut propagation = Propagation::Continue;
        for action in &actions {
            if self.run_action(action, event) == Propagation::Stop {
                propagation = Propagation::Stop;
            }
        }
        propagation
    }

    /// Deliver a queued thread signal, if this session listens for it.
    fn notify_thread(&mut self, thread: &SharedThread, signal: ThreadSignal) {
        let id = thread_id(thread);
        if !self.core().is_subscribed(id, signal.kind()) {
            log::trace!("Dropped {:?} from unsubscribed {}", signal, id);
            return;
        }

        match signal {
            ThreadSignal::ThreadEvent(event) => self.handle_annotation_event(thread, event),
            ThreadSignal::AnnotationSaved => self.register_thread(thread),
            ThreadSignal::AnnotationDelete => self.unregister_thread(thread),
        }
    }
}

/// Mode controller with the generic behaviour only.
pub struct AnnotationModeController {
    core: ModeCore,
}

impl AnnotationModeController {
    pub fn new(surface: SharedSurface) -> Self {
        Self {
            core: ModeCore::new(surface),
        }
    }
}

impl AnnotationMode for AnnotationModeController {
    fn core(&self) -> &ModeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModeCore {
        &mut self.core
    }
}
