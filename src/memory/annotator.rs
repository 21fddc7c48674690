//! In-memory annotator backing a mode session.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::config::{HeaderMode, HistoryConfig};
use crate::constants::{
    SELECTOR_DRAW_CANCEL, SELECTOR_DRAW_POST, SELECTOR_DRAW_REDO, SELECTOR_DRAW_UNDO,
};
use crate::controller::AnnotatorFacade;
use crate::model::{
    thread_id, Annotation, AnnotationType, Location, SharedThread, ThreadHandle, ThreadId,
    ThreadSignal,
};
use crate::surface::{DomEvent, ElementId};

use super::thread::MemoryDrawingThread;

/// Owns every thread it creates and records what controllers ask of it.
pub struct MemoryAnnotator {
    annotated_element: ElementId,
    container: ElementId,
    header_mode: HeaderMode,
    history: HistoryConfig,
    buttons: HashMap<String, ElementId>,
    threads: Vec<Rc<RefCell<MemoryDrawingThread>>>,
    thread_map: BTreeMap<u32, Vec<ThreadId>>,
    custom_bound: Vec<ThreadId>,
    toggles: Vec<AnnotationType>,
}

impl MemoryAnnotator {
    pub fn new(annotated_element: ElementId, container: ElementId) -> Self {
        Self {
            annotated_element,
            container,
            header_mode: HeaderMode::default(),
            history: HistoryConfig::default(),
            buttons: HashMap::new(),
            threads: Vec::new(),
            thread_map: BTreeMap::new(),
            custom_bound: Vec::new(),
            toggles: Vec::new(),
        }
    }

    pub fn with_header_mode(mut self, header_mode: HeaderMode) -> Self {
        self.header_mode = header_mode;
        self
    }

    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    pub fn with_button(mut self, selector: &str, element: ElementId) -> Self {
        self.buttons.insert(selector.to_string(), element);
        self
    }

    /// Register the four draw mode buttons on consecutive ids after `first`.
    pub fn with_draw_buttons(self, first: ElementId) -> Self {
        [
            SELECTOR_DRAW_CANCEL,
            SELECTOR_DRAW_POST,
            SELECTOR_DRAW_UNDO,
            SELECTOR_DRAW_REDO,
        ]
        .into_iter()
        .zip(first.0..)
        .fold(self, |annotator, (selector, id)| {
            annotator.with_button(selector, ElementId(id))
        })
    }

    /// Adopt an externally built thread, e.g. a previously saved drawing.
    pub fn adopt(&mut self, thread: MemoryDrawingThread) -> Rc<RefCell<MemoryDrawingThread>> {
        let thread = Rc::new(RefCell::new(thread));
        self.threads.push(Rc::clone(&thread));
        thread
    }

    /// Every thread created or adopted, oldest first.
    pub fn threads(&self) -> &[Rc<RefCell<MemoryDrawingThread>>] {
        &self.threads
    }

    pub fn thread(&self, id: ThreadId) -> Option<Rc<RefCell<MemoryDrawingThread>>> {
        self.threads
            .iter()
            .find(|t| t.borrow().id() == id)
            .map(Rc::clone)
    }

    /// Most recently created thread.
    pub fn latest_thread(&self) -> Option<Rc<RefCell<MemoryDrawingThread>>> {
        self.threads.last().map(Rc::clone)
    }

    pub fn threads_on_page(&self, page: u32) -> &[ThreadId] {
        self.thread_map
            .get(&page)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn custom_bound(&self) -> &[ThreadId] {
        &self.custom_bound
    }

    /// Mode toggles requested so far, oldest first.
    pub fn toggles(&self) -> &[AnnotationType] {
        &self.toggles
    }

    /// Take every signal queued on any thread, oldest thread first.
    ///
    /// Threads destroyed since the last drain are released afterwards.
    pub fn drain_signals(&mut self) -> Vec<(SharedThread, ThreadSignal)> {
        let mut drained = Vec::new();
        for thread in &self.threads {
            let signals = thread.borrow_mut().take_signals();
            if signals.is_empty() {
                continue;
            }
            let shared: SharedThread = thread.clone();
            drained.extend(signals.into_iter().map(|s| (Rc::clone(&shared), s)));
        }
        self.release_destroyed();
        drained
    }

    /// Forget destroyed threads, including their page map entries.
    fn release_destroyed(&mut self) {
        let mut released = Vec::new();
        self.threads.retain(|thread| {
            let thread = thread.borrow();
            if thread.is_destroyed() {
                released.push(thread.id());
            }
            !thread.is_destroyed()
        });
        if released.is_empty() {
            return;
        }

        for ids in self.thread_map.values_mut() {
            ids.retain(|id| !released.contains(id));
        }
        self.thread_map.retain(|_, ids| !ids.is_empty());
        self.custom_bound.retain(|id| !released.contains(id));
        log::debug!("♻️ Released {} destroyed threads", released.len());
    }
}

impl AnnotatorFacade for MemoryAnnotator {
    fn create_annotation_thread(
        &mut self,
        annotations: Vec<Annotation>,
        location: Option<Location>,
        kind: AnnotationType,
    ) -> SharedThread {
        let thread = self.adopt(MemoryDrawingThread::with_history(
            location,
            self.history.clone(),
        ));
        log::debug!(
            "Created {} {} thread with {} annotations",
            thread.borrow().id(),
            kind.as_str(),
            annotations.len()
        );
        thread
    }

    fn location_from_event(&self, event: &DomEvent, _kind: AnnotationType) -> Option<Location> {
        let point = event.client;
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let location = Location::new(point.x, point.y);
        Some(match event.page {
            Some(page) => location.on_page(page),
            None => location,
        })
    }

    fn add_thread_to_map(&mut self, thread: &SharedThread) {
        let Some(location) = thread.borrow().location() else {
            return;
        };
        let id = thread_id(thread);
        let page = self.thread_map.entry(location.page_or_default()).or_default();
        if !page.contains(&id) {
            page.push(id);
        }
    }

    fn bind_custom_listeners_on_thread(&mut self, thread: &SharedThread) {
        self.custom_bound.push(thread_id(thread));
    }

    fn annotate_button(&self, selector: &str) -> Option<ElementId> {
        self.buttons.get(selector).copied()
    }

    fn toggle_annotation_handler(&mut self, kind: AnnotationType) {
        log::debug!("Toggle {} mode requested", kind.as_str());
        self.toggles.push(kind);
    }

    fn annotated_element(&self) -> ElementId {
        self.annotated_element
    }

    fn container(&self) -> ElementId {
        self.container
    }

    fn header_mode(&self) -> HeaderMode {
        self.header_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::EventType;

    #[test]
    fn test_draw_buttons_are_consecutive() {
        let annotator = MemoryAnnotator::new(ElementId(1), ElementId(2))
            .with_draw_buttons(ElementId(10));
        assert_eq!(
            annotator.annotate_button(SELECTOR_DRAW_CANCEL),
            Some(ElementId(10))
        );
        assert_eq!(
            annotator.annotate_button(SELECTOR_DRAW_REDO),
            Some(ElementId(13))
        );
        assert_eq!(annotator.annotate_button(".missing"), None);
    }

    #[test]
    fn test_location_from_event() {
        let annotator = MemoryAnnotator::new(ElementId(1), ElementId(2));
        let event = DomEvent::pointer(EventType::MouseDown, 4.0, 8.0).on_page(3);
        let location = annotator
            .location_from_event(&event, AnnotationType::Point)
            .expect("on page");
        assert_eq!(location, Location::new(4.0, 8.0).on_page(3));

        let outside = DomEvent::pointer(EventType::MouseDown, -1.0, 8.0);
        assert!(
            annotator
                .location_from_event(&outside, AnnotationType::Point)
                .is_none()
        );
    }

    #[test]
    fn test_destroyed_threads_are_released_on_drain() {
        let mut annotator = MemoryAnnotator::new(ElementId(1), ElementId(2));
        let kept = annotator.create_annotation_thread(
            Vec::new(),
            Some(Location::new(1.0, 1.0).on_page(1)),
            AnnotationType::Draw,
        );
        let dropped = annotator.create_annotation_thread(
            Vec::new(),
            Some(Location::new(2.0, 2.0).on_page(1)),
            AnnotationType::Draw,
        );
        annotator.add_thread_to_map(&kept);
        annotator.add_thread_to_map(&dropped);
        annotator.bind_custom_listeners_on_thread(&dropped);

        dropped.borrow_mut().delete_thread();
        dropped.borrow_mut().destroy();
        let drained = annotator.drain_signals();

        // Signals queued before destruction are still delivered
        assert_eq!(drained.len(), 1);
        assert_eq!(annotator.threads().len(), 1);
        assert!(annotator.thread(thread_id(&dropped)).is_none());
        assert_eq!(annotator.threads_on_page(1), &[thread_id(&kept)]);
        assert!(annotator.custom_bound().is_empty());
    }

    #[test]
    fn test_thread_map_files_by_page() {
        let mut annotator = MemoryAnnotator::new(ElementId(1), ElementId(2));
        let thread = annotator.create_annotation_thread(
            Vec::new(),
            Some(Location::new(1.0, 1.0).on_page(2)),
            AnnotationType::Draw,
        );
        annotator.add_thread_to_map(&thread);
        annotator.add_thread_to_map(&thread);
        assert_eq!(annotator.threads_on_page(2), &[thread_id(&thread)]);
        assert!(annotator.threads_on_page(1).is_empty());
    }
}
