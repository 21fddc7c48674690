//! Freehand drawing mode.
//!
//! Saved drawings are indexed per page by their bounding boxes so a click can
//! find every drawing under the pointer. Overlapping drawings cannot be told
//! apart by bounds alone; a [`TieBreak`] policy picks one of them.

use std::rc::Rc;

use crate::config::{HeaderMode, SelectionConfig};
use crate::constants::{
    CLASS_ANNOTATION_DRAW_MODE, DRAW_MODE_HEADER, SELECTOR_DRAW_CANCEL, SELECTOR_DRAW_POST,
    SELECTOR_DRAW_REDO, SELECTOR_DRAW_UNDO,
};
use crate::model::{
    thread_id, AnnotationType, Bounds, Location, SharedThread, SignalKind, ThreadEvent, ThreadState,
};
use crate::spatial::{tie_break_for, PagedIndex, TieBreak};
use crate::surface::{DomEvent, ElementId, EventType, SharedSurface};

use super::{AnnotationMode, ModeAction, ModeCore, SharedAnnotator};

/// Draw, commit, undo and select freehand drawings.
pub struct DrawingModeController {
    core: ModeCore,
    index: PagedIndex<SharedThread>,
    current_thread: Option<SharedThread>,
    selected_thread: Option<SharedThread>,
    cancel_button: Option<ElementId>,
    post_button: Option<ElementId>,
    undo_button: Option<ElementId>,
    redo_button: Option<ElementId>,
    border_offset: f32,
    tie_break: Box<dyn TieBreak<SharedThread>>,
}

impl DrawingModeController {
    pub fn new(surface: SharedSurface, selection: &SelectionConfig) -> Self {
        Self {
            core: ModeCore::new(surface),
            index: PagedIndex::new(),
            current_thread: None,
            selected_thread: None,
            cancel_button: None,
            post_button: None,
            undo_button: None,
            redo_button: None,
            border_offset: selection.border_offset,
            tie_break: tie_break_for(selection.tie_break),
        }
    }

    /// Replace the policy used for overlapping drawings.
    pub fn with_tie_break(mut self, tie_break: Box<dyn TieBreak<SharedThread>>) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Thread that pointer events currently draw into.
    pub fn current_thread(&self) -> Option<&SharedThread> {
        self.current_thread.as_ref()
    }

    pub fn selected_thread(&self) -> Option<&SharedThread> {
        self.selected_thread.as_ref()
    }

    pub fn index(&self) -> &PagedIndex<SharedThread> {
        &self.index
    }

    pub fn undo_button(&self) -> Option<ElementId> {
        self.undo_button
    }

    pub fn redo_button(&self) -> Option<ElementId> {
        self.redo_button
    }

    /// Page and box filed for a thread: its drawn extents, else its anchor
    /// point. Threads without a location cannot be filed.
    fn placement(thread: &SharedThread) -> Option<(u32, Bounds)> {
        let thread = thread.borrow();
        let location = thread.location()?;
        let bounds = thread
            .bounds()
            .unwrap_or_else(|| Bounds::from_point(location.point()));
        Some((location.page_or_default(), bounds))
    }

    /// Select the drawing under a pointer event.
    ///
    /// Events on buttons are ignored so the button's own handler wins.
    pub fn handle_selection(&mut self, event: Option<&DomEvent>) {
        let Some(event) = event else {
            return;
        };
        if event.targets_button() {
            return;
        }

        let Some(annotator) = self.core.annotator() else {
            return;
        };
        let location = annotator
            .borrow()
            .location_from_event(event, AnnotationType::Point);
        let Some(location) = location else {
            return;
        };

        let area = Bounds::around(location.point(), self.border_offset);
        let candidates = self.index.search(location.page_or_default(), &area);

        self.remove_selection();

        let chosen = self
            .tie_break
            .choose(&candidates)
            .and_then(|index| candidates.get(index));
        match chosen {
            Some(candidate) => {
                log::debug!(
                    "🎯 Selected {} among {} candidates",
                    candidate.id,
                    candidates.len()
                );
                let thread = Rc::clone(&candidate.value);
                self.select(&thread);
            }
            None => self.selected_thread = None,
        }
    }

    /// Highlight `thread` and make it the selection.
    pub fn select(&mut self, thread: &SharedThread) {
        self.remove_selection();
        thread.borrow_mut().draw_boundary();
        self.selected_thread = Some(Rc::clone(thread));
    }

    /// Enable on exactly one step available, disable on none; deeper
    /// histories leave the buttons as they are.
    pub fn update_undo_redo_buttons(&mut self, undo_count: usize, redo_count: usize) {
        let mut surface = self.core.surface().borrow_mut();
        for (button, count) in [(self.undo_button, undo_count), (self.redo_button, redo_count)] {
            let Some(button) = button else {
                continue;
            };
            match count {
                1 => surface.set_disabled(button, false),
                0 => surface.set_disabled(button, true),
                _ => {}
            }
        }
    }

    fn disable_undo_redo(&mut self) {
        let mut surface = self.core.surface().borrow_mut();
        for button in [self.undo_button, self.redo_button].into_iter().flatten() {
            surface.set_disabled(button, true);
        }
    }

    fn soft_commit(&mut self, thread: &SharedThread, location: Option<Location>) {
        log::debug!("💾 Soft commit of {}", thread_id(thread));
        self.current_thread = None;
        thread.borrow_mut().save_annotation(AnnotationType::Draw);
        self.unbind_mode_listeners();
        self.bind_mode_listeners();

        if let (Some(location), Some(current)) = (location, &self.current_thread) {
            current.borrow_mut().handle_start(Some(location));
        }
    }

    fn delete_drawing(&mut self, thread: &SharedThread) {
        let state = thread.borrow().state();
        if state == ThreadState::Pending {
            log::debug!("♻️ Discarding unsaved {}", thread_id(thread));
            thread.borrow_mut().destroy();
            self.unbind_mode_listeners();
            self.bind_mode_listeners();
            return;
        }

        let id = thread_id(thread);
        let page = self.index.page_of(id).or_else(|| {
            thread
                .borrow()
                .location()
                .map(|location| location.page_or_default())
        });

        log::debug!("🗑️ Deleting {}", id);
        thread.borrow_mut().delete_thread();
        self.unregister_thread(thread);

        // The deleted drawing may have covered others on its page
        if let Some(page) = page {
            for candidate in self.index.threads_on_page(page) {
                candidate.value.borrow_mut().show();
            }
        }
    }
}

impl AnnotationMode for DrawingModeController {
    fn core(&self) -> &ModeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModeCore {
        &mut self.core
    }

    fn mode_type(&self) -> AnnotationType {
        AnnotationType::Draw
    }

    fn register_annotator(&mut self, annotator: &SharedAnnotator) {
        self.core.set_annotator(annotator);

        let annotator = annotator.borrow();
        if annotator.header_mode() != HeaderMode::None {
            self.core
                .setup_header(annotator.container(), DRAW_MODE_HEADER);
        }

        self.cancel_button = annotator.annotate_button(SELECTOR_DRAW_CANCEL);
        self.post_button = annotator.annotate_button(SELECTOR_DRAW_POST);
        self.undo_button = annotator.annotate_button(SELECTOR_DRAW_UNDO);
        self.redo_button = annotator.annotate_button(SELECTOR_DRAW_REDO);

        self.core
            .surface()
            .borrow_mut()
            .add_class(annotator.annotated_element(), CLASS_ANNOTATION_DRAW_MODE);
    }

    fn unbind_mode_listeners(&mut self) {
        self.core.detach_all();
        self.disable_undo_redo();
        log::debug!("✂️ Unbound draw mode handlers");
    }

    fn register_thread(&mut self, thread: &SharedThread) {
        let Some((page, bounds)) = Self::placement(thread) else {
            return;
        };
        let id = thread_id(thread);
        if self.index.insert(page, id, bounds, Rc::clone(thread)) {
            log::debug!("Re-indexed {} on page {}", id, page);
        }
    }

    fn unregister_thread(&mut self, thread: &SharedThread) {
        if thread.borrow().location().is_none() {
            return;
        }
        self.index.remove(thread_id(thread));
    }

    fn bind_custom_listeners_on_thread(&mut self, thread: &SharedThread) {
        self.core.bind_thread_events(thread);

        let id = thread_id(thread);
        self.core.subscribe(id, SignalKind::AnnotationSaved);
        self.core.subscribe(id, SignalKind::AnnotationDelete);
    }

    fn setup_handlers(&mut self) {
        let Some(annotator) = self.core.annotator() else {
            log::warn!("Draw mode bound without a registered annotator");
            return;
        };

        let thread = annotator.borrow_mut().create_annotation_thread(
            Vec::new(),
            None,
            AnnotationType::Draw,
        );
        self.current_thread = Some(Rc::clone(&thread));
        self.bind_custom_listeners_on_thread(&thread);

        let element = Some(annotator.borrow().annotated_element());
        self.push_element_handler(
            element,
            &[EventType::MouseMove, EventType::TouchMove],
            ModeAction::Move(Rc::clone(&thread)),
        );
        self.push_element_handler(
            element,
            &[EventType::MouseDown, EventType::TouchStart],
            ModeAction::Start(Rc::clone(&thread)),
        );
        self.push_element_handler(
            element,
            &[
                EventType::MouseUp,
                EventType::TouchCancel,
                EventType::TouchEnd,
            ],
            ModeAction::Stop(Rc::clone(&thread)),
        );
        self.push_element_handler(
            self.cancel_button,
            &[EventType::Click],
            ModeAction::Cancel(Rc::clone(&thread)),
        );
        self.push_element_handler(
            self.post_button,
            &[EventType::Click],
            ModeAction::Post(Rc::clone(&thread)),
        );
        self.push_element_handler(
            self.undo_button,
            &[EventType::Click],
            ModeAction::Undo(Rc::clone(&thread)),
        );
        self.push_element_handler(
            self.redo_button,
            &[EventType::Click],
            ModeAction::Redo(thread),
        );
    }

    fn handle_annotation_event(&mut self, thread: &SharedThread, event: ThreadEvent) {
        match event {
            ThreadEvent::LocationAssigned => {
                if let Some(annotator) = self.core.annotator() {
                    annotator.borrow_mut().add_thread_to_map(thread);
                }
            }
            ThreadEvent::SoftCommit { location } => self.soft_commit(thread, location),
            ThreadEvent::DialogDelete => self.delete_drawing(thread),
            ThreadEvent::AvailableActions { undo, redo } => {
                self.update_undo_redo_buttons(undo, redo);
            }
            ThreadEvent::Other(_) => {}
        }
    }

    fn remove_selection(&mut self) {
        if let Some(thread) = self.selected_thread.take() {
            thread.borrow_mut().clear_boundary();
        }
    }
}
