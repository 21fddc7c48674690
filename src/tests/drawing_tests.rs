//! Draw mode sessions end to end.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{HeaderMode, TieBreakMode};
use crate::constants::{CLASS_ANNOTATION_DRAW_MODE, DRAW_MODE_HEADER};
use crate::controller::AnnotationMode;
use crate::memory::{MemoryDrawingThread, SurfaceOp};
use crate::model::{
    share, thread_id, AnnotationType, Bounds, SharedThread, ThreadEvent, ThreadHandle,
    ThreadSignal, ThreadState,
};
use crate::spatial::RandomTieBreak;
use crate::surface::{DomEvent, ElementInfo, EventType, Propagation};

use super::{
    drawing, DrawSession, JournalThread, ANNOTATED, CANCEL_BUTTON, CONTAINER,
    DRAW_SESSION_LISTENERS, POST_BUTTON, REDO_BUTTON, UNDO_BUTTON,
};

fn as_shared<T: ThreadHandle + 'static>(thread: &Rc<RefCell<T>>) -> SharedThread {
    let shared: SharedThread = thread.clone();
    shared
}

fn click_at(x: f32, y: f32, page: u32) -> DomEvent {
    DomEvent::pointer(EventType::Click, x, y).on_page(page)
}

#[test]
fn test_register_annotator_prepares_the_page() {
    let session = DrawSession::new(TieBreakMode::First);
    let surface = session.surface.borrow();
    assert_eq!(surface.children(CONTAINER), &[DRAW_MODE_HEADER]);
    assert!(surface.has_class(ANNOTATED, CLASS_ANNOTATION_DRAW_MODE));
    assert_eq!(session.controller.undo_button(), Some(UNDO_BUTTON));
    assert_eq!(session.controller.redo_button(), Some(REDO_BUTTON));

    let headless = DrawSession::with_header(TieBreakMode::First, HeaderMode::None);
    assert!(headless.surface.borrow().children(CONTAINER).is_empty());
}

#[test]
fn test_bind_then_unbind_leaves_no_listeners() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    assert_eq!(session.controller.core().handlers().len(), 7);
    assert_eq!(
        session.surface.borrow().added_listener_count(),
        DRAW_SESSION_LISTENERS
    );

    session.controller.unbind_mode_listeners();
    let surface = session.surface.borrow();
    assert!(session.controller.core().handlers().is_empty());
    assert_eq!(surface.removed_listener_count(), DRAW_SESSION_LISTENERS);
    assert_eq!(surface.active_listeners(), 0);
}

#[test]
fn test_second_bind_only_attaches_new_handlers() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    session.controller.bind_mode_listeners();
    assert_eq!(session.controller.core().handlers().len(), 14);
    assert_eq!(
        session.surface.borrow().added_listener_count(),
        2 * DRAW_SESSION_LISTENERS
    );

    session.controller.unbind_mode_listeners();
    assert_eq!(
        session.surface.borrow().removed_listener_count(),
        2 * DRAW_SESSION_LISTENERS
    );
    assert_eq!(session.surface.borrow().active_listeners(), 0);
}

#[test]
fn test_unbind_disables_undo_and_redo() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    session.controller.update_undo_redo_buttons(1, 1);
    assert!(!session.surface.borrow().is_disabled(UNDO_BUTTON));

    session.controller.unbind_mode_listeners();
    let surface = session.surface.borrow();
    assert!(surface.is_disabled(UNDO_BUTTON));
    assert!(surface.is_disabled(REDO_BUTTON));
}

#[test]
fn test_index_follows_register_and_unregister() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let bounds = Bounds::new(10.0, 10.0, 40.0, 30.0);
    let thread = as_shared(&session.saved_drawing(2, bounds));
    let id = thread_id(&thread);

    session.controller.register_thread(&thread);
    let hits = session.controller.index().search(2, &bounds);
    assert!(hits.iter().any(|c| c.id == id));
    assert!(session.controller.index().search(1, &bounds).is_empty());

    session.controller.unregister_thread(&thread);
    let hits = session.controller.index().search(2, &bounds);
    assert!(hits.iter().all(|c| c.id != id));
}

#[test]
fn test_thread_without_location_is_never_indexed() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let thread = as_shared(
        &session
            .annotator
            .borrow_mut()
            .adopt(MemoryDrawingThread::new(None)),
    );
    session.controller.register_thread(&thread);
    assert!(session.controller.index().is_empty());
}

#[test]
fn test_reregistering_moves_thread_between_pages() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let journal = Rc::new(RefCell::new(Vec::new()));
    let bounds = Bounds::new(0.0, 0.0, 5.0, 5.0);
    let thread = share(JournalThread::new(1, "a", &journal).at(1, bounds));
    session.controller.register_thread(&thread);

    let moved = share(JournalThread::new(1, "a", &journal).at(3, bounds));
    session.controller.register_thread(&moved);

    let index = session.controller.index();
    assert_eq!(index.len(), 1);
    assert_eq!(index.page_of(thread_id(&thread)), Some(3));
    assert!(index.search(1, &bounds).is_empty());
}

#[test]
fn test_select_clears_previous_boundary_first() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let journal = Rc::new(RefCell::new(Vec::new()));
    let a = share(JournalThread::new(1, "a", &journal));
    let b = share(JournalThread::new(2, "b", &journal));

    session.controller.select(&a);
    session.controller.select(&b);

    assert_eq!(
        *journal.borrow(),
        vec!["a.draw_boundary", "a.clear_boundary", "b.draw_boundary"]
    );
    let selected = session.controller.selected_thread().expect("selection");
    assert_eq!(thread_id(selected), thread_id(&b));

    session.controller.remove_selection();
    session.controller.remove_selection();
    assert!(session.controller.selected_thread().is_none());
    assert_eq!(journal.borrow().len(), 4);
}

#[test]
fn test_selection_hits_and_misses() {
    let mut session = DrawSession::new(TieBreakMode::Newest);
    let older = as_shared(&session.saved_drawing(1, Bounds::new(0.0, 0.0, 100.0, 100.0)));
    let newer = as_shared(&session.saved_drawing(1, Bounds::new(50.0, 50.0, 150.0, 150.0)));
    session.controller.register_thread(&older);
    session.controller.register_thread(&newer);

    session.controller.handle_selection(Some(&click_at(75.0, 75.0, 1)));
    let selected = session.controller.selected_thread().expect("overlap hit");
    assert_eq!(thread_id(selected), thread_id(&newer));

    // Within the border offset of the older drawing only
    session.controller.handle_selection(Some(&click_at(10.0, 103.0, 1)));
    let selected = session.controller.selected_thread().expect("near hit");
    assert_eq!(thread_id(selected), thread_id(&older));

    session.controller.handle_selection(Some(&click_at(400.0, 400.0, 1)));
    assert!(session.controller.selected_thread().is_none());

    session.controller.handle_selection(Some(&click_at(75.0, 75.0, 9)));
    assert!(session.controller.selected_thread().is_none());
}

#[test]
fn test_selection_ignores_buttons_and_missing_events() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let thread = session.saved_drawing(1, Bounds::new(0.0, 0.0, 10.0, 10.0));
    let shared = as_shared(&thread);
    session.controller.register_thread(&shared);
    session.controller.select(&shared);

    let on_button = click_at(5.0, 5.0, 1).with_target(ElementInfo::new("button"));
    session.controller.handle_selection(Some(&on_button));
    session.controller.handle_selection(None);

    assert!(session.controller.selected_thread().is_some());
    assert!(thread.borrow().boundary_drawn());
}

#[test]
fn test_random_tie_break_picks_an_overlapping_thread() {
    let mut session = DrawSession::new(TieBreakMode::Random);
    session.controller = session
        .controller
        .with_tie_break(Box::new(RandomTieBreak::seeded(42)));

    let a = as_shared(&session.saved_drawing(1, Bounds::new(0.0, 0.0, 20.0, 20.0)));
    let b = as_shared(&session.saved_drawing(1, Bounds::new(5.0, 5.0, 25.0, 25.0)));
    session.controller.register_thread(&a);
    session.controller.register_thread(&b);

    for _ in 0..10 {
        session.controller.handle_selection(Some(&click_at(10.0, 10.0, 1)));
        let selected = thread_id(session.controller.selected_thread().expect("hit"));
        assert!(selected == thread_id(&a) || selected == thread_id(&b));
    }
}

#[test]
fn test_pending_dialog_delete_destroys_locally() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    let thread = session
        .annotator
        .borrow_mut()
        .adopt(drawing(1, Bounds::new(0.0, 0.0, 10.0, 10.0)));

    session
        .controller
        .handle_annotation_event(&as_shared(&thread), ThreadEvent::DialogDelete);

    let thread = thread.borrow();
    assert!(thread.is_destroyed());
    assert!(!thread.calls().contains(&"delete_thread"));
    // Rebound with a fresh current thread
    assert_eq!(session.controller.core().handlers().len(), 7);
    assert_eq!(
        session.surface.borrow().active_listeners(),
        DRAW_SESSION_LISTENERS
    );
}

#[test]
fn test_saved_dialog_delete_removes_remotely() {
    for state in [ThreadState::Inactive, ThreadState::PendingActive] {
        let mut session = DrawSession::new(TieBreakMode::First);
        let thread = session.annotator.borrow_mut().adopt(
            drawing(1, Bounds::new(0.0, 0.0, 10.0, 10.0)).with_state(state),
        );
        let shared = as_shared(&thread);
        session.controller.register_thread(&shared);

        session
            .controller
            .handle_annotation_event(&shared, ThreadEvent::DialogDelete);

        let calls = thread.borrow().calls().to_vec();
        assert!(calls.contains(&"delete_thread"), "{state:?}");
        assert!(!calls.contains(&"destroy"), "{state:?}");
        assert!(!session.controller.index().contains(thread_id(&shared)));
    }
}

#[test]
fn test_hard_delete_redraws_overlapped_drawings_once() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let a = session.saved_drawing(1, Bounds::new(0.0, 0.0, 50.0, 50.0));
    let b = session.saved_drawing(1, Bounds::new(25.0, 25.0, 75.0, 75.0));
    let elsewhere = session.saved_drawing(2, Bounds::new(0.0, 0.0, 50.0, 50.0));
    for thread in [&a, &b, &elsewhere] {
        session.controller.register_thread(&as_shared(thread));
    }

    session
        .controller
        .handle_annotation_event(&as_shared(&a), ThreadEvent::DialogDelete);

    assert_eq!(b.borrow().show_count(), 1);
    assert_eq!(a.borrow().show_count(), 0);
    assert_eq!(elsewhere.borrow().show_count(), 0);
    assert_eq!(
        a.borrow().pending_signals(),
        &[ThreadSignal::AnnotationDelete]
    );
}

#[test]
fn test_undo_redo_buttons_reflect_single_steps_only() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.surface.borrow_mut().clear_log();

    session.controller.update_undo_redo_buttons(1, 0);
    assert_eq!(
        session.surface.borrow().log(),
        &[
            SurfaceOp::SetDisabled(UNDO_BUTTON, false),
            SurfaceOp::SetDisabled(REDO_BUTTON, true),
        ]
    );

    session.surface.borrow_mut().clear_log();
    session.controller.update_undo_redo_buttons(2, 2);
    assert!(session.surface.borrow().log().is_empty());
}

#[test]
fn test_draw_undo_redo_and_post() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    let current = session.current();
    let id = current.borrow().id();

    let propagation = session.pointer(EventType::MouseDown, 10.0, 10.0, 1);
    assert_eq!(propagation, Propagation::Stop);
    assert_eq!(session.annotator.borrow().threads_on_page(1), &[id]);

    session.pointer(EventType::MouseMove, 60.0, 10.0, 1);
    session.pointer(EventType::MouseUp, 60.0, 50.0, 1);
    assert!(!session.surface.borrow().is_disabled(UNDO_BUTTON));
    assert!(session.surface.borrow().is_disabled(REDO_BUTTON));

    session.click(UNDO_BUTTON);
    assert!(session.surface.borrow().is_disabled(UNDO_BUTTON));
    assert!(!session.surface.borrow().is_disabled(REDO_BUTTON));

    session.click(REDO_BUTTON);
    assert!(!session.surface.borrow().is_disabled(UNDO_BUTTON));
    assert!(session.surface.borrow().is_disabled(REDO_BUTTON));

    session.click(POST_BUTTON);
    assert_eq!(current.borrow().state(), ThreadState::Inactive);
    assert_eq!(session.annotator.borrow().toggles(), &[AnnotationType::Draw]);
    assert_eq!(
        session.controller.index().bounds_of(id),
        Some(Bounds::new(10.0, 10.0, 60.0, 50.0))
    );

    session.controller.unbind_mode_listeners();
    assert_eq!(session.surface.borrow().active_listeners(), 0);
}

#[test]
fn test_cancel_discards_unsaved_drawing() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    session.stroke((5.0, 5.0), (20.0, 20.0), 1);
    let current = session.current();

    let id = current.borrow().id();

    session.click(CANCEL_BUTTON);
    assert!(current.borrow().is_cancelled());
    assert!(session.annotator.borrow().thread(id).is_none());
    assert_eq!(session.annotator.borrow().toggles(), &[AnnotationType::Draw]);
    assert!(session.controller.index().is_empty());
}

#[test]
fn test_crossing_pages_soft_commits() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();
    session.stroke((5.0, 5.0), (20.0, 20.0), 1);
    let first = session.current();
    let first_id = first.borrow().id();

    session.pointer(EventType::MouseDown, 30.0, 40.0, 2);

    assert_eq!(first.borrow().state(), ThreadState::Inactive);
    assert_eq!(session.controller.index().page_of(first_id), Some(1));

    let second = session.current();
    let second_id = second.borrow().id();
    assert_ne!(second_id, first_id);
    assert_eq!(second.borrow().location().map(|l| l.page), Some(Some(2)));
    assert!(second.borrow().is_drawing());
    assert_eq!(session.annotator.borrow().threads_on_page(2), &[second_id]);

    assert_eq!(session.controller.core().handlers().len(), 7);
    assert_eq!(
        session.surface.borrow().active_listeners(),
        DRAW_SESSION_LISTENERS
    );
}

#[test]
fn test_pointer_events_on_buttons_fall_through() {
    let mut session = DrawSession::new(TieBreakMode::First);
    session.controller.bind_mode_listeners();

    let event = DomEvent::pointer(EventType::MouseDown, 5.0, 5.0)
        .on_page(1)
        .with_target(ElementInfo::new("button"));
    let propagation = session.controller.dispatch_dom_event(ANNOTATED, &event);
    assert_eq!(propagation, Propagation::Continue);
    assert!(session.current().borrow().location().is_none());
}

#[test]
fn test_unsubscribed_signals_are_dropped() {
    let mut session = DrawSession::new(TieBreakMode::First);
    let thread = as_shared(&session.saved_drawing(1, Bounds::new(0.0, 0.0, 5.0, 5.0)));

    session
        .controller
        .notify_thread(&thread, ThreadSignal::AnnotationSaved);
    assert!(session.controller.index().is_empty());

    session.controller.bind_custom_listeners_on_thread(&thread);
    session
        .controller
        .notify_thread(&thread, ThreadSignal::AnnotationSaved);
    assert!(session.controller.index().contains(thread_id(&thread)));

    session
        .controller
        .notify_thread(&thread, ThreadSignal::AnnotationDelete);
    assert!(session.controller.index().is_empty());
}
