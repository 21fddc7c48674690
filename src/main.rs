/// Headless annotation session replay for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use preview_annotations::AnnotatorConfig;

    let config = match std::env::args().nth(1) {
        Some(path) => match AnnotatorConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => AnnotatorConfig::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .init();

    session::replay_drawing(&config);
    session::replay_point_dialog(&config);
}

#[cfg(not(target_arch = "wasm32"))]
mod session {
    use std::cell::RefCell;
    use std::rc::Rc;

    use preview_annotations::config::AnnotatorConfig;
    use preview_annotations::controller::{AnnotationMode, DrawingModeController, SharedAnnotator};
    use preview_annotations::dialog::{
        AnnotationDialog, DialogData, MobileDialogSlot, PointPlacement, StaticLayout,
    };
    use preview_annotations::memory::{pump_signals, MemoryAnnotator, RecordingSurface};
    use preview_annotations::model::{Annotation, AnnotationId, Location, User};
    use preview_annotations::surface::{DomEvent, ElementId, EventType, SharedSurface};

    const ANNOTATED: ElementId = ElementId(1);
    const CONTAINER: ElementId = ElementId(2);
    const FIRST_BUTTON: ElementId = ElementId(10);
    const POST_BUTTON: ElementId = ElementId(11);

    /// Draw two strokes, post them, then select the saved drawing.
    pub fn replay_drawing(config: &AnnotatorConfig) {
        let surface = Rc::new(RefCell::new(RecordingSurface::new()));
        let shared_surface: SharedSurface = surface.clone();
        let annotator = Rc::new(RefCell::new(
            MemoryAnnotator::new(ANNOTATED, CONTAINER)
                .with_header_mode(config.header)
                .with_history(config.history.clone())
                .with_draw_buttons(FIRST_BUTTON),
        ));
        let shared_annotator: SharedAnnotator = annotator.clone();

        let mut controller = DrawingModeController::new(shared_surface, &config.selection);
        controller.register_annotator(&shared_annotator);
        controller.bind_mode_listeners();

        let strokes = [((20.0, 20.0), (80.0, 60.0)), ((40.0, 90.0), (120.0, 140.0))];
        for (from, to) in strokes {
            for (kind, x, y) in [
                (EventType::MouseDown, from.0, from.1),
                (EventType::MouseMove, to.0, from.1),
                (EventType::MouseUp, to.0, to.1),
            ] {
                let event = DomEvent::pointer(kind, x, y).on_page(1);
                controller.dispatch_dom_event(ANNOTATED, &event);
                pump_signals(&annotator, &mut controller);
            }
        }

        controller.dispatch_dom_event(POST_BUTTON, &DomEvent::pointer(EventType::Click, 0.0, 0.0));
        let delivered = pump_signals(&annotator, &mut controller);
        controller.unbind_mode_listeners();
        log::info!(
            "💾 Posted drawing, {} signals delivered, {} drawings indexed",
            delivered,
            controller.index().len()
        );

        let click = DomEvent::pointer(EventType::Click, 50.0, 50.0).on_page(1);
        controller.handle_selection(Some(&click));
        match controller.selected_thread() {
            Some(thread) => log::info!("🎯 Selected drawing {}", thread.borrow().id()),
            None => log::info!("🎯 No drawing under the pointer"),
        }
        log::info!(
            "{} listeners still attached",
            surface.borrow().active_listeners()
        );
    }

    /// Open a point dialog, post a comment, then delete it.
    pub fn replay_point_dialog(config: &AnnotatorConfig) {
        let mut data = DialogData::new(ANNOTATED, CONTAINER, Location::new(240.0, 120.0).on_page(1));
        data.can_annotate = config.can_annotate;
        data.locale = config.locale.clone();
        data.is_mobile = config.is_mobile;

        let mut dialog = AnnotationDialog::new(
            data,
            Box::new(PointPlacement),
            Rc::new(StaticLayout::default()),
        )
        .with_strings(config.strings.clone())
        .with_mobile_slot(MobileDialogSlot::shared());

        dialog.setup(&[], None);
        dialog.show();
        dialog.post_annotation(Some("Please double check this figure"));
        for event in dialog.drain_events() {
            log::info!("📝 Dialog asked for {:?}", event);
        }

        let user = User::new("1", config.strings.anonymous_user_name.clone());
        let comment = Annotation::new("c1", "Please double check this figure", user);
        dialog.add_annotation(&comment);

        let id = AnnotationId::from("c1");
        dialog.show_delete_confirmation(&id);
        dialog.delete_annotation(&id);
        for event in dialog.drain_events() {
            log::info!("🗑️ Dialog asked for {:?}", event);
        }
        dialog.hide();
        dialog.destroy();
    }
}

// WASM hosts drive the library directly
#[cfg(target_arch = "wasm32")]
fn main() {}
