//! Dialog positioning strategies.
//!
//! The dialog state machine is shared; only where a dialog lands differs
//! between annotation types. Hosts provide measurements through
//! [`DialogLayout`].

use crate::constants::{
    PAGE_PADDING_TOP, POINT_ANNOTATION_ICON_DOT_HEIGHT, POINT_ANNOTATION_ICON_HEIGHT,
    POINT_DIALOG_GAP,
};
use crate::model::{Location, Point, Size};
use crate::util::reposition_caret;

use super::view::{DialogElement, ThreadIcon};

/// Measurements a dialog needs from the host.
pub trait DialogLayout {
    /// Rendered size of the dialog element.
    fn dialog_size(&self) -> Size;

    fn viewport_size(&self) -> Size;

    /// Height of the scrollable container holding the pages.
    fn container_height(&self) -> f32;

    fn page_width(&self, page: u32) -> f32;

    /// Location converted to browser coordinates relative to its page.
    fn browser_point(&self, location: &Location) -> Point;
}

/// Fixed measurements, for hosts with a static layout and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticLayout {
    pub dialog: Size,
    pub viewport: Size,
    pub container_height: f32,
    pub page_width: f32,
    /// Zoom applied to location coordinates
    pub scale: f32,
}

impl Default for StaticLayout {
    fn default() -> Self {
        Self {
            dialog: Size::new(282.0, 150.0),
            viewport: Size::new(1024.0, 768.0),
            container_height: 768.0,
            page_width: 816.0,
            scale: 1.0,
        }
    }
}

impl DialogLayout for StaticLayout {
    fn dialog_size(&self) -> Size {
        self.dialog
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn container_height(&self) -> f32 {
        self.container_height
    }

    fn page_width(&self, _page: u32) -> f32 {
        self.page_width
    }

    fn browser_point(&self, location: &Location) -> Point {
        Point::new(location.x * self.scale, location.y * self.scale)
    }
}

/// What a positioner may read and move.
pub struct PlacementContext<'a> {
    pub element: &'a mut DialogElement,
    pub location: &'a Location,
    pub layout: &'a dyn DialogLayout,
    pub thread_icon: Option<&'a ThreadIcon>,
}

/// Strategy deciding where a dialog is placed.
pub trait DialogPositioner {
    /// Place the dialog against its thread's location.
    fn position(&mut self, ctx: PlacementContext<'_>);

    /// Place the dialog at a literal browser coordinate.
    fn position_at(&mut self, _ctx: PlacementContext<'_>, _x: f32, _y: f32) {}

    /// Whether dialogs placed this way carry the drawing save/delete toolbar.
    fn has_drawing_toolbar(&self) -> bool {
        false
    }
}

/// Leaves the dialog where the host put it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualPlacement;

impl DialogPositioner for ManualPlacement {
    fn position(&mut self, _ctx: PlacementContext<'_>) {}
}

/// Floating bubble centered on a point annotation icon.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointPlacement;

impl DialogPositioner for PointPlacement {
    fn position(&mut self, ctx: PlacementContext<'_>) {
        let PlacementContext {
            element,
            location,
            layout,
            thread_icon,
        } = ctx;

        let page = location.page_or_default();
        let anchor = layout.browser_point(location);
        let size = layout.dialog_size();

        element.attached = true;
        element.page = Some(page);
        element.visible = true;

        let centered = anchor.x - size.width / 2.0;
        let (left, caret) = reposition_caret(centered, size.width, anchor.x, layout.page_width(page));
        element.left = left;
        element.caret = caret;

        // Anchors in the lower half of the container open upwards
        let container_height = layout.container_height();
        let flipped = anchor.y > container_height / 2.0;
        if flipped {
            element.top = None;
            element.bottom = Some(
                container_height - anchor.y + POINT_ANNOTATION_ICON_HEIGHT
                    - POINT_ANNOTATION_ICON_DOT_HEIGHT / 2.0,
            );
        } else {
            element.bottom = None;
            element.top = Some(
                anchor.y + POINT_DIALOG_GAP + PAGE_PADDING_TOP - POINT_ANNOTATION_ICON_HEIGHT
                    + POINT_ANNOTATION_ICON_DOT_HEIGHT,
            );
        }
        element.flipped = flipped;

        if let Some(icon) = thread_icon {
            icon.set_flipped(flipped);
        }

        log::trace!(
            "Point dialog at ({}, {:?}/{:?}) flipped={}",
            element.left,
            element.top,
            element.bottom,
            flipped
        );
    }
}

/// Drawing toolbar whose top-right corner sits on a browser coordinate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrawingPlacement {
    anchor: Option<Point>,
}

impl DrawingPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last coordinate passed to `position_at`.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }
}

impl DialogPositioner for DrawingPlacement {
    fn position(&mut self, ctx: PlacementContext<'_>) {
        let anchor = self
            .anchor
            .unwrap_or_else(|| ctx.layout.browser_point(ctx.location));
        self.position_at(ctx, anchor.x, anchor.y);
    }

    fn position_at(&mut self, ctx: PlacementContext<'_>, x: f32, y: f32) {
        let page = ctx.location.page_or_default();
        let element = ctx.element;

        if !element.attached || element.page != Some(page) {
            log::debug!("✏️ Drawing dialog attached to page {}", page);
            element.attached = true;
            element.page = Some(page);
        }

        let size = ctx.layout.dialog_size();
        element.left = x - size.width;
        element.top = Some(y);
        element.bottom = None;
        element.visible = true;
        self.anchor = Some(Point::new(x, y));
    }

    fn has_drawing_toolbar(&self) -> bool {
        true
    }
}
