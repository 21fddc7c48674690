//! Geometry primitives shared by dialogs, controllers and the spatial index.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE;

/// A 2D point in page or browser coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Axis-aligned bounding box stored in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Degenerate box covering a single point.
    pub fn from_point(point: Point) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Square of half-size `offset` centered on `point`.
    pub fn around(point: Point, offset: f32) -> Self {
        Self::new(
            point.x - offset,
            point.y - offset,
            point.x + offset,
            point.y + offset,
        )
    }

    /// Smallest box containing every point, or `None` when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(*first), |acc, p| {
            acc.union(&Self::from_point(*p))
        }))
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Edges touching counts as intersecting.
    pub fn intersects(&self, other: &Bounds) -> bool {
        other.min_x <= self.max_x
            && other.min_y <= self.max_y
            && other.max_x >= self.min_x
            && other.max_y >= self.min_y
    }
}

/// Page dimensions recorded when an annotation was created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub x: f32,
    pub y: f32,
}

/// Where a thread is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// 1-based page number; unset for single-surface viewers
    #[serde(default)]
    pub page: Option<u32>,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl Location {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            page: None,
            x,
            y,
            dimensions: None,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Page number, defaulting to the first page.
    pub fn page_or_default(&self) -> u32 {
        match self.page {
            Some(page) if page > 0 => page,
            _ => DEFAULT_PAGE,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
