//! Stroke undo/redo history of an in-progress drawing.
//!
//! Two stacks: `strokes` holds what can be undone (most recent at the end)
//! and `undone` holds strokes that can be redone. Drawing a new stroke clears
//! the redo stack. Strokes pushed out of a full history land in `committed`,
//! still drawn but beyond undo.

use crate::config::HistoryConfig;
use crate::model::{Bounds, Point};

/// One continuous pointer-down to pointer-up path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }
}

/// Bounded undo/redo history of strokes.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    committed: Vec<Stroke>,
    strokes: Vec<Stroke>,
    undone: Vec<Stroke>,
    config: HistoryConfig,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Record a finished stroke. Empty strokes are dropped.
    pub fn push(&mut self, stroke: Stroke) {
        if stroke.points.is_empty() {
            return;
        }
        log::debug!("📝 Stroke: pushed {} points", stroke.points.len());
        self.strokes.push(stroke);
        self.undone.clear();

        if self.strokes.len() > self.config.max_strokes {
            let overflow = self.strokes.len() - self.config.max_strokes;
            self.committed.extend(self.strokes.drain(..overflow));
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    /// Nothing drawn at all, committed or not.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Move the newest stroke to the redo stack. Returns whether one moved.
    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.strokes.pop() else {
            return false;
        };
        log::debug!("⏪ Undo stroke ({} points)", stroke.points.len());
        self.undone.push(stroke);
        true
    }

    /// Move the newest undone stroke back. Returns whether one moved.
    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.undone.pop() else {
            return false;
        };
        log::debug!("⏩ Redo stroke ({} points)", stroke.points.len());
        self.strokes.push(stroke);
        true
    }

    pub fn undo_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn redo_count(&self) -> usize {
        self.undone.len()
    }

    /// Visible strokes, oldest first.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.committed.iter().chain(&self.strokes)
    }

    /// Extents of every visible stroke.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.strokes().flat_map(|s| s.points.iter()))
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.strokes.clear();
        self.undone.clear();
        log::debug!("🗑️ Stroke history cleared");
    }
}
