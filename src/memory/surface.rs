//! Element surface that records every mutation.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::surface::{ElementId, ElementSurface, EventType};

/// One recorded surface mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddListener(ElementId, EventType),
    RemoveListener(ElementId, EventType),
    AddClass(ElementId, String),
    RemoveClass(ElementId, String),
    SetDisabled(ElementId, bool),
    InsertMarkup(ElementId, String),
}

/// Headless surface tracking listeners, classes and disabled state.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: Vec<SurfaceOp>,
    listeners: HashMap<(ElementId, EventType), usize>,
    classes: HashMap<ElementId, BTreeSet<String>>,
    disabled: HashSet<ElementId>,
    markup: HashMap<ElementId, Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &[SurfaceOp] {
        &self.log
    }

    pub fn added_listener_count(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, SurfaceOp::AddListener(..)))
            .count()
    }

    pub fn removed_listener_count(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, SurfaceOp::RemoveListener(..)))
            .count()
    }

    /// Listeners currently attached for `event` on `element`.
    pub fn listener_count(&self, element: ElementId, event: EventType) -> usize {
        self.listeners.get(&(element, event)).copied().unwrap_or(0)
    }

    /// Listeners currently attached anywhere.
    pub fn active_listeners(&self) -> usize {
        self.listeners.values().sum()
    }

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes
            .get(&element)
            .is_some_and(|classes| classes.contains(class))
    }

    pub fn is_disabled(&self, element: ElementId) -> bool {
        self.disabled.contains(&element)
    }

    /// Markup inserted into `container`, first child first.
    pub fn children(&self, container: ElementId) -> &[String] {
        self.markup
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl ElementSurface for RecordingSurface {
    fn add_event_listener(&mut self, element: ElementId, event: EventType) {
        *self.listeners.entry((element, event)).or_default() += 1;
        self.log.push(SurfaceOp::AddListener(element, event));
    }

    fn remove_event_listener(&mut self, element: ElementId, event: EventType) {
        if let Some(count) = self.listeners.get_mut(&(element, event)) {
            *count -= 1;
            if *count == 0 {
                self.listeners.remove(&(element, event));
            }
        } else {
            log::warn!("Removing {} listener never added on {}", event.as_str(), element);
        }
        self.log.push(SurfaceOp::RemoveListener(element, event));
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.classes
            .entry(element)
            .or_default()
            .insert(class.to_string());
        self.log.push(SurfaceOp::AddClass(element, class.to_string()));
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(classes) = self.classes.get_mut(&element) {
            classes.remove(class);
        }
        self.log
            .push(SurfaceOp::RemoveClass(element, class.to_string()));
    }

    fn set_disabled(&mut self, element: ElementId, disabled: bool) {
        if disabled {
            self.disabled.insert(element);
        } else {
            self.disabled.remove(&element);
        }
        self.log.push(SurfaceOp::SetDisabled(element, disabled));
    }

    fn insert_before_first_child(&mut self, container: ElementId, markup: &str) {
        self.markup
            .entry(container)
            .or_default()
            .insert(0, markup.to_string());
        self.log
            .push(SurfaceOp::InsertMarkup(container, markup.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_counts_balance() {
        let mut surface = RecordingSurface::new();
        let el = ElementId(3);
        surface.add_event_listener(el, EventType::Click);
        surface.add_event_listener(el, EventType::Click);
        surface.remove_event_listener(el, EventType::Click);
        assert_eq!(surface.listener_count(el, EventType::Click), 1);
        surface.remove_event_listener(el, EventType::Click);
        assert_eq!(surface.active_listeners(), 0);
        assert_eq!(surface.added_listener_count(), 2);
        assert_eq!(surface.removed_listener_count(), 2);
    }

    #[test]
    fn test_markup_is_prepended() {
        let mut surface = RecordingSurface::new();
        surface.insert_before_first_child(ElementId(1), "<b>");
        surface.insert_before_first_child(ElementId(1), "<a>");
        assert_eq!(surface.children(ElementId(1)), &["<a>", "<b>"]);
    }
}
