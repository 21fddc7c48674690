//! Host UI surface abstraction.
//!
//! The annotation layer never touches a real DOM. Hosts describe elements by
//! opaque [`ElementId`]s, report events as [`DomEvent`]s, and apply listener
//! and class changes through an [`ElementSurface`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::model::Point;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Event names the annotation layer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    MouseMove,
    MouseDown,
    MouseUp,
    MouseEnter,
    MouseLeave,
    TouchMove,
    TouchStart,
    TouchEnd,
    TouchCancel,
    Click,
    KeyDown,
    Wheel,
}

impl EventType {
    /// DOM event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MouseMove => "mousemove",
            EventType::MouseDown => "mousedown",
            EventType::MouseUp => "mouseup",
            EventType::MouseEnter => "mouseenter",
            EventType::MouseLeave => "mouseleave",
            EventType::TouchMove => "touchmove",
            EventType::TouchStart => "touchstart",
            EventType::TouchEnd => "touchend",
            EventType::TouchCancel => "touchcancel",
            EventType::Click => "click",
            EventType::KeyDown => "keydown",
            EventType::Wheel => "wheel",
        }
    }
}

/// One node on an event's propagation path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementInfo {
    /// Upper-case tag name, e.g. `BUTTON`
    pub node_name: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementInfo {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into().to_ascii_uppercase(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_button(&self) -> bool {
        self.node_name == "BUTTON"
    }
}

/// Keyboard state carried by a keydown event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    /// `KeyboardEvent.key`, or a legacy `U+XXXX` key identifier
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

/// An input event reported by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomEvent {
    pub kind: Option<EventType>,
    /// Target first, then its ancestors
    pub path: Vec<ElementInfo>,
    /// Pointer position in client coordinates
    pub client: Point,
    /// Page under the pointer, when the host knows it
    pub page: Option<u32>,
    pub key: Option<KeyInput>,
}

impl DomEvent {
    /// Pointer event at client coordinates.
    pub fn pointer(kind: EventType, x: f32, y: f32) -> Self {
        Self {
            kind: Some(kind),
            client: Point::new(x, y),
            ..Self::default()
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_target(mut self, target: ElementInfo) -> Self {
        self.path.insert(0, target);
        self
    }

    pub fn target(&self) -> Option<&ElementInfo> {
        self.path.first()
    }

    /// Buttons take precedence over canvas handling.
    pub fn targets_button(&self) -> bool {
        self.target().is_some_and(ElementInfo::is_button)
    }
}

/// Whether an event should keep bubbling after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Mutations the annotation layer applies to host elements.
pub trait ElementSurface {
    fn add_event_listener(&mut self, element: ElementId, event: EventType);
    fn remove_event_listener(&mut self, element: ElementId, event: EventType);
    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);
    fn set_disabled(&mut self, element: ElementId, disabled: bool);
    /// Insert markup as the new first child of `container`.
    fn insert_before_first_child(&mut self, container: ElementId, markup: &str);
}

/// Shared handle to the host surface.
pub type SharedSurface = Rc<RefCell<dyn ElementSurface>>;
