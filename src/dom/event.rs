//! Event Module - Event values dispatched through the document
//!
//! An [`Event`] travels from its target up through the target's ancestors
//! (when it bubbles) and ends at the document root. Handlers may cancel the
//! default action or stop propagation; neither affects the other.

use indextree::NodeId;

use crate::types::Point;

// =============================================================================
// TYPES
// =============================================================================

/// Event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Focus,
    Blur,
    KeyDown,
}

impl EventKind {
    /// Propagation and cancellation behavior of this event type.
    pub fn flags(self) -> EventFlags {
        match self {
            EventKind::Click | EventKind::Submit | EventKind::KeyDown => {
                EventFlags::BUBBLES | EventFlags::CANCELABLE
            }
            EventKind::Focus | EventKind::Blur => EventFlags::NONE,
        }
    }
}

bitflags::bitflags! {
    /// How an event propagates and whether its default can be prevented.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventFlags: u8 {
        const NONE = 0;
        const BUBBLES = 1 << 0;
        const CANCELABLE = 1 << 1;
    }
}

/// Keyboard payload of a keydown event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "Escape")
    pub key: String,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// A dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    flags: EventFlags,
    target: NodeId,
    current_target: Option<NodeId>,
    pointer: Option<Point>,
    keyboard: Option<KeyboardEvent>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            flags: kind.flags(),
            target,
            current_target: None,
            pointer: None,
            keyboard: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a click at a client position
    pub fn click(target: NodeId, point: Point) -> Self {
        let mut event = Self::new(EventKind::Click, target);
        event.pointer = Some(point);
        event
    }

    /// Create a keydown carrying a keyboard payload
    pub fn key_down(target: NodeId, keyboard: KeyboardEvent) -> Self {
        let mut event = Self::new(EventKind::KeyDown, target);
        event.keyboard = Some(keyboard);
        event
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = Some(node);
    }

    /// Client position for pointer events.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn keyboard(&self) -> Option<&KeyboardEvent> {
        self.keyboard.as_ref()
    }

    /// The key of a keydown event, if any.
    pub fn key(&self) -> Option<&str> {
        self.keyboard.as_ref().map(|k| k.key.as_str())
    }

    pub fn bubbles(&self) -> bool {
        self.flags.contains(EventFlags::BUBBLES)
    }

    /// Cancel the default action. Ignored for non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.flags.contains(EventFlags::CANCELABLE) {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop the event from reaching further nodes on its path.
    /// Remaining listeners on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Result of dispatching an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not dispatched at all (disabled or destroyed target)
    Suppressed,
    /// Dispatched, and a handler prevented the default action
    Prevented,
    /// Dispatched, default action allowed
    Completed,
}

impl DispatchOutcome {
    pub fn default_allowed(self) -> bool {
        self == DispatchOutcome::Completed
    }
}

// =============================================================================
// TESTS
// =============================================================================
