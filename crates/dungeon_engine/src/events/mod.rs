//! Engine event delivery
//!
//! Key principles:
//! - Callers register interest and get a [`ListenerId`] back
//! - Events of a kind are only queued while someone listens for that kind
//! - Delivery is pull-based: the host drains the queue once per frame
//! - Unregistering a listener is explicit and immediate

use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::scene::{IntervalId, ListenerId, SoundId};

/// Browser-style numeric key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Enter key
    pub const ENTER: Self = Self(13);
    /// Escape key
    pub const ESCAPE: Self = Self(27);
    /// Left arrow
    pub const LEFT: Self = Self(37);
    /// Up arrow
    pub const UP: Self = Self(38);
    /// Right arrow
    pub const RIGHT: Self = Self(39);
    /// Down arrow
    pub const DOWN: Self = Self(40);
}

/// Kinds of events a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Key pressed
    KeyDown,
    /// Key released
    KeyUp,
    /// Once per frame, before the frame renders
    BeforeRender,
    /// Window resized
    Resize,
}

/// Event produced by the engine loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A scene finished loading
    SceneLoaded,
    /// A repeating interval fired
    Interval(IntervalId),
    /// A non-looping sound reached its end
    SoundEnded(SoundId),
    /// Key pressed
    KeyDown(KeyCode),
    /// Key released
    KeyUp(KeyCode),
    /// A frame is about to render
    BeforeRender,
    /// Window resized to the given size in pixels
    Resized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
}

impl EngineEvent {
    /// Listener kind gating this event, if any
    pub fn listener_kind(&self) -> Option<ListenerKind> {
        match self {
            Self::KeyDown(_) => Some(ListenerKind::KeyDown),
            Self::KeyUp(_) => Some(ListenerKind::KeyUp),
            Self::BeforeRender => Some(ListenerKind::BeforeRender),
            Self::Resized { .. } => Some(ListenerKind::Resize),
            Self::SceneLoaded | Self::Interval(_) | Self::SoundEnded(_) => None,
        }
    }
}

/// Listener registrations plus the pending event queue
#[derive(Debug, Default)]
pub struct EventQueue {
    listeners: SlotMap<ListenerId, ListenerKind>,
    pending: VecDeque<EngineEvent>,
}

impl EventQueue {
    /// Create an empty queue with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a kind of event
    pub fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.listeners.insert(kind)
    }

    /// Unregister a listener; returns `false` if it was not registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Whether anyone listens for `kind`
    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Queue an event; gated events without a listener are dropped
    ///
    /// Returns whether the event was queued.
    pub fn push(&mut self, event: EngineEvent) -> bool {
        if let Some(kind) = event.listener_kind() {
            if !self.has_listener(kind) {
                return false;
            }
        }
        self.pending.push_back(event);
        true
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.pending.drain(..).collect()
    }

    /// Drop pending events, keeping listeners registered
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }
}
