use std::collections::VecDeque;

use crate::Key;

/// Raw event delivered by the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    WindowClose,
    /// Relative mouse motion in backend units.
    MouseMotion { xrel: f32, yrel: f32 },
    Key { key: Key, pressed: bool },
}

/// Source of pending input events, drained once per frame.
pub trait EventSource {
    /// Next pending event, or `None` once the queue is drained for this frame.
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// In-memory event source for headless runs.
///
/// Events pushed for a frame are all delivered by the next drain.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn press(&mut self, key: Key) {
        self.push(InputEvent::Key { key, pressed: true });
    }

    pub fn release(&mut self, key: Key) {
        self.push(InputEvent::Key {
            key,
            pressed: false,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pending.pop_front()
    }
}

impl Extend<InputEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.pending.extend(iter);
    }
}
