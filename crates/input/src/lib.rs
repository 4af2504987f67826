//! Input: raw key and mouse events mapped to key states, a walking direction and engine actions.
//!
//! # Invariants
//! - `key_down`/`key_up` report edges of the most recent update only.
//! - The movement vector lies in the XZ plane; -Z is forward.
//! - Actions fire on key-down edges, never while a key is held.

pub mod action;
mod event;
mod key;
mod mouse;

pub use action::{Action, Controls};
pub use event::{EventQueue, EventSource, InputEvent};
pub use key::{InputState, Key, KeyState};
pub use mouse::{DEFAULT_FULL_ROTATION, MouseLook};

/// Errors from input configuration.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
}

pub fn crate_info() -> &'static str {
    "notdoom-input v0.1.0"
}
