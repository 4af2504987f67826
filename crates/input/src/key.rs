use notdoom_math::Vector3f;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Controls, InputError};

/// Logical keyboard key, independent of any windowing library's scancodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    Space,
    LeftCtrl,
    LeftShift,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub const ALL: [Key; 15] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::R,
        Key::Space,
        Key::LeftCtrl,
        Key::LeftShift,
        Key::Escape,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Q => "q",
            Key::E => "e",
            Key::R => "r",
            Key::Space => "space",
            Key::LeftCtrl => "left_ctrl",
            Key::LeftShift => "left_shift",
            Key::Escape => "escape",
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Key::ALL
            .into_iter()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| InputError::UnknownKey(s.to_owned()))
    }
}

/// Edge-detected state of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    /// Went down with the latest update.
    pub key_down: bool,
    /// Went up with the latest update.
    pub key_up: bool,
    pub is_pressed: bool,
}

/// Current state of every key seen so far.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    key_states: BTreeMap<Key, KeyState>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `key`; keys never updated read as fully released.
    pub fn key_state(&self, key: Key) -> KeyState {
        self.key_states.get(&key).copied().unwrap_or_default()
    }

    /// Record a press or release and return the resulting state.
    ///
    /// Repeated presses without a release in between do not report `key_down` again.
    pub fn update_key_state(&mut self, key: Key, pressed: bool) -> KeyState {
        let state = self.key_states.entry(key).or_default();
        state.key_down = pressed && !state.is_pressed;
        state.key_up = !pressed && state.is_pressed;
        state.is_pressed = pressed;
        if state.key_down || state.key_up {
            tracing::debug!(?key, pressed, "key state changed");
        }
        *state
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.key_state(key).is_pressed
    }

    /// Walking direction in the XZ plane: `(right - left, 0, backward - forward)`.
    ///
    /// Not normalized, so diagonals have length `sqrt(2)`.
    pub fn player_movement_vector(&self, controls: &Controls) -> Vector3f {
        let axis = |key: Key| if self.is_pressed(key) { 1.0 } else { 0.0 };
        Vector3f::new(
            axis(controls.walk_right) - axis(controls.walk_left),
            0.0,
            axis(controls.walk_backward) - axis(controls.walk_forward),
        )
    }
}
