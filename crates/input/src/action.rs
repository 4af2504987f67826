use serde::{Deserialize, Serialize};

use crate::{Key, KeyState};

/// A high-level action produced from raw key input.
///
/// The game loop consumes actions, never raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the game loop.
    Exit,
    /// Snap the camera back to the identity rotation.
    ResetCamera,
}

/// Key bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub walk_forward: Key,
    pub walk_left: Key,
    pub walk_backward: Key,
    pub walk_right: Key,
    pub jump: Key,
    pub crouch: Key,
    pub exit_game: Key,
    pub reset_camera: Key,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            walk_forward: Key::W,
            walk_left: Key::A,
            walk_backward: Key::S,
            walk_right: Key::D,
            jump: Key::Space,
            crouch: Key::LeftCtrl,
            exit_game: Key::Escape,
            reset_camera: Key::R,
        }
    }
}

impl Controls {
    /// Action triggered by `key` reaching `state`. Only fresh presses trigger actions.
    pub fn action_for(&self, key: Key, state: KeyState) -> Option<Action> {
        if !state.key_down {
            return None;
        }
        if key == self.exit_game {
            Some(Action::Exit)
        } else if key == self.reset_camera {
            Some(Action::ResetCamera)
        } else {
            None
        }
    }
}
