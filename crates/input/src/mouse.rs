use notdoom_math::{Quaternionf, Vector3f};
use std::f32::consts::TAU;

/// Mouse units needed for one full turn when no other value is configured.
pub const DEFAULT_FULL_ROTATION: f32 = 50.0 * TAU;

/// First-person yaw/pitch accumulated from relative mouse motion.
///
/// Angles wrap into `(-2pi, 2pi)`. Pitch is not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseLook {
    /// Rotation about +Y in radians.
    pub yaw: f32,
    /// Rotation about +X in radians.
    pub pitch: f32,
    full_rotation: f32,
}

impl Default for MouseLook {
    fn default() -> Self {
        Self::new(DEFAULT_FULL_ROTATION)
    }
}

impl MouseLook {
    pub fn new(full_rotation: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            full_rotation,
        }
    }

    /// Accumulate one motion event and return the new camera rotation.
    ///
    /// Moving the mouse right or down turns the view right or down.
    pub fn apply_motion(&mut self, xrel: f32, yrel: f32) -> Quaternionf {
        self.yaw = (self.yaw - xrel / self.full_rotation) % TAU;
        self.pitch = (self.pitch - yrel / self.full_rotation) % TAU;
        self.rotation()
    }

    /// Yaw about world Y applied after pitch about local X.
    pub fn rotation(&self) -> Quaternionf {
        Quaternionf::from_axis_angle(Vector3f::new(0.0, 1.0, 0.0), self.yaw)
            * Quaternionf::from_axis_angle(Vector3f::new(1.0, 0.0, 0.0), self.pitch)
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}
