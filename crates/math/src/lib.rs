//! Math core: vectors, quaternions and 4x4 matrices generic over `f32`/`f64`.
//!
//! # Invariants
//! - All operations are pure and deterministic.
//! - Normalization is guarded against zero length; SLERP and the perspective
//!   projection are not and yield NaN/Inf on degenerate input.
//! - `Matrix4x4` is row-major and treats points as column vectors.

mod matrix;
mod quaternion;
mod scalar;
mod transform;
mod vector;

pub use matrix::{Matrix4x4, Matrix4x4d, Matrix4x4f};
pub use quaternion::{Quaternion, Quaterniond, Quaternionf};
pub use scalar::Scalar;
pub use transform::{Transform, Transformf};
pub use vector::{Vector2, Vector2d, Vector2f, Vector3, Vector3d, Vector3f};

pub fn crate_info() -> &'static str {
    "notdoom-math v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("math"));
    }
}
