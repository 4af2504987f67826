use serde::{Deserialize, Serialize};

use crate::{Quaternion, Scalar, Vector3};

/// Position, rotation and scale of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform<T> {
    pub position: Vector3<T>,
    pub rotation: Quaternion<T>,
    pub scale: Vector3<T>,
}

pub type Transformf = Transform<f32>;

impl<T: Scalar> Transform<T> {
    pub fn new(position: Vector3<T>, rotation: Quaternion<T>, scale: Vector3<T>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vector3<T>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Inverse of a rigid transform: negated position, conjugated rotation, unit scale.
    ///
    /// Only valid for unit-scale transforms with a unit-norm rotation. Used to turn a
    /// camera's world transform into a view transform without a general matrix inverse.
    pub fn rigid_inverse(&self) -> Self {
        Self {
            position: -self.position,
            rotation: self.rotation.inverse(),
            scale: Vector3::one(),
        }
    }
}

impl<T: Scalar> Default for Transform<T> {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::identity(),
            scale: Vector3::one(),
        }
    }
}
