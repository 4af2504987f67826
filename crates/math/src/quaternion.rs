use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

use crate::{Scalar, Vector3};

/// Quaternion `w + xi + yj + zk`. Represents a rotation when unit-norm.
///
/// `Default` is the zero quaternion, not the identity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion<T> {
    pub w: T,
    pub x: T,
    pub y: T,
    pub z: T,
}

pub type Quaternionf = Quaternion<f32>;
pub type Quaterniond = Quaternion<f64>;

impl<T: Scalar> Quaternion<T> {
    pub const fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(T::ONE, T::ZERO, T::ZERO, T::ZERO)
    }

    /// Rotation of `angle` radians about `axis` (right-hand rule).
    ///
    /// The axis is normalized here, so callers may pass any non-zero direction.
    /// A zero axis yields `(cos(angle/2), 0, 0, 0)` normalized.
    pub fn from_axis_angle(axis: Vector3<T>, angle: T) -> Self {
        let axis = axis.normalized();
        let half = angle / T::TWO;
        let sine = half.sin();
        let cosine = half.cos();
        Self::new(cosine, axis.x * sine, axis.y * sine, axis.z * sine).normalized()
    }

    /// Unit-norm copy. The zero quaternion is returned unchanged (and stays non-unit).
    pub fn normalized(self) -> Self {
        let sum_of_squares = self.dot(self);
        if sum_of_squares == T::ZERO {
            return self;
        }
        self / sum_of_squares.sqrt()
    }

    /// Conjugate. Equals the inverse only for unit quaternions.
    pub fn inverse(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn dot(self, rhs: Self) -> T {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Rotates `vector` by the sandwich product `q * (0, v) * q^-1`.
    ///
    /// Assumes `self` is unit-norm; otherwise the result is silently scaled.
    pub fn rotate_point(self, vector: Vector3<T>) -> Vector3<T> {
        let pure = Self::new(T::ZERO, vector.x, vector.y, vector.z);
        let rotated = self * (pure * self.inverse());
        Vector3::new(rotated.x, rotated.y, rotated.z)
    }

    /// Spherical interpolation towards `rhs` for `0 < t < 1`.
    ///
    /// Unguarded: identical or antipodal inputs (dot of +-1) divide by `sin(0)`
    /// and produce NaN.
    pub fn slerp_to(self, rhs: Self, t: T) -> Self {
        let theta = self.dot(rhs).acos();
        let sin_theta = theta.sin();
        self * ((T::ONE - t) * theta).sin() / sin_theta + rhs * (t * theta).sin() / sin_theta
    }
}

impl<T: Scalar> fmt::Display for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}, {}}}", self.w, self.x, self.y, self.z)
    }
}

impl<T: Scalar> Add for Quaternion<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Scalar> AddAssign for Quaternion<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar> Mul<T> for Quaternion<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self::new(self.w * rhs, self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl<T: Scalar> MulAssign<T> for Quaternion<T> {
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Scalar> Div<T> for Quaternion<T> {
    type Output = Self;
    fn div(self, rhs: T) -> Self {
        Self::new(self.w / rhs, self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl<T: Scalar> DivAssign<T> for Quaternion<T> {
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

/// Hamilton product. Not commutative.
impl<T: Scalar> Mul for Quaternion<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let (w1, x1, y1, z1) = (self.w, self.x, self.y, self.z);
        let (w2, x2, y2, z2) = (rhs.w, rhs.x, rhs.y, rhs.z);
        Self::new(
            w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2,
            w1 * x2 + w2 * x1 + y1 * z2 - z1 * y2,
            w1 * y2 + w2 * y1 + z1 * x2 - x1 * z2,
            w1 * z2 + w2 * z1 + x1 * y2 - y1 * x2,
        )
    }
}

impl<T: Scalar> MulAssign for Quaternion<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
