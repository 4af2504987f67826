use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::Scalar;

/// Two-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

/// Three-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

pub type Vector2f = Vector2<f32>;
pub type Vector2d = Vector2<f64>;
pub type Vector3f = Vector3<f32>;
pub type Vector3d = Vector3<f64>;

impl<T: Scalar> Vector2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(T::ZERO, T::ZERO)
    }

    /// Unit-length copy. A zero vector is returned unchanged.
    pub fn normalized(self) -> Self {
        let sum_of_squares = self.dot(self);
        if sum_of_squares == T::ZERO {
            return self;
        }
        self / sum_of_squares.sqrt()
    }

    pub fn dot(self, rhs: Self) -> T {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn length(self) -> T {
        self.dot(self).sqrt()
    }

    /// Linear interpolation, `t` is not clamped.
    pub fn lerp(self, to: Self, t: T) -> Self {
        self + (to - self) * t
    }
}

impl<T: Scalar> Vector3<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(T::ZERO, T::ZERO, T::ZERO)
    }

    pub fn one() -> Self {
        Self::new(T::ONE, T::ONE, T::ONE)
    }

    /// Unit-length copy. A zero vector is returned unchanged.
    pub fn normalized(self) -> Self {
        let sum_of_squares = self.dot(self);
        if sum_of_squares == T::ZERO {
            return self;
        }
        self / sum_of_squares.sqrt()
    }

    pub fn dot(self, rhs: Self) -> T {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn length(self) -> T {
        self.dot(self).sqrt()
    }

    /// Component-wise product.
    pub fn element_wise(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    /// Linear interpolation, `t` is not clamped.
    pub fn lerp(self, to: Self, t: T) -> Self {
        self + (to - self) * t
    }
}

impl<T: Scalar> fmt::Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.x, self.y)
    }
}

impl<T: Scalar> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.x, self.y, self.z)
    }
}

// Operator impls shared by both vector widths. `$($field),+` lists the components.
macro_rules! impl_vector_ops {
    ($name:ident { $($field:ident),+ }) => {
        impl<T: Scalar> Neg for $name<T> {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl<T: Scalar> Add<T> for $name<T> {
            type Output = Self;
            fn add(self, rhs: T) -> Self {
                Self { $($field: self.$field + rhs),+ }
            }
        }

        impl<T: Scalar> Sub<T> for $name<T> {
            type Output = Self;
            fn sub(self, rhs: T) -> Self {
                self + -rhs
            }
        }

        impl<T: Scalar> Mul<T> for $name<T> {
            type Output = Self;
            fn mul(self, rhs: T) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl<T: Scalar> Div<T> for $name<T> {
            type Output = Self;
            fn div(self, rhs: T) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl<T: Scalar> Add for $name<T> {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl<T: Scalar> Sub for $name<T> {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl<T: Scalar> AddAssign<T> for $name<T> {
            fn add_assign(&mut self, rhs: T) {
                *self = *self + rhs;
            }
        }

        impl<T: Scalar> SubAssign<T> for $name<T> {
            fn sub_assign(&mut self, rhs: T) {
                *self = *self - rhs;
            }
        }

        impl<T: Scalar> MulAssign<T> for $name<T> {
            fn mul_assign(&mut self, rhs: T) {
                *self = *self * rhs;
            }
        }

        impl<T: Scalar> DivAssign<T> for $name<T> {
            fn div_assign(&mut self, rhs: T) {
                *self = *self / rhs;
            }
        }

        impl<T: Scalar> AddAssign for $name<T> {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl<T: Scalar> SubAssign for $name<T> {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }
    };
}

impl_vector_ops!(Vector2 { x, y });
impl_vector_ops!(Vector3 { x, y, z });
