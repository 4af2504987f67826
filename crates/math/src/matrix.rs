use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::{Quaternion, Scalar, Transform, Vector3};

/// 4x4 matrix stored row-major: element `(row, col)` lives at `row * 4 + col`.
///
/// Points are column vectors, so `a * b` applies `b` first.
/// `Default` is the zero matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Matrix4x4<T> {
    pub data: [T; 16],
}

pub type Matrix4x4f = Matrix4x4<f32>;
pub type Matrix4x4d = Matrix4x4<f64>;

impl<T: Scalar> Matrix4x4<T> {
    pub const fn from_array(data: [T; 16]) -> Self {
        Self { data }
    }

    pub fn zero() -> Self {
        Self::from_array([T::ZERO; 16])
    }

    pub fn identity() -> Self {
        let (o, l) = (T::ZERO, T::ONE);
        #[rustfmt::skip]
        let data = [
            l, o, o, o,
            o, l, o, o,
            o, o, l, o,
            o, o, o, l,
        ];
        Self::from_array(data)
    }

    /// Rotation-only matrix. Assumes `q` is unit-norm.
    pub fn from_quaternion(q: Quaternion<T>) -> Self {
        let (o, l, two) = (T::ZERO, T::ONE, T::TWO);
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);
        #[rustfmt::skip]
        let data = [
            l - two * y * y - two * z * z, two * x * y - two * w * z,     two * x * z + two * w * y,     o,
            two * x * y + two * w * z,     l - two * x * x - two * z * z, two * y * z - two * w * x,     o,
            two * x * z - two * w * y,     two * y * z + two * w * x,     l - two * x * x - two * y * y, o,
            o,                             o,                             o,                             l,
        ];
        Self::from_array(data)
    }

    /// Combined scale and translation: `p -> scale * p + position`.
    pub fn scale_translation(scale: Vector3<T>, position: Vector3<T>) -> Self {
        let (o, l) = (T::ZERO, T::ONE);
        #[rustfmt::skip]
        let data = [
            scale.x, o,       o,       position.x,
            o,       scale.y, o,       position.y,
            o,       o,       scale.z, position.z,
            o,       o,       o,       l,
        ];
        Self::from_array(data)
    }

    /// Model matrix `rotation * (scale + translation)`.
    ///
    /// Scale and translation are applied in local space and the rotation last, so a
    /// rotated transform also swings its position around the origin. Rendering relies on
    /// exactly this order; it is not the usual translate * rotate * scale.
    pub fn from_transform(t: &Transform<T>) -> Self {
        Self::from_quaternion(t.rotation) * Self::scale_translation(t.scale, t.position)
    }

    /// Right-handed OpenGL-style perspective projection with a vertical field of view.
    ///
    /// The camera looks down -Z. After [`Self::rotate_point`], camera-space `z = -near`
    /// maps to depth -1 and `z = -far` to +1; `w` becomes `-z`.
    /// Unguarded: `far == near` or `fov_degrees == 180` produce Inf/NaN.
    pub fn perspective_matrix(near: T, far: T, aspect_ratio: T, fov_degrees: T) -> Self {
        let o = T::ZERO;
        let inv_tan = T::ONE / (fov_degrees.to_radians() / T::TWO).tan();
        let depth = T::ONE / (near - far);
        #[rustfmt::skip]
        let data = [
            inv_tan / aspect_ratio, o,       o,                    o,
            o,                      inv_tan, o,                    o,
            o,                      o,       (far + near) * depth, T::TWO * far * near * depth,
            o,                      o,       -T::ONE,              o,
        ];
        Self::from_array(data)
    }

    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[row * 4 + col]
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * 4 + col]
    }

    pub fn transposed(&self) -> Self {
        let mut result = Self::zero();
        for row in 0..4 {
            for col in 0..4 {
                *result.at_mut(col, row) = self.at(row, col);
            }
        }
        result
    }

    /// Homogeneous transform of a point followed by the divide by `w`.
    ///
    /// Returns the zero vector when `w` is exactly zero instead of dividing.
    pub fn rotate_point(&self, p: Vector3<T>) -> Vector3<T> {
        let row = |r: usize| {
            self.at(r, 0) * p.x + self.at(r, 1) * p.y + self.at(r, 2) * p.z + self.at(r, 3)
        };
        let w = row(3);
        if w == T::ZERO {
            return Vector3::zero();
        }
        Vector3::new(row(0) / w, row(1) / w, row(2) / w)
    }

    fn map(self, f: impl Fn(T) -> T) -> Self {
        Self::from_array(self.data.map(f))
    }

    fn zip(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        let mut result = self;
        for (out, r) in result.data.iter_mut().zip(rhs.data) {
            *out = f(*out, r);
        }
        result
    }
}

impl<T: Scalar> fmt::Display for Matrix4x4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            if row > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "[{:>10.3}, {:>10.3}, {:>10.3}, {:>10.3}]",
                self.at(row, 0),
                self.at(row, 1),
                self.at(row, 2),
                self.at(row, 3)
            )?;
        }
        Ok(())
    }
}

impl<T> Index<usize> for Matrix4x4<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Matrix4x4<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T: Scalar> Neg for Matrix4x4<T> {
    type Output = Self;
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl<T: Scalar> Add<T> for Matrix4x4<T> {
    type Output = Self;
    fn add(self, rhs: T) -> Self {
        self.map(|v| v + rhs)
    }
}

impl<T: Scalar> Sub<T> for Matrix4x4<T> {
    type Output = Self;
    fn sub(self, rhs: T) -> Self {
        self + -rhs
    }
}

impl<T: Scalar> Mul<T> for Matrix4x4<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        self.map(|v| v * rhs)
    }
}

impl<T: Scalar> Div<T> for Matrix4x4<T> {
    type Output = Self;
    fn div(self, rhs: T) -> Self {
        self * (T::ONE / rhs)
    }
}

impl<T: Scalar> Add for Matrix4x4<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl<T: Scalar> Sub for Matrix4x4<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl<T: Scalar> Mul for Matrix4x4<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut result = Self::zero();
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = T::ZERO;
                for i in 0..4 {
                    sum += self.at(row, i) * rhs.at(i, col);
                }
                *result.at_mut(row, col) = sum;
            }
        }
        result
    }
}

/// Same as [`Matrix4x4::rotate_point`].
impl<T: Scalar> Mul<Vector3<T>> for Matrix4x4<T> {
    type Output = Vector3<T>;
    fn mul(self, rhs: Vector3<T>) -> Vector3<T> {
        self.rotate_point(rhs)
    }
}

macro_rules! impl_assign {
    ($trait:ident, $method:ident, $op:tt, $rhs:ty) => {
        impl<T: Scalar> $trait<$rhs> for Matrix4x4<T> {
            fn $method(&mut self, rhs: $rhs) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_assign!(AddAssign, add_assign, +, T);
impl_assign!(SubAssign, sub_assign, -, T);
impl_assign!(MulAssign, mul_assign, *, T);
impl_assign!(DivAssign, div_assign, /, T);
impl_assign!(AddAssign, add_assign, +, Matrix4x4<T>);
impl_assign!(SubAssign, sub_assign, -, Matrix4x4<T>);
impl_assign!(MulAssign, mul_assign, *, Matrix4x4<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quaterniond, Vector3d};
    use approx::assert_abs_diff_eq;

    const EPS: f64 = 5e-3;

    #[rustfmt::skip]
    const SAMPLE: [f64; 16] = [
        -372.65, 800.96, -790.74, 144.73,
        1022.44, -3.35, -621.43, 498.99,
        733.69, -517.37, -504.58, 942.80,
        -484.97, -148.03, 985.37, 66.20,
    ];

    fn assert_mat_near(actual: Matrix4x4d, expected: Matrix4x4d) {
        for i in 0..16 {
            assert_abs_diff_eq!(actual[i], expected[i], epsilon = EPS);
        }
    }

    fn assert_vec_near(actual: Vector3d, expected: Vector3d) {
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = EPS);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = EPS);
        assert_abs_diff_eq!(actual.z, expected.z, epsilon = EPS);
    }

    #[test]
    fn flat_and_row_col_access() {
        let mut m = Matrix4x4d::from_array(SAMPLE);
        assert_eq!(m.at(2, 1), -517.37);
        assert_eq!(m.at(3, 3), 66.20);
        m[3] = -512.98;
        assert_eq!(m[3], -512.98);
        assert_eq!(m.at(0, 3), -512.98);
    }

    #[test]
    fn scalar_arithmetic() {
        let m = Matrix4x4d::from_array(SAMPLE);
        assert_abs_diff_eq!((m + 76.28).at(0, 0), -296.37, epsilon = EPS);
        assert_abs_diff_eq!((m - 76.28).at(3, 3), -10.08, epsilon = EPS);
        assert_abs_diff_eq!((m * 2.54).at(1, 0), 2597.00, epsilon = 0.01);
        assert_abs_diff_eq!((m / 2.54).at(2, 3), 371.18, epsilon = 0.01);
        assert_eq!(-(-m), m);
    }

    #[test]
    fn matrix_addition_and_subtraction() {
        let m = Matrix4x4d::from_array(SAMPLE);
        assert_mat_near(m + m - m, m);
        let mut n = m;
        n += m;
        assert_mat_near(n, m * 2.0);
        n -= m;
        assert_mat_near(n, m);
    }

    #[test]
    fn multiply_by_identity() {
        let m = Matrix4x4d::from_array(SAMPLE);
        assert_mat_near(m * Matrix4x4d::identity(), m);
        assert_mat_near(Matrix4x4d::identity() * m, m);
    }

    #[test]
    fn multiply_by_zero() {
        let m = Matrix4x4d::from_array(SAMPLE);
        assert_eq!(m * Matrix4x4d::zero(), Matrix4x4d::zero());
        assert_eq!(Matrix4x4d::default() * Matrix4x4d::default(), Matrix4x4d::zero());
    }

    #[test]
    fn multiply_two_matrices() {
        let a = Matrix4x4d::from_array(SAMPLE);
        #[rustfmt::skip]
        let b = Matrix4x4d::from_array([
            346.48, -253.20, 766.78, -68.55,
            353.64, 937.99, -485.22, -972.35,
            -610.42, 550.54, 734.42, -942.18,
            -531.71, -246.17, -751.73, 444.67,
        ]);
        #[rustfmt::skip]
        let expected = Matrix4x4d::from_array([
            559864.845, 374685.267, -1363915.532, 56108.204,
            467085.645, -726982.515, -45884.343, 740553.911,
            -122044.280, -1180938.743, -265687.598, 1347410.330,
            -857070.492, 510132.890, 373872.729, -721777.089,
        ]);
        assert_mat_near(a * b, expected);
    }

    #[test]
    fn from_identity_quaternion_is_identity() {
        assert_mat_near(
            Matrix4x4d::from_quaternion(Quaterniond::identity()),
            Matrix4x4d::identity(),
        );
    }

    #[test]
    fn from_zero_quaternion_is_identity() {
        assert_mat_near(
            Matrix4x4d::from_quaternion(Quaterniond::default()),
            Matrix4x4d::identity(),
        );
    }

    #[test]
    fn from_quaternion_values() {
        let q = Quaterniond::new(2.45, -7.12, 12.6, -6.42).normalized();
        #[rustfmt::skip]
        let expected = Matrix4x4d::from_array([
            -0.5582174, -0.5764760, 0.5967150, 0.0,
            -0.8215969, 0.2838305, -0.4943872, 0.0,
            0.1156365, -0.7662348, -0.6320700, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        assert_mat_near(Matrix4x4d::from_quaternion(q), expected);
    }

    #[test]
    fn from_quaternion_agrees_with_quaternion_rotation() {
        let q = Quaterniond::new(2.45, -7.12, 12.6, -6.42).normalized();
        let p = Vector3d::new(1.5, -2.0, 0.25);
        assert_vec_near(Matrix4x4d::from_quaternion(q).rotate_point(p), q.rotate_point(p));
    }

    #[test]
    fn from_transform_scales_and_translates_before_rotating() {
        let rotation = Quaterniond::from_axis_angle(Vector3d::new(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
        let t = Transform::new(Vector3d::new(1.0, 0.0, 0.0), rotation, Vector3d::new(2.0, 2.0, 2.0));
        let m = Matrix4x4d::from_transform(&t);
        // (1,0,0) -> scaled (2,0,0) -> translated (3,0,0) -> rotated (0,3,0)
        assert_vec_near(m * Vector3d::new(1.0, 0.0, 0.0), Vector3d::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn perspective_matrix_values() {
        let m = Matrix4x4d::perspective_matrix(6.0, 24.0, 16.0 / 9.0, 70.0);
        #[rustfmt::skip]
        let expected = Matrix4x4d::from_array([
            0.803333, 0.0, 0.0, 0.0,
            0.0, 1.428148, 0.0, 0.0,
            0.0, 0.0, -1.666667, -16.0,
            0.0, 0.0, -1.0, 0.0,
        ]);
        assert_mat_near(m, expected);
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let m = Matrix4x4d::perspective_matrix(0.5, 500.0, 4.0 / 3.0, 75.0);
        let near = m.rotate_point(Vector3d::new(0.0, 0.0, -0.5));
        let far = m.rotate_point(Vector3d::new(0.0, 0.0, -500.0));
        assert_abs_diff_eq!(near.z, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn perspective_with_equal_planes_is_not_finite() {
        let m = Matrix4x4d::perspective_matrix(1.0, 1.0, 1.0, 90.0);
        assert!(!m.at(2, 2).is_finite());
    }

    #[test]
    fn rotate_point_cases() {
        let m = Matrix4x4d::from_array(SAMPLE);
        assert_vec_near(Matrix4x4d::zero().rotate_point(Vector3d::zero()), Vector3d::zero());
        assert_vec_near(m.rotate_point(Vector3d::zero()), Vector3d::new(2.186, 7.537, 14.241));
        let p = Vector3d::new(2.64, -28.54, 28.87);
        assert_eq!(Matrix4x4d::zero().rotate_point(p), Vector3d::zero());
        assert_vec_near(Matrix4x4d::identity().rotate_point(p), p);
        assert_vec_near(m * p, Vector3d::new(-1.479, -0.465, 0.097));
    }

    #[test]
    fn transpose_round_trip() {
        let m = Matrix4x4d::from_array(SAMPLE);
        assert_eq!(m.transposed().at(1, 0), m.at(0, 1));
        assert_eq!(m.transposed().transposed(), m);
    }

    #[test]
    fn display_rows() {
        let text = Matrix4x4d::identity().to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("[     1.000,      0.000,"));
    }
}
