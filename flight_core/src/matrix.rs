//! 4x4 affine matrices.
//!
//! Storage is column-major, `m[col][row]`, so the literal arrays below read
//! as the transpose of the matrix they build: each inner array is a column.
//! Column 3 holds the translation of an affine transform and columns 0..=2
//! hold the (possibly rotated or scaled) basis.
//!
//! Vectors are columns and are multiplied on the right, so in `a * b * v` the
//! transform `b` is applied first.

use std::ops::Mul;

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::{
    scalar::Scalar,
    vector::{Vector, Vec3, Vec4},
};

/// 4x4 matrix (column-major).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T = f32> {
    pub m: [[T; 4]; 4],
}

pub type Mat4 = Matrix<f32>;

impl<T: Scalar> Default for Matrix<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Scalar> Matrix<T> {
    pub const fn from_columns(m: [[T; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn zero() -> Self {
        Self {
            m: [[T::ZERO; 4]; 4],
        }
    }

    pub fn identity() -> Self {
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [
                [l, o, o, o],
                [o, l, o, o],
                [o, o, l, o],
                [o, o, o, l],
            ],
        }
    }

    /// Transposes in place.
    pub fn transpose(&mut self) -> &mut Self {
        for col in 0..4 {
            for row in (col + 1)..4 {
                let tmp = self.m[col][row];
                self.m[col][row] = self.m[row][col];
                self.m[row][col] = tmp;
            }
        }
        self
    }

    pub fn transposed(mut self) -> Self {
        self.transpose();
        self
    }

    /// Rotation of `angle_deg` about the unit `axis` (Rodrigues' formula).
    ///
    /// A positive angle turns counter-clockwise when looking down the axis
    /// toward the origin. The axis must be unit length or the result is not
    /// a pure rotation.
    pub fn rotation_axis(angle_deg: T, axis: Vec3<T>) -> Self {
        Self::transform(axis, angle_deg, Vec3::<T>::default(), T::ONE)
    }

    pub fn rotation_x(angle_deg: T) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [
                [l, o, o, o],
                [o, c, s, o],
                [o, -s, c, o],
                [o, o, o, l],
            ],
        }
    }

    pub fn rotation_y(angle_deg: T) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [
                [c, o, -s, o],
                [o, l, o, o],
                [s, o, c, o],
                [o, o, o, l],
            ],
        }
    }

    pub fn rotation_z(angle_deg: T) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [
                [c, s, o, o],
                [-s, c, o, o],
                [o, o, l, o],
                [o, o, o, l],
            ],
        }
    }

    pub fn translation(x: T, y: T, z: T) -> Self {
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [
                [l, o, o, o],
                [o, l, o, o],
                [o, o, l, o],
                [x, y, z, l],
            ],
        }
    }

    pub fn scale_uniform(s: T) -> Self {
        let (o, l) = (T::ZERO, T::ONE);
        Self {
            m: [
                [s, o, o, o],
                [o, s, o, o],
                [o, o, s, o],
                [o, o, o, l],
            ],
        }
    }

    /// Uniform scale, then rotation about `axis`, then translation, built in
    /// one pass. Equivalent to `translation * rotation_axis * scale_uniform`.
    pub fn transform(axis: Vec3<T>, angle_deg: T, translation: Vec3<T>, scale: T) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let [x, y, z] = axis.0;
        let a = T::ONE - c;
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (sx, sy, sz) = (s * x, s * y, s * z);
        let k = scale;
        let o = T::ZERO;
        Self {
            m: [
                [k * (c + a * x * x), k * (a * xy + sz), k * (a * xz - sy), o],
                [k * (a * xy - sz), k * (c + a * y * y), k * (a * yz + sx), o],
                [k * (a * xz + sy), k * (a * yz - sx), k * (c + a * z * z), o],
                [translation[0], translation[1], translation[2], T::ONE],
            ],
        }
    }

    /// `a * b`. Not commutative: applied to a column vector, `b` acts first.
    pub fn concatenate(a: &Self, b: &Self) -> Self {
        let mut out = Self::zero();
        for col in 0..4 {
            for row in 0..4 {
                let mut acc = T::ZERO;
                for n in 0..4 {
                    acc += a.m[n][row] * b.m[col][n];
                }
                out.m[col][row] = acc;
            }
        }
        out
    }

    pub fn multiply(&self, v: Vec4<T>) -> Vec4<T> {
        let mut out = Vec4::<T>::default();
        for row in 0..4 {
            let mut acc = T::ZERO;
            for col in 0..4 {
                acc += self.m[col][row] * v[col];
            }
            out[row] = acc;
        }
        out
    }

    /// Child-to-parent transform from a frame whose axes and origin are
    /// expressed in the parent frame.
    ///
    /// The axes must be pairwise orthonormal directions or geometry is
    /// sheared and scaled.
    pub fn basis_to_matrix(x: Vec4<T>, y: Vec4<T>, z: Vec4<T>, origin: Vec4<T>) -> Self {
        assert!(
            x.is_direction() && y.is_direction() && z.is_direction(),
            "basis axes must be directions"
        );
        assert!(origin.is_point(), "basis origin must be a point");
        Self {
            m: [x.0, y.0, z.0, origin.0],
        }
    }

    /// Inverse of [`Matrix::basis_to_matrix`] for an orthonormal basis:
    /// parent-to-child, or world-to-view when the frame is a camera's.
    ///
    /// The rotation part is transposed and the translation is the origin
    /// rotated into the child frame and negated, so no general inverse is
    /// needed.
    pub fn world_to_view_from_basis(x: Vec4<T>, y: Vec4<T>, z: Vec4<T>, origin: Vec4<T>) -> Self {
        assert!(
            x.is_direction() && y.is_direction() && z.is_direction(),
            "basis axes must be directions"
        );
        assert!(origin.is_point(), "basis origin must be a point");
        let o = T::ZERO;
        Self {
            m: [
                [x[0], y[0], z[0], o],
                [x[1], y[1], z[1], o],
                [x[2], y[2], z[2], o],
                [-x.dot(origin), -y.dot(origin), -z.dot(origin), T::ONE],
            ],
        }
    }

    /// View matrix for an eye at `eye` looking at `target`.
    ///
    /// The camera looks down its local -z, so local +z points from the
    /// target back to the eye; x = up × z and y = z × x complete the frame.
    pub fn look_at(eye: Vec4<T>, target: Vec4<T>, world_up: Vec4<T>) -> Self {
        assert!(eye.is_point() && target.is_point(), "eye and target must be points");
        assert!(world_up.is_direction(), "world up must be a direction");

        let z = (eye - target).normalise();
        let x = world_up.cross(z).normalise();
        let y = z.cross(x);
        Self::world_to_view_from_basis(x, y, z, eye)
    }

    pub fn column(&self, i: usize) -> Vec4<T> {
        Vector(self.m[i])
    }

    pub fn translation_column(&self) -> Vec4<T> {
        self.column(3)
    }

    /// The 16 components in storage order (column-major), borrowed as-is for
    /// handing to a graphics API.
    pub fn flatten(&self) -> &[T] {
        self.m.as_flattened()
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::concatenate(&self, &rhs)
    }
}

impl<T: Scalar> Mul<Vec4<T>> for Matrix<T> {
    type Output = Vec4<T>;

    fn mul(self, v: Vec4<T>) -> Vec4<T> {
        self.multiply(v)
    }
}

impl<T: Scalar> Mul<Vec4<T>> for &Matrix<T> {
    type Output = Vec4<T>;

    fn mul(self, v: Vec4<T>) -> Vec4<T> {
        self.multiply(v)
    }
}

impl<T: Scalar> AbsDiffEq for Matrix<T> {
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.flatten()
            .iter()
            .zip(other.flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const EPS: f32 = 1e-5;

    fn random_axis(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if v.length() > 0.1 {
                return v.normalise();
            }
        }
    }

    #[test]
    fn identity_is_default() {
        assert_eq!(Mat4::default(), Mat4::identity());
        assert_eq!(Mat4::zero().flatten(), &[0.0; 16]);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let mut m = Mat4::translation(1.0, 2.0, 3.0);
        m.transpose();
        assert_eq!(m.m[0][3], 1.0);
        assert_eq!(m.m[1][3], 2.0);
        assert_eq!(m.m[2][3], 3.0);
        assert_eq!(m.m[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn axis_is_fixed_point_of_its_rotation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let axis = random_axis(&mut rng);
            let angle = rng.gen_range(-360.0..360.0);
            let r = Mat4::rotation_axis(angle, axis);
            assert_abs_diff_eq!(r * axis.extend(0.0), axis.extend(0.0), epsilon = EPS);
        }
    }

    #[test]
    fn inverse_rotation_round_trips() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..64 {
            let axis = random_axis(&mut rng);
            let angle = rng.gen_range(-180.0..180.0);
            let both = Mat4::rotation_axis(angle, axis) * Mat4::rotation_axis(-angle, axis);
            assert_abs_diff_eq!(both, Mat4::identity(), epsilon = EPS);
        }
    }

    #[test]
    fn transpose_of_rotation_is_inverse_rotation() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..64 {
            let axis = random_axis(&mut rng);
            let angle = rng.gen_range(-180.0..180.0);
            assert_abs_diff_eq!(
                Mat4::rotation_axis(angle, axis).transposed(),
                Mat4::rotation_axis(-angle, axis),
                epsilon = EPS
            );
        }
    }

    #[test]
    fn positive_angles_turn_counter_clockwise() {
        let x_to_y = Mat4::rotation_z(90.0) * Vec4::X;
        assert_abs_diff_eq!(x_to_y, Vec4::Y, epsilon = EPS);
        let y_to_z = Mat4::rotation_x(90.0) * Vec4::Y;
        assert_abs_diff_eq!(y_to_z, Vec4::Z, epsilon = EPS);
        let z_to_x = Mat4::rotation_y(90.0) * Vec4::Z;
        assert_abs_diff_eq!(z_to_x, Vec4::X, epsilon = EPS);
    }

    #[test]
    fn axis_rotation_matches_principal_rotations() {
        for angle in [-135.0, -30.0, 0.0, 45.0, 170.0] {
            assert_abs_diff_eq!(
                Mat4::rotation_axis(angle, Vec4::X.xyz()),
                Mat4::rotation_x(angle),
                epsilon = EPS
            );
            assert_abs_diff_eq!(
                Mat4::rotation_axis(angle, Vec4::Y.xyz()),
                Mat4::rotation_y(angle),
                epsilon = EPS
            );
            assert_abs_diff_eq!(
                Mat4::rotation_axis(angle, Vec4::Z.xyz()),
                Mat4::rotation_z(angle),
                epsilon = EPS
            );
        }
    }

    #[test]
    fn translation_moves_points_not_directions() {
        let t = Mat4::translation(1.0, -2.0, 3.0);
        assert_eq!(t * Vec4::point(1.0, 1.0, 1.0), Vec4::point(2.0, -1.0, 4.0));
        assert_eq!(t * Vec4::X, Vec4::X);
    }

    #[test]
    fn concatenate_applies_right_operand_first() {
        let t = Mat4::translation(5.0, 0.0, 0.0);
        let r = Mat4::rotation_z(90.0);
        let p = Vec4::point(1.0, 0.0, 0.0);
        // rotate then translate
        assert_abs_diff_eq!((t * r) * p, Vec4::point(5.0, 1.0, 0.0), epsilon = EPS);
        // translate then rotate
        assert_abs_diff_eq!((r * t) * p, Vec4::point(0.0, 6.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn concatenate_uses_all_sixteen_terms() {
        let s = Mat4::scale_uniform(2.0);
        let t = Mat4::translation(1.0, 2.0, 3.0);
        let ts = Mat4::concatenate(&t, &s);
        assert_eq!(ts.translation_column(), Vec4::point(1.0, 2.0, 3.0));
        let st = Mat4::concatenate(&s, &t);
        assert_eq!(st.translation_column(), Vec4::point(2.0, 4.0, 6.0));
    }

    #[test]
    fn transform_matches_composed_constructors() {
        let axis = Vec3::new(1.0, 2.0, 2.0).normalise();
        let composed = Mat4::translation(4.0, 5.0, 6.0)
            * Mat4::rotation_axis(33.0, axis)
            * Mat4::scale_uniform(1.5);
        let direct = Mat4::transform(axis, 33.0, Vec3::new(4.0, 5.0, 6.0), 1.5);
        assert_abs_diff_eq!(direct, composed, epsilon = EPS);
    }

    #[test]
    fn world_to_view_inverts_basis_to_matrix() {
        let r = Mat4::rotation_axis(40.0, Vec3::new(0.0, 0.6, 0.8));
        let (x, y, z) = (r.column(0), r.column(1), r.column(2));
        let origin = Vec4::point(3.0, -1.0, 7.0);
        let model = Mat4::basis_to_matrix(x, y, z, origin);
        let view = Mat4::world_to_view_from_basis(x, y, z, origin);
        assert_abs_diff_eq!(view * model, Mat4::identity(), epsilon = EPS);
        assert_abs_diff_eq!(model * view, Mat4::identity(), epsilon = EPS);
        assert_abs_diff_eq!(view * origin, Vec4::point(0.0, 0.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn look_at_down_negative_z_is_identity() {
        let view = Mat4::look_at(
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::point(0.0, 0.0, -1.0),
            Vec4::Y,
        );
        assert_abs_diff_eq!(view, Mat4::identity(), epsilon = EPS);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let eye = Vec4::point(10.0, 5.0, 0.0);
        let target = Vec4::point(0.0, 0.0, 0.0);
        let view = Mat4::look_at(eye, target, Vec4::Y);
        let in_view = view * target;
        let distance = (target - eye).length();
        assert_abs_diff_eq!(in_view, Vec4::point(0.0, 0.0, -distance), epsilon = 1e-4);
        assert_abs_diff_eq!(view * eye, Vec4::point(0.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn flatten_is_column_major() {
        let t = Mat4::translation(7.0, 8.0, 9.0);
        let flat = t.flatten();
        assert_eq!(flat.len(), 16);
        assert_eq!(&flat[12..], &[7.0, 8.0, 9.0, 1.0]);
        assert!(std::ptr::eq(flat.as_ptr(), t.m[0].as_ptr()));
    }

    #[test]
    #[should_panic(expected = "basis origin must be a point")]
    fn basis_rejects_direction_origin() {
        let _ = Mat4::basis_to_matrix(Vec4::X, Vec4::Y, Vec4::Z, Vec4::X);
    }

    #[test]
    fn double_precision_rotation() {
        let r = Matrix::<f64>::rotation_axis(90.0, Vec3::<f64>::new(0.0, 0.0, 1.0));
        let v = r * Vec4::<f64>::direction(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(v, Vec4::<f64>::direction(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
