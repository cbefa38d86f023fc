//! Fixed-dimension vectors.
//!
//! `Vector<T, N>` is a column vector of `N` components (2, 3 or 4).
//!
//! Four-component vectors are homogeneous: `w = 1` marks a point (a position)
//! and `w = 0` marks a direction. Transform matrices only translate points,
//! and the arithmetic here keeps the tag meaningful:
//!
//! - point + direction = point, direction + direction = direction,
//!   point + point panics;
//! - point - point = direction, point - direction = point,
//!   direction - point panics;
//! - `scale`, `normalise` and the length/dot family act on x, y, z only and
//!   leave `w` untouched.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::scalar::Scalar;

/// Column vector with `N` components.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "[T; N]: Serialize",
    deserialize = "[T; N]: Deserialize<'de>"
))]
pub struct Vector<T, const N: usize>(pub [T; N]);

pub type Vec2<T = f32> = Vector<T, 2>;
pub type Vec3<T = f32> = Vector<T, 3>;
pub type Vec4<T = f32> = Vector<T, 4>;

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self([T::ZERO; N])
    }
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Number of components that take part in spatial operations. The `w`
    /// tag of a homogeneous vector is excluded.
    const SPATIAL: usize = if N == 4 { 3 } else { N };

    pub const fn from_array(components: [T; N]) -> Self {
        Self(components)
    }

    pub fn to_array(self) -> [T; N] {
        self.0
    }

    pub fn scale(self, s: T) -> Self {
        let mut out = self;
        for c in &mut out.0[..Self::SPATIAL] {
            *c = *c * s;
        }
        out
    }

    pub fn dot(self, rhs: Self) -> T {
        let mut acc = T::ZERO;
        for i in 0..Self::SPATIAL {
            acc += self.0[i] * rhs.0[i];
        }
        acc
    }

    /// Componentwise product, including `w`.
    pub fn hadamard(self, rhs: Self) -> Self {
        let mut out = self;
        for (c, r) in out.0.iter_mut().zip(rhs.0) {
            *c = *c * r;
        }
        out
    }

    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction; `w` is preserved. A zero-length
    /// input gives non-finite components.
    pub fn normalise(self) -> Self {
        self.scale(T::ONE / self.length())
    }

    fn tag(&self) -> Option<T> {
        if N == 4 {
            self.0.get(3).copied()
        } else {
            None
        }
    }
}

impl<T: Scalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        if let (Some(a), Some(b)) = (self.tag(), rhs.tag()) {
            assert!(
                !(a == T::ONE && b == T::ONE),
                "cannot add two points: {self:?} + {rhs:?}"
            );
        }
        let mut out = self;
        for (c, r) in out.0.iter_mut().zip(rhs.0) {
            *c = *c + r;
        }
        out
    }
}

impl<T: Scalar, const N: usize> AddAssign for Vector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        if let (Some(a), Some(b)) = (self.tag(), rhs.tag()) {
            assert!(
                !(a == T::ZERO && b == T::ONE),
                "cannot subtract a point from a direction: {self:?} - {rhs:?}"
            );
        }
        let mut out = self;
        for (c, r) in out.0.iter_mut().zip(rhs.0) {
            *c = *c - r;
        }
        out
    }
}

impl<T: Scalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, s: T) -> Self {
        self.scale(s)
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: Scalar, const N: usize> AbsDiffEq for Vector<T, N> {
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: Scalar> Vector<T, 2> {
    pub const fn new(x: T, y: T) -> Self {
        Self([x, y])
    }

    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }

    /// z component of the 3D cross product of the two vectors lifted into the
    /// xy plane.
    pub fn cross(self, rhs: Self) -> T {
        self.0[0] * rhs.0[1] - self.0[1] * rhs.0[0]
    }
}

impl<T: Scalar> Vector<T, 3> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self([x, y, z])
    }

    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }

    pub fn z(self) -> T {
        self.0[2]
    }

    pub fn cross(self, rhs: Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = rhs.0;
        Self([ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx])
    }

    /// Homogeneous vector with the given tag.
    pub fn extend(self, w: T) -> Vector<T, 4> {
        Vector([self.0[0], self.0[1], self.0[2], w])
    }
}

impl<T: Scalar> Vector<T, 4> {
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self([x, y, z, w])
    }

    pub const fn point(x: T, y: T, z: T) -> Self {
        Self([x, y, z, T::ONE])
    }

    pub const fn direction(x: T, y: T, z: T) -> Self {
        Self([x, y, z, T::ZERO])
    }

    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }

    pub fn z(self) -> T {
        self.0[2]
    }

    pub fn w(self) -> T {
        self.0[3]
    }

    pub fn xyz(self) -> Vector<T, 3> {
        Vector([self.0[0], self.0[1], self.0[2]])
    }

    pub fn is_point(self) -> bool {
        self.0[3] == T::ONE
    }

    pub fn is_direction(self) -> bool {
        self.0[3] == T::ZERO
    }

    /// Cross product of the spatial parts. The tags multiply, so the result
    /// is a point only when both inputs are points.
    pub fn cross(self, rhs: Self) -> Self {
        self.xyz().cross(rhs.xyz()).extend(self.0[3] * rhs.0[3])
    }
}

impl Vector<f32, 4> {
    pub const X: Self = Self::direction(1.0, 0.0, 0.0);
    pub const Y: Self = Self::direction(0.0, 1.0, 0.0);
    pub const Z: Self = Self::direction(0.0, 0.0, 1.0);
    pub const ORIGIN: Self = Self::point(0.0, 0.0, 0.0);
}

/// Spherical coordinates with `y` as the polar axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spherical<T = f32> {
    pub r: T,
    /// Azimuth in the xz plane, radians from +x toward +z.
    pub theta: T,
    /// Polar angle from +y, radians.
    pub phi: T,
}

impl<T: Scalar> Spherical<T> {
    pub fn to_cartesian(self) -> Vector<T, 3> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vector::<T, 3>::new(
            self.r * cos_theta * sin_phi,
            self.r * cos_phi,
            self.r * sin_theta * sin_phi,
        )
    }
}
