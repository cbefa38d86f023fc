//! Scalar types the vector and matrix types are generic over.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use approx::AbsDiffEq;

/// Floating-point component type.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AbsDiffEq<Epsilon = Self>
    + 'static
{
    const ZERO: Self;
    const ONE: Self;

    fn sqrt(self) -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn to_radians(self) -> Self;
    fn abs(self) -> Self;
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                #[inline]
                fn sqrt(self) -> Self {
                    <$t>::sqrt(self)
                }

                #[inline]
                fn sin_cos(self) -> (Self, Self) {
                    <$t>::sin_cos(self)
                }

                #[inline]
                fn to_radians(self) -> Self {
                    <$t>::to_radians(self)
                }

                #[inline]
                fn abs(self) -> Self {
                    <$t>::abs(self)
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }
            }
        )*
    };
}

impl_scalar!(f32, f64);
