use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::Float;

/// Derivative storage of a differentiable base type: one slot, or a fixed-size vector of
/// directions.
pub trait Derivative<T: Float>: Clone + fmt::Debug {
    fn zero() -> Self;
    fn as_slice(&self) -> &[T];
    fn as_mut_slice(&mut self) -> &mut [T];

    #[inline]
    fn dim(&self) -> usize {
        self.as_slice().len()
    }

    /// `self += alpha * x`, componentwise.
    #[inline]
    fn axpy(&mut self, alpha: T, x: &Self) {
        debug_assert_eq!(self.dim(), x.dim(), "axpy: derivative width mismatch");
        for (d, &s) in self.as_mut_slice().iter_mut().zip(x.as_slice()) {
            *d = *d + alpha * s;
        }
    }
}

macro_rules! scalar_derivative {
    ($($T:ty),* $(,)?) => {
        $(
            impl Derivative<$T> for $T {
                #[inline]
                fn zero() -> Self {
                    0.0
                }

                #[inline]
                fn as_slice(&self) -> &[$T] {
                    core::slice::from_ref(self)
                }

                #[inline]
                fn as_mut_slice(&mut self) -> &mut [$T] {
                    core::slice::from_mut(self)
                }
            }
        )*
    };
}

scalar_derivative!(f32, f64);

impl<T: Float + fmt::Debug, const N: usize> Derivative<T> for [T; N] {
    #[inline]
    fn zero() -> Self {
        [T::zero(); N]
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self[..]
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self[..]
    }
}

/// A forward-mode differentiable value: the base type wrapped by [`crate::Leaf`].
///
/// Expression trees only need the primal value, the derivative storage, a way to build a
/// passive value (zero derivative), and arithmetic that follows dual-number rules so that
/// [`crate::evaluate::ActiveValue`] can compose through it.
pub trait Differentiable:
    Clone
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    type Scalar: Float + fmt::Debug;
    type Derivative: Derivative<Self::Scalar>;

    fn value(&self) -> Self::Scalar;
    fn derivative(&self) -> &Self::Derivative;
    fn derivative_mut(&mut self) -> &mut Self::Derivative;

    /// A value with zero derivative.
    fn passive(value: Self::Scalar) -> Self;

    fn sin(self) -> Self;
    fn cos(self) -> Self;
}
