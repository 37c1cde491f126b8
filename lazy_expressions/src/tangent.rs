//! Forward-mode dual numbers usable as leaf base types.
//!
//! [`Tangent`] carries one derivative slot; [`VectorTangent`] carries `N` of them, so seeding
//! each input with a different basis direction yields a full gradient (and, through
//! [`crate::Hessian::project`], a full Hessian) in the caller's variables.
//!
//! ```
//! use lazy_expressions::{Differentiable, VectorTangent};
//!
//! let x = VectorTangent::<f64, 2>::variable(3.0, 0);
//! let y = VectorTangent::<f64, 2>::variable(4.0, 1);
//! let f = x * y + x.sin();
//!
//! assert_eq!(f.value(), 12.0 + 3.0f64.sin());
//! assert_eq!(f.derivs, [4.0 + 3.0f64.cos(), 3.0]);
//! ```

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::Float;

use crate::traits::{Derivative, Differentiable};

/// Value plus a single derivative slot: `value + deriv·ε`, `ε² = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tangent<T> {
    pub value: T,
    pub deriv: T,
}

impl<T: Float> Tangent<T> {
    pub fn new(value: T, deriv: T) -> Self {
        Self { value, deriv }
    }

    pub fn constant(value: T) -> Self {
        Self::new(value, T::zero())
    }

    /// The independent variable: `dx/dx = 1`.
    pub fn variable(value: T) -> Self {
        Self::new(value, T::one())
    }
}

impl<T: Float> Add for Tangent<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value, self.deriv + rhs.deriv)
    }
}

impl<T: Float> Sub for Tangent<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value, self.deriv - rhs.deriv)
    }
}

impl<T: Float> Mul for Tangent<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.value * rhs.value,
            self.deriv * rhs.value + self.value * rhs.deriv,
        )
    }
}

impl<T: Float> Div for Tangent<T> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let inv = T::one() / rhs.value;
        Self::new(
            self.value * inv,
            (self.deriv - self.value * inv * rhs.deriv) * inv,
        )
    }
}

impl<T: Float> Neg for Tangent<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.value, -self.deriv)
    }
}

impl<T> Differentiable for Tangent<T>
where
    T: Float + fmt::Debug + Derivative<T>,
{
    type Scalar = T;
    type Derivative = T;

    #[inline]
    fn value(&self) -> T {
        self.value
    }

    #[inline]
    fn derivative(&self) -> &T {
        &self.deriv
    }

    #[inline]
    fn derivative_mut(&mut self) -> &mut T {
        &mut self.deriv
    }

    fn passive(value: T) -> Self {
        Self::constant(value)
    }

    fn sin(self) -> Self {
        Self::new(self.value.sin(), self.deriv * self.value.cos())
    }

    fn cos(self) -> Self {
        Self::new(self.value.cos(), -self.deriv * self.value.sin())
    }
}

impl<T: fmt::Display> fmt::Display for Tangent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{}, d:{}", self.value, self.deriv)
    }
}

/// Value plus `N` directional derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorTangent<T, const N: usize> {
    pub value: T,
    pub derivs: [T; N],
}

impl<T: Float, const N: usize> VectorTangent<T, N> {
    pub fn new(value: T, derivs: [T; N]) -> Self {
        Self { value, derivs }
    }

    pub fn constant(value: T) -> Self {
        Self::new(value, [T::zero(); N])
    }

    /// Seeds basis direction `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn variable(value: T, index: usize) -> Self {
        assert!(index < N, "direction {index} out of range for width {N}");
        let mut derivs = [T::zero(); N];
        derivs[index] = T::one();
        Self::new(value, derivs)
    }

    fn map_derivs(self, value: T, f: impl Fn(T) -> T) -> Self {
        Self::new(value, self.derivs.map(f))
    }

    fn zip_derivs(self, rhs: Self, value: T, f: impl Fn(T, T) -> T) -> Self {
        let mut derivs = self.derivs;
        for (d, &r) in derivs.iter_mut().zip(rhs.derivs.iter()) {
            *d = f(*d, r);
        }
        Self::new(value, derivs)
    }
}

impl<T: Float, const N: usize> Default for VectorTangent<T, N> {
    fn default() -> Self {
        Self::constant(T::zero())
    }
}

impl<T: Float, const N: usize> Add for VectorTangent<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_derivs(rhs, self.value + rhs.value, |a, b| a + b)
    }
}

impl<T: Float, const N: usize> Sub for VectorTangent<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_derivs(rhs, self.value - rhs.value, |a, b| a - b)
    }
}

impl<T: Float, const N: usize> Mul for VectorTangent<T, N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.value, rhs.value);
        self.zip_derivs(rhs, a * b, |da, db| da * b + a * db)
    }
}

impl<T: Float, const N: usize> Div for VectorTangent<T, N> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let inv = T::one() / rhs.value;
        let q = self.value * inv;
        self.zip_derivs(rhs, q, |da, db| (da - q * db) * inv)
    }
}

impl<T: Float, const N: usize> Neg for VectorTangent<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map_derivs(-self.value, |d| -d)
    }
}

impl<T, const N: usize> Differentiable for VectorTangent<T, N>
where
    T: Float + fmt::Debug,
{
    type Scalar = T;
    type Derivative = [T; N];

    #[inline]
    fn value(&self) -> T {
        self.value
    }

    #[inline]
    fn derivative(&self) -> &[T; N] {
        &self.derivs
    }

    #[inline]
    fn derivative_mut(&mut self) -> &mut [T; N] {
        &mut self.derivs
    }

    fn passive(value: T) -> Self {
        Self::constant(value)
    }

    fn sin(self) -> Self {
        let c = self.value.cos();
        self.map_derivs(self.value.sin(), |d| d * c)
    }

    fn cos(self) -> Self {
        let s = self.value.sin();
        self.map_derivs(self.value.cos(), |d| -d * s)
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for VectorTangent<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{}, d:", self.value)?;
        for d in &self.derivs {
            write!(f, "{d} ")?;
        }
        Ok(())
    }
}
