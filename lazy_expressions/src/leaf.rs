use core::fmt;

use num_traits::Zero;

use crate::evaluate_derivative::{Hessian, reverse_gradient, reverse_hessian};
use crate::node::Expr;
use crate::traits::Differentiable;

/// Which reverse sweep materializes an expression into a [`Leaf`].
///
/// Both produce the same value and first derivative. [`Pass::Hessian`] also visits every leaf
/// with its second-order row (logged at `debug`), at the cost of one tangent evaluation per
/// operator.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Pass {
    Gradient,
    #[default]
    Hessian,
}

/// A named differentiable value: the only mutable thing in an expression tree.
///
/// Operators copy a leaf into the nodes they build, so later assignments to the leaf do not
/// affect trees that already hold it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaf<B> {
    base: B,
}

impl<B: Differentiable> Leaf<B> {
    pub fn new(base: B) -> Self {
        Self { base }
    }

    /// A leaf with zero derivative.
    pub fn passive(value: B::Scalar) -> Self {
        Self::new(B::passive(value))
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut B {
        &mut self.base
    }

    pub fn into_base(self) -> B {
        self.base
    }

    #[inline]
    pub fn value(&self) -> B::Scalar {
        self.base.value()
    }

    #[inline]
    pub fn derivative(&self) -> &B::Derivative {
        self.base.derivative()
    }

    pub fn derivative_mut(&mut self) -> &mut B::Derivative {
        self.base.derivative_mut()
    }

    /// Replaces the base value, derivative included.
    pub fn set(&mut self, base: B) -> &mut Self {
        self.base = base;
        self
    }

    /// Overwrites this leaf with the value of `expr` and the derivative obtained by a reverse
    /// gradient sweep with unit seed.
    ///
    /// `expr` may hold copies of this leaf; they are snapshots, so the sweep sees the value
    /// from before the assignment.
    pub fn assign(&mut self, expr: &Expr<B>) -> &mut Self {
        let (value, derivative) = reverse_gradient(expr);
        let mut base = B::passive(value);
        *base.derivative_mut() = derivative;
        self.base = base;
        self
    }

    pub fn from_expr_with(expr: &Expr<B>, pass: Pass) -> Self {
        match pass {
            Pass::Gradient => {
                let mut leaf = Self::passive(B::Scalar::zero());
                leaf.assign(expr);
                leaf
            }
            Pass::Hessian => Self::hessian_of(expr).0,
        }
    }

    /// Materializes `expr` and returns its second derivatives alongside.
    pub fn hessian_of(expr: &Expr<B>) -> (Self, Hessian<B>) {
        let (value, hessian) = reverse_hessian(expr);
        let mut base = B::passive(value);
        *base.derivative_mut() = hessian.gradient().clone();
        (Self::new(base), hessian)
    }
}

impl<B: Differentiable> From<B> for Leaf<B> {
    fn from(base: B) -> Self {
        Self::new(base)
    }
}

impl<B: Differentiable> From<Expr<B>> for Leaf<B> {
    fn from(expr: Expr<B>) -> Self {
        Self::from_expr_with(&expr, Pass::default())
    }
}

impl<B: fmt::Display> fmt::Display for Leaf<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.base, f)
    }
}
