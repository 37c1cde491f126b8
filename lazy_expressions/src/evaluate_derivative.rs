use ndarray::{Array2, ArrayView1, ArrayView2, aview1};
use num_traits::{Float, One, Zero};

use crate::evaluate::Evaluator;
use crate::leaf::Leaf;
use crate::node::{Expr, ExprKind, Node};
use crate::traits::{Derivative, Differentiable};

/// Partials of an expression with respect to each leaf occurrence, in left-to-right order.
///
/// A leaf contributes `[1]` and a passive constant contributes nothing, so the output length is
/// always [`Node::leaf_count`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ForwardTangent;

impl<B: Differentiable> Evaluator<B> for ForwardTangent {
    type Output = Vec<B::Scalar>;
    type Adjoint = ();
    type Accumulator = ();

    fn on_operator(&self, expr: &Expr<B>, _: (), _: &mut ()) -> Vec<B::Scalar> {
        let t = match expr.kind() {
            ExprKind::Unary(op, x) => op.tangent(&**x),
            ExprKind::Binary(op, x) => op.tangent(&**x),
        };
        debug_assert_eq!(t.len(), expr.leaf_count(), "{}: tangent length", expr.name());
        t
    }

    fn on_leaf(&self, _: &Leaf<B>, _: (), _: &mut ()) -> Vec<B::Scalar> {
        vec![B::Scalar::one()]
    }

    fn on_passive(&self, _: B::Scalar) -> Vec<B::Scalar> {
        Vec::new()
    }
}

/// Reverse sweep accumulating `adjoint * leaf.derivative()` over every leaf occurrence.
///
/// Each visit returns the visited subtree's primal value, which is what lets a parent rule
/// rebuild its own value from its operands' results.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReverseGradient;

impl<B: Differentiable> Evaluator<B> for ReverseGradient {
    type Output = B::Scalar;
    type Adjoint = B::Scalar;
    type Accumulator = B::Derivative;

    fn on_operator(&self, expr: &Expr<B>, adjoint: B::Scalar, acc: &mut B::Derivative) -> B::Scalar {
        match expr.kind() {
            ExprKind::Unary(op, x) => op.gradient(&**x, acc, adjoint),
            ExprKind::Binary(op, x) => op.gradient(&**x, acc, adjoint),
        }
    }

    fn on_leaf(&self, leaf: &Leaf<B>, adjoint: B::Scalar, acc: &mut B::Derivative) -> B::Scalar {
        acc.axpy(adjoint, leaf.derivative());
        leaf.value()
    }

    fn on_passive(&self, value: B::Scalar) -> B::Scalar {
        value
    }
}

/// Adjoint state carried down a second-order reverse sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondOrder<T> {
    pub adjoint: T,
    /// Derivative of `adjoint` with respect to every leaf occurrence of the whole tree.
    pub second: Vec<T>,
    /// Index of the first leaf occurrence of the subtree being visited.
    pub offset: usize,
}

impl<T: Float> SecondOrder<T> {
    pub fn new(adjoint: T, second: Vec<T>, offset: usize) -> Self {
        Self {
            adjoint,
            second,
            offset,
        }
    }

    /// Seed at the root of a tree with `leaf_count` leaf occurrences.
    pub fn root(leaf_count: usize) -> Self {
        Self::new(T::one(), vec![T::zero(); leaf_count], 0)
    }

    /// Chains through a local partial `p` that does not depend on any leaf.
    pub fn scaled(&self, p: T) -> Self {
        let second = self.second.iter().map(|&s| s * p).collect();
        Self::new(self.adjoint * p, second, self.offset)
    }

    pub fn negated(&self) -> Self {
        let second = self.second.iter().map(|&s| -s).collect();
        Self::new(-self.adjoint, second, self.offset)
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// `second[start..start + t.len()] += alpha * t`: the part of the local partial that varies
    /// with the leaves of one operand.
    pub fn add_cross(&mut self, start: usize, alpha: T, t: &[T]) {
        for (s, &ti) in self.second[start..start + t.len()].iter_mut().zip(t) {
            *s = *s + alpha * ti;
        }
    }
}

/// Second-order reverse sweep. Every leaf occurrence writes its Hessian row into the
/// accumulator and adds its first-order contribution to the gradient.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReverseHessian;

impl<B: Differentiable> Evaluator<B> for ReverseHessian {
    type Output = B::Scalar;
    type Adjoint = SecondOrder<B::Scalar>;
    type Accumulator = Hessian<B>;

    fn on_operator(&self, expr: &Expr<B>, seed: SecondOrder<B::Scalar>, acc: &mut Hessian<B>) -> B::Scalar {
        match expr.kind() {
            ExprKind::Unary(op, x) => op.hessian(&**x, acc, seed),
            ExprKind::Binary(op, x) => op.hessian(&**x, acc, seed),
        }
    }

    fn on_leaf(&self, leaf: &Leaf<B>, seed: SecondOrder<B::Scalar>, acc: &mut Hessian<B>) -> B::Scalar {
        acc.record(leaf, seed);
        leaf.value()
    }

    fn on_passive(&self, value: B::Scalar) -> B::Scalar {
        value
    }
}

/// Second derivatives of an expression with respect to its leaf occurrences.
///
/// Row `i` of [`Hessian::rows`] holds the derivatives of `∂f/∂leaf_i` with respect to every
/// occurrence; a leaf used twice occupies two rows. [`Hessian::project`] folds occurrences
/// back onto the directions carried by each leaf's derivative.
#[derive(Clone, Debug)]
pub struct Hessian<B: Differentiable> {
    rows: Array2<B::Scalar>,
    values: Vec<B::Scalar>,
    seeds: Vec<B::Derivative>,
    gradient: B::Derivative,
}

impl<B: Differentiable> Hessian<B> {
    pub fn new(leaf_count: usize) -> Self {
        Self {
            rows: Array2::zeros((leaf_count, leaf_count)),
            values: vec![B::Scalar::zero(); leaf_count],
            seeds: vec![B::Derivative::zero(); leaf_count],
            gradient: B::Derivative::zero(),
        }
    }

    fn record(&mut self, leaf: &Leaf<B>, seed: SecondOrder<B::Scalar>) {
        let i = seed.offset;
        log::debug!(
            "leaf {i}: value={:?} adjoint={:?} hessian row={:?}",
            leaf.value(),
            seed.adjoint,
            seed.second
        );
        self.rows.row_mut(i).assign(&aview1(&seed.second));
        self.values[i] = leaf.value();
        self.seeds[i] = leaf.derivative().clone();
        self.gradient.axpy(seed.adjoint, leaf.derivative());
    }

    pub fn leaf_count(&self) -> usize {
        self.rows.nrows()
    }

    pub fn rows(&self) -> ArrayView2<'_, B::Scalar> {
        self.rows.view()
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, B::Scalar> {
        self.rows.row(i)
    }

    /// Primal value of each leaf occurrence, in the order rows are laid out.
    pub fn leaf_values(&self) -> &[B::Scalar] {
        &self.values
    }

    pub fn leaf_seeds(&self) -> &[B::Derivative] {
        &self.seeds
    }

    /// First-order result of the same sweep.
    pub fn gradient(&self) -> &B::Derivative {
        &self.gradient
    }

    /// `Sᵀ H S`, where row `i` of `S` is the derivative carried by leaf occurrence `i`.
    pub fn project(&self) -> Array2<B::Scalar> {
        let dim = self.gradient.dim();
        let mut out = Array2::zeros((dim, dim));
        for (i, si) in self.seeds.iter().enumerate() {
            for (j, sj) in self.seeds.iter().enumerate() {
                let h = self.rows[[i, j]];
                if h.is_zero() {
                    continue;
                }
                for (p, &a) in si.as_slice().iter().enumerate() {
                    for (q, &b) in sj.as_slice().iter().enumerate() {
                        out[[p, q]] = out[[p, q]] + a * h * b;
                    }
                }
            }
        }
        out
    }

    pub fn into_rows(self) -> Array2<B::Scalar> {
        self.rows
    }
}

#[inline]
pub fn tangent<B: Differentiable>(node: &Node<B>) -> Vec<B::Scalar> {
    ForwardTangent.visit(node, (), &mut ())
}

#[inline]
pub fn gradient<B: Differentiable>(node: &Node<B>, acc: &mut B::Derivative, adjoint: B::Scalar) -> B::Scalar {
    ReverseGradient.visit(node, adjoint, acc)
}

#[inline]
pub fn hessian<B: Differentiable>(node: &Node<B>, acc: &mut Hessian<B>, seed: SecondOrder<B::Scalar>) -> B::Scalar {
    ReverseHessian.visit(node, seed, acc)
}

/// Value and gradient of `expr` with unit seed.
pub fn reverse_gradient<B: Differentiable>(expr: &Expr<B>) -> (B::Scalar, B::Derivative) {
    let mut acc = B::Derivative::zero();
    let value = ReverseGradient.on_operator(expr, B::Scalar::one(), &mut acc);
    (value, acc)
}

/// Value and second derivatives of `expr` with unit seed.
pub fn reverse_hessian<B: Differentiable>(expr: &Expr<B>) -> (B::Scalar, Hessian<B>) {
    let n = expr.leaf_count();
    log::trace!("{}: tangent {:?}", expr.name(), expr.tangent());
    let mut acc = Hessian::new(n);
    let value = ReverseHessian.on_operator(expr, SecondOrder::root(n), &mut acc);
    (value, acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_order_chaining() {
        let s = SecondOrder::new(2.0, vec![1.0, -1.0, 0.5], 1);
        let t = s.scaled(3.0);
        assert_eq!(t, SecondOrder::new(6.0, vec![3.0, -3.0, 1.5], 1));

        let mut n = s.negated().at(2);
        assert_eq!(n.offset, 2);
        n.add_cross(1, 2.0, &[1.0, 1.0]);
        assert_eq!(n.second, vec![-1.0, 3.0, 1.5]);
        assert_eq!(n.adjoint, -2.0);
    }

    #[test]
    fn root_seed_is_unit_adjoint() {
        let s = SecondOrder::<f64>::root(3);
        assert_eq!(s.adjoint, 1.0);
        assert_eq!(s.second, vec![0.0; 3]);
        assert_eq!(s.offset, 0);
    }
}
