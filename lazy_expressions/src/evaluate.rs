//! Evaluator dispatch.
//!
//! An [`Evaluator`] answers three questions: what to do at an operator node, at a leaf, and at
//! a passive constant. [`Evaluator::visit`] routes a child slot to the right one, so operation
//! rules can recurse into operands without knowing which kind each operand is.

use crate::leaf::Leaf;
use crate::node::{Expr, ExprKind, Node};
use crate::traits::Differentiable;

pub trait Evaluator<B: Differentiable> {
    type Output;
    /// Value pushed down from the parent (reverse passes); `()` for bottom-up passes.
    type Adjoint;
    /// State shared by every leaf a pass touches; `()` when nothing accumulates.
    type Accumulator: ?Sized;

    fn on_operator(
        &self,
        expr: &Expr<B>,
        adjoint: Self::Adjoint,
        acc: &mut Self::Accumulator,
    ) -> Self::Output;

    fn on_leaf(&self, leaf: &Leaf<B>, adjoint: Self::Adjoint, acc: &mut Self::Accumulator) -> Self::Output;

    /// Passive constants ignore the adjoint and never touch the accumulator.
    fn on_passive(&self, value: B::Scalar) -> Self::Output;

    #[inline]
    fn visit(&self, node: &Node<B>, adjoint: Self::Adjoint, acc: &mut Self::Accumulator) -> Self::Output {
        match node {
            Node::Operator(expr) => self.on_operator(expr, adjoint, acc),
            Node::Leaf(leaf) => self.on_leaf(leaf, adjoint, acc),
            Node::Passive(value) => self.on_passive(*value),
        }
    }
}

/// Primal value as a plain scalar.
#[derive(Copy, Clone, Debug, Default)]
pub struct Value;

impl<B: Differentiable> Evaluator<B> for Value {
    type Output = B::Scalar;
    type Adjoint = ();
    type Accumulator = ();

    fn on_operator(&self, expr: &Expr<B>, _: (), _: &mut ()) -> B::Scalar {
        match expr.kind() {
            ExprKind::Unary(op, x) => op.value(&**x),
            ExprKind::Binary(op, x) => op.value(&**x),
        }
    }

    fn on_leaf(&self, leaf: &Leaf<B>, _: (), _: &mut ()) -> B::Scalar {
        leaf.value()
    }

    fn on_passive(&self, value: B::Scalar) -> B::Scalar {
        value
    }
}

/// Value in the leaf base type: the whole expression recomputed with the base type's own
/// arithmetic, so a dual-number base carries its derivatives forward.
#[derive(Copy, Clone, Debug, Default)]
pub struct ActiveValue;

impl<B: Differentiable> Evaluator<B> for ActiveValue {
    type Output = B;
    type Adjoint = ();
    type Accumulator = ();

    fn on_operator(&self, expr: &Expr<B>, _: (), _: &mut ()) -> B {
        match expr.kind() {
            ExprKind::Unary(op, x) => op.active_value(&**x),
            ExprKind::Binary(op, x) => op.active_value(&**x),
        }
    }

    fn on_leaf(&self, leaf: &Leaf<B>, _: (), _: &mut ()) -> B {
        leaf.base().clone()
    }

    fn on_passive(&self, value: B::Scalar) -> B {
        B::passive(value)
    }
}

#[inline]
pub fn value<B: Differentiable>(node: &Node<B>) -> B::Scalar {
    Value.visit(node, (), &mut ())
}

#[inline]
pub fn active_value<B: Differentiable>(node: &Node<B>) -> B {
    ActiveValue.visit(node, (), &mut ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tangent::Tangent;

    #[test]
    fn visit_dispatches_on_node_kind() {
        let leaf = Leaf::new(Tangent::new(2.0, 1.0));
        assert_eq!(value(&Node::Leaf(leaf.clone())), 2.0);
        assert_eq!(value::<Tangent<f64>>(&Node::Passive(7.0)), 7.0);

        assert_eq!(active_value(&Node::Leaf(leaf)), Tangent::new(2.0, 1.0));
        assert_eq!(active_value::<Tangent<f64>>(&Node::Passive(7.0)), Tangent::new(7.0, 0.0));
    }
}
