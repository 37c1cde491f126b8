use crate::node::{Expr, Node};
use crate::traits::Differentiable;

/// Bottom-up fold: `f_leaf` runs on leaves and passive constants, `f_branch` on operator nodes,
/// and `op` merges a branch's own result with its operands' results.
pub fn tree_mapreduce<B: Differentiable, R>(
    expr: &Expr<B>,
    mut f_leaf: impl FnMut(&Node<B>) -> R,
    mut f_branch: impl FnMut(&Expr<B>) -> R,
    mut op: impl FnMut(R, &[R]) -> R,
) -> R {
    fold_expr(expr, &mut f_leaf, &mut f_branch, &mut op)
}

fn fold_expr<B: Differentiable, R>(
    expr: &Expr<B>,
    f_leaf: &mut impl FnMut(&Node<B>) -> R,
    f_branch: &mut impl FnMut(&Expr<B>) -> R,
    op: &mut impl FnMut(R, &[R]) -> R,
) -> R {
    let parent = f_branch(expr);
    let children: Vec<R> = expr
        .operands()
        .iter()
        .map(|child| match child {
            Node::Operator(inner) => fold_expr(inner, f_leaf, f_branch, op),
            _ => f_leaf(child),
        })
        .collect();
    op(parent, &children)
}

pub fn count_nodes<B: Differentiable>(expr: &Expr<B>) -> usize {
    tree_mapreduce(expr, |_| 1usize, |_| 1usize, |p, c| p + c.iter().sum::<usize>())
}

pub fn count_depth<B: Differentiable>(expr: &Expr<B>) -> usize {
    tree_mapreduce(
        expr,
        |_| 1usize,
        |_| 0usize,
        |_, children| children.iter().copied().max().unwrap_or(0) + 1,
    )
}

pub fn count_operators<B: Differentiable>(expr: &Expr<B>) -> usize {
    tree_mapreduce(expr, |_| 0usize, |_| 1usize, |p, c| p + c.iter().sum::<usize>())
}

pub fn count_passive<B: Differentiable>(expr: &Expr<B>) -> usize {
    tree_mapreduce(
        expr,
        |n| usize::from(matches!(n, Node::Passive(_))),
        |_| 0usize,
        |_, c| c.iter().sum(),
    )
}

/// Leaf occurrences, counted by walking the tree; agrees with [`Expr::leaf_count`].
pub fn count_leaves<B: Differentiable>(expr: &Expr<B>) -> usize {
    tree_mapreduce(
        expr,
        |n| usize::from(matches!(n, Node::Leaf(_))),
        |_| 0usize,
        |_, c| c.iter().sum(),
    )
}

pub fn has_passive<B: Differentiable>(expr: &Expr<B>) -> bool {
    count_passive(expr) > 0
}

/// Value of each leaf occurrence in tangent order.
pub fn leaf_values<B: Differentiable>(expr: &Expr<B>) -> Vec<B::Scalar> {
    tree_mapreduce(
        expr,
        |n| n.as_leaf().map(|leaf| leaf.value()).into_iter().collect::<Vec<_>>(),
        |_| Vec::new(),
        |_, children| children.concat(),
    )
}
