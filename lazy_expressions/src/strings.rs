use core::fmt;

use crate::node::{Expr, Node};
use crate::traits::Differentiable;

/// Renders a tree with leaves and constants shown by value, e.g. `2 * sin(0.5 + 1)`.
///
/// Infix operators are parenthesized only where they appear as an operand of another infix or
/// prefix operator.
pub fn string_tree<B>(node: &Node<B>) -> String
where
    B: Differentiable,
    B::Scalar: fmt::Display,
{
    render(node, false)
}

fn render<B>(node: &Node<B>, grouped: bool) -> String
where
    B: Differentiable,
    B::Scalar: fmt::Display,
{
    let expr = match node {
        Node::Leaf(leaf) => return leaf.value().to_string(),
        Node::Passive(value) => return value.to_string(),
        Node::Operator(expr) => expr,
    };
    match (expr.operands(), expr.op().infix()) {
        ([x], Some(tok)) => format!("{tok}{}", render(x, true)),
        ([x, y], Some(tok)) => {
            let body = format!("{} {tok} {}", render(x, true), render(y, true));
            if grouped { format!("({body})") } else { body }
        }
        (operands, _) => {
            let args: Vec<String> = operands.iter().map(|arg| render(arg, false)).collect();
            format!("{}({})", expr.name(), args.join(", "))
        }
    }
}

/// Shows the expression's value; use [`string_tree`] for its structure.
impl<B> fmt::Display for Expr<B>
where
    B: Differentiable,
    B::Scalar: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}
