use core::ops::Range;

use crate::evaluate::{ActiveValue, Evaluator, Value};
use crate::evaluate_derivative::ForwardTangent;
use crate::leaf::Leaf;
use crate::operators::{BinaryOp, Op, UnaryOp};
use crate::traits::Differentiable;

/// Which of the three operand kinds a value is, known at compile time through
/// [`Operand::CATEGORY`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Expression,
    Leaf,
    Passive,
}

impl Category {
    /// Expressions and leaves carry derivative information; passive constants do not.
    pub const fn is_differentiable(self) -> bool {
        !matches!(self, Category::Passive)
    }

    pub const fn is_expression(self) -> bool {
        matches!(self, Category::Expression)
    }

    pub const fn is_leaf(self) -> bool {
        matches!(self, Category::Leaf)
    }

    pub const fn is_passive(self) -> bool {
        matches!(self, Category::Passive)
    }
}

/// True when at least one operand category is differentiable. An operator node whose operands
/// are all passive is rejected when it is built.
pub const fn any_differentiable(x: Category, y: Category) -> bool {
    x.is_differentiable() || y.is_differentiable()
}

/// One child slot of an operator node.
#[derive(Clone, Debug)]
pub enum Node<B: Differentiable> {
    Operator(Expr<B>),
    Leaf(Leaf<B>),
    Passive(B::Scalar),
}

impl<B: Differentiable> Node<B> {
    pub fn category(&self) -> Category {
        match self {
            Node::Operator(_) => Category::Expression,
            Node::Leaf(_) => Category::Leaf,
            Node::Passive(_) => Category::Passive,
        }
    }

    /// Number of leaf occurrences below this node; equals the length of its tangent vector.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Operator(expr) => expr.leaf_count(),
            Node::Leaf(_) => 1,
            Node::Passive(_) => 0,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr<B>> {
        match self {
            Node::Operator(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf<B>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }
}

/// Operator payload of an [`Expr`]; operands are owned in a fixed-size array matching the arity.
#[derive(Clone, Debug)]
pub enum ExprKind<B: Differentiable> {
    Unary(UnaryOp, Box<[Node<B>; 1]>),
    Binary(BinaryOp, Box<[Node<B>; 2]>),
}

/// An unevaluated operator node. Operands are copies taken at construction, so the tree is
/// immutable once built and every rule evaluates lazily on request.
#[derive(Clone, Debug)]
pub struct Expr<B: Differentiable> {
    kind: ExprKind<B>,
    leaves: usize,
}

impl<B: Differentiable> Expr<B> {
    pub(crate) fn unary(op: UnaryOp, x: Node<B>) -> Self {
        debug_assert!(x.category().is_differentiable(), "{}: passive operand", op.name());
        let operands = Box::new([x]);
        let leaves = op.leaf_count(&*operands);
        Self {
            kind: ExprKind::Unary(op, operands),
            leaves,
        }
    }

    pub(crate) fn binary(op: BinaryOp, x: Node<B>, y: Node<B>) -> Self {
        debug_assert!(
            any_differentiable(x.category(), y.category()),
            "{}: both operands passive",
            op.name()
        );
        let operands = Box::new([x, y]);
        let leaves = op.leaf_count(&*operands);
        Self {
            kind: ExprKind::Binary(op, operands),
            leaves,
        }
    }

    pub fn kind(&self) -> &ExprKind<B> {
        &self.kind
    }

    pub fn op(&self) -> Op {
        match self.kind {
            ExprKind::Unary(op, _) => Op::Unary(op),
            ExprKind::Binary(op, _) => Op::Binary(op),
        }
    }

    pub fn name(&self) -> &'static str {
        self.op().name()
    }

    pub fn arity(&self) -> usize {
        self.operands().len()
    }

    pub fn operands(&self) -> &[Node<B>] {
        match &self.kind {
            ExprKind::Unary(_, x) => &x[..],
            ExprKind::Binary(_, x) => &x[..],
        }
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Index ranges of each operand's leaves, given where this node's leaves start.
    pub fn operand_slices(&self, offset: usize) -> Vec<Range<usize>> {
        match &self.kind {
            ExprKind::Unary(_, x) => operand_slices(&**x, offset).to_vec(),
            ExprKind::Binary(_, x) => operand_slices(&**x, offset).to_vec(),
        }
    }

    /// Primal value.
    pub fn value(&self) -> B::Scalar {
        Value.on_operator(self, (), &mut ())
    }

    /// The expression evaluated in the base type's own arithmetic.
    pub fn active_value(&self) -> B {
        ActiveValue.on_operator(self, (), &mut ())
    }

    /// Partials of the value with respect to each leaf occurrence, left to right.
    pub fn tangent(&self) -> Vec<B::Scalar> {
        ForwardTangent.on_operator(self, (), &mut ())
    }
}

/// Leaf ranges of `operands` laid out consecutively from `offset`.
pub fn operand_slices<B: Differentiable, const A: usize>(
    operands: &[Node<B>; A],
    offset: usize,
) -> [Range<usize>; A] {
    core::array::from_fn(|i| {
        let start = offset + operands[..i].iter().map(Node::leaf_count).sum::<usize>();
        start..start + operands[i].leaf_count()
    })
}

/// Anything that can sit in an operand slot.
///
/// Expressions and leaves are copied into the new node (references clone), and scalars become
/// passive constants.
pub trait Operand<B: Differentiable> {
    const CATEGORY: Category;

    fn into_node(self) -> Node<B>;
}

impl<B: Differentiable> Operand<B> for Expr<B> {
    const CATEGORY: Category = Category::Expression;

    fn into_node(self) -> Node<B> {
        Node::Operator(self)
    }
}

impl<B: Differentiable> Operand<B> for &Expr<B> {
    const CATEGORY: Category = Category::Expression;

    fn into_node(self) -> Node<B> {
        Node::Operator(self.clone())
    }
}

impl<B: Differentiable> Operand<B> for Leaf<B> {
    const CATEGORY: Category = Category::Leaf;

    fn into_node(self) -> Node<B> {
        Node::Leaf(self)
    }
}

impl<B: Differentiable> Operand<B> for &Leaf<B> {
    const CATEGORY: Category = Category::Leaf;

    fn into_node(self) -> Node<B> {
        Node::Leaf(self.clone())
    }
}

macro_rules! passive_operand {
    ($($T:ty),* $(,)?) => {
        $(
            impl<B: Differentiable<Scalar = $T>> Operand<B> for $T {
                const CATEGORY: Category = Category::Passive;

                fn into_node(self) -> Node<B> {
                    Node::Passive(self)
                }
            }
        )*
    };
}

passive_operand!(f32, f64);

/// Category of a value's type, for use in `const` contexts.
pub const fn category_of<B: Differentiable, X: Operand<B>>() -> Category {
    X::CATEGORY
}
