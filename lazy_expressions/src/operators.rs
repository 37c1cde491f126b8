//! Operation descriptors and the closed operator set used by expression nodes.
//!
//! Every operation is a zero-sized type implementing [`Operation`] with the six rules an
//! evaluator needs. [`UnaryOp`] and [`BinaryOp`] are the runtime tags stored in a node; they
//! forward each rule to the matching descriptor in [`builtin`].

use core::fmt;

use crate::evaluate_derivative::{Hessian, SecondOrder};
use crate::node::Node;
use crate::traits::Differentiable;

pub mod builtin;
pub mod names;

pub use names::{LookupError, OpName};

/// Rules for one operation of arity `A`.
///
/// Every rule receives the node's operands and recurses into them through the evaluators in
/// [`crate::evaluate`] and [`crate::evaluate_derivative`]. Leaf occurrences are numbered left to
/// right, so operand `k` owns the index range that follows the leaves of operands `0..k`.
pub trait Operation<const A: usize> {
    const NAME: &'static str;
    const INFIX: Option<&'static str> = None;

    /// Primal value of the node.
    fn value<B: Differentiable>(x: &[Node<B>; A]) -> B::Scalar;

    /// The node evaluated in the base type's arithmetic.
    fn active_value<B: Differentiable>(x: &[Node<B>; A]) -> B;

    /// Number of leaf occurrences below the node.
    fn leaf_count<B: Differentiable>(x: &[Node<B>; A]) -> usize {
        x.iter().map(Node::leaf_count).sum()
    }

    /// Partial of the node's value with respect to each leaf occurrence, concatenated in
    /// operand order.
    fn tangent<B: Differentiable>(x: &[Node<B>; A]) -> Vec<B::Scalar>;

    /// Reverse-mode sweep: chains `adjoint` through the local partials into each operand and
    /// returns the node's primal value.
    fn gradient<B: Differentiable>(
        x: &[Node<B>; A],
        acc: &mut B::Derivative,
        adjoint: B::Scalar,
    ) -> B::Scalar;

    /// Second-order reverse sweep. Besides the adjoint, `seed` carries the derivative of the
    /// adjoint with respect to every leaf occurrence of the whole tree; each operand receives
    /// that vector scaled by its local partial, plus the adjoint times the derivative of the
    /// partial itself. Returns the node's primal value.
    fn hessian<B: Differentiable>(
        x: &[Node<B>; A],
        acc: &mut Hessian<B>,
        seed: SecondOrder<B::Scalar>,
    ) -> B::Scalar;
}

macro_rules! op_enum {
    (
        $(#[$meta:meta])*
        $Enum:ident: $A:literal { $($Op:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $Enum {
            $($Op),*
        }

        impl $Enum {
            pub const ALL: &'static [$Enum] = &[$($Enum::$Op),*];
            pub const ARITY: usize = $A;

            pub const fn name(self) -> &'static str {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::NAME),*
                }
            }

            pub const fn infix(self) -> Option<&'static str> {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::INFIX),*
                }
            }

            #[inline]
            pub fn value<B: Differentiable>(self, x: &[Node<B>; $A]) -> B::Scalar {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::value(x)),*
                }
            }

            #[inline]
            pub fn active_value<B: Differentiable>(self, x: &[Node<B>; $A]) -> B {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::active_value(x)),*
                }
            }

            #[inline]
            pub fn leaf_count<B: Differentiable>(self, x: &[Node<B>; $A]) -> usize {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::leaf_count(x)),*
                }
            }

            #[inline]
            pub fn tangent<B: Differentiable>(self, x: &[Node<B>; $A]) -> Vec<B::Scalar> {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::tangent(x)),*
                }
            }

            #[inline]
            pub fn gradient<B: Differentiable>(
                self,
                x: &[Node<B>; $A],
                acc: &mut B::Derivative,
                adjoint: B::Scalar,
            ) -> B::Scalar {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::gradient(x, acc, adjoint)),*
                }
            }

            #[inline]
            pub fn hessian<B: Differentiable>(
                self,
                x: &[Node<B>; $A],
                acc: &mut Hessian<B>,
                seed: SecondOrder<B::Scalar>,
            ) -> B::Scalar {
                match self {
                    $($Enum::$Op => <builtin::$Op as Operation<$A>>::hessian(x, acc, seed)),*
                }
            }
        }

        impl fmt::Display for $Enum {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

op_enum! {
    /// Single-operand operators.
    UnaryOp: 1 { Identity, Neg, Sin, Cos }
}

op_enum! {
    /// Two-operand operators.
    BinaryOp: 2 { Add, Sub, Mul, Div }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Op {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Op {
    pub fn all() -> impl Iterator<Item = Op> {
        let unary = UnaryOp::ALL.iter().copied().map(Op::Unary);
        let binary = BinaryOp::ALL.iter().copied().map(Op::Binary);
        unary.chain(binary)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Op::Unary(op) => op.name(),
            Op::Binary(op) => op.name(),
        }
    }

    pub const fn infix(self) -> Option<&'static str> {
        match self {
            Op::Unary(op) => op.infix(),
            Op::Binary(op) => op.infix(),
        }
    }

    pub const fn arity(self) -> usize {
        match self {
            Op::Unary(_) => UnaryOp::ARITY,
            Op::Binary(_) => BinaryOp::ARITY,
        }
    }

    fn matches(self, token: &str) -> bool {
        self.name().eq_ignore_ascii_case(token) || self.infix() == Some(token)
    }

    /// Resolves an operator by name or infix token.
    ///
    /// Tokens used at more than one arity (`"-"`) are rejected as ambiguous; use
    /// [`Op::lookup_with_arity`] for those. Names from the wider [`OpName`] vocabulary that map
    /// onto a supported operator (`"usub"`) resolve to it.
    pub fn lookup(token: &str) -> Result<Op, LookupError> {
        let found: Vec<Op> = Op::all().filter(|op| op.matches(token)).collect();
        match found.as_slice() {
            [op] => Ok(*op),
            [] => Self::lookup_vocabulary(token, None),
            _ => Err(LookupError::Ambiguous {
                token: token.to_string(),
                candidates: found.iter().map(|op| op.name()).collect(),
            }),
        }
    }

    pub fn lookup_with_arity(token: &str, arity: usize) -> Result<Op, LookupError> {
        match Op::all().find(|op| op.arity() == arity && op.matches(token)) {
            Some(op) => Ok(op),
            None => Self::lookup_vocabulary(token, Some(arity)),
        }
    }

    fn lookup_vocabulary(token: &str, arity: Option<usize>) -> Result<Op, LookupError> {
        let name = OpName::from_name(token)
            .filter(|name| arity.is_none_or(|a| a == name.arity()))
            .ok_or_else(|| LookupError::Unknown(token.to_string()))?;
        name.to_op().ok_or(LookupError::Unsupported(name.name()))
    }
}

impl From<UnaryOp> for Op {
    fn from(op: UnaryOp) -> Self {
        Op::Unary(op)
    }
}

impl From<BinaryOp> for Op {
    fn from(op: BinaryOp) -> Self {
        Op::Binary(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
