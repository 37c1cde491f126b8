//! Lazy expression trees for automatic differentiation.
//!
//! Arithmetic on [`Leaf`] values builds an [`Expr`] instead of computing a result. The tree is
//! evaluated on demand by an [`evaluate::Evaluator`]: plainly ([`evaluate::Value`]), in the
//! leaves' own dual-number arithmetic ([`evaluate::ActiveValue`]), or by forward tangent,
//! reverse gradient and reverse Hessian sweeps. Assigning an expression back to a leaf runs a
//! reverse sweep and stores the value together with its derivative.
//!
//! ```
//! use lazy_expressions::{Leaf, Tangent};
//!
//! let x = Leaf::new(Tangent::variable(3.0_f64));
//! let y = Leaf::new(Tangent::constant(4.0_f64));
//!
//! let mut w = Leaf::from(&x * &y + 2.0);
//! assert_eq!(w.value(), 14.0);
//! assert_eq!(*w.derivative(), 4.0);
//!
//! w *= &x;
//! assert_eq!(w.value(), 42.0);
//! assert_eq!(*w.derivative(), 14.0 + 4.0 * 3.0);
//! ```

#![deny(unsafe_code)]

pub mod evaluate;
pub mod evaluate_derivative;
pub mod expression_algebra;
pub mod leaf;
pub mod node;
pub mod node_utils;
pub mod operators;
pub mod strings;
pub mod tangent;
pub mod traits;

pub use {ndarray, num_traits, paste};

pub use crate::evaluate::{ActiveValue, Evaluator, Value, active_value, value};
pub use crate::evaluate_derivative::{
    ForwardTangent, Hessian, ReverseGradient, ReverseHessian, SecondOrder, reverse_gradient, reverse_hessian,
};
pub use crate::expression_algebra::{cos, identity, sin};
pub use crate::leaf::{Leaf, Pass};
pub use crate::node::{Category, Expr, ExprKind, Node, Operand, any_differentiable, category_of};
pub use crate::node_utils::{count_depth, count_leaves, count_nodes, count_operators, tree_mapreduce};
pub use crate::operators::{BinaryOp, LookupError, Op, OpName, Operation, UnaryOp};
pub use crate::strings::string_tree;
pub use crate::tangent::{Tangent, VectorTangent};
pub use crate::traits::{Derivative, Differentiable};
