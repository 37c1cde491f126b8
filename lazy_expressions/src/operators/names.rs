use core::fmt;

use super::{BinaryOp, Op, UnaryOp};

macro_rules! op_names {
    ($($Name:ident: $A:literal => $token:literal),* $(,)?) => {
        /// The reserved operator vocabulary. Only some entries have rules; see [`OpName::to_op`].
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum OpName {
            $($Name),*
        }

        impl OpName {
            pub const ALL: &'static [OpName] = &[$(OpName::$Name),*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(OpName::$Name => $token),*
                }
            }

            pub const fn arity(self) -> usize {
                match self {
                    $(OpName::$Name => $A),*
                }
            }
        }
    };
}

op_names! {
    Add: 2 => "add",
    UAdd: 1 => "uadd",
    Sub: 2 => "sub",
    USub: 1 => "usub",
    Mul: 2 => "mul",
    Div: 2 => "div",
    Sqr: 1 => "sqr",
    Inv: 1 => "inv",
    Exp: 1 => "exp",
    Log: 1 => "log",
    Cos: 1 => "cos",
    Sin: 1 => "sin",
    Tan: 1 => "tan",
    Asin: 1 => "asin",
    Acos: 1 => "acos",
    Atan: 1 => "atan",
    Abs: 1 => "abs",
    Fabs: 1 => "fabs",
    Sqrt: 1 => "sqrt",
    Xlog: 1 => "xlog",
    Arh: 1 => "arh",
    Erf: 1 => "erf",
    Erfc: 1 => "erfc",
    Fstp: 1 => "fstp",
    Bstp: 1 => "bstp",
    Pow: 2 => "pow",
    Cheb: 2 => "cheb",
    Min: 2 => "min",
    Max: 2 => "max",
    Mono: 2 => "mono",
}

impl OpName {
    pub fn from_name(token: &str) -> Option<OpName> {
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.name().eq_ignore_ascii_case(token))
    }

    /// The operator implementing this name, if any.
    pub const fn to_op(self) -> Option<Op> {
        Some(match self {
            OpName::Add => Op::Binary(BinaryOp::Add),
            OpName::Sub => Op::Binary(BinaryOp::Sub),
            OpName::Mul => Op::Binary(BinaryOp::Mul),
            OpName::Div => Op::Binary(BinaryOp::Div),
            OpName::UAdd => Op::Unary(UnaryOp::Identity),
            OpName::USub => Op::Unary(UnaryOp::Neg),
            OpName::Sin => Op::Unary(UnaryOp::Sin),
            OpName::Cos => Op::Unary(UnaryOp::Cos),
            _ => return None,
        })
    }

    pub const fn is_supported(self) -> bool {
        self.to_op().is_some()
    }
}

impl fmt::Display for OpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    Unknown(String),
    /// Reserved name without rules.
    Unsupported(&'static str),
    Ambiguous {
        token: String,
        candidates: Vec<&'static str>,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Unknown(token) => write!(f, "unknown operator {token:?}"),
            LookupError::Unsupported(name) => {
                write!(f, "operator {name:?} is reserved but has no differentiation rules")
            }
            LookupError::Ambiguous { token, candidates } => write!(
                f,
                "operator token {token:?} is ambiguous (candidates: {}); specify an arity",
                candidates.join(", ")
            ),
        }
    }
}

impl std::error::Error for LookupError {}
