use crate::leaf::Leaf;
use crate::node::{Expr, Operand, any_differentiable};
use crate::operators::{BinaryOp, UnaryOp};
use crate::traits::Differentiable;

/// Builds `op(x, y)`. Instantiating this with two passive operands fails to compile.
#[inline]
pub fn binary<B, X, Y>(op: BinaryOp, x: X, y: Y) -> Expr<B>
where
    B: Differentiable,
    X: Operand<B>,
    Y: Operand<B>,
{
    const {
        assert!(
            any_differentiable(X::CATEGORY, Y::CATEGORY),
            "an operator needs at least one leaf or expression operand"
        )
    };
    Expr::binary(op, x.into_node(), y.into_node())
}

/// Builds `op(x)`. Instantiating this with a passive operand fails to compile.
#[inline]
pub fn unary<B, X>(op: UnaryOp, x: X) -> Expr<B>
where
    B: Differentiable,
    X: Operand<B>,
{
    const {
        assert!(
            X::CATEGORY.is_differentiable(),
            "an operator needs at least one leaf or expression operand"
        )
    };
    Expr::unary(op, x.into_node())
}

macro_rules! unary_wrappers {
    ($( $fname:ident => $Op:ident ),* $(,)?) => {
        $(
            #[inline]
            #[must_use]
            pub fn $fname<B: Differentiable, X: Operand<B>>(x: X) -> Expr<B> {
                unary(UnaryOp::$Op, x)
            }
        )*
    };
}

macro_rules! binary_wrappers {
    ($( $fname:ident => $Op:ident ),* $(,)?) => {
        $(
            #[inline]
            #[must_use]
            pub fn $fname<B: Differentiable, X: Operand<B>, Y: Operand<B>>(x: X, y: Y) -> Expr<B> {
                binary(BinaryOp::$Op, x, y)
            }
        )*
    };
}

unary_wrappers! {
    identity => Identity,
    neg => Neg,
    sin => Sin,
    cos => Cos,
}

binary_wrappers! {
    add => Add,
    sub => Sub,
    mul => Mul,
    div => Div,
}

macro_rules! impl_binop {
    ($Trait:ident, $method:ident, $Op:ident) => {
        impl_binop!(@lhs $Trait, $method, $Op, Leaf<B>);
        impl_binop!(@lhs $Trait, $method, $Op, &Leaf<B>);
        impl_binop!(@lhs $Trait, $method, $Op, Expr<B>);
        impl_binop!(@lhs $Trait, $method, $Op, &Expr<B>);

        impl_binop!(@scalar_lhs $Trait, $method, $Op, f32);
        impl_binop!(@scalar_lhs $Trait, $method, $Op, f64);
    };
    (@lhs $Trait:ident, $method:ident, $Op:ident, $Lhs:ty) => {
        impl<B: Differentiable, R: Operand<B>> core::ops::$Trait<R> for $Lhs {
            type Output = Expr<B>;

            #[inline]
            fn $method(self, rhs: R) -> Expr<B> {
                binary(BinaryOp::$Op, self, rhs)
            }
        }
    };
    (@scalar_lhs $Trait:ident, $method:ident, $Op:ident, $T:ty) => {
        impl_binop!(@scalar_rhs $Trait, $method, $Op, $T, Leaf<B>);
        impl_binop!(@scalar_rhs $Trait, $method, $Op, $T, &Leaf<B>);
        impl_binop!(@scalar_rhs $Trait, $method, $Op, $T, Expr<B>);
        impl_binop!(@scalar_rhs $Trait, $method, $Op, $T, &Expr<B>);
    };
    (@scalar_rhs $Trait:ident, $method:ident, $Op:ident, $T:ty, $Rhs:ty) => {
        impl<B: Differentiable<Scalar = $T>> core::ops::$Trait<$Rhs> for $T {
            type Output = Expr<B>;

            #[inline]
            fn $method(self, rhs: $Rhs) -> Expr<B> {
                binary(BinaryOp::$Op, self, rhs)
            }
        }
    };
}

impl_binop!(Add, add, Add);
impl_binop!(Sub, sub, Sub);
impl_binop!(Mul, mul, Mul);
impl_binop!(Div, div, Div);

macro_rules! impl_neg {
    ($($Operand:ty),* $(,)?) => {
        $(
            impl<B: Differentiable> core::ops::Neg for $Operand {
                type Output = Expr<B>;

                #[inline]
                fn neg(self) -> Expr<B> {
                    unary(UnaryOp::Neg, self)
                }
            }
        )*
    };
}

impl_neg!(Leaf<B>, &Leaf<B>, Expr<B>, &Expr<B>);

// `leaf op= rhs` rebuilds `leaf op rhs` from a snapshot of the leaf and assigns the result.
macro_rules! impl_assign_op {
    ($($Trait:ident),* $(,)?) => {
        crate::paste::paste! {
            $(
                impl<B: Differentiable, R: Operand<B>> core::ops::[<$Trait Assign>]<R> for Leaf<B> {
                    fn [<$Trait:snake _assign>](&mut self, rhs: R) {
                        let expr = binary(BinaryOp::$Trait, &*self, rhs);
                        self.assign(&expr);
                    }
                }
            )*
        }
    };
}

impl_assign_op!(Add, Sub, Mul, Div);

impl<B: Differentiable> Leaf<B> {
    #[must_use]
    pub fn sin(&self) -> Expr<B> {
        unary(UnaryOp::Sin, self)
    }

    #[must_use]
    pub fn cos(&self) -> Expr<B> {
        unary(UnaryOp::Cos, self)
    }
}

impl<B: Differentiable> Expr<B> {
    #[must_use]
    pub fn sin(self) -> Expr<B> {
        unary(UnaryOp::Sin, self)
    }

    #[must_use]
    pub fn cos(self) -> Expr<B> {
        unary(UnaryOp::Cos, self)
    }
}
