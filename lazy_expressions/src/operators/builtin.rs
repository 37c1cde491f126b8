use num_traits::Float;

use super::Operation;
use crate::evaluate as eval;
use crate::evaluate_derivative::{self as deriv, Hessian, SecondOrder};
use crate::node::{Node, operand_slices};
use crate::traits::Differentiable;

fn two<T: Float>() -> T {
    T::one() + T::one()
}

fn scaled<T: Float>(mut v: Vec<T>, alpha: T) -> Vec<T> {
    for t in &mut v {
        *t = *t * alpha;
    }
    v
}

fn concat<T>(mut x: Vec<T>, y: Vec<T>) -> Vec<T> {
    x.extend(y);
    x
}

macro_rules! builtin_op {
    (@name $Op:ident, $name:literal) => {
        $name
    };
    (@name $Op:ident) => {
        crate::paste::paste! { stringify!([<$Op:snake>]) }
    };
    (@infix $v:expr) => {
        $v
    };
    (@infix) => {
        None
    };
    (
        $(#[$meta:meta])*
        $Op:ident : $A:literal {
            $(name: $name:literal,)?
            $(infix: $infix:expr,)?
            value($v:pat) $value:block,
            active_value($av:pat) $active:block,
            tangent($t:pat) $tangent:block,
            gradient($g:pat, $gacc:ident, $gadj:ident) $gradient:block,
            hessian($h:pat, $hacc:ident, $hseed:ident) $hessian:block $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $Op;

        impl Operation<$A> for $Op {
            const NAME: &'static str = builtin_op!(@name $Op $(, $name)?);
            const INFIX: Option<&'static str> = builtin_op!(@infix $($infix)?);

            fn value<B: Differentiable>(operands: &[Node<B>; $A]) -> B::Scalar {
                let $v = operands;
                $value
            }

            fn active_value<B: Differentiable>(operands: &[Node<B>; $A]) -> B {
                let $av = operands;
                $active
            }

            fn tangent<B: Differentiable>(operands: &[Node<B>; $A]) -> Vec<B::Scalar> {
                let $t = operands;
                $tangent
            }

            fn gradient<B: Differentiable>(
                operands: &[Node<B>; $A],
                acc: &mut B::Derivative,
                adjoint: B::Scalar,
            ) -> B::Scalar {
                let $g = operands;
                let $gacc = acc;
                let $gadj = adjoint;
                $gradient
            }

            fn hessian<B: Differentiable>(
                operands: &[Node<B>; $A],
                acc: &mut Hessian<B>,
                seed: SecondOrder<B::Scalar>,
            ) -> B::Scalar {
                let $h = operands;
                let $hacc = acc;
                let $hseed = seed;
                $hessian
            }
        }
    };
}

builtin_op!(
    /// `+x`: passes every rule through to its operand.
    Identity: 1 {
        value([x]) { eval::value(x) },
        active_value([x]) { eval::active_value(x) },
        tangent([x]) { deriv::tangent(x) },
        gradient([x], acc, adjoint) { deriv::gradient(x, acc, adjoint) },
        hessian([x], acc, seed) { deriv::hessian(x, acc, seed) },
    }
);

builtin_op!(Neg: 1 {
    infix: Some("-"),
    value([x]) { -eval::value(x) },
    active_value([x]) { -eval::active_value(x) },
    tangent([x]) { deriv::tangent(x).into_iter().map(|t| -t).collect() },
    gradient([x], acc, adjoint) { -deriv::gradient(x, acc, -adjoint) },
    hessian([x], acc, seed) { -deriv::hessian(x, acc, seed.negated()) },
});

builtin_op!(Sin: 1 {
    value([x]) { eval::value(x).sin() },
    active_value([x]) { eval::active_value(x).sin() },
    tangent([x]) { scaled(deriv::tangent(x), eval::value(x).cos()) },
    gradient([x], acc, adjoint) {
        let c = eval::value(x).cos();
        deriv::gradient(x, acc, adjoint * c).sin()
    },
    hessian([x], acc, seed) {
        let u = eval::value(x);
        let mut inner = seed.scaled(u.cos());
        inner.add_cross(seed.offset, -seed.adjoint * u.sin(), &deriv::tangent(x));
        deriv::hessian(x, acc, inner).sin()
    },
});

builtin_op!(Cos: 1 {
    value([x]) { eval::value(x).cos() },
    active_value([x]) { eval::active_value(x).cos() },
    tangent([x]) { scaled(deriv::tangent(x), -eval::value(x).sin()) },
    gradient([x], acc, adjoint) {
        let s = eval::value(x).sin();
        deriv::gradient(x, acc, -adjoint * s).cos()
    },
    hessian([x], acc, seed) {
        let u = eval::value(x);
        let mut inner = seed.scaled(-u.sin());
        inner.add_cross(seed.offset, -seed.adjoint * u.cos(), &deriv::tangent(x));
        deriv::hessian(x, acc, inner).cos()
    },
});

builtin_op!(Add: 2 {
    infix: Some("+"),
    value([x, y]) { eval::value(x) + eval::value(y) },
    active_value([x, y]) { eval::active_value(x) + eval::active_value(y) },
    tangent([x, y]) { concat(deriv::tangent(x), deriv::tangent(y)) },
    gradient([x, y], acc, adjoint) {
        deriv::gradient(x, acc, adjoint) + deriv::gradient(y, acc, adjoint)
    },
    hessian(ops, acc, seed) {
        let [x, y] = ops;
        let [_, ry] = operand_slices(ops, seed.offset);
        let right = seed.clone().at(ry.start);
        deriv::hessian(x, acc, seed) + deriv::hessian(y, acc, right)
    },
});

builtin_op!(Sub: 2 {
    infix: Some("-"),
    value([x, y]) { eval::value(x) - eval::value(y) },
    active_value([x, y]) { eval::active_value(x) - eval::active_value(y) },
    tangent([x, y]) {
        let ty = deriv::tangent(y).into_iter().map(|t| -t);
        let mut out = deriv::tangent(x);
        out.extend(ty);
        out
    },
    gradient([x, y], acc, adjoint) {
        deriv::gradient(x, acc, adjoint) - deriv::gradient(y, acc, -adjoint)
    },
    hessian(ops, acc, seed) {
        let [x, y] = ops;
        let [_, ry] = operand_slices(ops, seed.offset);
        let right = seed.negated().at(ry.start);
        deriv::hessian(x, acc, seed) - deriv::hessian(y, acc, right)
    },
});

builtin_op!(Mul: 2 {
    infix: Some("*"),
    value([x, y]) { eval::value(x) * eval::value(y) },
    active_value([x, y]) { eval::active_value(x) * eval::active_value(y) },
    tangent([x, y]) {
        let (a, b) = (eval::value(x), eval::value(y));
        concat(scaled(deriv::tangent(x), b), scaled(deriv::tangent(y), a))
    },
    gradient([x, y], acc, adjoint) {
        let (a, b) = (eval::value(x), eval::value(y));
        deriv::gradient(x, acc, adjoint * b) * deriv::gradient(y, acc, adjoint * a)
    },
    hessian(ops, acc, seed) {
        let [x, y] = ops;
        let (a, b) = (eval::value(x), eval::value(y));
        let [rx, ry] = operand_slices(ops, seed.offset);
        let (tx, ty) = (deriv::tangent(x), deriv::tangent(y));

        // d(adjoint * b) picks up the other operand's tangent, and vice versa.
        let mut left = seed.scaled(b);
        left.add_cross(ry.start, seed.adjoint, &ty);
        let mut right = seed.scaled(a).at(ry.start);
        right.add_cross(rx.start, seed.adjoint, &tx);

        deriv::hessian(x, acc, left) * deriv::hessian(y, acc, right)
    },
});

builtin_op!(Div: 2 {
    infix: Some("/"),
    value([x, y]) { eval::value(x) / eval::value(y) },
    active_value([x, y]) { eval::active_value(x) / eval::active_value(y) },
    tangent([x, y]) {
        let (a, inv) = (eval::value(x), eval::value(y).recip());
        concat(scaled(deriv::tangent(x), inv), scaled(deriv::tangent(y), -a * inv * inv))
    },
    gradient([x, y], acc, adjoint) {
        let (a, inv) = (eval::value(x), eval::value(y).recip());
        deriv::gradient(x, acc, adjoint * inv) / deriv::gradient(y, acc, -adjoint * a * inv * inv)
    },
    hessian(ops, acc, seed) {
        let [x, y] = ops;
        let (a, inv) = (eval::value(x), eval::value(y).recip());
        let inv2 = inv * inv;
        let [rx, ry] = operand_slices(ops, seed.offset);
        let (tx, ty) = (deriv::tangent(x), deriv::tangent(y));

        let mut left = seed.scaled(inv);
        left.add_cross(ry.start, -seed.adjoint * inv2, &ty);

        let mut right = seed.scaled(-a * inv2).at(ry.start);
        right.add_cross(rx.start, -seed.adjoint * inv2, &tx);
        right.add_cross(ry.start, two::<B::Scalar>() * seed.adjoint * a * inv2 * inv, &ty);

        deriv::hessian(x, acc, left) / deriv::hessian(y, acc, right)
    },
});
