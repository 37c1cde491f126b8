use lazy_expressions::expression_algebra::{binary, unary};
use lazy_expressions::{BinaryOp, Expr, Leaf, Tangent, UnaryOp, VectorTangent, identity};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

pub const N_VARS: usize = 3;

/// Leaf base seeded with one basis direction per variable.
pub type V = VectorTangent<f64, N_VARS>;
pub type S = Tangent<f64>;

#[allow(dead_code)]
pub fn var(value: f64, index: usize) -> Leaf<V> {
    Leaf::new(V::variable(value, index))
}

#[allow(dead_code)]
pub fn scalar_var(value: f64) -> Leaf<S> {
    Leaf::new(S::variable(value))
}

#[allow(dead_code)]
pub fn scalar_const(value: f64) -> Leaf<S> {
    Leaf::new(S::constant(value))
}

/// `x0 * x1 + sin(x2)` at `(3, 4, 5)`.
#[allow(dead_code)]
pub fn w_expr() -> (Expr<V>, [Leaf<V>; N_VARS]) {
    let vars = [var(3.0, 0), var(4.0, 1), var(5.0, 2)];
    let [x, y, z] = &vars;
    (x * y + z.sin(), vars)
}

#[allow(dead_code)]
pub fn apply_unary(op: UnaryOp, x: f64) -> f64 {
    match op {
        UnaryOp::Identity => x,
        UnaryOp::Neg => -x,
        UnaryOp::Sin => x.sin(),
        UnaryOp::Cos => x.cos(),
    }
}

#[allow(dead_code)]
pub fn apply_binary(op: BinaryOp, x: f64, y: f64) -> f64 {
    match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
    }
}

/// Shape of a random expression over `N_VARS` variables.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub enum GenExpr {
    Var(usize),
    Const(f64),
    Unary(UnaryOp, Box<GenExpr>),
    Binary(BinaryOp, Box<GenExpr>, Box<GenExpr>),
}

/// Intermediate result of building a [`GenExpr`]; constant-only subtrees are folded so no
/// operator ever receives two passive operands.
#[allow(dead_code)]
pub enum Built {
    Leaf(Leaf<V>),
    Expr(Expr<V>),
    Const(f64),
}

#[allow(dead_code)]
impl GenExpr {
    pub fn has_var(&self) -> bool {
        match self {
            GenExpr::Var(_) => true,
            GenExpr::Const(_) => false,
            GenExpr::Unary(_, x) => x.has_var(),
            GenExpr::Binary(_, x, y) => x.has_var() || y.has_var(),
        }
    }

    pub fn build(&self, vars: &[Leaf<V>]) -> Built {
        match self {
            GenExpr::Var(i) => Built::Leaf(vars[*i].clone()),
            GenExpr::Const(c) => Built::Const(*c),
            GenExpr::Unary(op, x) => match x.build(vars) {
                Built::Leaf(x) => Built::Expr(unary(*op, x)),
                Built::Expr(x) => Built::Expr(unary(*op, x)),
                Built::Const(x) => Built::Const(apply_unary(*op, x)),
            },
            GenExpr::Binary(op, x, y) => {
                let op = *op;
                match (x.build(vars), y.build(vars)) {
                    (Built::Const(x), Built::Const(y)) => Built::Const(apply_binary(op, x, y)),
                    (Built::Leaf(x), Built::Leaf(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Leaf(x), Built::Expr(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Leaf(x), Built::Const(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Expr(x), Built::Leaf(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Expr(x), Built::Expr(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Expr(x), Built::Const(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Const(x), Built::Leaf(y)) => Built::Expr(binary(op, x, y)),
                    (Built::Const(x), Built::Expr(y)) => Built::Expr(binary(op, x, y)),
                }
            }
        }
    }

    /// # Panics
    ///
    /// Panics if the tree has no variable.
    pub fn to_expr(&self, vars: &[Leaf<V>]) -> Expr<V> {
        match self.build(vars) {
            Built::Leaf(leaf) => identity(leaf),
            Built::Expr(expr) => expr,
            Built::Const(_) => panic!("expression has no variable: {self:?}"),
        }
    }

    /// `x / (y*y + 1)`.
    pub fn safe_quotient(x: GenExpr, y: GenExpr) -> GenExpr {
        let y = Box::new(y);
        let square = GenExpr::Binary(BinaryOp::Mul, y.clone(), y);
        let denominator = GenExpr::Binary(BinaryOp::Add, Box::new(square), Box::new(GenExpr::Const(1.0)));
        GenExpr::Binary(BinaryOp::Div, Box::new(x), Box::new(denominator))
    }

    /// Plain `f64` evaluation at `point`, independent of the expression tree.
    pub fn eval(&self, point: &[f64]) -> f64 {
        match self {
            GenExpr::Var(i) => point[*i],
            GenExpr::Const(c) => *c,
            GenExpr::Unary(op, x) => apply_unary(*op, x.eval(point)),
            GenExpr::Binary(op, x, y) => apply_binary(*op, x.eval(point), y.eval(point)),
        }
    }
}

#[allow(dead_code)]
pub fn arb_gen_expr(depth: u32, unary_ops: Vec<UnaryOp>, binary_ops: Vec<BinaryOp>) -> BoxedStrategy<GenExpr> {
    arb_tree(depth, unary_ops, binary_ops, false)
}

/// Like [`arb_gen_expr`], but also emits `x / (y*y + 1)`, whose denominator stays at least 1.
#[allow(dead_code)]
pub fn arb_gen_expr_with_quotients(
    depth: u32,
    unary_ops: Vec<UnaryOp>,
    binary_ops: Vec<BinaryOp>,
) -> BoxedStrategy<GenExpr> {
    arb_tree(depth, unary_ops, binary_ops, true)
}

#[allow(dead_code)]
fn arb_tree(depth: u32, unary_ops: Vec<UnaryOp>, binary_ops: Vec<BinaryOp>, quotients: bool) -> BoxedStrategy<GenExpr> {
    let leaf = prop_oneof![
        3 => (0..N_VARS).prop_map(GenExpr::Var),
        1 => (-1.5f64..1.5).prop_map(GenExpr::Const),
    ];
    leaf.prop_recursive(depth, 32, 2, move |inner| {
        let unary = prop::sample::select(unary_ops.clone());
        let binary = prop::sample::select(binary_ops.clone());
        let ops = prop_oneof![
            (unary, inner.clone()).prop_map(|(op, x)| GenExpr::Unary(op, Box::new(x))),
            (binary, inner.clone(), inner.clone())
                .prop_map(|(op, x, y)| GenExpr::Binary(op, Box::new(x), Box::new(y))),
        ]
        .boxed();
        if !quotients {
            return ops;
        }
        prop_oneof![
            2 => ops,
            1 => (inner.clone(), inner).prop_map(|(x, y)| GenExpr::safe_quotient(x, y)),
        ]
        .boxed()
    })
    .prop_filter("expression needs a variable", GenExpr::has_var)
    .boxed()
}

/// Operators without poles.
#[allow(dead_code)]
pub fn smooth_unary_ops() -> Vec<UnaryOp> {
    UnaryOp::ALL.to_vec()
}

#[allow(dead_code)]
pub fn smooth_binary_ops() -> Vec<BinaryOp> {
    vec![BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul]
}

#[allow(dead_code)]
pub fn arb_point() -> impl Strategy<Value = [f64; N_VARS]> {
    prop::array::uniform3(-1.5f64..1.5)
}

#[allow(dead_code)]
pub fn vars_at(point: &[f64; N_VARS]) -> Vec<Leaf<V>> {
    point.iter().enumerate().map(|(i, &v)| var(v, i)).collect()
}
