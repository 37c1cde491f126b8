mod common;

use std::panic::{AssertUnwindSafe, catch_unwind};

use common::{V, var};
use lazy_expressions::expression_algebra::{add, div, mul, neg, sub};
use lazy_expressions::{Category, Expr, Leaf, Node, Operand, category_of, cos, reverse_hessian, sin};

#[test]
fn builders_match_operators() {
    let x = var(3.0, 0);
    let y = var(4.0, 1);

    assert_eq!(add(&x, &y).value(), (&x + &y).value());
    assert_eq!(sub(&x, 1.0).value(), 2.0);
    assert_eq!(mul(2.0, &y).value(), 8.0);
    assert_eq!(div(&x, &y).value(), 0.75);
    assert_eq!(neg(&x).value(), -3.0);
    assert_eq!(sin(&x).name(), "sin");
    assert_eq!(cos(&x).name(), "cos");
}

#[test]
fn every_lhs_kind_combines_with_every_rhs_kind() {
    let x = var(3.0, 0);
    let e: Expr<V> = &x + 1.0;

    let products = [
        &x * &x,
        &x * x.clone(),
        &x * &e,
        &x * 2.0,
        x.clone() * &e,
        &e * &x,
        &e * e.clone(),
        e.clone() * 2.0,
        2.0 * &x,
        2.0 * &e,
    ];
    let values: Vec<f64> = products.iter().map(Expr::value).collect();
    assert_eq!(values, vec![9.0, 9.0, 12.0, 6.0, 12.0, 12.0, 16.0, 8.0, 6.0, 8.0]);
}

#[test]
fn operand_nodes_keep_their_category() {
    let x = var(3.0, 0);
    let e = &x * 2.0;
    let kinds: Vec<Category> = e.operands().iter().map(Node::category).collect();
    assert_eq!(kinds, vec![Category::Leaf, Category::Passive]);

    assert_eq!(<f64 as Operand<V>>::CATEGORY, Category::Passive);
    assert_eq!(category_of::<V, Expr<V>>(), Category::Expression);
    assert!(matches!(Operand::<V>::into_node(2.0_f64), Node::Passive(c) if c == 2.0));
}

#[test]
fn leaf_conversions() {
    let base = V::variable(1.5, 2);
    let leaf = Leaf::from(base);
    assert_eq!(leaf.base(), &base);
    assert_eq!(leaf.clone().into_base(), base);
    assert_eq!(Leaf::<V>::passive(1.5).derivative(), &[0.0; 3]);

    let mut leaf = leaf;
    leaf.derivative_mut()[0] = 4.0;
    assert_eq!(*leaf.derivative(), [4.0, 0.0, 1.0]);
    leaf.base_mut().value = 2.0;
    assert_eq!(leaf.value(), 2.0);
}

#[test]
fn hessian_row_out_of_range_panics() {
    let x = var(3.0, 0);
    let (_, h) = reverse_hessian(&(&x * &x));
    assert!(catch_unwind(AssertUnwindSafe(|| h.row(2).len())).is_err());
}
