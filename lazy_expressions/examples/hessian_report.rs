//! Prints the value, gradient and Hessian of `w = x*y + sin(z)`.
//!
//! Run with `RUST_LOG=debug` to see every leaf's Hessian row as the sweep reaches it, or
//! `RUST_LOG=trace` for the forward tangent as well.

use lazy_expressions::{Leaf, VectorTangent, string_tree};

type V = VectorTangent<f64, 3>;

fn main() {
    env_logger::init();

    let x = Leaf::new(V::variable(3.0, 0));
    let y = Leaf::new(V::variable(4.0, 1));
    let z = Leaf::new(V::variable(5.0, 2));

    let w = &x * &y + z.sin();
    println!("w = {}", string_tree(&lazy_expressions::Node::Operator(w.clone())));

    let (leaf, hessian) = Leaf::hessian_of(&w);
    println!("value    = {}", leaf.value());
    println!("gradient = {:?}", leaf.derivative());
    println!("rows by leaf occurrence:\n{}", hessian.rows());
    println!("hessian in x, y, z:\n{}", hessian.project());

    let mut acc = leaf;
    acc *= &x;
    println!("w * x    = {acc}");
}
