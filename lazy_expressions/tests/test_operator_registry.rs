use lazy_expressions::{BinaryOp, LookupError, Op, OpName, UnaryOp};

#[test]
fn lookup_with_dash_is_ambiguous_without_arity() {
    let err = Op::lookup("-").unwrap_err();
    match err {
        LookupError::Ambiguous { token, candidates } => {
            assert_eq!(token, "-");
            assert!(candidates.iter().any(|c| c.eq_ignore_ascii_case("neg")));
            assert!(candidates.iter().any(|c| c.eq_ignore_ascii_case("sub")));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn lookup_with_dash_and_arity_selects_sub() {
    let op = Op::lookup_with_arity("-", 2).unwrap();
    assert_eq!(op.arity(), 2);
    assert_eq!(op, Op::Binary(BinaryOp::Sub));
}

#[test]
fn lookup_with_dash_and_arity_selects_neg() {
    let op = Op::lookup_with_arity("-", 1).unwrap();
    assert_eq!(op.arity(), 1);
    assert_eq!(op, Op::Unary(UnaryOp::Neg));
}

#[test]
fn lookup_by_name_and_token() {
    assert_eq!(Op::lookup("*").unwrap(), Op::Binary(BinaryOp::Mul));
    assert_eq!(Op::lookup("+").unwrap(), Op::Binary(BinaryOp::Add));
    assert_eq!(Op::lookup("SIN").unwrap(), Op::Unary(UnaryOp::Sin));
    assert_eq!(Op::lookup("identity").unwrap(), Op::Unary(UnaryOp::Identity));
}

#[test]
fn vocabulary_aliases_resolve() {
    assert_eq!(Op::lookup("usub").unwrap(), Op::Unary(UnaryOp::Neg));
    assert_eq!(Op::lookup("uadd").unwrap(), Op::Unary(UnaryOp::Identity));
    assert_eq!(OpName::from_name("usub").and_then(OpName::to_op), Some(UnaryOp::Neg.into()));
}

#[test]
fn reserved_names_without_rules_are_unsupported() {
    assert_eq!(Op::lookup("exp"), Err(LookupError::Unsupported("exp")));
    assert_eq!(Op::lookup_with_arity("pow", 2), Err(LookupError::Unsupported("pow")));
    assert!(!OpName::Erf.is_supported());
}

#[test]
fn unknown_tokens_and_wrong_arity() {
    assert_eq!(Op::lookup("frobnicate"), Err(LookupError::Unknown("frobnicate".into())));
    assert_eq!(Op::lookup_with_arity("sin", 2), Err(LookupError::Unknown("sin".into())));
}

#[test]
fn errors_render_readably() {
    let err = Op::lookup("-").unwrap_err();
    assert_eq!(
        err.to_string(),
        "operator token \"-\" is ambiguous (candidates: neg, sub); specify an arity"
    );
    assert_eq!(Op::lookup("?").unwrap_err().to_string(), "unknown operator \"?\"");
    let boxed: Box<dyn std::error::Error> = Box::new(LookupError::Unsupported("erf"));
    assert!(boxed.to_string().contains("no differentiation rules"));
}

#[test]
fn operator_metadata() {
    assert_eq!(Op::all().count(), 8);
    assert_eq!(BinaryOp::Div.name(), "div");
    assert_eq!(BinaryOp::Div.infix(), Some("/"));
    assert_eq!(UnaryOp::Cos.to_string(), "cos");
    assert_eq!(Op::from(UnaryOp::Neg).infix(), Some("-"));
}
