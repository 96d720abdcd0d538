use super::*;
use pretty_assertions::assert_eq;

#[test]
fn chain_collects_operands_in_order() {
    let mut b = ExprBuilder::new();
    let x = b.ident("x");
    let one = b.int("1");
    let two = b.int("2");
    let root = b.chain(x, &[(BinaryOp::Add, one), (BinaryOp::Sub, two)]);
    let arena = b.finish();

    match &arena.get_expr(root).kind {
        ExprKind::Chain {
            level,
            operands,
            ops,
        } => {
            assert_eq!(*level, ChainLevel::Additive);
            assert_eq!(operands.as_slice(), &[x, one, two]);
            assert_eq!(ops.as_slice(), &[BinaryOp::Add, BinaryOp::Sub]);
        }
        other => panic!("expected chain, got {other:?}"),
    }
}

#[test]
fn chain_without_operators_is_identity() {
    let mut b = ExprBuilder::new();
    let x = b.ident("x");
    assert_eq!(b.chain(x, &[]), x);
    assert_eq!(b.arena().len(), 1);
}

#[test]
fn nodes_get_distinct_spans() {
    let mut b = ExprBuilder::new();
    let a = b.int("1");
    let c = b.int("2");
    let arena = b.finish();
    assert_ne!(arena.span(a), arena.span(c));
}

#[test]
fn unit_literal_keeps_suffix() {
    let mut b = ExprBuilder::new();
    let lit = b.int_unit("300", "ms");
    let arena = b.finish();
    assert_eq!(
        arena.get_expr(lit).kind,
        ExprKind::Literal(Literal::Int(NumericLiteral::with_unit("300", "ms")))
    );
}
