use super::*;
use crate::{ExprKind, Literal};

#[test]
fn alloc_returns_sequential_ids() {
    let mut arena = ExprArena::new();
    let a = arena.alloc_expr(Expr::new(ExprKind::Literal(Literal::Bool(true)), Span::new(0, 4)));
    let b = arena.alloc_expr(Expr::new(ExprKind::Ident("x".into()), Span::new(5, 6)));

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.span(b), Span::new(5, 6));
    assert_eq!(arena.ids().collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn missing_id_has_dummy_span() {
    let arena = ExprArena::new();
    assert!(arena.try_get(ExprId::new(3)).is_none());
    assert_eq!(arena.span(ExprId::INVALID), Span::DUMMY);
}
