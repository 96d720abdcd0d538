use super::*;

#[test]
fn default_is_invalid() {
    assert_eq!(ExprId::default(), ExprId::INVALID);
    assert!(!ExprId::INVALID.is_valid());
}

#[test]
fn index_matches_raw() {
    let id = ExprId::new(42);
    assert_eq!(id.index(), 42);
    assert_eq!(id.raw(), 42);
    assert_eq!(format!("{id:?}"), "ExprId(42)");
}
