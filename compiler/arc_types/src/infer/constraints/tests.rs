use super::*;
use pretty_assertions::assert_eq;

const NODE: ExprId = ExprId::new(0);

fn known(ty: Type) -> InferTy {
    InferTy::Known(ty)
}

#[test]
fn merge_prefers_float_then_integer() {
    use VarConstraint::{Float, Integer, None, Numeric};
    assert_eq!(Integer.merge(Float), Float);
    assert_eq!(Numeric.merge(Integer), Integer);
    assert_eq!(None.merge(Numeric), Numeric);
    assert_eq!(None.merge(None), None);
}

#[test]
fn time_literals_merge_as_floats_outside_time() {
    use VarConstraint::{Duration, Float, Integer, Numeric};
    assert_eq!(Duration.merge(Integer), Duration);
    assert_eq!(Float.merge(Duration), Float);
    assert_eq!(Duration.merge(Numeric), Float);
    assert!(Duration.accepts(&Type::TimeSpan, true));
    assert!(Duration.accepts(&Type::I32, false));
    assert!(!Duration.accepts(&Type::I32, true));
    assert!(!Float.accepts(&Type::TimeStamp, false));
}

#[test]
fn fractional_time_literal_binds_to_timespan() {
    let mut sys = ConstraintSystem::new();
    let lit = sys.fresh(VarConstraint::Duration);
    sys.add_compatible(known(Type::TimeSpan), InferTy::Var(lit), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.bound(lit), Some(Type::TimeSpan));
}

#[test]
fn unbound_literals_take_defaults() {
    let mut sys = ConstraintSystem::new();
    let i = sys.fresh(VarConstraint::Integer);
    let f = sys.fresh(VarConstraint::Float);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.apply(&InferTy::Var(i), NODE), Ok(Type::I64));
    assert_eq!(sys.apply(&InferTy::Var(f), NODE), Ok(Type::F64));
}

#[test]
fn unconstrained_variable_is_unresolved() {
    let mut sys = ConstraintSystem::new();
    let v = sys.fresh(VarConstraint::None);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(
        sys.apply(&InferTy::Var(v), NODE),
        Err(UnifyError::Unresolved { node: NODE })
    );
}

#[test]
fn integer_literal_takes_operand_type() {
    let mut sys = ConstraintSystem::new();
    let lit = sys.fresh(VarConstraint::Integer);
    sys.add_compatible(known(Type::F32), InferTy::Var(lit), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.bound(lit), Some(Type::F32));
}

#[test]
fn literals_chained_through_variables_promote() {
    // 1 + 2.5: both literals meet at f64
    let mut sys = ConstraintSystem::new();
    let a = sys.fresh(VarConstraint::Integer);
    let b = sys.fresh(VarConstraint::Float);
    sys.add_compatible(InferTy::Var(a), InferTy::Var(b), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.bound(a), Some(Type::F64));
    assert_eq!(sys.constraint(a), VarConstraint::Float);
}

#[test]
fn float_literal_against_integer_operand_is_f64() {
    let mut sys = ConstraintSystem::new();
    let f = sys.fresh(VarConstraint::Float);
    sys.add_compatible(known(Type::I32), InferTy::Var(f), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.bound(f), Some(Type::F64));
}

#[test]
fn non_fixed_bounds_widen_by_promotion() {
    let mut sys = ConstraintSystem::new();
    let v = sys.fresh(VarConstraint::Integer);
    sys.add_compatible(InferTy::Var(v), known(Type::I16), NODE);
    sys.add_compatible(InferTy::Var(v), known(Type::U8), NODE);
    sys.add_compatible(InferTy::Var(v), known(Type::F32), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.bound(v), Some(Type::F32));
}

#[test]
fn equality_fixes_the_bound() {
    let mut sys = ConstraintSystem::new();
    let idx = sys.fresh(VarConstraint::Integer);
    assert_eq!(sys.add_equality(&InferTy::Var(idx), &known(Type::I32), NODE), Ok(()));
    sys.add_compatible(InferTy::Var(idx), known(Type::I64), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.bound(idx), Some(Type::I32));
}

#[test]
fn float_literal_cannot_equal_an_integer() {
    let mut sys = ConstraintSystem::new();
    let f = sys.fresh(VarConstraint::Float);
    let err = sys.add_equality(&InferTy::Var(f), &known(Type::I32), NODE);
    assert_eq!(
        err.clone().map_err(|e| e.to_string()),
        Err("float literal is not compatible with i32".to_owned())
    );
    let diag = err.err().map(|e| e.to_diagnostic(arc_ir::Span::new(0, 3)));
    assert_eq!(
        diag.map(|d| d.suggestions),
        Some(vec!["use i32(value) to convert".to_owned()])
    );
}

#[test]
fn string_is_not_compatible_with_numeric_literal() {
    let mut sys = ConstraintSystem::new();
    let v = sys.fresh(VarConstraint::Integer);
    sys.add_compatible(known(Type::String), InferTy::Var(v), NODE);
    assert!(matches!(sys.unify(), Err(UnifyError::Mismatch { .. })));
}

#[test]
fn series_element_meets_scalar() {
    let mut sys = ConstraintSystem::new();
    let elem = sys.fresh(VarConstraint::None);
    let lit = sys.fresh(VarConstraint::Integer);
    sys.add_compatible(InferTy::Var(lit), InferTy::Var(elem), NODE);
    let series = InferTy::series(InferTy::Var(elem));
    sys.add_compatible(series.clone(), known(Type::series(Type::F32)), NODE);
    assert_eq!(sys.unify(), Ok(()));
    assert_eq!(sys.apply(&series, NODE), Ok(Type::series(Type::F32)));
}

#[test]
fn known_types_check_compatibility_only() {
    let mut sys = ConstraintSystem::new();
    sys.add_compatible(known(Type::I32), known(Type::F64), NODE);
    sys.add_compatible(known(Type::TimeStamp), known(Type::TimeSpan), NODE);
    assert_eq!(sys.unify(), Ok(()));

    let mut sys = ConstraintSystem::new();
    sys.add_compatible(known(Type::String), known(Type::F64), NODE);
    assert_eq!(
        sys.unify().map_err(|e| e.to_string()),
        Err("str is not compatible with f64".to_owned())
    );
}

#[test]
fn path_compression_keeps_roots_consistent() {
    let mut sys = ConstraintSystem::new();
    let vars: Vec<_> = (0..8).map(|_| sys.fresh(VarConstraint::Integer)).collect();
    for pair in vars.windows(2) {
        sys.add_compatible(InferTy::Var(pair[0]), InferTy::Var(pair[1]), NODE);
    }
    sys.add_compatible(InferTy::Var(vars[7]), known(Type::U16), NODE);
    assert_eq!(sys.unify(), Ok(()));
    for v in vars {
        assert_eq!(sys.bound(v), Some(Type::U16));
    }
}
