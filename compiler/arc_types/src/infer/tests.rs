use super::*;
use arc_diagnostic::ErrorCode;
use arc_ir::{BinaryOp, ChainLevel, ExprBuilder, ParsedType};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use smallvec::smallvec;

use crate::{FunctionType, Kind, Param, SymbolDef, SymbolKind};

struct Env {
    symbols: SymbolTable,
    scope: ScopeId,
}

impl Env {
    fn new(defs: &[(&str, SymbolKind, Type)]) -> Self {
        let mut symbols = SymbolTable::new();
        let scope = symbols.push_scope(symbols.root(), crate::ScopeKind::Function);
        for (name, kind, ty) in defs {
            let target = if matches!(kind, SymbolKind::Function | SymbolKind::Channel) {
                symbols.root()
            } else {
                scope
            };
            assert!(symbols.add(target, SymbolDef::new(name, *kind, ty.clone())).is_ok());
        }
        Env { symbols, scope }
    }

    fn infer(&self, b: &ExprBuilder, root: ExprId, expected: Option<&Type>) -> Result<TypeMap, InferFailure> {
        infer_types(b.arena(), root, &self.symbols, self.scope, expected)
    }
}

fn codes(result: Result<TypeMap, InferFailure>) -> Vec<ErrorCode> {
    result
        .err()
        .map(|f| f.diagnostics.iter().map(|d| d.code).collect())
        .unwrap_or_default()
}

fn messages(result: Result<TypeMap, InferFailure>) -> Vec<String> {
    result
        .err()
        .map(|f| f.diagnostics.into_iter().map(|d| d.message).collect())
        .unwrap_or_default()
}

fn type_of(map: &Result<TypeMap, InferFailure>, id: ExprId) -> Option<Type> {
    map.as_ref().ok().and_then(|m| m.get(id).cloned())
}

#[test]
fn integer_literals_default_to_i64() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let (one, two) = (b.int("1"), b.int("2"));
    let sum = b.binary(one, BinaryOp::Add, two);
    let map = env.infer(&b, sum, None);
    assert_eq!(type_of(&map, one), Some(Type::I64));
    assert_eq!(type_of(&map, sum), Some(Type::I64));
}

#[test]
fn mixed_literals_meet_at_f64() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let (one, half) = (b.int("1"), b.float("2.5"));
    let sum = b.binary(one, BinaryOp::Add, half);
    let map = env.infer(&b, sum, None);
    assert_eq!(type_of(&map, one), Some(Type::F64));
    assert_eq!(type_of(&map, sum), Some(Type::F64));
}

#[test]
fn literal_takes_the_variable_type() {
    let env = Env::new(&[("x", SymbolKind::Variable, Type::F32)]);
    let mut b = ExprBuilder::new();
    let (x, one) = (b.ident("x"), b.int("1"));
    let sum = b.binary(x, BinaryOp::Add, one);
    let map = env.infer(&b, sum, None);
    assert_eq!(type_of(&map, one), Some(Type::F32));
    assert_eq!(type_of(&map, sum), Some(Type::F32));
}

#[test]
fn expected_type_reaches_literals() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let (one, two) = (b.int("1"), b.int("2"));
    let product = b.binary(one, BinaryOp::Mul, two);
    let map = env.infer(&b, product, Some(&Type::U16));
    assert_eq!(type_of(&map, one), Some(Type::U16));
    assert_eq!(type_of(&map, two), Some(Type::U16));
}

#[test]
fn comparisons_are_u8() {
    let env = Env::new(&[("x", SymbolKind::Input, Type::F64)]);
    let mut b = ExprBuilder::new();
    let (x, zero) = (b.ident("x"), b.int("0"));
    let cmp = b.binary(x, BinaryOp::Gt, zero);
    let map = env.infer(&b, cmp, None);
    assert_eq!(type_of(&map, cmp), Some(Type::U8));
    assert_eq!(type_of(&map, zero), Some(Type::F64));
}

#[test]
fn series_comparisons_are_series_u8() {
    let env = Env::new(&[("s", SymbolKind::Variable, Type::series(Type::F32))]);
    let mut b = ExprBuilder::new();
    let (s, limit) = (b.ident("s"), b.float("0.5"));
    let cmp = b.binary(s, BinaryOp::Lt, limit);
    let map = env.infer(&b, cmp, None);
    assert_eq!(type_of(&map, cmp), Some(Type::series(Type::U8)));
    assert_eq!(type_of(&map, limit), Some(Type::F32));
}

#[test]
fn channels_are_read_as_their_element() {
    let env = Env::new(&[("sensor", SymbolKind::Channel, Type::chan(Type::F64))]);
    let mut b = ExprBuilder::new();
    let (ch, two) = (b.ident("sensor"), b.int("2"));
    let product = b.binary(ch, BinaryOp::Mul, two);
    let map = env.infer(&b, product, None);
    assert_eq!(type_of(&map, ch), Some(Type::F64));
    assert_eq!(type_of(&map, product), Some(Type::F64));
}

#[test]
fn scalar_times_series_is_a_series() {
    let env = Env::new(&[("s", SymbolKind::Variable, Type::series(Type::I32))]);
    let mut b = ExprBuilder::new();
    let (two, s) = (b.int("2"), b.ident("s"));
    let product = b.binary(two, BinaryOp::Mul, s);
    let map = env.infer(&b, product, None);
    assert_eq!(type_of(&map, two), Some(Type::I32));
    assert_eq!(type_of(&map, product), Some(Type::series(Type::I32)));
}

#[test]
fn every_unknown_identifier_is_reported() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let (y, z) = (b.ident("y"), b.ident("z"));
    let sum = b.binary(y, BinaryOp::Add, z);
    assert_eq!(
        messages(env.infer(&b, sum, None)),
        vec!["unresolved symbol: y".to_owned(), "unresolved symbol: z".to_owned()]
    );
}

#[test]
fn string_plus_number_is_a_mismatch() {
    let env = Env::new(&[("x", SymbolKind::Variable, Type::F64)]);
    let mut b = ExprBuilder::new();
    let (s, x) = (b.string("a"), b.ident("x"));
    let sum = b.binary(s, BinaryOp::Add, x);
    assert_eq!(
        messages(env.infer(&b, sum, None)),
        vec!["type mismatch: cannot use str and f64 in additive operation".to_owned()]
    );
}

#[test]
fn string_concat_and_equality_are_allowed() {
    let env = Env::new(&[("name", SymbolKind::Variable, Type::String)]);
    let mut b = ExprBuilder::new();
    let (n, suffix) = (b.ident("name"), b.string("_x"));
    let concat = b.binary(n, BinaryOp::Add, suffix);
    let other = b.string("a_x");
    let eq = b.binary(concat, BinaryOp::Eq, other);
    let map = env.infer(&b, eq, None);
    assert_eq!(type_of(&map, concat), Some(Type::String));
    assert_eq!(type_of(&map, eq), Some(Type::U8));
}

#[test]
fn logical_operands_must_be_boolean() {
    let env = Env::new(&[("flag", SymbolKind::Variable, Type::U8), ("x", SymbolKind::Variable, Type::F64)]);
    let mut b = ExprBuilder::new();
    let (flag, x) = (b.ident("flag"), b.ident("x"));
    let and = b.binary(flag, BinaryOp::And, x);
    assert_eq!(codes(env.infer(&b, and, None)), vec![ErrorCode::E2004]);

    let mut b = ExprBuilder::new();
    let (flag, one) = (b.ident("flag"), b.int("1"));
    let or = b.binary(flag, BinaryOp::Or, one);
    let map = env.infer(&b, or, None);
    assert_eq!(type_of(&map, one), Some(Type::U8));
}

#[test]
fn index_is_i32_and_yields_the_element() {
    let env = Env::new(&[("s", SymbolKind::Variable, Type::series(Type::F64))]);
    let mut b = ExprBuilder::new();
    let (s, zero) = (b.ident("s"), b.int("0"));
    let elem = b.index(s, zero);
    let map = env.infer(&b, elem, None);
    assert_eq!(type_of(&map, zero), Some(Type::I32));
    assert_eq!(type_of(&map, elem), Some(Type::F64));
}

#[test]
fn indexing_a_scalar_fails() {
    let env = Env::new(&[("x", SymbolKind::Variable, Type::F64)]);
    let mut b = ExprBuilder::new();
    let (x, zero) = (b.ident("x"), b.int("0"));
    let elem = b.index(x, zero);
    assert_eq!(
        messages(env.infer(&b, elem, None)),
        vec!["indexing is only supported on series types".to_owned()]
    );
}

#[test]
fn float_index_is_rejected() {
    let env = Env::new(&[("s", SymbolKind::Variable, Type::series(Type::F64))]);
    let mut b = ExprBuilder::new();
    let (s, idx) = (b.ident("s"), b.float("1.5"));
    let elem = b.index(s, idx);
    assert_eq!(codes(env.infer(&b, elem, None)), vec![ErrorCode::E2001]);
}

#[test]
fn series_literals_follow_hint_or_default() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let elems = [b.int("1"), b.int("2"), b.int("3")];
    let series = b.series(&elems);
    assert_eq!(
        type_of(&env.infer(&b, series, None), series),
        Some(Type::series(Type::I64))
    );
    let hinted = env.infer(&b, series, Some(&Type::series(Type::F32)));
    assert_eq!(type_of(&hinted, series), Some(Type::series(Type::F32)));
    assert_eq!(type_of(&hinted, elems[0]), Some(Type::F32));
}

#[test]
fn empty_series_needs_a_hint() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let series = b.series(&[]);
    assert_eq!(codes(env.infer(&b, series, None)), vec![ErrorCode::E2005]);
    assert_eq!(
        type_of(&env.infer(&b, series, Some(&Type::series(Type::U32))), series),
        Some(Type::series(Type::U32))
    );
}

fn scale_fn() -> Type {
    Type::function(FunctionType::new(
        vec![
            Param::new("value", Type::F64),
            Param::new("factor", Type::F64).with_default(crate::ConstValue::F64(2.0)),
        ],
        vec![Param::new("output", Type::F64)],
    ))
}

#[test]
fn call_arguments_take_parameter_types() {
    let env = Env::new(&[("scale", SymbolKind::Function, scale_fn())]);
    let mut b = ExprBuilder::new();
    let one = b.int("1");
    let call = b.call("scale", &[one]);
    let map = env.infer(&b, call, None);
    assert_eq!(type_of(&map, one), Some(Type::F64));
    assert_eq!(type_of(&map, call), Some(Type::F64));
}

#[test]
fn call_arity_is_checked() {
    let env = Env::new(&[("scale", SymbolKind::Function, scale_fn())]);
    let mut b = ExprBuilder::new();
    let args = [b.int("1"), b.int("2"), b.int("3")];
    let call = b.call("scale", &args);
    assert_eq!(
        messages(env.infer(&b, call, None)),
        vec!["function scale expects 1 to 2 argument(s), got 3".to_owned()]
    );
}

#[test]
fn builtins_have_fixed_results() {
    let env = Env::new(&[
        ("s", SymbolKind::Variable, Type::series(Type::F64)),
        ("name", SymbolKind::Variable, Type::String),
    ]);
    let mut b = ExprBuilder::new();
    let s = b.ident("s");
    let len_s = b.call("len", &[s]);
    let name = b.ident("name");
    let len_name = b.call("len", &[name]);
    let now = b.call("now", &[]);
    assert_eq!(type_of(&env.infer(&b, len_s, None), len_s), Some(Type::I64));
    assert_eq!(type_of(&env.infer(&b, len_name, None), len_name), Some(Type::I32));
    assert_eq!(type_of(&env.infer(&b, now, None), now), Some(Type::TimeStamp));
}

#[test]
fn functions_are_not_values() {
    let env = Env::new(&[("scale", SymbolKind::Function, scale_fn())]);
    let mut b = ExprBuilder::new();
    let f = b.ident("scale");
    assert_eq!(codes(env.infer(&b, f, None)), vec![ErrorCode::E2009]);
}

#[test]
fn mixed_unit_dimensions_are_rejected() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let (secs, meters) = (b.int_unit("1", "s"), b.int_unit("1", "m"));
    let sum = b.binary(secs, BinaryOp::Add, meters);
    assert_eq!(codes(env.infer(&b, sum, None)), vec![ErrorCode::E2008]);

    let mut b = ExprBuilder::new();
    let (secs, meters) = (b.int_unit("1", "s"), b.int_unit("1", "m"));
    let product = b.binary(secs, BinaryOp::Mul, meters);
    assert!(env.infer(&b, product, None).is_ok());
}

#[test]
fn sub_second_time_literals_meet_temporal_types() {
    let env = Env::new(&[("elapsed", SymbolKind::Variable, Type::TimeSpan)]);

    let mut b = ExprBuilder::new();
    let (elapsed, limit) = (b.ident("elapsed"), b.int_unit("300", "ms"));
    let cmp = b.binary(elapsed, BinaryOp::Gt, limit);
    let map = env.infer(&b, cmp, None);
    assert_eq!(type_of(&map, limit), Some(Type::TimeSpan));
    assert_eq!(type_of(&map, cmp), Some(Type::U8));

    let mut b = ExprBuilder::new();
    let (now, ago) = (b.call("now", &[]), b.float_unit("1.5", "s"));
    let diff = b.binary(now, BinaryOp::Sub, ago);
    let map = env.infer(&b, diff, None);
    assert_eq!(type_of(&map, ago), Some(Type::TimeStamp));
    assert_eq!(type_of(&map, diff), Some(Type::TimeStamp));

    let mut b = ExprBuilder::new();
    let tick = b.int_unit("500", "us");
    let cast = b.cast(ParsedType::TimeSpan, tick);
    let map = env.infer(&b, cast, None);
    assert_eq!(type_of(&map, tick), Some(Type::TimeSpan));
}

#[test]
fn lone_sub_second_literal_is_f64_seconds() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let (limit, one) = (b.int_unit("300", "ms"), b.int("1"));
    let sum = b.binary(limit, BinaryOp::Add, one);
    let map = env.infer(&b, sum, None);
    assert_eq!(type_of(&map, limit), Some(Type::F64));
    assert_eq!(type_of(&map, one), Some(Type::F64));
}

#[test]
fn malformed_chains_are_structural_errors() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let empty = b.raw_chain(ChainLevel::Additive, smallvec![], smallvec![]);
    assert_eq!(
        messages(env.infer(&b, empty, None)),
        vec!["cannot compile an empty additive expression".to_owned()]
    );

    let one = b.int("1");
    let broken = b.raw_chain(ChainLevel::Additive, smallvec![one], smallvec![BinaryOp::Add]);
    assert_eq!(codes(env.infer(&b, broken, None)), vec![ErrorCode::E1002]);
}

#[test]
fn invalid_casts_are_reported() {
    let env = Env::new(&[("x", SymbolKind::Variable, Type::F64)]);
    let mut b = ExprBuilder::new();
    let x = b.ident("x");
    let cast = b.cast(ParsedType::Str, x);
    assert_eq!(
        messages(env.infer(&b, cast, None)),
        vec!["cannot cast f64 to str".to_owned()]
    );

    let mut b = ExprBuilder::new();
    let five = b.int("5");
    let cast = b.cast(ParsedType::F32, five);
    let map = env.infer(&b, cast, None);
    assert_eq!(type_of(&map, five), Some(Type::F32));
    assert_eq!(type_of(&map, cast), Some(Type::F32));
}

#[test]
fn negating_unsigned_series_fails() {
    let env = Env::new(&[("s", SymbolKind::Variable, Type::series(Type::U16))]);
    let mut b = ExprBuilder::new();
    let s = b.ident("s");
    let neg = b.neg(s);
    assert_eq!(codes(env.infer(&b, neg, None)), vec![ErrorCode::E2004]);
}

#[test]
fn deep_nesting_does_not_overflow() {
    let env = Env::new(&[]);
    let mut b = ExprBuilder::new();
    let mut expr = b.int("1");
    for _ in 0..20_000 {
        expr = b.paren(expr);
    }
    let map = env.infer(&b, expr, None);
    assert_eq!(type_of(&map, expr), Some(Type::I64));
}

proptest! {
    #[test]
    fn literal_follows_numeric_operand(index in 0usize..Kind::NUMERIC.len()) {
        let ty = Type::from_kind(Kind::NUMERIC[index]).unwrap_or(Type::Unresolved);
        let env = Env::new(&[("x", SymbolKind::Variable, ty.clone())]);
        let mut b = ExprBuilder::new();
        let (x, one) = (b.ident("x"), b.int("1"));
        let sum = b.binary(x, BinaryOp::Sub, one);
        let map = env.infer(&b, sum, None);
        prop_assert_eq!(type_of(&map, one), Some(ty.clone()));
        prop_assert_eq!(type_of(&map, sum), Some(ty));
    }
}
