use arc_diagnostic::ErrorCode;
use arc_ir::{BinaryOp, ExprBuilder, ExprId};
use arc_types::{FunctionType, Param, ScopeKind, SymbolDef, SymbolKind, SymbolTable, Type};
use arc_wasm::{decode, Instruction};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn table() -> (SymbolTable, arc_types::ScopeId) {
    let mut symbols = SymbolTable::new();
    let scope = symbols.push_scope(symbols.root(), ScopeKind::Function);
    for (name, ty) in [("x", Type::F64), ("n", Type::I32)] {
        if let Err(e) = symbols.add(scope, SymbolDef::new(name, SymbolKind::Variable, ty)) {
            panic!("{e}");
        }
    }
    let root = symbols.root();
    let sig = FunctionType::new(
        vec![Param::new("value", Type::F64)],
        vec![Param::new("output", Type::F64)],
    );
    if let Err(e) = symbols.add(
        root,
        SymbolDef::new("double", SymbolKind::Function, Type::function(sig)),
    ) {
        panic!("{e}");
    }
    (symbols, scope)
}

fn functions() -> FunctionIndex {
    let mut functions = FunctionIndex::new();
    functions.declare("double");
    functions
}

fn call_double(b: &mut ExprBuilder) -> ExprId {
    let x = b.ident("x");
    b.call("double", &[x])
}

fn last_call(out: &CompiledExpr) -> Option<Instruction> {
    match decode(&out.code) {
        Ok(code) => code.into_iter().rev().find(|i| matches!(i, Instruction::Call(_))),
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn config_defaults() {
    let config = CompileConfig::new();
    assert_eq!(config.hint, None);
    assert!(config.infer);
    assert!(!config.patch_calls);
    assert!(!config.require_complete);
    assert_eq!(config, CompileConfig::default());
}

#[test]
fn deferred_calls_stay_pending_by_default() {
    let (symbols, scope) = table();
    let mut b = ExprBuilder::new();
    let root = call_double(&mut b);
    let imports = ImportIndex::new();
    let unit = Unit::new(b.arena(), root, &symbols, scope);

    let out = match compile_expression(&unit, &imports, &functions(), &CompileConfig::default()) {
        Ok(out) => out,
        Err(e) => panic!("{e}"),
    };
    assert!(!out.is_complete());
    assert_eq!(out.pending.len(), 1);
    assert_eq!(last_call(&out), Some(Instruction::Call(0)));
}

#[test]
fn patched_calls_follow_the_imports() {
    let (symbols, scope) = table();
    let mut b = ExprBuilder::new();
    let root = call_double(&mut b);
    let imports = ImportIndex::new();
    let unit = Unit::new(b.arena(), root, &symbols, scope);
    let config = CompileConfig::default().with_patch_calls(true);

    let out = match compile_expression(&unit, &imports, &functions(), &config) {
        Ok(out) => out,
        Err(e) => panic!("{e}"),
    };
    assert!(out.is_complete());
    assert_eq!(last_call(&out), Some(Instruction::Call(imports.len())));
    assert_eq!(out.ty, Type::F64);
}

#[test]
fn incomplete_output_can_be_rejected() {
    let (symbols, scope) = table();
    let mut b = ExprBuilder::new();
    let root = call_double(&mut b);
    let imports = ImportIndex::new();
    let unit = Unit::new(b.arena(), root, &symbols, scope);
    let config = CompileConfig::default().with_require_complete(true);

    let err = match compile_expression(&unit, &imports, &functions(), &config) {
        Ok(out) => panic!("expected an error, got {out:?}"),
        Err(e) => e,
    };
    assert_eq!(err.code(), ErrorCode::E4002);
    assert_eq!(err.span, Some(b.arena().span(root)));
}

#[test]
fn undeclared_functions_are_binding_errors() {
    let (symbols, scope) = table();
    let mut b = ExprBuilder::new();
    let root = call_double(&mut b);
    let imports = ImportIndex::new();
    let unit = Unit::new(b.arena(), root, &symbols, scope);

    let err = match compile_expression(
        &unit,
        &imports,
        &FunctionIndex::new(),
        &CompileConfig::default(),
    ) {
        Ok(out) => panic!("expected an error, got {out:?}"),
        Err(e) => e,
    };
    assert_eq!(err.code(), ErrorCode::E4001);
    assert_eq!(err.span, Some(b.arena().span(root)));
}

#[test]
fn inference_failures_keep_every_diagnostic() {
    let (symbols, scope) = table();
    let mut b = ExprBuilder::new();
    let (a, c) = (b.ident("missing"), b.ident("also_missing"));
    let root = b.binary(a, BinaryOp::Add, c);
    let imports = ImportIndex::new();
    let unit = Unit::new(b.arena(), root, &symbols, scope);

    let err = match compile_expression(&unit, &imports, &functions(), &CompileConfig::default()) {
        Ok(out) => panic!("expected an error, got {out:?}"),
        Err(e) => e,
    };
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.span, Some(b.arena().span(a)));
    assert_eq!(err.diagnostics().len(), 2);
}

#[test]
fn batch_results_keep_input_order() {
    let (symbols, scope) = table();
    let imports = ImportIndex::new();
    let functions = functions();

    let mut b = ExprBuilder::new();
    let x = b.ident("x");
    let missing = b.ident("missing");
    let n = b.ident("n");
    let units = [
        Unit::new(b.arena(), x, &symbols, scope),
        Unit::new(b.arena(), missing, &symbols, scope),
        Unit::new(b.arena(), n, &symbols, scope),
    ];

    let results = compile_batch(&units, &imports, &functions, &CompileConfig::default());
    let summary: Vec<Result<Type, ErrorCode>> = results
        .into_iter()
        .map(|r| r.map(|out| out.ty).map_err(|e| e.code()))
        .collect();
    assert_eq!(
        summary,
        vec![Ok(Type::F64), Err(ErrorCode::E2003), Ok(Type::I32)]
    );
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}

fn additive_op() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![Just(BinaryOp::Add), Just(BinaryOp::Sub)]
}

proptest! {
    /// Compiling the same tree against fresh tables yields the same bytes.
    #[test]
    fn compilation_is_deterministic(
        terms in prop::collection::vec((additive_op(), 0u16..1000, any::<bool>()), 1..12),
    ) {
        let mut b = ExprBuilder::new();
        let first = b.ident("x");
        let rest: Vec<(BinaryOp, ExprId)> = terms
            .iter()
            .map(|&(op, value, use_var)| {
                let operand = if use_var {
                    b.ident("n")
                } else {
                    b.int(&value.to_string())
                };
                (op, operand)
            })
            .collect();
        let root = b.chain(first, &rest);

        let compile_once = || {
            let (symbols, scope) = table();
            let unit = Unit::new(b.arena(), root, &symbols, scope);
            compile_expression(&unit, &ImportIndex::new(), &functions(), &CompileConfig::default())
        };
        let (a, c) = (compile_once(), compile_once());
        prop_assert!(a.is_ok());
        prop_assert_eq!(a, c);
    }
}
