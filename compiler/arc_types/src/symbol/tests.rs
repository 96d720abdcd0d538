use super::*;
use pretty_assertions::assert_eq;

fn var(name: &str) -> SymbolDef {
    SymbolDef::new(name, SymbolKind::Variable, Type::F64)
}

#[test]
fn resolve_walks_outward() {
    let mut table = SymbolTable::new();
    let root = table.root();
    table.add(root, var("x")).map(|_| ()).unwrap_or_default();
    let func = table.push_scope(root, ScopeKind::Function);
    let block = table.push_scope(func, ScopeKind::Block);

    assert_eq!(table.resolve(block, "x").map(|s| s.kind), Ok(SymbolKind::Variable));
    assert_eq!(
        table.resolve(block, "y"),
        Err(ScopeError::Unresolved { name: "y".into() })
    );
}

#[test]
fn duplicate_in_same_scope_fails() {
    let mut table = SymbolTable::new();
    let root = table.root();
    assert!(table.add(root, var("x")).is_ok());
    let err = table.add(root, var("x")).map(|_| ());
    assert_eq!(err, Err(ScopeError::Duplicate { name: "x".into() }));
    assert_eq!(
        ScopeError::Duplicate { name: "x".into() }.to_string(),
        "duplicate symbol: x"
    );
}

#[test]
fn adding_to_a_foreign_scope_fails() {
    let mut table = SymbolTable::new();
    let stray = ScopeId(7);
    let err = table.add(stray, var("x")).map(|_| ());
    assert_eq!(err, Err(ScopeError::UnknownScope { scope: stray }));
    assert_eq!(
        ScopeError::UnknownScope { scope: stray }.to_string(),
        "unknown scope: 7"
    );
    assert!(table.add(table.root(), var("x")).is_ok());
}

#[test]
fn shadowing_outer_scope_is_allowed() {
    let mut table = SymbolTable::new();
    let root = table.root();
    assert!(table.add(root, var("x")).is_ok());
    let func = table.push_scope(root, ScopeKind::Function);
    let inner = SymbolDef::new("x", SymbolKind::Input, Type::I32);
    assert!(table.add(func, inner).is_ok());

    assert_eq!(table.resolve(func, "x").map(|s| s.ty.clone()), Ok(Type::I32));
    assert_eq!(table.resolve(root, "x").map(|s| s.ty.clone()), Ok(Type::F64));
}

#[test]
fn locals_count_per_function() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let f = table.push_scope(root, ScopeKind::Function);
    let block = table.push_scope(f, ScopeKind::Block);

    let a = table.add(f, SymbolDef::new("a", SymbolKind::Input, Type::F64)).map(|s| s.id);
    let b = table.add(f, SymbolDef::new("b", SymbolKind::Config, Type::F64)).map(|s| s.id);
    let c = table.add(block, var("c")).map(|s| s.id);
    assert_eq!((a, b, c), (Ok(0), Ok(1), Ok(2)));
    assert_eq!(table.local_count(block), 3);

    let g = table.push_scope(root, ScopeKind::Function);
    assert_eq!(table.add(g, var("d")).map(|s| s.id), Ok(0));
}

#[test]
fn stateful_ids_are_separate_from_locals() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let f = table.push_scope(root, ScopeKind::Function);
    assert_eq!(table.add(f, var("x")).map(|s| s.id), Ok(0));
    let st = SymbolDef::new("count", SymbolKind::StatefulVariable, Type::I64);
    assert_eq!(table.add(f, st).map(|s| s.id), Ok(0));
    let st2 = SymbolDef::new("total", SymbolKind::StatefulVariable, Type::F64);
    assert_eq!(table.add(f, st2).map(|s| s.id), Ok(1));
}

#[test]
fn channels_and_functions_count_globally() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let f = table.push_scope(root, ScopeKind::Function);

    let ch = |name: &str| SymbolDef::new(name, SymbolKind::Channel, Type::chan(Type::F64));
    assert_eq!(table.add(f, ch("a")).map(|s| s.id), Ok(0));
    assert_eq!(table.add(root, ch("b")).map(|s| s.id), Ok(1));
    assert_eq!(table.add(root, ch("c").with_id(42)).map(|s| s.id), Ok(42));

    let func = |name: &str| {
        SymbolDef::new(
            name,
            SymbolKind::Function,
            Type::function(crate::FunctionType::default()),
        )
    };
    assert_eq!(table.add(root, func("f")).map(|s| s.id), Ok(0));
    assert_eq!(table.add(root, func("g")).map(|s| s.id), Ok(1));
    assert_eq!(table.function_count(), 2);
}

#[test]
fn constants_carry_value_without_id() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let def = SymbolDef::new("LIMIT", SymbolKind::GlobalConstant, Type::I32)
        .with_value(ConstValue::I32(10));
    let sym = table.add(root, def).map(Clone::clone);
    assert_eq!(sym.as_ref().map(|s| s.id), Ok(0));
    assert_eq!(
        sym.map(|s| s.value),
        Ok(Some(ConstValue::I32(10)))
    );
}

#[test]
fn fresh_tables_assign_identical_ids() {
    let build = || {
        let mut table = SymbolTable::new();
        let root = table.root();
        let f = table.push_scope(root, ScopeKind::Function);
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| table.add(f, var(n)).map(|s| s.id))
            .collect();
        ids
    };
    assert_eq!(build(), build());
}
