//! Two-phase type inference.
//!
//! Phase 1 walks the expression, gives each literal a type
//! variable and records constraints between operands. Phase 2
//! ([`ConstraintSystem::unify`]) solves them and rewrites every node to a
//! concrete type. The result is a [`TypeMap`] the compiler reads while
//! emitting; it never changes during emission.

mod analyze;
mod constraints;

pub use constraints::{
    compatible_concrete, ConstraintSystem, InferTy, TypeVar, UnifyError, VarConstraint,
};

use arc_diagnostic::Diagnostic;
use arc_ir::{ExprArena, ExprId};
use rustc_hash::FxHashMap;

use crate::{ScopeId, SymbolTable, Type};
use analyze::{Analysis, Analyzer};

/// Concrete type of every analyzed node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeMap {
    types: FxHashMap<ExprId, Type>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn insert(&mut self, id: ExprId, ty: Type) {
        self.types.insert(id, ty);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Type)> + '_ {
        self.types.iter().map(|(id, ty)| (*id, ty))
    }
}

/// Inference failed; every problem found is in `diagnostics`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("type inference failed with {} error(s)", .diagnostics.len())]
pub struct InferFailure {
    pub diagnostics: Vec<Diagnostic>,
}

/// Infer the type of every node reachable from `root`.
///
/// `expected` is the type the caller wants the whole expression to have;
/// literals that feed into the result bend towards it.
#[tracing::instrument(level = "debug", skip_all, fields(root = ?root))]
pub fn infer_types(
    arena: &ExprArena,
    root: ExprId,
    symbols: &SymbolTable,
    scope: ScopeId,
    expected: Option<&Type>,
) -> Result<TypeMap, InferFailure> {
    let mut analyzer = Analyzer::new(arena, symbols, scope);
    let root_ty = analyzer.visit(root);
    if let (Some(ty), Some(expected)) = (&root_ty, expected) {
        if ty.has_var() {
            analyzer
                .system_mut()
                .add_compatible(ty.clone(), InferTy::Known(expected.clone()), root);
        }
    }

    let Analysis {
        mut system,
        nodes,
        diagnostics,
    } = analyzer.finish();
    if !diagnostics.is_empty() {
        return Err(InferFailure { diagnostics });
    }

    let fail = |e: UnifyError| {
        let span = arena.span(e.node().unwrap_or(root));
        InferFailure {
            diagnostics: vec![e.to_diagnostic(span)],
        }
    };

    // Nothing to solve when no literal introduced a variable.
    if system.var_count() > 0 {
        system.unify().map_err(fail)?;
    }

    let mut types = TypeMap::new();
    for (id, ty) in nodes {
        let concrete = system.apply(&ty, id).map_err(fail)?;
        types.insert(id, concrete);
    }
    tracing::debug!(nodes = types.len(), vars = system.var_count(), "types inferred");
    Ok(types)
}

#[cfg(test)]
mod tests;
