//! Arc expression compiler.
//!
//! Turns one Arc expression tree into a WebAssembly instruction stream
//! that leaves the expression's value on the stack. Compilation runs in
//! two steps:
//!
//! 1. type inference (`arc_types::infer_types`) decides the type of every
//!    literal from the operands around it
//! 2. emission walks the tree once, writing instructions and host calls
//!    through [`arc_wasm::Writer`]
//!
//! Operations the instruction set cannot express are calls into the host
//! interface described by [`ImportIndex`]. Calls to user functions are
//! written as deferred calls and patched once their final index is known.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=arc_compiler=debug`: one event per compiled expression,
//!   plus inference and patching summaries.
//! - `RUST_LOG=arc_compiler=trace`: every node as it is compiled.
//!
//! Call [`init_tracing`] to install a subscriber that honours `RUST_LOG`.

pub mod bindings;
mod config;
mod context;
mod error;
mod expr;

pub use bindings::{
    ArithOp, BindingError, CompareOp, FunctionIndex, HostOp, Import, ImportIndex,
    ResolvedFunctions, IMPORT_MODULE,
};
pub use config::CompileConfig;
pub use error::{CompileError, CompileErrorKind};

use std::sync::Once;

use arc_ir::{ExprArena, ExprId};
use arc_types::{infer_types, ScopeId, SymbolTable, Type, TypeMap};
use arc_wasm::{PatchSite, WriterError};
use rayon::prelude::*;

use context::{Code, Context, Shared};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`. Does nothing when the variable is
/// unset, and nothing after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// One expression to compile: its tree and the scope it is compiled in.
#[derive(Copy, Clone, Debug)]
pub struct Unit<'a> {
    pub arena: &'a ExprArena,
    pub root: ExprId,
    pub symbols: &'a SymbolTable,
    pub scope: ScopeId,
}

impl<'a> Unit<'a> {
    pub fn new(arena: &'a ExprArena, root: ExprId, symbols: &'a SymbolTable, scope: ScopeId) -> Self {
        Unit {
            arena,
            root,
            symbols,
            scope,
        }
    }
}

/// A compiled expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledExpr {
    /// Instruction stream.
    pub code: Vec<u8>,
    /// String bytes referenced by `string_from_literal` calls.
    pub data: Vec<u8>,
    /// Type of the value the code leaves on the stack.
    pub ty: Type,
    /// Deferred calls still waiting for a function index.
    pub pending: Vec<PatchSite>,
}

impl CompiledExpr {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Compile one expression.
#[tracing::instrument(level = "debug", skip_all, fields(root = ?unit.root))]
pub fn compile_expression(
    unit: &Unit<'_>,
    imports: &ImportIndex,
    functions: &FunctionIndex,
    config: &CompileConfig,
) -> Result<CompiledExpr, CompileError> {
    let types = if config.infer {
        infer_types(
            unit.arena,
            unit.root,
            unit.symbols,
            unit.scope,
            config.hint.as_ref(),
        )?
    } else {
        TypeMap::new()
    };

    let shared = Shared {
        arena: unit.arena,
        symbols: unit.symbols,
        scope: unit.scope,
        imports,
        functions,
        types: &types,
    };
    let mut code = Code::default();
    let ty = expr::compile(Context::new(
        &shared,
        &mut code,
        unit.root,
        config.hint.clone(),
    ))?;

    let Code { mut writer, data } = code;
    let root_span = unit.arena.span(unit.root);
    if config.patch_calls {
        let resolved = functions.resolve(imports.len());
        writer
            .patch(|id| resolved.index(id))
            .map_err(|e| CompileError::new(e.into(), root_span))?;
    }
    let (code, pending) = writer.into_parts();
    if config.require_complete && !pending.is_empty() {
        let err = WriterError::Unpatched {
            count: pending.len(),
        };
        return Err(CompileError::new(err.into(), root_span));
    }

    tracing::debug!(
        bytes = code.len(),
        data = data.len(),
        pending = pending.len(),
        %ty,
        "expression compiled"
    );
    Ok(CompiledExpr {
        code,
        data,
        ty,
        pending,
    })
}

/// Compile independent expressions in parallel.
///
/// Results are in the order of `units`.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn compile_batch(
    units: &[Unit<'_>],
    imports: &ImportIndex,
    functions: &FunctionIndex,
    config: &CompileConfig,
) -> Vec<Result<CompiledExpr, CompileError>> {
    units
        .par_iter()
        .map(|unit| compile_expression(unit, imports, functions, config))
        .collect()
}

#[cfg(test)]
mod tests;
