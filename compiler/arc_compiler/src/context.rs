//! Compilation context.
//!
//! Bundles what every emission function needs: the read-only inputs
//! ([`Shared`]), the output being written ([`Code`]), the node being
//! compiled and the type its parent would like it to produce. Children get
//! a fresh context from [`Context::child`]; the parent's is never modified.

use arc_ir::{ExprArena, ExprId, Span};
use arc_types::{ScopeId, SymbolTable, Type, TypeMap};
use arc_wasm::Writer;

use crate::bindings::{FunctionIndex, HostOp, ImportIndex};
use crate::error::{CompileError, CompileErrorKind};

/// Read-only inputs, shared by every node of one compilation.
pub(crate) struct Shared<'a> {
    pub arena: &'a ExprArena,
    pub symbols: &'a SymbolTable,
    pub scope: ScopeId,
    pub imports: &'a ImportIndex,
    pub functions: &'a FunctionIndex,
    pub types: &'a TypeMap,
}

/// Output of one compilation: the instruction stream and the string data
/// it refers to.
#[derive(Default)]
pub(crate) struct Code {
    pub writer: Writer,
    pub data: Vec<u8>,
}

impl Code {
    /// Append a string to the data segment, returning its offset and length.
    pub fn push_str(&mut self, value: &str) -> Result<(i32, i32), CompileError> {
        let too_large = || CompileErrorKind::Internal("string data segment exceeds 2 GiB".into());
        let offset = i32::try_from(self.data.len()).map_err(|_| too_large())?;
        let len = i32::try_from(value.len()).map_err(|_| too_large())?;
        self.data.extend_from_slice(value.as_bytes());
        Ok((offset, len))
    }
}

pub(crate) struct Context<'c, 'a> {
    pub shared: &'c Shared<'a>,
    pub code: &'c mut Code,
    pub node: ExprId,
    /// Type the parent wants, if any. Only literals are bound by it.
    pub hint: Option<Type>,
}

impl<'c, 'a> Context<'c, 'a> {
    pub fn new(shared: &'c Shared<'a>, code: &'c mut Code, node: ExprId, hint: Option<Type>) -> Self {
        Context {
            shared,
            code,
            node,
            hint,
        }
    }

    /// Context for a child node. The hint carries over until replaced with
    /// [`Context::with_hint`].
    pub fn child(&mut self, node: ExprId) -> Context<'_, 'a> {
        Context {
            shared: self.shared,
            code: &mut *self.code,
            node,
            hint: self.hint.clone(),
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: Option<Type>) -> Self {
        self.hint = hint;
        self
    }

    #[inline]
    pub fn writer(&mut self) -> &mut Writer {
        &mut self.code.writer
    }

    /// Span of another node, usually a child, for errors that belong to it.
    pub fn span_of(&self, node: ExprId) -> Span {
        self.shared.arena.span(node)
    }

    /// Type inference gave this node, if it ran.
    pub fn inferred(&self) -> Option<&'a Type> {
        self.shared.types.get(self.node)
    }

    /// Emit a call to the host import for `op` on values of type `ty`.
    pub fn call_host(&mut self, op: HostOp, ty: &Type) -> Result<(), CompileError> {
        let index = self.shared.imports.get(op, ty)?;
        self.code.writer.write_call(index);
        Ok(())
    }

    /// Emit a call to an untyped host import.
    pub fn call_generic(&mut self, op: HostOp) -> Result<(), CompileError> {
        let index = self.shared.imports.generic_index(op)?;
        self.code.writer.write_call(index);
        Ok(())
    }
}
