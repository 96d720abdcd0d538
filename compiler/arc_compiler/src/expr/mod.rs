//! Expression emission.
//!
//! The tree already encodes precedence (one chain node per operator
//! level), so emission is a single dispatch on node kind. Each function
//! takes the context for its node, writes the node's code and returns the
//! type of the value it left on the stack.
//!
//! Errors are created without a span; [`compile`] stamps the span of the
//! node they came out of, so the innermost node wins.

mod call;
mod cast;
mod literal;
mod operators;
mod postfix;
mod primary;
mod unary;

pub(crate) use cast::coerce;
pub(crate) use literal::emit_const;

use arc_ir::{ensure_sufficient_stack, ExprKind};
use arc_types::Type;

use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

/// Compile the node `ctx` points at.
pub(crate) fn compile(ctx: Context<'_, '_>) -> Result<Type, CompileError> {
    ensure_sufficient_stack(|| {
        let arena = ctx.shared.arena;
        let node = ctx.node;
        let span = arena.span(node);
        let Some(expr) = arena.try_get(node) else {
            return Err(CompileError::new(
                CompileErrorKind::Internal(format!("node {node:?} is not in the arena")),
                span,
            ));
        };
        tracing::trace!(?node, kind = expr.kind.label(), hint = ?ctx.hint, "compile");

        let result = match &expr.kind {
            ExprKind::Chain {
                level,
                operands,
                ops,
            } => operators::compile_chain(ctx, *level, operands, ops),
            ExprKind::Power { base, exponent } => operators::compile_power(ctx, *base, *exponent),
            ExprKind::Unary { op, operand } => unary::compile_unary(ctx, *op, *operand),
            ExprKind::Index { target, index } => postfix::compile_index(ctx, *target, *index),
            ExprKind::Slice { target, start, end } => {
                postfix::compile_slice(ctx, *target, *start, *end)
            }
            ExprKind::Call { callee, args } => call::compile_call(ctx, callee, args),
            ExprKind::Cast { target, expr } => cast::compile_cast(ctx, target, *expr),
            ExprKind::Literal(lit) => literal::compile_literal(ctx, lit),
            ExprKind::SeriesLiteral(elems) => literal::compile_series_literal(ctx, elems),
            ExprKind::Ident(name) => primary::compile_ident(ctx, name),
            ExprKind::Paren(inner) => {
                let mut ctx = ctx;
                compile(ctx.child(*inner))
            }
        };
        result.map_err(|e| e.or_span(span))
    })
}
