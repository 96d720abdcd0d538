//! Series indexing and slicing.

use arc_ir::ExprId;
use arc_types::Type;

use super::{coerce, compile};
use crate::bindings::HostOp;
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

/// `target[index]`
pub(super) fn compile_index(
    mut ctx: Context<'_, '_>,
    target: ExprId,
    index: ExprId,
) -> Result<Type, CompileError> {
    let hint = ctx.hint.clone().map(Type::series);
    let target_ty = compile(ctx.child(target).with_hint(hint))?;
    let Type::Series(elem) = target_ty else {
        return CompileErrorKind::NotSeries { what: "indexing" }.err();
    };
    compile_position(&mut ctx, index)?;
    ctx.call_host(HostOp::SeriesIndex, &elem)?;
    Ok(*elem)
}

/// `target[start:end]`. A missing start is 0 and a missing end is -1,
/// which the host reads as "through the last element".
pub(super) fn compile_slice(
    mut ctx: Context<'_, '_>,
    target: ExprId,
    start: Option<ExprId>,
    end: Option<ExprId>,
) -> Result<Type, CompileError> {
    let target_ty = compile(ctx.child(target))?;
    if !target_ty.is_series() {
        return CompileErrorKind::NotSeries { what: "slicing" }.err();
    }
    match start {
        Some(start) => compile_position(&mut ctx, start)?,
        None => ctx.writer().write_i32_const(0),
    }
    match end {
        Some(end) => compile_position(&mut ctx, end)?,
        None => ctx.writer().write_i32_const(-1),
    }
    ctx.call_generic(HostOp::SeriesSlice)?;
    Ok(target_ty)
}

/// An index or slice bound, as an `i32`.
fn compile_position(ctx: &mut Context<'_, '_>, position: ExprId) -> Result<(), CompileError> {
    let ty = compile(ctx.child(position).with_hint(Some(Type::I32)))?;
    coerce(ctx, &ty, &Type::I32).map_err(|e| e.or_span(ctx.span_of(position)))
}
