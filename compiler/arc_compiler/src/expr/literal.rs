//! Literals and constants.

use arc_ir::{ExprId, Literal};
use arc_types::literal::{parse_numeric, parse_string};
use arc_types::{ConstValue, Type};

use super::{coerce, compile};
use crate::bindings::HostOp;
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

/// Numeric literals are emitted as the hint type if there is one, else as
/// the type inference gave them, else as their default type.
pub(super) fn compile_literal(mut ctx: Context<'_, '_>, lit: &Literal) -> Result<Type, CompileError> {
    let value = match lit {
        Literal::Int(n) | Literal::Float(n) => {
            let target = ctx
                .hint
                .as_ref()
                .filter(|ty| ty.is_arithmetic())
                .or_else(|| ctx.inferred().filter(|ty| ty.is_arithmetic()));
            parse_numeric(n, matches!(lit, Literal::Float(_)), target)?
        }
        Literal::Str(s) => parse_string(s, ctx.hint.as_ref())?,
        Literal::Bool(b) => ConstValue::U8(u8::from(*b)),
    };
    emit_const(&mut ctx, &value)
}

/// Push a constant. Strings are copied into the data segment and turned
/// into a handle by the host.
pub(crate) fn emit_const(ctx: &mut Context<'_, '_>, value: &ConstValue) -> Result<Type, CompileError> {
    let w = ctx.writer();
    match value {
        ConstValue::I8(v) => w.write_i32_const(i32::from(*v)),
        ConstValue::I16(v) => w.write_i32_const(i32::from(*v)),
        ConstValue::I32(v) => w.write_i32_const(*v),
        ConstValue::U8(v) => w.write_i32_const(i32::from(*v)),
        ConstValue::U16(v) => w.write_i32_const(i32::from(*v)),
        ConstValue::U32(v) => w.write_i32_const(*v as i32),
        ConstValue::I64(v) | ConstValue::TimeStamp(v) | ConstValue::TimeSpan(v) => {
            w.write_i64_const(*v);
        }
        ConstValue::U64(v) => w.write_i64_const(*v as i64),
        ConstValue::F32(v) => w.write_f32_const(*v),
        ConstValue::F64(v) => w.write_f64_const(*v),
        ConstValue::Str(s) => {
            let (offset, len) = ctx.code.push_str(s)?;
            let w = ctx.writer();
            w.write_i32_const(offset);
            w.write_i32_const(len);
            ctx.call_generic(HostOp::StringFromLiteral)?;
        }
    }
    Ok(value.ty())
}

/// `[e0, e1, ...]`: create a series of the right length, then set each
/// element in order.
pub(super) fn compile_series_literal(
    mut ctx: Context<'_, '_>,
    elems: &[ExprId],
) -> Result<Type, CompileError> {
    let Some(elem) = series_elem(&ctx) else {
        return CompileErrorKind::UnknownType {
            what: "series literal",
        }
        .err();
    };
    let len = i32::try_from(elems.len())
        .map_err(|_| CompileErrorKind::Internal("series literal too long".into()))?;

    ctx.writer().write_i32_const(len);
    ctx.call_host(HostOp::SeriesCreateEmpty, &elem)?;
    for (i, &e) in (0..len).zip(elems) {
        ctx.writer().write_i32_const(i);
        let ty = compile(ctx.child(e).with_hint(Some(elem.clone())))?;
        coerce(&mut ctx, &ty, &elem).map_err(|err| err.or_span(ctx.span_of(e)))?;
        ctx.call_host(HostOp::SeriesSetElement, &elem)?;
    }
    Ok(Type::series(elem))
}

/// Element type: a series hint, then inference, then a scalar hint.
fn series_elem(ctx: &Context<'_, '_>) -> Option<Type> {
    if let Some(Type::Series(elem)) = &ctx.hint {
        return Some((**elem).clone());
    }
    if let Some(Type::Series(elem)) = ctx.inferred() {
        return Some((**elem).clone());
    }
    ctx.hint.clone().filter(Type::is_numeric)
}
