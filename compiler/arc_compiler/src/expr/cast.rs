//! Explicit casts and implicit widening.
//!
//! Both go through [`emit_conversion`], which lowers a change of numeric
//! type to at most three instructions: one to change machine type
//! (extend, wrap, convert, trunc, promote, demote) and, for 8 and 16-bit
//! targets, one or two more to bring the value back into range.

use arc_ir::{ExprId, ParsedType};
use arc_types::Type;
use arc_wasm::{Opcode, ValueType, Writer};

use super::compile;
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

/// `T(expr)`. The operand is compiled with `T` as its hint, so a literal
/// operand is emitted as `T` directly.
pub(super) fn compile_cast(
    mut ctx: Context<'_, '_>,
    target: &ParsedType,
    expr: ExprId,
) -> Result<Type, CompileError> {
    let to = Type::from_parsed(target);
    let from = compile(ctx.child(expr).with_hint(Some(to.clone())))?;
    if from == to {
        return Ok(to);
    }
    if !from.can_cast(&to) {
        return CompileErrorKind::InvalidCast { from, to }.err();
    }
    emit_conversion(ctx.writer(), &from, &to);
    Ok(to)
}

/// Convert the value on top of the stack from `from` to `to` if no
/// information is lost, or fail.
pub(crate) fn coerce(ctx: &mut Context<'_, '_>, from: &Type, to: &Type) -> Result<(), CompileError> {
    if from == to || (from.is_temporal() && to.is_temporal()) {
        return Ok(());
    }
    if !from.widens_to(to) {
        return CompileErrorKind::LossyConversion {
            from: from.clone(),
            to: to.clone(),
        }
        .err();
    }
    emit_conversion(ctx.writer(), from, to);
    Ok(())
}

/// Both types must be numeric or temporal. Temporal values are `i64`.
pub(crate) fn emit_conversion(w: &mut Writer, from: &Type, to: &Type) {
    use Opcode as O;
    use ValueType::{F32, F64, I32, I64};

    let (Some(src), Some(dst)) = (from.value_type(), to.value_type()) else {
        return;
    };
    let unsigned_src = from.is_unsigned();
    let unsigned_dst = to.is_unsigned();
    let choose = |unsigned: bool, u: Opcode, s: Opcode| if unsigned { u } else { s };

    let op = match (src, dst) {
        (I32, I32) | (I64, I64) | (F32, F32) | (F64, F64) => None,
        (I32, I64) => Some(choose(unsigned_src, O::I64ExtendI32U, O::I64ExtendI32S)),
        (I64, I32) => Some(O::I32WrapI64),
        (I32, F32) => Some(choose(unsigned_src, O::F32ConvertI32U, O::F32ConvertI32S)),
        (I32, F64) => Some(choose(unsigned_src, O::F64ConvertI32U, O::F64ConvertI32S)),
        (I64, F32) => Some(choose(unsigned_src, O::F32ConvertI64U, O::F32ConvertI64S)),
        (I64, F64) => Some(choose(unsigned_src, O::F64ConvertI64U, O::F64ConvertI64S)),
        (F32, I32) => Some(choose(unsigned_dst, O::I32TruncF32U, O::I32TruncF32S)),
        (F64, I32) => Some(choose(unsigned_dst, O::I32TruncF64U, O::I32TruncF64S)),
        (F32, I64) => Some(choose(unsigned_dst, O::I64TruncF32U, O::I64TruncF32S)),
        (F64, I64) => Some(choose(unsigned_dst, O::I64TruncF64U, O::I64TruncF64S)),
        (F32, F64) => Some(O::F64PromoteF32),
        (F64, F32) => Some(O::F32DemoteF64),
    };
    if let Some(op) = op {
        w.write_opcode(op);
    }
    if dst == I32 {
        narrow(w, from, to);
    }
}

/// Bring an `i32` back into the range of an 8 or 16-bit target. Needed when
/// the source is wider, a float, or of the other signedness.
fn narrow(w: &mut Writer, from: &Type, to: &Type) {
    let (Some(from_bits), Some(to_bits)) = (from.bits(), to.bits()) else {
        return;
    };
    if to_bits >= 32 {
        return;
    }
    let needed =
        from.is_float() || to_bits < from_bits || from.is_unsigned() != to.is_unsigned();
    if !needed {
        return;
    }
    match (to.is_unsigned(), to_bits) {
        (true, 8) => {
            w.write_i32_const(0xFF);
            w.write_opcode(Opcode::I32And);
        }
        (true, _) => {
            w.write_i32_const(0xFFFF);
            w.write_opcode(Opcode::I32And);
        }
        (false, 8) => w.write_opcode(Opcode::I32Extend8S),
        (false, _) => w.write_opcode(Opcode::I32Extend16S),
    }
}
