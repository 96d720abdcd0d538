use arc_ir::{ExprId, UnaryOp};
use arc_types::Type;
use arc_wasm::{Opcode, ValueType};

use super::compile;
use crate::bindings::HostOp;
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

pub(super) fn compile_unary(
    mut ctx: Context<'_, '_>,
    op: UnaryOp,
    operand: ExprId,
) -> Result<Type, CompileError> {
    let ty = compile(ctx.child(operand))?;
    match op {
        UnaryOp::Neg => negate(&mut ctx, ty),
        UnaryOp::Not => not(&mut ctx, ty),
    }
}

fn unsupported(op: UnaryOp, ty: Type) -> Result<Type, CompileError> {
    CompileErrorKind::UnsupportedOperator {
        op: op.as_symbol(),
        ty,
    }
    .err()
}

fn negate(ctx: &mut Context<'_, '_>, ty: Type) -> Result<Type, CompileError> {
    match &ty {
        Type::Series(elem) if elem.is_signed_integer() || elem.is_float() => {
            ctx.call_host(HostOp::SeriesNegate, elem)?;
        }
        Type::F32 => ctx.writer().write_opcode(Opcode::F32Neg),
        Type::F64 => ctx.writer().write_opcode(Opcode::F64Neg),
        scalar if scalar.is_arithmetic() => {
            // Integers have no neg instruction; multiply by -1.
            let w = ctx.writer();
            if scalar.value_type() == Some(ValueType::I64) {
                w.write_i64_const(-1);
                w.write_opcode(Opcode::I64Mul);
            } else {
                w.write_i32_const(-1);
                w.write_opcode(Opcode::I32Mul);
            }
        }
        _ => return unsupported(UnaryOp::Neg, ty),
    }
    Ok(ty)
}

fn not(ctx: &mut Context<'_, '_>, ty: Type) -> Result<Type, CompileError> {
    match &ty {
        Type::Series(elem) if elem.is_bool() => {
            ctx.call_host(HostOp::SeriesNot, elem)?;
            Ok(ty)
        }
        scalar if scalar.is_integer() => {
            let eqz = if scalar.is_64bit() {
                Opcode::I64Eqz
            } else {
                Opcode::I32Eqz
            };
            ctx.writer().write_opcode(eqz);
            Ok(Type::U8)
        }
        _ => unsupported(UnaryOp::Not, ty),
    }
}
