//! Operator chains and power.
//!
//! A binary chain folds left: the first operand is compiled, then each
//! further operand is compiled with the running type as its hint and
//! combined. Combining picks the first strategy that applies:
//!
//! 1. series with series or scalar: element-wise host call
//! 2. scalar with series: reverse host call, the result is a series
//! 3. strings: `string_concat` for `+`, `string_equal` for `==` / `!=`
//! 4. scalars: one typed instruction, after widening the right operand
//!
//! Logical chains short-circuit through `if` blocks instead.

use arc_ir::{BinaryOp, ChainLevel, ExprId};
use arc_types::Type;
use arc_wasm::{BlockType, Opcode, ValueType};

use super::cast::emit_conversion;
use super::{coerce, compile};
use crate::bindings::{ArithOp, CompareOp, HostOp};
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

pub(super) fn compile_chain(
    mut ctx: Context<'_, '_>,
    level: ChainLevel,
    operands: &[ExprId],
    ops: &[BinaryOp],
) -> Result<Type, CompileError> {
    let what = level.name();
    let Some(&first) = operands.first() else {
        return CompileErrorKind::Empty { what }.err();
    };
    if ops.len() + 1 != operands.len() || ops.iter().any(|op| op.level() != level) {
        return CompileErrorKind::Malformed { what }.err();
    }
    if ops.is_empty() {
        return compile(ctx.child(first));
    }

    match level {
        ChainLevel::Or | ChainLevel::And => compile_logical(ctx, operands, ops),
        ChainLevel::Equality | ChainLevel::Relational => {
            // The caller's hint describes the boolean result, not the operands.
            compile_binary(ctx.with_hint(None), level, operands, ops)
        }
        ChainLevel::Additive | ChainLevel::Multiplicative => {
            let hint = ctx.inferred().cloned().or_else(|| ctx.hint.clone());
            compile_binary(ctx.with_hint(hint), level, operands, ops)
        }
    }
}

fn compile_binary(
    mut ctx: Context<'_, '_>,
    level: ChainLevel,
    operands: &[ExprId],
    ops: &[BinaryOp],
) -> Result<Type, CompileError> {
    let mut left = compile(ctx.child(operands[0]))?;
    for (&op, &rhs) in ops.iter().zip(&operands[1..]) {
        let hint = match &left {
            Type::Series(elem) => (**elem).clone(),
            scalar => scalar.clone(),
        };
        let right = compile(ctx.child(rhs).with_hint(Some(hint)))?;
        left = emit_binary(&mut ctx, level, op, left, right)?;
    }
    Ok(left)
}

/// Which side of a series operation the scalar (if any) sits on.
#[derive(Copy, Clone)]
enum SeriesForm {
    Series,
    Scalar,
    Reverse,
}

fn series_op(op: BinaryOp, form: SeriesForm) -> Option<HostOp> {
    if let Some(arith) = ArithOp::from_binary(op) {
        return Some(match form {
            SeriesForm::Series => HostOp::SeriesSeries(arith),
            SeriesForm::Scalar => HostOp::SeriesScalar(arith),
            SeriesForm::Reverse => HostOp::SeriesScalarReverse(arith),
        });
    }
    let compare = CompareOp::from_binary(op)?;
    Some(match form {
        SeriesForm::Series => HostOp::SeriesCompare(compare),
        SeriesForm::Scalar => HostOp::SeriesCompareScalar(compare),
        SeriesForm::Reverse => HostOp::SeriesCompareReverse(compare),
    })
}

fn emit_series(
    ctx: &mut Context<'_, '_>,
    op: BinaryOp,
    form: SeriesForm,
    series: Type,
) -> Result<Type, CompileError> {
    let Some(elem) = series.elem() else {
        return CompileErrorKind::Internal(format!("{series} is not a series")).err();
    };
    let Some(host) = series_op(op, form) else {
        return CompileErrorKind::UnsupportedOperator {
            op: op.as_symbol(),
            ty: series,
        }
        .err();
    };
    ctx.call_host(host, elem)?;
    Ok(if op.is_comparison() {
        Type::series(Type::U8)
    } else {
        series
    })
}

fn emit_binary(
    ctx: &mut Context<'_, '_>,
    level: ChainLevel,
    op: BinaryOp,
    left: Type,
    right: Type,
) -> Result<Type, CompileError> {
    let mismatch = |left: Type, right: Type| {
        CompileErrorKind::TypeMismatch {
            left,
            right,
            context: level.name(),
        }
        .err()
    };

    match (&left, &right) {
        (Type::Series(l), Type::Series(r)) => {
            if l != r {
                return mismatch(left, right);
            }
            emit_series(ctx, op, SeriesForm::Series, left)
        }
        (Type::Series(elem), scalar) => {
            if !scalar.is_arithmetic() {
                return mismatch(left, right);
            }
            coerce(ctx, scalar, elem)?;
            emit_series(ctx, op, SeriesForm::Scalar, left)
        }
        (scalar, Type::Series(elem)) => {
            // The scalar is already below the series on the stack, so it
            // has to match the element type as it is.
            if scalar != &**elem {
                return mismatch(left, right);
            }
            emit_series(ctx, op, SeriesForm::Reverse, right)
        }
        (Type::String, Type::String) => emit_string(ctx, op),
        (Type::String, _) | (_, Type::String) => mismatch(left, right),
        _ => {
            if !left.is_arithmetic() || !right.is_arithmetic() {
                return mismatch(left, right);
            }
            coerce(ctx, &right, &left)?;
            let Some(opcode) = scalar_opcode(op, &left) else {
                return CompileErrorKind::UnsupportedOperator {
                    op: op.as_symbol(),
                    ty: left,
                }
                .err();
            };
            ctx.writer().write_opcode(opcode);
            Ok(if op.is_comparison() { Type::U8 } else { left })
        }
    }
}

fn emit_string(ctx: &mut Context<'_, '_>, op: BinaryOp) -> Result<Type, CompileError> {
    match op {
        BinaryOp::Add => {
            ctx.call_generic(HostOp::StringConcat)?;
            Ok(Type::String)
        }
        BinaryOp::Eq => {
            ctx.call_generic(HostOp::StringEqual)?;
            Ok(Type::U8)
        }
        BinaryOp::NotEq => {
            ctx.call_generic(HostOp::StringEqual)?;
            ctx.writer().write_opcode(Opcode::I32Eqz);
            Ok(Type::U8)
        }
        _ => CompileErrorKind::UnsupportedOperator {
            op: op.as_symbol(),
            ty: Type::String,
        }
        .err(),
    }
}

#[inline]
fn pick(signed: bool, s: Opcode, u: Opcode) -> Opcode {
    if signed {
        s
    } else {
        u
    }
}

/// Instruction for a scalar operator, by machine type and signedness.
///
/// `None` for `%` on floats and for the logical operators.
fn scalar_opcode(op: BinaryOp, ty: &Type) -> Option<Opcode> {
    use BinaryOp::{Add, And, Div, Eq, Gt, GtEq, Lt, LtEq, Mod, Mul, NotEq, Or, Sub};
    use Opcode as O;

    let signed = ty.uses_signed_ops();
    Some(match ty.value_type()? {
        ValueType::I32 => match op {
            Add => O::I32Add,
            Sub => O::I32Sub,
            Mul => O::I32Mul,
            Div => pick(signed, O::I32DivS, O::I32DivU),
            Mod => pick(signed, O::I32RemS, O::I32RemU),
            Eq => O::I32Eq,
            NotEq => O::I32Ne,
            Lt => pick(signed, O::I32LtS, O::I32LtU),
            LtEq => pick(signed, O::I32LeS, O::I32LeU),
            Gt => pick(signed, O::I32GtS, O::I32GtU),
            GtEq => pick(signed, O::I32GeS, O::I32GeU),
            Or | And => return None,
        },
        ValueType::I64 => match op {
            Add => O::I64Add,
            Sub => O::I64Sub,
            Mul => O::I64Mul,
            Div => pick(signed, O::I64DivS, O::I64DivU),
            Mod => pick(signed, O::I64RemS, O::I64RemU),
            Eq => O::I64Eq,
            NotEq => O::I64Ne,
            Lt => pick(signed, O::I64LtS, O::I64LtU),
            LtEq => pick(signed, O::I64LeS, O::I64LeU),
            Gt => pick(signed, O::I64GtS, O::I64GtU),
            GtEq => pick(signed, O::I64GeS, O::I64GeU),
            Or | And => return None,
        },
        ValueType::F32 => match op {
            Add => O::F32Add,
            Sub => O::F32Sub,
            Mul => O::F32Mul,
            Div => O::F32Div,
            Eq => O::F32Eq,
            NotEq => O::F32Ne,
            Lt => O::F32Lt,
            LtEq => O::F32Le,
            Gt => O::F32Gt,
            GtEq => O::F32Ge,
            Mod | Or | And => return None,
        },
        ValueType::F64 => match op {
            Add => O::F64Add,
            Sub => O::F64Sub,
            Mul => O::F64Mul,
            Div => O::F64Div,
            Eq => O::F64Eq,
            NotEq => O::F64Ne,
            Lt => O::F64Lt,
            LtEq => O::F64Le,
            Gt => O::F64Gt,
            GtEq => O::F64Ge,
            Mod | Or | And => return None,
        },
    })
}

fn compile_logical(
    mut ctx: Context<'_, '_>,
    operands: &[ExprId],
    ops: &[BinaryOp],
) -> Result<Type, CompileError> {
    let bool_hint = Some(Type::U8);
    let first = compile(ctx.child(operands[0]).with_hint(bool_hint.clone()))?;
    expect_bool(&ctx, ops[0], operands[0], first)?;
    normalize(&mut ctx);

    for (&op, &next) in ops.iter().zip(&operands[1..]) {
        let w = ctx.writer();
        let short_circuit = if op == BinaryOp::And {
            w.write_opcode(Opcode::I32Eqz);
            0
        } else {
            1
        };
        w.write_if(BlockType::Value(ValueType::I32));
        w.write_i32_const(short_circuit);
        w.write_else();

        let ty = compile(ctx.child(next).with_hint(bool_hint.clone()))?;
        expect_bool(&ctx, op, next, ty)?;
        normalize(&mut ctx);
        ctx.writer().write_end();
    }
    Ok(Type::U8)
}

/// Collapse any non-zero value to 1.
fn normalize(ctx: &mut Context<'_, '_>) {
    let w = ctx.writer();
    w.write_i32_const(0);
    w.write_opcode(Opcode::I32Ne);
}

fn expect_bool(
    ctx: &Context<'_, '_>,
    op: BinaryOp,
    operand: ExprId,
    found: Type,
) -> Result<(), CompileError> {
    if found.is_bool() {
        return Ok(());
    }
    Err(CompileError::new(
        CompileErrorKind::NotBoolean {
            op: op.as_symbol(),
            found,
        },
        ctx.span_of(operand),
    ))
}

/// `base ^ exponent`, right-associative. The result has the base type.
///
/// Two integers call the integer power import for the base type, with the
/// exponent converted to it. Anything else goes through the `f32` or `f64`
/// import, `f64` when either side is 64-bit, converting on the way in and
/// back to the base type on the way out.
pub(super) fn compile_power(
    mut ctx: Context<'_, '_>,
    base: ExprId,
    exponent: ExprId,
) -> Result<Type, CompileError> {
    let hint = ctx.inferred().cloned().or_else(|| ctx.hint.clone());
    let base_ty = compile(ctx.child(base).with_hint(hint))?;
    if !base_ty.is_numeric() {
        return CompileErrorKind::UnsupportedOperator {
            op: "^",
            ty: base_ty,
        }
        .err();
    }

    // The base sits below the exponent, so its conversion is picked from
    // the inferred exponent type before the exponent is compiled.
    let predicted = ctx
        .shared
        .types
        .get(exponent)
        .filter(|t| t.is_numeric())
        .cloned();
    let operand = match &predicted {
        Some(exp) => pow_operand(&base_ty, exp),
        None => base_ty.clone(),
    };
    emit_conversion(ctx.writer(), &base_ty, &operand);

    let exp_hint = predicted.unwrap_or_else(|| base_ty.clone());
    let exp_ty = compile(ctx.child(exponent).with_hint(Some(exp_hint)))?;
    if !exp_ty.is_numeric() || pow_operand(&base_ty, &exp_ty) != operand {
        return CompileErrorKind::TypeMismatch {
            left: base_ty,
            right: exp_ty,
            context: "power",
        }
        .err();
    }
    emit_conversion(ctx.writer(), &exp_ty, &operand);
    ctx.call_host(HostOp::Pow, &operand)?;
    emit_conversion(ctx.writer(), &operand, &base_ty);
    Ok(base_ty)
}

/// Type both operands are converted to before calling the power import.
fn pow_operand(base: &Type, exponent: &Type) -> Type {
    if base.is_integer() && exponent.is_integer() {
        base.clone()
    } else if base.is_64bit() || exponent.is_64bit() {
        Type::F64
    } else {
        Type::F32
    }
}
