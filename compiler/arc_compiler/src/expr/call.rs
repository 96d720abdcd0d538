//! Function calls.
//!
//! `len` and `now` are built in and map straight to host imports. Anything
//! else must name a function symbol; its call is written as a deferred
//! call because user functions are numbered after the imports.

use arc_ir::ExprId;
use arc_types::{FunctionType, SymbolKind, Type};

use super::{coerce, compile, emit_const};
use crate::bindings::{BindingError, HostOp};
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

pub(super) fn compile_call(
    mut ctx: Context<'_, '_>,
    callee: &str,
    args: &[ExprId],
) -> Result<Type, CompileError> {
    match callee {
        "len" => return compile_len(ctx, args),
        "now" => return compile_now(ctx, args),
        _ => {}
    }

    let symbol = ctx.shared.symbols.resolve(ctx.shared.scope, callee)?;
    let (SymbolKind::Function, Type::Function(sig)) = (symbol.kind, &symbol.ty) else {
        return CompileErrorKind::NotAFunction {
            name: callee.to_owned(),
            kind: symbol.kind,
        }
        .err();
    };
    check_arity(callee, sig, args.len())?;

    for (i, param) in sig.inputs.iter().enumerate() {
        if let Some(&arg) = args.get(i) {
            let ty = compile(ctx.child(arg).with_hint(Some(param.ty.clone())))?;
            coerce(&mut ctx, &ty, &param.ty)
                .map_err(|e| e.or_span(ctx.span_of(arg)))?;
        } else if let Some(default) = &param.default {
            let ty = emit_const(&mut ctx, default)?;
            coerce(&mut ctx, &ty, &param.ty)?;
        }
    }

    let target = ctx
        .shared
        .functions
        .get(callee)
        .ok_or_else(|| BindingError::UnknownFunction {
            name: callee.to_owned(),
        })?;
    ctx.writer().write_call_deferred(target);
    Ok(sig.default_output().cloned().unwrap_or(Type::Unresolved))
}

fn check_arity(callee: &str, sig: &FunctionType, found: usize) -> Result<(), CompileError> {
    let required = sig.required_inputs();
    let total = sig.inputs.len();
    if (required..=total).contains(&found) {
        return Ok(());
    }
    let expected = if required == total {
        total.to_string()
    } else {
        format!("{required} to {total}")
    };
    CompileErrorKind::Arity {
        name: callee.to_owned(),
        expected,
        found,
    }
    .err()
}

fn arity(name: &str, expected: usize, found: usize) -> CompileError {
    CompileErrorKind::Arity {
        name: name.to_owned(),
        expected: expected.to_string(),
        found,
    }
    .into()
}

/// `len(series)` is an `i64`; `len(str)` is an `i32`.
fn compile_len(mut ctx: Context<'_, '_>, args: &[ExprId]) -> Result<Type, CompileError> {
    let [arg] = args else {
        return Err(arity("len", 1, args.len()));
    };
    let ty = compile(ctx.child(*arg).with_hint(None))?;
    match ty {
        Type::Series(_) => {
            ctx.call_generic(HostOp::SeriesLen)?;
            Ok(Type::I64)
        }
        Type::String => {
            ctx.call_generic(HostOp::StringLen)?;
            Ok(Type::I32)
        }
        other => CompileErrorKind::UnsupportedOperator {
            op: "len",
            ty: other,
        }
        .err(),
    }
}

fn compile_now(mut ctx: Context<'_, '_>, args: &[ExprId]) -> Result<Type, CompileError> {
    if !args.is_empty() {
        return Err(arity("now", 0, args.len()));
    }
    ctx.call_generic(HostOp::Now)?;
    Ok(Type::TimeStamp)
}
