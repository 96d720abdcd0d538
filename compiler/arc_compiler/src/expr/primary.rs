//! Identifiers.
//!
//! What an identifier compiles to depends on the kind of symbol it names:
//!
//! | kind                    | code                                          |
//! |-------------------------|-----------------------------------------------|
//! | variable, input, config | `local.get id` (+ channel read for `chan T`)  |
//! | stateful variable       | `i32.const id`, zero value, `state_load_T`    |
//! | channel                 | `i32.const id`, `channel_read_T`              |
//! | global constant         | its value                                     |
//! | function, block         | error                                         |

use arc_types::{Symbol, SymbolKind, Type};

use super::{coerce, emit_const};
use crate::bindings::HostOp;
use crate::context::Context;
use crate::error::{CompileError, CompileErrorKind};

pub(super) fn compile_ident(mut ctx: Context<'_, '_>, name: &str) -> Result<Type, CompileError> {
    let symbol = ctx.shared.symbols.resolve(ctx.shared.scope, name)?;
    match symbol.kind {
        SymbolKind::Variable | SymbolKind::Input | SymbolKind::Config => {
            ctx.writer().write_local_get(symbol.id);
            if let Type::Chan(elem) = &symbol.ty {
                ctx.call_host(HostOp::ChannelRead, elem)?;
                return Ok((**elem).clone());
            }
            Ok(symbol.ty.clone())
        }
        SymbolKind::StatefulVariable => load_state(&mut ctx, symbol),
        SymbolKind::Channel => {
            let elem = symbol.ty.unwrap();
            ctx.writer().write_i32_const(symbol.id as i32);
            ctx.call_host(HostOp::ChannelRead, elem)?;
            Ok(elem.clone())
        }
        SymbolKind::GlobalConstant => {
            let Some(value) = &symbol.value else {
                return CompileErrorKind::MissingValue {
                    name: name.to_owned(),
                }
                .err();
            };
            let ty = emit_const(&mut ctx, value)?;
            if ty != symbol.ty {
                coerce(&mut ctx, &ty, &symbol.ty)?;
            }
            Ok(symbol.ty.clone())
        }
        SymbolKind::Function | SymbolKind::Block => CompileErrorKind::UnsupportedSymbol {
            name: name.to_owned(),
            kind: symbol.kind,
        }
        .err(),
    }
}

/// Load a stateful variable, initialising it to the zero value of its type
/// (an empty series for series) on first use.
fn load_state(ctx: &mut Context<'_, '_>, symbol: &Symbol) -> Result<Type, CompileError> {
    ctx.writer().write_i32_const(symbol.id as i32);
    match &symbol.ty {
        Type::Series(elem) => {
            ctx.writer().write_i32_const(0);
            ctx.call_host(HostOp::SeriesCreateEmpty, elem)?;
            ctx.call_host(HostOp::StateLoadSeries, elem)?;
        }
        ty => {
            let Some(zero) = ty.zero_value() else {
                return CompileErrorKind::UnsupportedSymbol {
                    name: symbol.name.to_string(),
                    kind: symbol.kind,
                }
                .err();
            };
            emit_const(ctx, &zero)?;
            ctx.call_host(HostOp::StateLoad, ty)?;
        }
    }
    Ok(symbol.ty.clone())
}
