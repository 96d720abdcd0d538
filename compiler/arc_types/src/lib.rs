//! Types, symbols and type inference for Arc expressions.
//!
//! - [`Type`]: the type model and its promotion and conversion rules
//! - [`SymbolTable`]: lexical scopes with per-kind symbol IDs
//! - [`literal`]: exact parsing of numeric and string literals
//! - [`infer_types`]: two-phase inference producing a [`TypeMap`]

pub mod literal;

mod infer;
mod symbol;
mod types;
mod value;

pub use infer::{
    compatible_concrete, infer_types, ConstraintSystem, InferFailure, InferTy, TypeMap, TypeVar,
    UnifyError, VarConstraint,
};
pub use symbol::{ScopeError, ScopeId, ScopeKind, Symbol, SymbolDef, SymbolKind, SymbolTable};
pub use types::{FunctionType, Kind, Param, Type, DEFAULT_OUTPUT};
pub use value::ConstValue;
