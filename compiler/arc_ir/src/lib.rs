//! Arc IR - expression trees for the Arc compiler.
//!
//! This crate holds the data the parser produces and every later phase
//! reads:
//! - [`Span`] source locations
//! - [`ExprId`] indices and the [`ExprArena`] that owns the nodes
//! - [`ExprKind`] node kinds, operators and cast target types
//! - [`ExprBuilder`] for constructing trees without a parser
//! - [`ensure_sufficient_stack`] for recursive passes over the tree
//!
//! # Design
//!
//! The tree is flat: children are `ExprId`s, not boxes. Inference keys its
//! results by the same IDs, so a node's resolved type can be looked up
//! without any pointer identity.

mod arena;
pub mod ast;
mod builder;
mod expr_id;
mod span;
mod stack;

pub use arena::ExprArena;
pub use ast::{
    BinaryOp, ChainLevel, ChainOps, Expr, ExprKind, Literal, NumericLiteral, Operands,
    ParsedType, UnaryOp,
};
pub use builder::ExprBuilder;
pub use expr_id::ExprId;
pub use span::{Span, SpanError};
pub use stack::ensure_sufficient_stack;
