//! Arc WASM - instruction stream encoding.
//!
//! Provides the low-level pieces the expression compiler emits through:
//! - [`Opcode`] byte values and mnemonics
//! - [`ValueType`], [`BlockType`] and [`FuncType`]
//! - [`leb128`] immediate encoding
//! - [`Writer`], the append-only stream with patchable deferred calls
//! - [`decode`] / [`disassemble`] for reading a stream back
//!
//! Module sections, imports and the binary container are assembled
//! elsewhere; this crate only knows about function bodies.

mod decode;
pub mod leb128;
mod opcode;
mod types;
mod writer;

pub use decode::{decode, disassemble, DecodeError, Instruction};
pub use opcode::Opcode;
pub use types::{BlockType, FuncType, ValueType};
pub use writer::{DeferredId, PatchSite, Writer, WriterError};
