//! Diagnostic system for the Arc compiler.
//!
//! Every reported problem carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary span saying where
//! - optional notes and suggestions saying how to fix it
//!
//! Inference accumulates diagnostics and reports them together; emission
//! stops at the first error and converts it into a single diagnostic.

mod diagnostic;
mod error_code;

pub use diagnostic::{type_mismatch, unknown_identifier, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
