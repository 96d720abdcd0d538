//! Error codes for all compiler diagnostics.
//!
//! The first digit names the phase that reports the error, so a code can be
//! looked up without knowing which crate produced it.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Malformed expression trees
/// - E2xxx: Symbol and type errors
/// - E3xxx: Literal errors
/// - E4xxx: Host binding and emission errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Structure (E1xxx)
    /// Operator chain with no operands
    E1001,
    /// Operator chain whose operators and operands do not line up
    E1002,

    // Symbols and types (E2xxx)
    /// Type mismatch
    E2001,
    /// Duplicate symbol in one scope
    E2002,
    /// Unknown identifier
    E2003,
    /// Operator not supported for the operand type
    E2004,
    /// Type could not be inferred
    E2005,
    /// Wrong number of call arguments
    E2006,
    /// Invalid cast
    E2007,
    /// Operands with incompatible units
    E2008,
    /// Symbol cannot be used in this position
    E2009,
    /// Implicit conversion would lose precision
    E2010,

    // Literals (E3xxx)
    /// Value out of range for its type
    E3001,
    /// Non-integer value for an integer type
    E3002,
    /// Malformed literal text
    E3003,
    /// Unknown or misapplied unit suffix
    E3004,

    // Bindings and emission (E4xxx)
    /// No host function for this operation and type
    E4001,
    /// Deferred call site left unresolved
    E4002,

    // Internal (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line summary, used by `--explain`-style lookups.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "expression has no operands",
            ErrorCode::E1002 => "malformed operator chain",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "duplicate symbol",
            ErrorCode::E2003 => "unknown identifier",
            ErrorCode::E2004 => "unsupported operand type",
            ErrorCode::E2005 => "cannot infer type",
            ErrorCode::E2006 => "wrong number of arguments",
            ErrorCode::E2007 => "invalid cast",
            ErrorCode::E2008 => "incompatible units",
            ErrorCode::E2009 => "symbol not usable here",
            ErrorCode::E2010 => "lossy implicit conversion",
            ErrorCode::E3001 => "literal out of range",
            ErrorCode::E3002 => "non-integer literal",
            ErrorCode::E3003 => "malformed literal",
            ErrorCode::E3004 => "invalid unit",
            ErrorCode::E4001 => "no host binding",
            ErrorCode::E4002 => "unresolved call site",
            ErrorCode::E9001 => "internal compiler error",
        }
    }

    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_literal_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
