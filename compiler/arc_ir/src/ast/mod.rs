//! Expression nodes.
//!
//! The tree mirrors the precedence cascade of the grammar: each operator
//! level is a chain node holding its operands in source order, so the
//! compiler can fold them left-associatively without re-deriving
//! precedence. Power is the only right-associative operator and nests
//! instead of chaining.

mod operators;
mod parsed_type;

pub use operators::{BinaryOp, ChainLevel, UnaryOp};
pub use parsed_type::ParsedType;

use smallvec::SmallVec;

use crate::{ExprId, Span};

/// Operands of a chain node; most chains are a single binary operation.
pub type Operands = SmallVec<[ExprId; 4]>;

/// Operators between consecutive chain operands.
pub type ChainOps = SmallVec<[BinaryOp; 3]>;

/// Expression node.
#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Scalar literal.
    Literal(Literal),

    /// Series literal: `[1, 2, 3]`
    SeriesLiteral(Vec<ExprId>),

    /// Variable, channel, constant or stateful variable reference.
    Ident(Box<str>),

    /// `(expr)`
    Paren(ExprId),

    /// Type conversion: `f32(x)`
    Cast { target: ParsedType, expr: ExprId },

    /// `-x`, `not x`
    Unary { op: UnaryOp, operand: ExprId },

    /// Left-associative chain at one precedence level.
    ///
    /// Well-formed chains satisfy `ops.len() + 1 == operands.len()` and
    /// every op belongs to `level`.
    Chain {
        level: ChainLevel,
        operands: Operands,
        ops: ChainOps,
    },

    /// `base ^ exponent`; `a ^ b ^ c` nests as `a ^ (b ^ c)`.
    Power { base: ExprId, exponent: ExprId },

    /// `target[index]`
    Index { target: ExprId, index: ExprId },

    /// `target[start:end]`; either bound may be omitted.
    Slice {
        target: ExprId,
        start: Option<ExprId>,
        end: Option<ExprId>,
    },

    /// Function call by name.
    Call { callee: Box<str>, args: Vec<ExprId> },
}

impl ExprKind {
    /// Short name of the node kind, for logging.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::SeriesLiteral(_) => "series literal",
            Self::Ident(_) => "identifier",
            Self::Paren(_) => "paren",
            Self::Cast { .. } => "cast",
            Self::Unary { .. } => "unary",
            Self::Chain { level, .. } => level.name(),
            Self::Power { .. } => "power",
            Self::Index { .. } => "index",
            Self::Slice { .. } => "slice",
            Self::Call { .. } => "call",
        }
    }
}

/// Scalar literal.
///
/// Numeric literals keep their source text so that the literal parser can
/// check exact representability against whatever type the literal ends up
/// with.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    /// `42`, `300ms`
    Int(NumericLiteral),
    /// `1.5`, `2.5e3`, `0.5s`
    Float(NumericLiteral),
    /// String contents, escapes already processed.
    Str(Box<str>),
    /// `true` / `false`
    Bool(bool),
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct NumericLiteral {
    pub text: Box<str>,
    /// Unit suffix such as `ms` or `hz`.
    pub unit: Option<Box<str>>,
}

impl NumericLiteral {
    pub fn new(text: &str) -> Self {
        NumericLiteral {
            text: text.into(),
            unit: None,
        }
    }

    pub fn with_unit(text: &str, unit: &str) -> Self {
        NumericLiteral {
            text: text.into(),
            unit: Some(unit.into()),
        }
    }
}
