//! Compilation errors.
//!
//! Every error aborts the expression being compiled. Errors are built
//! without a location where they arise and pick up the span of the
//! innermost node they pass through on the way out (see
//! [`CompileError::or_span`]).

use arc_diagnostic::{Diagnostic, ErrorCode};
use arc_ir::Span;
use arc_types::literal::LiteralError;
use arc_types::{InferFailure, ScopeError, SymbolKind, Type};
use arc_wasm::WriterError;

use crate::bindings::BindingError;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("cannot compile an empty {what} expression")]
    Empty { what: &'static str },

    #[error("malformed {what} expression")]
    Malformed { what: &'static str },

    /// Inference reported one or more diagnostics.
    #[error(transparent)]
    Infer(InferFailure),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("unsupported symbol kind {kind} for {name}")]
    UnsupportedSymbol { name: String, kind: SymbolKind },

    #[error("{name} is a {kind}, not a function")]
    NotAFunction { name: String, kind: SymbolKind },

    #[error("type mismatch: cannot use {left} and {right} in {context} operation")]
    TypeMismatch {
        left: Type,
        right: Type,
        context: &'static str,
    },

    #[error("operator {op} is not supported for {ty}")]
    UnsupportedOperator { op: &'static str, ty: Type },

    #[error("operator {op} requires boolean operands, found {found}")]
    NotBoolean { op: &'static str, found: Type },

    #[error("{what} is only supported on series types")]
    NotSeries { what: &'static str },

    #[error("cannot implicitly convert {from} to {to}")]
    LossyConversion { from: Type, to: Type },

    #[error("cannot cast {from} to {to}")]
    InvalidCast { from: Type, to: Type },

    #[error("function {name} expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("cannot infer the type of this {what}")]
    UnknownType { what: &'static str },

    #[error("global constant {name} has no value")]
    MissingValue { name: String },

    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error("internal compiler error: {0}")]
    Internal(String),
}

impl CompileErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Empty { .. } => ErrorCode::E1001,
            Self::Malformed { .. } => ErrorCode::E1002,
            Self::Infer(failure) => failure
                .diagnostics
                .first()
                .map_or(ErrorCode::E9001, |d| d.code),
            Self::Scope(ScopeError::Duplicate { .. }) => ErrorCode::E2002,
            Self::Scope(ScopeError::Unresolved { .. }) => ErrorCode::E2003,
            Self::Scope(ScopeError::UnknownScope { .. }) => ErrorCode::E9001,
            Self::UnsupportedSymbol { .. } | Self::NotAFunction { .. } => ErrorCode::E2009,
            Self::TypeMismatch { .. } => ErrorCode::E2001,
            Self::UnsupportedOperator { .. } | Self::NotBoolean { .. } | Self::NotSeries { .. } => {
                ErrorCode::E2004
            }
            Self::LossyConversion { .. } => ErrorCode::E2010,
            Self::InvalidCast { .. } => ErrorCode::E2007,
            Self::Arity { .. } => ErrorCode::E2006,
            Self::UnknownType { .. } => ErrorCode::E2005,
            Self::Literal(err) => err.code(),
            Self::Binding(_) => ErrorCode::E4001,
            Self::Writer(_) => ErrorCode::E4002,
            Self::MissingValue { .. } | Self::Internal(_) => ErrorCode::E9001,
        }
    }

    /// Attach no location yet; the enclosing node fills it in.
    pub(crate) fn err<T>(self) -> Result<T, CompileError> {
        Err(self.into())
    }
}

/// A compilation error and where it happened.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Option<Span>,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        CompileError {
            kind,
            span: Some(span),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Set the span unless an inner node already did.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    /// The primary diagnostic for this error.
    ///
    /// Inference failures carry their own diagnostics; the first one is
    /// returned and the rest are available from [`CompileError::diagnostics`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        if let CompileErrorKind::Infer(failure) = &self.kind {
            if let Some(first) = failure.diagnostics.first() {
                return first.clone();
            }
        }
        if let CompileErrorKind::Literal(err) = &self.kind {
            if let Some(span) = self.span {
                return err.to_diagnostic(span);
            }
        }

        let mut diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        if let Some(span) = self.span {
            diag = diag.with_label(span, self.label());
        }
        match &self.kind {
            CompileErrorKind::LossyConversion { to, .. } => {
                diag.with_suggestion(format!("use {to}(value) to convert explicitly"))
            }
            CompileErrorKind::Internal(_) => {
                diag.with_note("this is a bug in the compiler, not in the program")
            }
            _ => diag,
        }
    }

    /// Every diagnostic this error stands for.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match &self.kind {
            CompileErrorKind::Infer(failure) if !failure.diagnostics.is_empty() => {
                failure.diagnostics.clone()
            }
            _ => vec![self.to_diagnostic()],
        }
    }

    fn label(&self) -> &'static str {
        match &self.kind {
            CompileErrorKind::Empty { .. } | CompileErrorKind::Malformed { .. } => {
                "in this expression"
            }
            CompileErrorKind::Scope(_) => "not found in this scope",
            CompileErrorKind::Binding(_) => "no host function for this operation",
            CompileErrorKind::Arity { .. } => "in this call",
            _ => "here",
        }
    }
}

impl From<CompileErrorKind> for CompileError {
    fn from(kind: CompileErrorKind) -> Self {
        CompileError { kind, span: None }
    }
}

impl From<InferFailure> for CompileError {
    fn from(failure: InferFailure) -> Self {
        let span = failure.diagnostics.first().and_then(Diagnostic::primary_span);
        CompileError {
            kind: CompileErrorKind::Infer(failure),
            span,
        }
    }
}

macro_rules! impl_from_kind {
    ($($source:ty),*) => {
        $(impl From<$source> for CompileError {
            fn from(err: $source) -> Self {
                CompileErrorKind::from(err).into()
            }
        })*
    };
}

impl_from_kind!(ScopeError, LiteralError, BindingError, WriterError);
