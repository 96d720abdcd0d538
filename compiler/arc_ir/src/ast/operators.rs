//! Binary and unary operators, grouped by precedence level.

/// Binary operators that appear inside an operator chain.
///
/// Power (`^`) is not a chain operator; it is a right-associative node of
/// its own ([`ExprKind::Power`](super::ExprKind::Power)).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Equality
    Eq,
    NotEq,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Additive
    Add,
    Sub,

    // Multiplicative
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Source-level symbol, used in error messages.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Precedence level this operator chains at.
    pub const fn level(self) -> ChainLevel {
        match self {
            Self::Or => ChainLevel::Or,
            Self::And => ChainLevel::And,
            Self::Eq | Self::NotEq => ChainLevel::Equality,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => ChainLevel::Relational,
            Self::Add | Self::Sub => ChainLevel::Additive,
            Self::Mul | Self::Div | Self::Mod => ChainLevel::Multiplicative,
        }
    }

    /// True for operators whose result is a boolean (`u8`).
    pub const fn is_comparison(self) -> bool {
        matches!(
            self.level(),
            ChainLevel::Equality | ChainLevel::Relational
        )
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self.level(),
            ChainLevel::Additive | ChainLevel::Multiplicative
        )
    }

    pub const fn is_logical(self) -> bool {
        matches!(self.level(), ChainLevel::Or | ChainLevel::And)
    }
}

/// Precedence levels of left-associative operator chains, loosest first.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ChainLevel {
    Or,
    And,
    Equality,
    Relational,
    Additive,
    Multiplicative,
}

impl ChainLevel {
    /// Name used in "cannot compile an empty ... expression".
    pub const fn name(self) -> &'static str {
        match self {
            Self::Or => "logical or",
            Self::And => "logical and",
            Self::Equality => "equality",
            Self::Relational => "relational",
            Self::Additive => "additive",
            Self::Multiplicative => "multiplicative",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Arithmetic negation: `-x`
    Neg,
    /// Logical negation: `not x`
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }
}
