//! Programmatic construction of expression trees.
//!
//! The parser hands the compiler a finished arena; tools and tests build
//! the same shape with [`ExprBuilder`]. Every node gets a distinct
//! one-byte synthetic span so diagnostics still point at a node.

use crate::{
    BinaryOp, ChainLevel, ChainOps, Expr, ExprArena, ExprId, ExprKind, Literal, NumericLiteral,
    Operands, ParsedType, Span, UnaryOp,
};

#[derive(Default, Debug)]
pub struct ExprBuilder {
    arena: ExprArena,
    cursor: u32,
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with an explicit span.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn push(&mut self, kind: ExprKind) -> ExprId {
        let span = Span::new(self.cursor, self.cursor + 1);
        self.cursor += 1;
        self.alloc(kind, span)
    }

    pub fn int(&mut self, text: &str) -> ExprId {
        self.push(ExprKind::Literal(Literal::Int(NumericLiteral::new(text))))
    }

    pub fn float(&mut self, text: &str) -> ExprId {
        self.push(ExprKind::Literal(Literal::Float(NumericLiteral::new(text))))
    }

    /// Integer literal with a unit suffix, e.g. `int_unit("300", "ms")`.
    pub fn int_unit(&mut self, text: &str, unit: &str) -> ExprId {
        self.push(ExprKind::Literal(Literal::Int(NumericLiteral::with_unit(
            text, unit,
        ))))
    }

    pub fn float_unit(&mut self, text: &str, unit: &str) -> ExprId {
        self.push(ExprKind::Literal(Literal::Float(NumericLiteral::with_unit(
            text, unit,
        ))))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        self.push(ExprKind::Literal(Literal::Str(value.into())))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.push(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.push(ExprKind::Ident(name.into()))
    }

    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        self.push(ExprKind::Paren(inner))
    }

    pub fn series(&mut self, elems: &[ExprId]) -> ExprId {
        self.push(ExprKind::SeriesLiteral(elems.to_vec()))
    }

    pub fn cast(&mut self, target: ParsedType, expr: ExprId) -> ExprId {
        self.push(ExprKind::Cast { target, expr })
    }

    pub fn neg(&mut self, operand: ExprId) -> ExprId {
        self.push(ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        })
    }

    pub fn not(&mut self, operand: ExprId) -> ExprId {
        self.push(ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        })
    }

    /// `lhs op rhs` as a two-operand chain.
    pub fn binary(&mut self, lhs: ExprId, op: BinaryOp, rhs: ExprId) -> ExprId {
        self.chain(lhs, &[(op, rhs)])
    }

    /// `first op1 e1 op2 e2 ...` at the level of the first operator.
    ///
    /// All operators must share one precedence level. With no operators the
    /// first operand is returned unchanged.
    pub fn chain(&mut self, first: ExprId, rest: &[(BinaryOp, ExprId)]) -> ExprId {
        let Some(&(op, _)) = rest.first() else {
            return first;
        };
        let mut operands = Operands::new();
        operands.push(first);
        let mut ops = ChainOps::new();
        for &(op, operand) in rest {
            ops.push(op);
            operands.push(operand);
        }
        self.raw_chain(op.level(), operands, ops)
    }

    /// Chain node with arbitrary contents, including malformed ones.
    pub fn raw_chain(&mut self, level: ChainLevel, operands: Operands, ops: ChainOps) -> ExprId {
        self.push(ExprKind::Chain {
            level,
            operands,
            ops,
        })
    }

    pub fn power(&mut self, base: ExprId, exponent: ExprId) -> ExprId {
        self.push(ExprKind::Power { base, exponent })
    }

    pub fn index(&mut self, target: ExprId, index: ExprId) -> ExprId {
        self.push(ExprKind::Index { target, index })
    }

    pub fn slice(&mut self, target: ExprId, start: Option<ExprId>, end: Option<ExprId>) -> ExprId {
        self.push(ExprKind::Slice { target, start, end })
    }

    pub fn call(&mut self, callee: &str, args: &[ExprId]) -> ExprId {
        self.push(ExprKind::Call {
            callee: callee.into(),
            args: args.to_vec(),
        })
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn finish(self) -> ExprArena {
        self.arena
    }
}

#[cfg(test)]
mod tests;
