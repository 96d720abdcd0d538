//! Contiguous storage for expression nodes.

use crate::{Expr, ExprId, Span};

/// Owns every node of one expression tree.
///
/// Nodes are appended and never removed, so an `ExprId` stays valid for
/// the arena's lifetime.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ExprArena {
            exprs: Vec::with_capacity(capacity),
        }
    }

    /// Append a node and return its ID.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        // A tree with 4 billion nodes never reaches the compiler.
        let index = self.exprs.len() as u32;
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn try_get(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.try_get(id).map_or(Span::DUMMY, |e| e.span)
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// All IDs in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = ExprId> + '_ {
        (0..self.exprs.len()).map(|i| ExprId::new(i as u32))
    }
}

#[cfg(test)]
mod tests;
