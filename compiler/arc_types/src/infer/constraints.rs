//! Type variables and the constraint solver.
//!
//! Variables are union-find nodes. A root carries the literal constraint of
//! everything merged into it and, once known, a bound concrete type.
//! Equality constraints are applied as soon as they are added; compatibility
//! constraints are queued and solved to a fixed point by
//! [`ConstraintSystem::unify`], widening non-fixed bounds with
//! [`Type::promote`].

use std::fmt;

use arc_diagnostic::{Diagnostic, ErrorCode};
use arc_ir::{ExprId, Span};

use crate::Type;

/// Upper bound on solver rounds. Bounds only move up the promotion lattice,
/// so a well-formed system settles in a handful.
const MAX_ROUNDS: usize = 64;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeVar(u32);

impl TypeVar {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// What kind of literal a variable stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum VarConstraint {
    #[default]
    None,
    Numeric,
    Integer,
    Float,
    /// A time literal with a fractional SI value, such as `300ms`. Meets
    /// temporal types as whole nanoseconds and anything else as a float.
    Duration,
}

impl VarConstraint {
    /// Constraint of two merged variables. A float anywhere wins.
    pub fn merge(self, other: VarConstraint) -> VarConstraint {
        use VarConstraint::{Duration, Float, Integer, None, Numeric};
        match (self, other) {
            (None, c) | (c, None) => c,
            (Float, _) | (_, Float) | (Duration, Numeric) | (Numeric, Duration) => Float,
            (Duration, _) | (_, Duration) => Duration,
            (Integer, _) | (_, Integer) => Integer,
            (Numeric, Numeric) => Numeric,
        }
    }

    /// Whether a variable with this constraint may become `ty`.
    ///
    /// Under equality a float literal must stay a float; under
    /// compatibility it meets any numeric type by promotion.
    pub fn accepts(self, ty: &Type, equality: bool) -> bool {
        match self {
            VarConstraint::None => true,
            VarConstraint::Numeric => ty.is_numeric(),
            VarConstraint::Integer => ty.is_arithmetic(),
            VarConstraint::Float if equality => ty.is_float(),
            VarConstraint::Float => ty.is_numeric(),
            VarConstraint::Duration if equality => ty.is_float() || ty.is_temporal(),
            VarConstraint::Duration => ty.is_arithmetic(),
        }
    }

    /// Type an unbound variable settles on.
    pub fn default_type(self) -> Option<Type> {
        match self {
            VarConstraint::None => None,
            VarConstraint::Integer => Some(Type::I64),
            VarConstraint::Float | VarConstraint::Numeric | VarConstraint::Duration => {
                Some(Type::F64)
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            VarConstraint::None => "unknown type",
            VarConstraint::Numeric => "numeric value",
            VarConstraint::Integer => "integer literal",
            VarConstraint::Float => "float literal",
            VarConstraint::Duration => "time literal",
        }
    }
}

/// Type of a node during inference.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum InferTy {
    Var(TypeVar),
    Known(Type),
    /// A series whose element may still be a variable.
    Series(Box<InferTy>),
}

impl InferTy {
    pub fn series(elem: InferTy) -> Self {
        InferTy::Series(Box::new(elem))
    }

    pub fn has_var(&self) -> bool {
        match self {
            InferTy::Var(_) => true,
            InferTy::Known(_) => false,
            InferTy::Series(elem) => elem.has_var(),
        }
    }

    pub fn as_known(&self) -> Option<&Type> {
        match self {
            InferTy::Known(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this is a series, known or not.
    pub fn is_series(&self) -> bool {
        matches!(self, InferTy::Series(_) | InferTy::Known(Type::Series(_)))
    }

    /// Element type of a series, or `None` for scalars.
    pub fn series_elem(&self) -> Option<InferTy> {
        match self {
            InferTy::Series(elem) => Some((**elem).clone()),
            InferTy::Known(Type::Series(elem)) => Some(InferTy::Known((**elem).clone())),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
enum VarState {
    Link(TypeVar),
    Root {
        constraint: VarConstraint,
        bound: Option<Type>,
        /// Set by equality; a fixed bound is never widened.
        fixed: bool,
    },
}

#[derive(Clone, Debug)]
struct Compatible {
    left: InferTy,
    right: InferTy,
    node: ExprId,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnifyError {
    #[error("{left} is not compatible with {right}")]
    Mismatch {
        left: String,
        right: String,
        node: ExprId,
        /// Numeric type an explicit conversion would reach.
        convert_to: Option<Type>,
    },

    #[error("unresolved type variable")]
    Unresolved { node: ExprId },

    #[error("type constraints did not settle after {rounds} rounds")]
    NoFixpoint { rounds: usize },
}

impl UnifyError {
    pub fn node(&self) -> Option<ExprId> {
        match self {
            UnifyError::Mismatch { node, .. } | UnifyError::Unresolved { node } => Some(*node),
            UnifyError::NoFixpoint { .. } => None,
        }
    }

    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        match self {
            UnifyError::Mismatch { convert_to, .. } => {
                let diag = Diagnostic::error(ErrorCode::E2001)
                    .with_message(self.to_string())
                    .with_label(span, "type mismatch here");
                match convert_to {
                    Some(ty) => diag.with_suggestion(format!("use {ty}(value) to convert")),
                    None => diag,
                }
            }
            UnifyError::Unresolved { .. } => Diagnostic::error(ErrorCode::E2005)
                .with_message(self.to_string())
                .with_label(span, "cannot infer the type of this expression")
                .with_suggestion("add an explicit cast"),
            UnifyError::NoFixpoint { .. } => Diagnostic::error(ErrorCode::E9001)
                .with_message(self.to_string())
                .with_label(span, "while inferring this expression"),
        }
    }
}

/// Two concrete types that may meet in an operator or a call argument.
pub fn compatible_concrete(a: &Type, b: &Type) -> bool {
    a == b || (a.is_numeric() && b.is_numeric()) || (a.is_temporal() && b.is_temporal())
}

/// Element type of a series, or the type itself.
pub(crate) fn scalar_of(ty: &Type) -> &Type {
    match ty {
        Type::Series(elem) => elem,
        other => other,
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConstraintSystem {
    vars: Vec<VarState>,
    compatible: Vec<Compatible>,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self, constraint: VarConstraint) -> TypeVar {
        let var = TypeVar(self.vars.len() as u32);
        self.vars.push(VarState::Root {
            constraint,
            bound: None,
            fixed: false,
        });
        var
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Constraint of the variable's root.
    pub fn constraint(&mut self, var: TypeVar) -> VarConstraint {
        let root = self.find(var);
        match &self.vars[root.index()] {
            VarState::Root { constraint, .. } => *constraint,
            VarState::Link(_) => VarConstraint::None,
        }
    }

    /// Current bound of the variable's root, if any.
    pub fn bound(&mut self, var: TypeVar) -> Option<Type> {
        let root = self.find(var);
        match &self.vars[root.index()] {
            VarState::Root { bound, .. } => bound.clone(),
            VarState::Link(_) => None,
        }
    }

    /// Queue a compatibility constraint for [`unify`](Self::unify).
    pub fn add_compatible(&mut self, left: InferTy, right: InferTy, node: ExprId) {
        self.compatible.push(Compatible { left, right, node });
    }

    /// Require `left` and `right` to be the same type, right away.
    pub fn add_equality(
        &mut self,
        left: &InferTy,
        right: &InferTy,
        node: ExprId,
    ) -> Result<(), UnifyError> {
        match (left, right) {
            (InferTy::Var(a), InferTy::Var(b)) => self.union(*a, *b, node).map(|_| ()),
            (InferTy::Var(v), InferTy::Known(t)) | (InferTy::Known(t), InferTy::Var(v)) => {
                self.bind_equal(*v, t, node)
            }
            (InferTy::Series(a), InferTy::Series(b)) => self.add_equality(a, b, node),
            (InferTy::Series(a), InferTy::Known(Type::Series(t)))
            | (InferTy::Known(Type::Series(t)), InferTy::Series(a)) => {
                self.add_equality(a, &InferTy::Known((**t).clone()), node)
            }
            (InferTy::Known(a), InferTy::Known(b)) if a == b => Ok(()),
            _ => Err(self.mismatch(left, right, node)),
        }
    }

    /// Solve every queued compatibility constraint, then default what is
    /// left unbound.
    #[tracing::instrument(level = "debug", skip_all, fields(vars = self.vars.len()))]
    pub fn unify(&mut self) -> Result<(), UnifyError> {
        self.settle()?;

        let mut defaulted = 0usize;
        for state in &mut self.vars {
            if let VarState::Root {
                constraint,
                bound: bound @ None,
                ..
            } = state
            {
                *bound = constraint.default_type();
                defaulted += usize::from(bound.is_some());
            }
        }
        if defaulted > 0 {
            self.settle()?;
        }

        tracing::debug!(
            constraints = self.compatible.len(),
            defaulted,
            "unification settled"
        );
        Ok(())
    }

    /// Rewrite an inference type into a concrete one.
    pub fn apply(&mut self, ty: &InferTy, node: ExprId) -> Result<Type, UnifyError> {
        match ty {
            InferTy::Known(t) => Ok(t.clone()),
            InferTy::Series(elem) => Ok(Type::series(self.apply(elem, node)?)),
            InferTy::Var(v) => self.bound(*v).ok_or(UnifyError::Unresolved { node }),
        }
    }

    fn settle(&mut self) -> Result<(), UnifyError> {
        let pending = std::mem::take(&mut self.compatible);
        let result = self.settle_rounds(&pending);
        self.compatible = pending;
        result
    }

    fn settle_rounds(&mut self, pending: &[Compatible]) -> Result<(), UnifyError> {
        for _ in 0..MAX_ROUNDS {
            let mut changed = false;
            for c in pending {
                changed |= self.solve(&c.left, &c.right, c.node)?;
            }
            if !changed {
                return Ok(());
            }
        }
        Err(UnifyError::NoFixpoint { rounds: MAX_ROUNDS })
    }

    /// Apply one compatibility constraint. Returns whether anything changed.
    fn solve(&mut self, left: &InferTy, right: &InferTy, node: ExprId) -> Result<bool, UnifyError> {
        match (left, right) {
            (InferTy::Var(a), InferTy::Var(b)) => self.union(*a, *b, node),
            (InferTy::Var(v), InferTy::Known(t)) | (InferTy::Known(t), InferTy::Var(v)) => {
                self.bind_compatible(*v, scalar_of(t), node)
            }
            (InferTy::Series(a), InferTy::Series(b)) => self.solve(a, b, node),
            // Series against a scalar compares element-wise.
            (InferTy::Series(elem), InferTy::Known(t)) => {
                self.solve(elem, &InferTy::Known(scalar_of(t).clone()), node)
            }
            (InferTy::Known(t), InferTy::Series(elem)) => {
                self.solve(&InferTy::Known(scalar_of(t).clone()), elem, node)
            }
            (InferTy::Known(a), InferTy::Known(b)) => {
                if compatible_concrete(scalar_of(a), scalar_of(b)) {
                    Ok(false)
                } else {
                    Err(self.mismatch(left, right, node))
                }
            }
            (InferTy::Var(_), InferTy::Series(_)) | (InferTy::Series(_), InferTy::Var(_)) => {
                Err(self.mismatch(left, right, node))
            }
        }
    }

    fn bind_equal(&mut self, var: TypeVar, ty: &Type, node: ExprId) -> Result<(), UnifyError> {
        let root = self.find(var);
        let VarState::Root {
            constraint,
            bound,
            fixed,
        } = &mut self.vars[root.index()]
        else {
            return Ok(());
        };
        let ok = constraint.accepts(ty, true) && bound.as_ref().map_or(true, |b| b == ty);
        if ok {
            *bound = Some(ty.clone());
            *fixed = true;
            Ok(())
        } else {
            Err(self.mismatch(&InferTy::Var(var), &InferTy::Known(ty.clone()), node))
        }
    }

    fn bind_compatible(&mut self, var: TypeVar, ty: &Type, node: ExprId) -> Result<bool, UnifyError> {
        let root = self.find(var);
        let VarState::Root {
            constraint,
            bound,
            fixed,
        } = &mut self.vars[root.index()]
        else {
            return Ok(false);
        };

        let next = match bound.as_ref() {
            None if constraint.accepts(ty, false) => Some(settle_bound(*constraint, ty.clone())),
            None => None,
            Some(b) if b == ty => return Ok(false),
            Some(b) if *fixed => {
                if compatible_concrete(b, ty) {
                    return Ok(false);
                }
                None
            }
            Some(b) => match Type::promote(b, ty) {
                Some(p) => Some(p),
                None if compatible_concrete(b, ty) => return Ok(false),
                None => None,
            },
        };

        match next {
            Some(next) if bound.as_ref() == Some(&next) => Ok(false),
            Some(next) => {
                *bound = Some(next);
                Ok(true)
            }
            None => Err(self.mismatch(&InferTy::Var(var), &InferTy::Known(ty.clone()), node)),
        }
    }

    /// Merge two variables. Returns whether the roots were distinct.
    fn union(&mut self, a: TypeVar, b: TypeVar, node: ExprId) -> Result<bool, UnifyError> {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return Ok(false);
        }
        let (VarState::Root {
            constraint: ca,
            bound: ba,
            fixed: fa,
        }, VarState::Root {
            constraint: cb,
            bound: bb,
            fixed: fb,
        }) = (self.vars[ra.index()].clone(), self.vars[rb.index()].clone())
        else {
            return Ok(false);
        };

        let constraint = ca.merge(cb);
        let fixed = fa || fb;
        let bound = match (ba, bb) {
            (None, None) => None,
            (Some(t), None) | (None, Some(t)) => Some(t),
            (Some(x), Some(y)) if x == y => Some(x),
            (Some(x), Some(y)) if !fixed => Type::promote(&x, &y),
            (Some(_), Some(_)) => None,
        };
        let bound = match bound {
            Some(t) if constraint.accepts(&t, fixed) => Some(settle_bound(constraint, t)),
            Some(_) => return Err(self.mismatch(&InferTy::Var(a), &InferTy::Var(b), node)),
            None if self.has_bound(ra) && self.has_bound(rb) => {
                return Err(self.mismatch(&InferTy::Var(a), &InferTy::Var(b), node));
            }
            None => None,
        };

        self.vars[rb.index()] = VarState::Link(ra);
        self.vars[ra.index()] = VarState::Root {
            constraint,
            bound,
            fixed,
        };
        Ok(true)
    }

    fn has_bound(&self, root: TypeVar) -> bool {
        matches!(&self.vars[root.index()], VarState::Root { bound: Some(_), .. })
    }

    /// Root of `var`, compressing the path behind it.
    fn find(&mut self, var: TypeVar) -> TypeVar {
        let mut root = var;
        while let VarState::Link(next) = self.vars[root.index()] {
            root = next;
        }
        let mut current = var;
        while let VarState::Link(next) = self.vars[current.index()] {
            self.vars[current.index()] = VarState::Link(root);
            current = next;
        }
        root
    }

    /// How a type reads in a diagnostic; variables show their bound or literal kind.
    pub fn describe(&mut self, ty: &InferTy) -> String {
        match ty {
            InferTy::Known(t) => t.to_string(),
            InferTy::Series(elem) => format!("series {}", self.describe(elem)),
            InferTy::Var(v) => {
                let root = self.find(*v);
                match &self.vars[root.index()] {
                    VarState::Root { bound: Some(t), .. } => t.to_string(),
                    VarState::Root { constraint, .. } => constraint.describe().to_owned(),
                    VarState::Link(_) => VarConstraint::None.describe().to_owned(),
                }
            }
        }
    }

    fn mismatch(&mut self, left: &InferTy, right: &InferTy, node: ExprId) -> UnifyError {
        let convert_to = match right {
            InferTy::Known(t) if t.is_numeric() => Some(t.clone()),
            _ => None,
        };
        UnifyError::Mismatch {
            left: self.describe(left),
            right: self.describe(right),
            node,
            convert_to,
        }
    }
}

/// A float literal that meets an integer type settles on `f64`.
fn settle_bound(constraint: VarConstraint, ty: Type) -> Type {
    let fractional = matches!(constraint, VarConstraint::Float | VarConstraint::Duration);
    if fractional && ty.is_integer() {
        Type::F64
    } else {
        ty
    }
}

#[cfg(test)]
mod tests;
