//! Phase 1: walk the tree and collect constraints.
//!
//! Every node gets an [`InferTy`]. Literals get fresh variables, everything
//! else is known up front or derived from its operands. Structural problems
//! are recorded as diagnostics and the walk continues, so one pass can
//! report several of them; a node that failed yields `None` and its parents
//! stay quiet about it.

use arc_diagnostic::{type_mismatch, unknown_identifier, Diagnostic, ErrorCode};
use arc_ir::{
    ensure_sufficient_stack, BinaryOp, ChainLevel, ExprArena, ExprId, ExprKind, Literal,
    NumericLiteral, ParsedType, Span, UnaryOp,
};
use rustc_hash::FxHashMap;

use super::constraints::{compatible_concrete, scalar_of, ConstraintSystem, InferTy, VarConstraint};
use crate::literal::{self, units::Dimension, LiteralError};
use crate::{ScopeId, SymbolKind, SymbolTable, Type};

pub(crate) struct Analyzer<'a> {
    arena: &'a ExprArena,
    symbols: &'a SymbolTable,
    scope: ScopeId,
    system: ConstraintSystem,
    /// Node types in visit order.
    nodes: Vec<(ExprId, InferTy)>,
    /// Physical dimension of unit-carrying values.
    dims: FxHashMap<ExprId, Dimension>,
    diagnostics: Vec<Diagnostic>,
}

pub(crate) struct Analysis {
    pub system: ConstraintSystem,
    pub nodes: Vec<(ExprId, InferTy)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Analyzer<'a> {
    pub(crate) fn new(arena: &'a ExprArena, symbols: &'a SymbolTable, scope: ScopeId) -> Self {
        Analyzer {
            arena,
            symbols,
            scope,
            system: ConstraintSystem::new(),
            nodes: Vec::with_capacity(arena.len()),
            dims: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn system_mut(&mut self) -> &mut ConstraintSystem {
        &mut self.system
    }

    pub(crate) fn finish(self) -> Analysis {
        Analysis {
            system: self.system,
            nodes: self.nodes,
            diagnostics: self.diagnostics,
        }
    }

    pub(crate) fn visit(&mut self, id: ExprId) -> Option<InferTy> {
        ensure_sufficient_stack(|| {
            let ty = self.visit_kind(id)?;
            self.nodes.push((id, ty.clone()));
            Some(ty)
        })
    }

    fn visit_kind(&mut self, id: ExprId) -> Option<InferTy> {
        let arena = self.arena;
        let Some(expr) = arena.try_get(id) else {
            self.report(
                Diagnostic::error(ErrorCode::E9001)
                    .with_message(format!("expression {id:?} is not in the arena")),
            );
            return None;
        };
        let span = expr.span;

        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(id, span, lit),
            ExprKind::SeriesLiteral(elems) => self.series_literal(elems),
            ExprKind::Ident(name) => self.ident(span, name),
            ExprKind::Paren(inner) => {
                let ty = self.visit(*inner)?;
                self.inherit_dim(id, *inner);
                Some(ty)
            }
            ExprKind::Cast {
                target,
                expr: inner,
            } => self.cast(span, target, *inner),
            ExprKind::Unary { op, operand } => self.unary(id, span, *op, *operand),
            ExprKind::Chain {
                level,
                operands,
                ops,
            } => self.chain(id, span, *level, operands, ops),
            ExprKind::Power { base, exponent } => self.power(span, *base, *exponent),
            ExprKind::Index { target, index } => {
                let elem = self.series_target(*target, span, "indexing");
                let index_ok = self.series_bound(*index);
                elem.zip(index_ok)?.0.series_elem()
            }
            ExprKind::Slice { target, start, end } => {
                let series = self.visit(*target);
                let start_ok = start.map_or(Some(()), |s| self.series_bound(s));
                let end_ok = end.map_or(Some(()), |e| self.series_bound(e));
                let series = series?;
                if !series.is_series() {
                    self.not_series(span, "slicing");
                    return None;
                }
                start_ok.and(end_ok).map(|()| series)
            }
            ExprKind::Call { callee, args } => self.call(span, callee, args),
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        tracing::trace!(code = %diag.code, message = %diag.message, "inference diagnostic");
        self.diagnostics.push(diag);
    }

    fn span(&self, id: ExprId) -> Span {
        self.arena.span(id)
    }

    fn inherit_dim(&mut self, id: ExprId, from: ExprId) {
        if let Some(dim) = self.dims.get(&from).copied() {
            self.dims.insert(id, dim);
        }
    }

    fn literal(&mut self, id: ExprId, span: Span, lit: &Literal) -> Option<InferTy> {
        match lit {
            Literal::Bool(_) => Some(InferTy::Known(Type::U8)),
            Literal::Str(_) => Some(InferTy::Known(Type::String)),
            Literal::Int(n) => self.numeric_literal(id, span, n, false),
            Literal::Float(n) => self.numeric_literal(id, span, n, true),
        }
    }

    fn numeric_literal(
        &mut self,
        id: ExprId,
        span: Span,
        lit: &NumericLiteral,
        is_float: bool,
    ) -> Option<InferTy> {
        let dim = match literal::dimension(lit) {
            Ok(dim) => dim,
            Err(e) => {
                self.report(e.to_diagnostic(span));
                return None;
            }
        };
        if let Some(dim) = dim {
            self.dims.insert(id, dim);
        }

        // Range and exactness are checked at emission, against the type the
        // literal ends up with; here only the literal kind matters.
        let constraint = match literal::parse_numeric(lit, is_float, None) {
            Ok(value) if value.ty().is_integer() => VarConstraint::Integer,
            Ok(_) => VarConstraint::Float,
            Err(LiteralError::OutOfRange { .. } | LiteralError::NonInteger { .. }) => {
                if is_float {
                    VarConstraint::Float
                } else {
                    VarConstraint::Integer
                }
            }
            Err(e) => {
                self.report(e.to_diagnostic(span));
                return None;
            }
        };
        // Sub-second time literals are fractional in seconds but whole in
        // nanoseconds.
        let constraint = match (constraint, dim) {
            (VarConstraint::Float, Some(Dimension::Time)) => VarConstraint::Duration,
            (c, _) => c,
        };
        Some(InferTy::Var(self.system.fresh(constraint)))
    }

    fn series_literal(&mut self, elems: &[ExprId]) -> Option<InferTy> {
        let elem = InferTy::Var(self.system.fresh(VarConstraint::None));
        let mut ok = true;
        for &e in elems {
            match self.visit(e) {
                Some(ty) => self.system.add_compatible(ty, elem.clone(), e),
                None => ok = false,
            }
        }
        ok.then(|| InferTy::series(elem))
    }

    fn ident(&mut self, span: Span, name: &str) -> Option<InferTy> {
        let symbols = self.symbols;
        let Ok(symbol) = symbols.resolve(self.scope, name) else {
            self.report(unknown_identifier(span, name));
            return None;
        };
        match symbol.kind {
            SymbolKind::Function | SymbolKind::Block => {
                self.report(
                    Diagnostic::error(ErrorCode::E2009)
                        .with_message(format!("cannot use {} {name} as a value", symbol.kind))
                        .with_label(span, "used as a value here"),
                );
                None
            }
            _ => Some(InferTy::Known(symbol.ty.unwrap().clone())),
        }
    }

    fn cast(&mut self, span: Span, target: &ParsedType, expr: ExprId) -> Option<InferTy> {
        let to = Type::from_parsed(target);
        let inner = self.visit(expr)?;
        let ok = match &inner {
            InferTy::Known(from) => from.can_cast(&to),
            InferTy::Var(_) => to.is_arithmetic(),
            InferTy::Series(_) => to.is_series(),
        };
        if !ok {
            let from = self.system.describe(&inner);
            self.report(
                Diagnostic::error(ErrorCode::E2007)
                    .with_message(format!("cannot cast {from} to {to}"))
                    .with_label(span, "invalid conversion"),
            );
            return None;
        }
        if inner.has_var() {
            self.system
                .add_compatible(inner, InferTy::Known(to.clone()), expr);
        }
        Some(InferTy::Known(to))
    }

    fn unary(&mut self, id: ExprId, span: Span, op: UnaryOp, operand: ExprId) -> Option<InferTy> {
        let ty = self.visit(operand)?;
        match op {
            UnaryOp::Neg => {
                self.inherit_dim(id, operand);
                let ok = match &ty {
                    InferTy::Var(_) | InferTy::Series(_) => true,
                    InferTy::Known(Type::Series(elem)) => elem.is_signed_integer() || elem.is_float(),
                    InferTy::Known(t) => t.is_arithmetic(),
                };
                if ok {
                    Some(ty)
                } else {
                    self.bad_operand(span, op.as_symbol(), &ty);
                    None
                }
            }
            UnaryOp::Not => match &ty {
                InferTy::Var(v)
                    if !matches!(
                        self.system.constraint(*v),
                        VarConstraint::Float | VarConstraint::Duration
                    ) =>
                {
                    Some(InferTy::Known(Type::U8))
                }
                InferTy::Known(t) if t.is_integer() => Some(InferTy::Known(Type::U8)),
                InferTy::Known(Type::Series(elem)) if elem.is_bool() => Some(ty.clone()),
                InferTy::Series(elem) => {
                    let bool_ty = InferTy::Known(Type::U8);
                    match self.system.add_equality(elem, &bool_ty, operand) {
                        Ok(()) => Some(InferTy::series(bool_ty)),
                        Err(e) => {
                            self.report(e.to_diagnostic(self.span(operand)));
                            None
                        }
                    }
                }
                _ => {
                    self.bad_operand(span, op.as_symbol(), &ty);
                    None
                }
            },
        }
    }

    fn bad_operand(&mut self, span: Span, op: &str, ty: &InferTy) {
        let found = self.system.describe(ty);
        self.report(
            Diagnostic::error(ErrorCode::E2004)
                .with_message(format!("operator {op} cannot be applied to {found}"))
                .with_label(span, format!("found {found}")),
        );
    }

    fn chain(
        &mut self,
        id: ExprId,
        span: Span,
        level: ChainLevel,
        operands: &[ExprId],
        ops: &[BinaryOp],
    ) -> Option<InferTy> {
        if operands.is_empty() {
            self.report(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message(format!("cannot compile an empty {} expression", level.name()))
                    .with_label(span, "no operands"),
            );
            return None;
        }
        if ops.len() + 1 != operands.len() || ops.iter().any(|op| op.level() != level) {
            self.report(
                Diagnostic::error(ErrorCode::E1002)
                    .with_message(format!(
                        "malformed {} expression: {} operand(s) and {} operator(s)",
                        level.name(),
                        operands.len(),
                        ops.len()
                    ))
                    .with_label(span, "in this expression"),
            );
            return None;
        }

        let mut types = Vec::with_capacity(operands.len());
        for &operand in operands {
            types.push(self.visit(operand));
        }
        let types: Vec<InferTy> = types.into_iter().collect::<Option<_>>()?;

        match level {
            ChainLevel::Or | ChainLevel::And => self.logical(level, operands, &types),
            _ => self.binary_chain(id, span, level, operands, ops, types),
        }
    }

    fn logical(&mut self, level: ChainLevel, operands: &[ExprId], types: &[InferTy]) -> Option<InferTy> {
        let op = if level == ChainLevel::Or { "or" } else { "and" };
        let bool_ty = InferTy::Known(Type::U8);
        let mut ok = true;
        for (&operand, ty) in operands.iter().zip(types) {
            let fits = match ty {
                InferTy::Var(_) => match self.system.add_equality(ty, &bool_ty, operand) {
                    Ok(()) => true,
                    Err(e) => {
                        self.report(e.to_diagnostic(self.span(operand)));
                        ok = false;
                        continue;
                    }
                },
                InferTy::Known(t) => t.is_bool(),
                InferTy::Series(_) => false,
            };
            if !fits {
                let found = self.system.describe(ty);
                let span = self.span(operand);
                self.report(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!("operator {op} requires boolean operands, found {found}"))
                        .with_label(span, "not a boolean"),
                );
                ok = false;
            }
        }
        ok.then_some(bool_ty)
    }

    fn binary_chain(
        &mut self,
        id: ExprId,
        span: Span,
        level: ChainLevel,
        operands: &[ExprId],
        ops: &[BinaryOp],
        types: Vec<InferTy>,
    ) -> Option<InferTy> {
        let mut types = types.into_iter();
        let mut acc = types.next()?;
        let mut acc_dim = self.dims.get(&operands[0]).copied();
        let mut ok = true;

        for ((&op, &rhs_id), rhs) in ops.iter().zip(&operands[1..]).zip(types) {
            let rhs_dim = self.dims.get(&rhs_id).copied();
            if level != ChainLevel::Multiplicative {
                if let (Some(a), Some(b)) = (acc_dim, rhs_dim) {
                    if a != b {
                        self.report(
                            Diagnostic::error(ErrorCode::E2008)
                                .with_message(format!(
                                    "cannot apply {} to {a} and {b} quantities",
                                    op.as_symbol()
                                ))
                                .with_label(self.span(rhs_id), format!("this is a {b} value")),
                        );
                        ok = false;
                    }
                }
            }
            acc_dim = match level {
                ChainLevel::Additive => acc_dim.or(rhs_dim),
                _ => None,
            };

            if acc.has_var() || rhs.has_var() {
                self.system.add_compatible(acc.clone(), rhs.clone(), rhs_id);
            } else if let (Some(a), Some(b)) = (acc.as_known(), rhs.as_known()) {
                if !operands_fit(op, a, b) {
                    let (a, b) = (a.to_string(), b.to_string());
                    self.report(type_mismatch(span, &a, &b, level.name()));
                    return None;
                }
            }

            let series = acc.is_series() || rhs.is_series();
            acc = if op.is_comparison() {
                let result = InferTy::Known(Type::U8);
                if series {
                    InferTy::series(result)
                } else {
                    result
                }
            } else if !acc.is_series() && rhs.is_series() {
                rhs
            } else {
                acc
            };
        }

        if let Some(dim) = acc_dim {
            self.dims.insert(id, dim);
        }
        ok.then_some(acc)
    }

    fn power(&mut self, span: Span, base: ExprId, exponent: ExprId) -> Option<InferTy> {
        let b = self.visit(base);
        let e = self.visit(exponent);
        let (b, e) = b.zip(e)?;

        if b.is_series() || e.is_series() {
            let (bs, es) = (self.system.describe(&b), self.system.describe(&e));
            self.report(type_mismatch(span, &bs, &es, "power"));
            return None;
        }
        if b.has_var() || e.has_var() {
            self.system.add_compatible(b.clone(), e, exponent);
        } else if let (Some(bt), Some(et)) = (b.as_known(), e.as_known()) {
            if !(bt.is_numeric() && et.is_numeric()) {
                let (bs, es) = (bt.to_string(), et.to_string());
                self.report(type_mismatch(span, &bs, &es, "power"));
                return None;
            }
        }
        Some(b)
    }

    fn series_target(&mut self, target: ExprId, span: Span, what: &str) -> Option<InferTy> {
        let ty = self.visit(target)?;
        if ty.is_series() {
            Some(ty)
        } else {
            self.not_series(span, what);
            None
        }
    }

    fn not_series(&mut self, span: Span, what: &str) {
        self.report(
            Diagnostic::error(ErrorCode::E2004)
                .with_message(format!("{what} is only supported on series types"))
                .with_label(span, "not a series"),
        );
    }

    /// Index and slice bounds are `i32`.
    fn series_bound(&mut self, bound: ExprId) -> Option<()> {
        let ty = self.visit(bound)?;
        match &ty {
            InferTy::Var(_) => match self.system.add_equality(&ty, &InferTy::Known(Type::I32), bound) {
                Ok(()) => Some(()),
                Err(e) => {
                    self.report(e.to_diagnostic(self.span(bound)));
                    None
                }
            },
            InferTy::Known(t) if t.widens_to(&Type::I32) => Some(()),
            _ => {
                let found = self.system.describe(&ty);
                self.report(type_mismatch(self.span(bound), "i32", &found, "index"));
                None
            }
        }
    }

    fn call(&mut self, span: Span, callee: &str, args: &[ExprId]) -> Option<InferTy> {
        let mut arg_types = Vec::with_capacity(args.len());
        for &arg in args {
            arg_types.push(self.visit(arg));
        }

        match callee {
            "len" => {
                self.check_arity(span, callee, 1, 1, args.len())?;
                let ty = arg_types.into_iter().next().flatten()?;
                match &ty {
                    t if t.is_series() => Some(InferTy::Known(Type::I64)),
                    InferTy::Known(Type::String) => Some(InferTy::Known(Type::I32)),
                    _ => {
                        self.bad_operand(span, "len", &ty);
                        None
                    }
                }
            }
            "now" => {
                self.check_arity(span, callee, 0, 0, args.len())?;
                Some(InferTy::Known(Type::TimeStamp))
            }
            _ => self.user_call(span, callee, args, arg_types),
        }
    }

    fn user_call(
        &mut self,
        span: Span,
        callee: &str,
        args: &[ExprId],
        arg_types: Vec<Option<InferTy>>,
    ) -> Option<InferTy> {
        let symbols = self.symbols;
        let Ok(symbol) = symbols.resolve(self.scope, callee) else {
            self.report(unknown_identifier(span, callee));
            return None;
        };
        let (SymbolKind::Function, Type::Function(sig)) = (symbol.kind, &symbol.ty) else {
            self.report(
                Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!("{callee} is a {}, not a function", symbol.kind))
                    .with_label(span, "called here"),
            );
            return None;
        };

        self.check_arity(span, callee, sig.required_inputs(), sig.inputs.len(), args.len())?;

        let mut ok = true;
        for ((&arg, ty), param) in args.iter().zip(arg_types).zip(&sig.inputs) {
            let Some(ty) = ty else {
                ok = false;
                continue;
            };
            let expected = InferTy::Known(param.ty.clone());
            if ty.has_var() {
                self.system.add_compatible(ty, expected, arg);
            } else if let Some(t) = ty.as_known() {
                let fits = compatible_concrete(scalar_of(t), scalar_of(&param.ty))
                    && t.is_series() == param.ty.is_series();
                if !fits {
                    self.report(
                        Diagnostic::error(ErrorCode::E2001)
                            .with_message(format!(
                                "argument {} of {callee} expects {}, found {t}",
                                param.name, param.ty
                            ))
                            .with_label(self.span(arg), format!("expected {}", param.ty)),
                    );
                    ok = false;
                }
            }
        }

        let result = sig.default_output().cloned().unwrap_or(Type::Unresolved);
        ok.then_some(InferTy::Known(result))
    }

    fn check_arity(
        &mut self,
        span: Span,
        callee: &str,
        min: usize,
        max: usize,
        got: usize,
    ) -> Option<()> {
        if (min..=max).contains(&got) {
            return Some(());
        }
        let expects = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        self.report(
            Diagnostic::error(ErrorCode::E2006)
                .with_message(format!("function {callee} expects {expects} argument(s), got {got}"))
                .with_label(span, "wrong number of arguments"),
        );
        None
    }
}

/// Whether two known operand types fit a binary operator.
fn operands_fit(op: BinaryOp, a: &Type, b: &Type) -> bool {
    let (ea, eb) = (scalar_of(a), scalar_of(b));
    let arithmetic = ea.is_arithmetic() && eb.is_arithmetic() && compatible_concrete(ea, eb);
    let strings = a.is_string() && b.is_string();
    match op {
        BinaryOp::Add => arithmetic || strings,
        BinaryOp::Eq | BinaryOp::NotEq => arithmetic || strings,
        _ => arithmetic,
    }
}
