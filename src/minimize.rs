//! Stage F: Logic Minimizer. Reduces each equation to DNF/SOP using a
//! symbolic-algebra engine (`boolean_expression`'s BDD-backed simplifier),
//! then flattens the reduced form into a strict sum-of-products shape.
//!
//! On any failure, or when an expression exceeds its node-count budget, the
//! original expression is kept unminimized and a diagnostic is recorded
//! rather than aborting the compile.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::expr::Expr;
use boolean_expression::Expr as BExpr;
use slog::Logger;
use std::collections::BTreeMap;

/// Above this many AST nodes, minimization is skipped for that key and the
/// original expression is kept, as a gas budget against pathological inputs.
pub const MAX_NODE_BUDGET: usize = 4096;

/// Minimizes every equation in `eqns`, keyed by name for diagnostics.
pub fn minimize_all<K, I>(eqns: I, diags: &mut Diagnostics, logger: &Logger) -> BTreeMap<String, Expr>
where
	K: std::fmt::Display,
	I: IntoIterator<Item = (K, Expr)>,
{
	eqns.into_iter()
		.map(|(key, expr)| {
			let key = key.to_string();
			let minimized = minimize(&expr, &key, diags, logger);
			(key, minimized)
		})
		.collect()
}

/// Minimizes a single expression, with the key used only for diagnostics.
pub fn minimize(expr: &Expr, key: &str, diags: &mut Diagnostics, logger: &Logger) -> Expr {
	if matches!(expr, Expr::True | Expr::False) {
		return expr.clone();
	}
	if expr.node_count() > MAX_NODE_BUDGET {
		diags.push_logged(Diagnostic::MinimizationFailed { key: key.to_string() }, logger);
		return expr.clone();
	}

	let lowered = to_boolean_expression(expr);
	let reduced = from_boolean_expression(&lowered.simplify_via_bdd());
	to_dnf(&reduced)
}

fn to_boolean_expression(expr: &Expr) -> BExpr<String> {
	match expr {
		Expr::True => BExpr::Const(true),
		Expr::False => BExpr::Const(false),
		Expr::Var(name) => BExpr::Terminal(name.clone()),
		Expr::Not(inner) => BExpr::not(to_boolean_expression(inner)),
		Expr::And(terms) => terms
			.iter()
			.map(to_boolean_expression)
			.reduce(BExpr::and)
			.unwrap_or(BExpr::Const(true)),
		Expr::Or(terms) => terms
			.iter()
			.map(to_boolean_expression)
			.reduce(BExpr::or)
			.unwrap_or(BExpr::Const(false)),
	}
}

fn from_boolean_expression(expr: &BExpr<String>) -> Expr {
	match expr {
		BExpr::Const(true) => Expr::True,
		BExpr::Const(false) => Expr::False,
		BExpr::Terminal(name) => Expr::var(name.clone()),
		BExpr::Not(inner) => from_boolean_expression(inner).not(),
		BExpr::And(lhs, rhs) => from_boolean_expression(lhs).and(from_boolean_expression(rhs)),
		BExpr::Or(lhs, rhs) => from_boolean_expression(lhs).or(from_boolean_expression(rhs)),
	}
}

/// Distributes a reduced expression into a strict sum-of-products shape:
/// an `Or` of `And`s of literals (`Var` or `Not(Var)`), or a bare literal /
/// `True`/`False`. The BDD-backed simplifier above already did the hard
/// work of minimizing term count; this pass only guarantees the syntactic
/// DNF shape downstream consumers (the VHDL emitter, the invariant tests)
/// rely on.
fn to_dnf(expr: &Expr) -> Expr {
	match expr {
		Expr::True | Expr::False | Expr::Var(_) => expr.clone(),
		Expr::Not(inner) => match inner.as_ref() {
			Expr::Var(_) => expr.clone(),
			Expr::True => Expr::False,
			Expr::False => Expr::True,
			Expr::Not(doubly_inner) => to_dnf(doubly_inner),
			Expr::And(terms) => {
				let negated = terms.iter().map(|t| to_dnf(&t.clone().not())).collect::<Vec<_>>();
				to_dnf(&negated.into_iter().fold(Expr::False, Expr::or))
			}
			Expr::Or(terms) => {
				let negated: Vec<Expr> = terms.iter().map(|t| to_dnf(&t.clone().not())).collect();
				distribute(&negated)
			}
		},
		Expr::Or(terms) => terms.iter().map(to_dnf).fold(Expr::False, Expr::or),
		Expr::And(terms) => {
			let products: Vec<Expr> = terms.iter().map(to_dnf).collect();
			distribute(&products)
		}
	}
}

/// Distributes a conjunction of (already-DNF) sub-expressions into a
/// single flat `Or` of `And`s, the standard product-of-sums ->
/// sum-of-products expansion.
fn distribute(products: &[Expr]) -> Expr {
	let mut acc = vec![Vec::new()];
	for product in products {
		let disjuncts = match product {
			Expr::Or(terms) => terms.clone(),
			other => vec![other.clone()],
		};
		let mut next = Vec::with_capacity(acc.len() * disjuncts.len());
		for partial in &acc {
			for disjunct in &disjuncts {
				let mut combined = partial.clone();
				match disjunct {
					Expr::And(terms) => combined.extend(terms.clone()),
					Expr::True => {}
					other => combined.push(other.clone()),
				}
				next.push(combined);
			}
		}
		acc = next;
	}
	acc.into_iter()
		.map(|literals| literals.into_iter().fold(Expr::True, Expr::and))
		.fold(Expr::False, Expr::or)
}
