//! The symbolic Boolean expression core shared by equation synthesis,
//! minimization, and VHDL rendering.
//!
//! Kept as a small, crate-owned ADT with structural equality for
//! deduplication and use as equation-map keys. [`crate::minimize`] is the
//! one seam that translates this into `boolean_expression`'s own `Expr`
//! and back.

use std::fmt;

/// A symbolic Boolean expression. `Var` carries a plain variable name;
/// state-bit symbols are named `Y0`, `Y1`, ... by convention and recognized
/// as such by [`crate::vhdl`] when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
	True,
	False,
	Var(String),
	Not(Box<Expr>),
	And(Vec<Expr>),
	Or(Vec<Expr>),
}

impl Expr {
	pub fn var(name: impl Into<String>) -> Self {
		Expr::Var(name.into())
	}

	pub fn not(self) -> Self {
		Expr::Not(Box::new(self))
	}

	/// Conjoins `self` and `other`, flattening nested `And`s so that
	/// repeated `.and()` calls along a path build one flat conjunction
	/// rather than a right-leaning chain of binary `And`s.
	pub fn and(self, other: Expr) -> Self {
		match (self, other) {
			(Expr::True, rhs) => rhs,
			(lhs, Expr::True) => lhs,
			(Expr::False, _) | (_, Expr::False) => Expr::False,
			(Expr::And(mut terms), Expr::And(more)) => {
				terms.extend(more);
				Expr::And(terms)
			}
			(Expr::And(mut terms), rhs) => {
				terms.push(rhs);
				Expr::And(terms)
			}
			(lhs, Expr::And(mut terms)) => {
				terms.insert(0, lhs);
				Expr::And(terms)
			}
			(lhs, rhs) => Expr::And(vec![lhs, rhs]),
		}
	}

	/// Disjoins `self` and `other`, flattening nested `Or`s the same way
	/// `and` flattens nested `And`s. `False` is the identity, matching the
	/// spec's "false is the identity when no path contributes".
	pub fn or(self, other: Expr) -> Self {
		match (self, other) {
			(Expr::False, rhs) => rhs,
			(lhs, Expr::False) => lhs,
			(Expr::True, _) | (_, Expr::True) => Expr::True,
			(Expr::Or(mut terms), Expr::Or(more)) => {
				terms.extend(more);
				Expr::Or(terms)
			}
			(Expr::Or(mut terms), rhs) => {
				terms.push(rhs);
				Expr::Or(terms)
			}
			(lhs, Expr::Or(mut terms)) => {
				terms.insert(0, lhs);
				Expr::Or(terms)
			}
			(lhs, rhs) => Expr::Or(vec![lhs, rhs]),
		}
	}

	/// Every distinct variable name appearing in the expression, sorted.
	pub fn variables(&self) -> Vec<String> {
		let mut set = std::collections::BTreeSet::new();
		self.collect_variables(&mut set);
		set.into_iter().collect()
	}

	fn collect_variables(&self, into: &mut std::collections::BTreeSet<String>) {
		match self {
			Expr::True | Expr::False => {}
			Expr::Var(name) => {
				into.insert(name.clone());
			}
			Expr::Not(inner) => inner.collect_variables(into),
			Expr::And(terms) | Expr::Or(terms) => {
				for term in terms {
					term.collect_variables(into);
				}
			}
		}
	}

	/// Approximate structural size, used by the minimizer's gas budget.
	pub fn node_count(&self) -> usize {
		match self {
			Expr::True | Expr::False | Expr::Var(_) => 1,
			Expr::Not(inner) => 1 + inner.node_count(),
			Expr::And(terms) | Expr::Or(terms) => {
				1 + terms.iter().map(Expr::node_count).sum::<usize>()
			}
		}
	}
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Expr::True => write!(f, "true"),
			Expr::False => write!(f, "false"),
			Expr::Var(name) => write!(f, "{name}"),
			Expr::Not(inner) => write!(f, "(not {inner})"),
			Expr::And(terms) => {
				let parts: Vec<String> = terms.iter().map(|t| format!("({t})")).collect();
				write!(f, "{}", parts.join(" and "))
			}
			Expr::Or(terms) => {
				let parts: Vec<String> = terms.iter().map(|t| format!("({t})")).collect();
				write!(f, "{}", parts.join(" or "))
			}
		}
	}
}
