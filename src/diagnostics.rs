//! The diagnostics channel: structured warnings the pipeline emits without
//! ever aborting. A `Diagnostic` is always collected, never returned as an
//! `Err` -- the pipeline's contract is "never throws".

use slog::Logger;
use std::fmt;

/// One problem the pipeline found and worked around.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
	/// A document entry was missing a required key or had the wrong shape.
	InvalidNodeShape { key: String },
	/// A node's stored `id` didn't match the document key indexing it.
	IdMismatch { key: String, stored_id: String },
	/// A connection pointed at a node id absent from the node table.
	MissingTarget { from: String, target: String },
	/// A walk re-entered an already-visited intermediate node.
	CycleDetected { path: Vec<String>, repeated: String },
	/// A step's predecessor was a Decision but the input_1 connection
	/// didn't resolve to `output_1` or `output_2` unambiguously.
	AmbiguousIndicator { node: String, predecessor: String },
	/// A path referenced a start or end state with no assigned code.
	UnknownStateCode { state_id: i64 },
	/// Minimization of one equation failed or exceeded its budget; the
	/// unminimized expression was kept.
	MinimizationFailed { key: String },
	/// No State nodes were present to seed path enumeration.
	NoStartStates,
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Diagnostic::InvalidNodeShape { key } => {
				write!(f, "node '{key}' has an invalid shape, skipping")
			}
			Diagnostic::IdMismatch { key, stored_id } => write!(
				f,
				"node key '{key}' does not match stored id '{stored_id}', skipping"
			),
			Diagnostic::MissingTarget { from, target } => {
				write!(f, "connection from '{from}' targets missing node '{target}'")
			}
			Diagnostic::CycleDetected { path, repeated } => write!(
				f,
				"cycle detected re-entering '{repeated}' via path {path:?}, branch pruned"
			),
			Diagnostic::AmbiguousIndicator { node, predecessor } => write!(
				f,
				"node '{node}' input_1 connection from '{predecessor}' is ambiguous"
			),
			Diagnostic::UnknownStateCode { state_id } => {
				write!(f, "no state code assigned for state {state_id}")
			}
			Diagnostic::MinimizationFailed { key } => {
				write!(f, "minimization failed for '{key}', keeping unminimized form")
			}
			Diagnostic::NoStartStates => write!(f, "no state nodes found to start paths from"),
		}
	}
}

/// An ordered collector of [`Diagnostic`]s, threaded by `&mut` reference
/// through every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
	pub fn new() -> Self {
		Diagnostics(Vec::new())
	}

	pub fn push(&mut self, diag: Diagnostic) {
		self.0.push(diag);
	}

	/// Pushes a diagnostic and logs it at `warn!` level, so a caller watching
	/// the log stream sees the same problems the returned `Diagnostics`
	/// collects.
	pub fn push_logged(&mut self, diag: Diagnostic, logger: &Logger) {
		warn!(logger, "{}", diag);
		self.push(diag);
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
		self.0.iter()
	}
}

impl<'a> IntoIterator for &'a Diagnostics {
	type Item = &'a Diagnostic;
	type IntoIter = std::slice::Iter<'a, Diagnostic>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collects_in_order() {
		let mut diags = Diagnostics::new();
		diags.push(Diagnostic::NoStartStates);
		diags.push(Diagnostic::UnknownStateCode { state_id: 1 });
		assert_eq!(diags.len(), 2);
		let collected: Vec<_> = diags.iter().collect();
		assert_eq!(collected[0], &Diagnostic::NoStartStates);
	}
}
