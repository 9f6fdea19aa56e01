//! Stage E: Equation Synthesizer. Builds unsimplified next-state and
//! output equations in symbolic form, one OR-term per contributing path.

use crate::annotate::{AnnotatedStep, Indicator};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::expr::Expr;
use crate::node::NodeType;
use crate::symbols::StateCodes;
use slog::Logger;
use std::collections::BTreeMap;

/// `next_state_eqns[i]` is the raw (unminimized) expression for state bit
/// `i`; `output_eqns[name]` is the raw expression for output `name`.
pub type NextStateEqns = Vec<Expr>;
pub type OutputEqns = BTreeMap<String, Expr>;

/// Builds both equation maps from the annotated paths plus the Moore
/// output table, initializing every key to `Expr::False`.
#[allow(clippy::too_many_arguments)]
pub fn synthesize(
	annotated_paths: &[Vec<Option<AnnotatedStep>>],
	state_codes: &StateCodes,
	inputs: &[String],
	event_outputs: &[String],
	moore_outputs: &BTreeMap<i64, Vec<String>>,
	diags: &mut Diagnostics,
	logger: &Logger,
) -> (NextStateEqns, OutputEqns) {
	let num_bits = crate::symbols::code_width(state_codes);
	let input_set: std::collections::BTreeSet<&String> = inputs.iter().collect();

	let mut next_state_eqns: NextStateEqns = vec![Expr::False; num_bits];

	let all_output_names = crate::symbols::union_output_names(moore_outputs, event_outputs);
	let mut output_eqns: OutputEqns =
		all_output_names.iter().map(|name| (name.clone(), Expr::False)).collect();

	for path in annotated_paths {
		synthesize_one_path(
			path,
			state_codes,
			num_bits,
			&input_set,
			event_outputs,
			&mut next_state_eqns,
			&mut output_eqns,
			diags,
			logger,
		);
	}

	synthesize_moore_outputs(moore_outputs, state_codes, num_bits, &mut output_eqns, diags, logger);

	(next_state_eqns, output_eqns)
}

#[allow(clippy::too_many_arguments)]
fn synthesize_one_path(
	path: &[Option<AnnotatedStep>],
	state_codes: &StateCodes,
	num_bits: usize,
	input_set: &std::collections::BTreeSet<&String>,
	event_outputs: &[String],
	next_state_eqns: &mut NextStateEqns,
	output_eqns: &mut OutputEqns,
	diags: &mut Diagnostics,
	logger: &Logger,
) {
	if path.is_empty() {
		return;
	}
	let first = match &path[0] {
		Some(step) => step,
		None => return,
	};
	let start_code = match state_codes.iter().find(|(id, _)| id.to_string() == first.id) {
		Some((_, code)) => code.clone(),
		None => {
			diags.push_logged(
				Diagnostic::UnknownStateCode { state_id: first.id.parse().unwrap_or_default() },
				logger,
			);
			return;
		}
	};

	let mut condition = present_state_minterm(&start_code, num_bits);

	for index in 1..path.len() {
		let (prev, current) = match (&path[index - 1], &path[index]) {
			(Some(p), Some(c)) => (p, c),
			_ => continue, // missing node details: condition is weakened, never wrongly strengthened
		};
		if prev.node_type != NodeType::Decision {
			continue;
		}
		if !input_set.contains(&prev.text) {
			continue;
		}
		match current.indicator {
			Indicator::True => condition = condition.and(Expr::var(prev.text.clone())),
			Indicator::False => condition = condition.and(Expr::var(prev.text.clone()).not()),
			Indicator::None => {
				diags.push_logged(
					Diagnostic::AmbiguousIndicator {
						node: current.id.clone(),
						predecessor: prev.id.clone(),
					},
					logger,
				);
			}
		}
	}

	let last = match path.last().and_then(|s| s.as_ref()) {
		Some(step) if step.node_type == NodeType::State => step,
		_ => return,
	};
	let end_code = match state_codes.iter().find(|(id, _)| id.to_string() == last.id) {
		Some((_, code)) => code.clone(),
		None => {
			diags.push_logged(
				Diagnostic::UnknownStateCode { state_id: last.id.parse().unwrap_or_default() },
				logger,
			);
			return;
		}
	};

	for (position, ch) in end_code.chars().enumerate() {
		if ch == '1' {
			let bit = num_bits - 1 - position;
			next_state_eqns[bit] = std::mem::replace(&mut next_state_eqns[bit], Expr::False)
				.or(condition.clone());
		}
	}

	for step in path.iter().flatten() {
		if step.node_type == NodeType::Event && event_outputs.contains(&step.text) {
			if let Some(entry) = output_eqns.get_mut(&step.text) {
				*entry = std::mem::replace(entry, Expr::False).or(condition.clone());
			}
		}
	}
}

fn synthesize_moore_outputs(
	moore_outputs: &BTreeMap<i64, Vec<String>>,
	state_codes: &StateCodes,
	num_bits: usize,
	output_eqns: &mut OutputEqns,
	diags: &mut Diagnostics,
	logger: &Logger,
) {
	for (state_id, names) in moore_outputs {
		let code = match state_codes.get(state_id) {
			Some(code) => code,
			None => {
				diags.push_logged(Diagnostic::UnknownStateCode { state_id: *state_id }, logger);
				continue;
			}
		};
		let minterm = present_state_minterm(code, num_bits);
		for name in names {
			if let Some(entry) = output_eqns.get_mut(name) {
				*entry = std::mem::replace(entry, Expr::False).or(minterm.clone());
			}
		}
	}
}

/// Conjunction over all state bits selecting exactly `code`. `code` is a
/// standard binary string (leftmost character is the most significant bit),
/// so string position `p` is `Y{num_bits - 1 - p}`; the next-state bit
/// assignment above indexes `next_state_eqns` the same way.
fn present_state_minterm(code: &str, num_bits: usize) -> Expr {
	let mut term = Expr::True;
	for (position, ch) in code.chars().enumerate().take(num_bits) {
		let bit = num_bits - 1 - position;
		let literal = Expr::var(format!("Y{bit}"));
		term = term.and(if ch == '1' { literal } else { literal.not() });
	}
	term
}
