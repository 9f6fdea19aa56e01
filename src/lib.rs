//! Compiles a visual finite-state-machine graph into synthesizable VHDL.
//!
//! The input is a document describing a directed graph of typed nodes
//! (states, decisions, events) with labelled ports and connections, as
//! produced by a visual FSM editor. The pipeline normalizes that document
//! into a flat node table, enumerates every transition walk between states,
//! synthesizes Boolean next-state and output equations, minimizes them, and
//! renders a VHDL entity/architecture pair.
//!
//! # Author
//! Tony Przygienda, 2024.
//!
//! # Panics
//! Never. Malformed input produces a best-effort result plus diagnostics.
//!
//! # Errors
//! The pipeline itself never fails; see [`Diagnostics`] for the soft-failure
//! channel and [`CompileOutput`] for the result shape.
//!
//! # Copyrights
//!
//! Copyright (c) 2024, Juniper Networks, Inc.
//! All rights reserved.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! This code is not an official Juniper product.
//! You may obtain a copy of the License at
//!
//! http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

#[macro_use]
extern crate slog;

pub mod annotate;
pub mod diagnostics;
pub mod document;
pub mod equations;
pub mod expr;
pub mod minimize;
pub mod node;
pub mod normalize;
pub mod paths;
pub mod symbols;
pub mod vhdl;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use expr::Expr;
pub use node::{Connection, Node, NodeType, PortMap};

use slog::Logger;

/// Default entity name used when the caller does not supply one.
pub const DEFAULT_ENTITY_NAME: &str = "fsm";

/// Everything produced by [`compile`]: the VHDL text plus enough summary
/// data for a caller to report on the compile without re-deriving it.
#[derive(Debug, Clone)]
pub struct CompileOutput {
	/// The rendered VHDL source. Always present, even on a hard
	/// precondition failure (in which case it is an explanatory comment).
	pub vhdl: String,
	/// Diagnostics collected across every stage, in emission order.
	pub diagnostics: Diagnostics,
	/// Number of nodes surviving normalization.
	pub node_count: usize,
	/// Number of transition walks enumerated.
	pub path_count: usize,
	/// Width, in bits, of the state encoding (0 if there were no states).
	pub state_bits: usize,
}

/// Runs the full pipeline: document -> nodes -> paths -> annotated paths ->
/// symbol tables -> raw equations -> minimized equations -> VHDL text.
///
/// `entity_name` defaults to [`DEFAULT_ENTITY_NAME`] when `None`.
pub fn compile(
	document: &serde_json::Value,
	entity_name: Option<&str>,
	logger: &Logger,
) -> CompileOutput {
	let entity_name = entity_name.unwrap_or(DEFAULT_ENTITY_NAME);
	let mut diags = Diagnostics::new();

	info!(logger, "compile: starting"; "entity" => entity_name);

	let nodes = normalize::normalize(document, &mut diags, logger);
	info!(logger, "compile: normalized"; "node_count" => nodes.len());

	let id_paths = paths::enumerate_paths(&nodes, &mut diags, logger);
	info!(logger, "compile: enumerated paths"; "path_count" => id_paths.len());

	let index = node::index_by_id(&nodes);
	let annotated_paths = annotate::annotate_paths(&id_paths, &index, &mut diags, logger);

	let states = symbols::collect_state_ids(&nodes);
	let state_codes = symbols::assign_state_codes(&states);
	let state_bits = symbols::code_width(&state_codes);

	let inputs = symbols::collect_input_names(&nodes);
	let moore_outputs = symbols::collect_moore_outputs(&nodes);
	let event_outputs = symbols::collect_event_outputs(&nodes);
	let outputs = symbols::union_output_names(&moore_outputs, &event_outputs);

	let (next_state_eqns, output_eqns) = equations::synthesize(
		&annotated_paths,
		&state_codes,
		&inputs,
		&event_outputs,
		&moore_outputs,
		&mut diags,
		logger,
	);

	let next_state_keyed = next_state_eqns
		.into_iter()
		.enumerate()
		.map(|(bit, expr)| (format!("Y{bit}"), expr));
	let minimized_next_state = minimize::minimize_all(next_state_keyed, &mut diags, logger);
	let minimized_outputs = minimize::minimize_all(output_eqns, &mut diags, logger);

	if state_bits == 0 && !states.is_empty() {
		diags.push(Diagnostic::UnknownStateCode {
			state_id: states.first().copied().unwrap_or_default(),
		});
		let vhdl = vhdl::error_comment(
			"invalid state codes (0 bits) for a non-empty state set",
		);
		return CompileOutput {
			vhdl,
			diagnostics: diags,
			node_count: nodes.len(),
			path_count: id_paths.len(),
			state_bits,
		};
	}

	let vhdl_text = vhdl::emit(
		entity_name,
		&inputs,
		&outputs,
		state_bits,
		&minimized_next_state,
		&minimized_outputs,
	);

	info!(logger, "compile: done"; "vhdl_len" => vhdl_text.len());

	CompileOutput {
		vhdl: vhdl_text,
		diagnostics: diags,
		node_count: nodes.len(),
		path_count: id_paths.len(),
		state_bits,
	}
}

/// Builds a `slog::Logger` that discards everything, for callers that don't
/// want log output (tests, one-off library embeds).
pub fn silent_logger() -> Logger {
	Logger::root(slog::Discard, o!())
}

/// The one genuinely exceptional, non-diagnostic failure this crate can
/// report: the caller handed in text that isn't even JSON. Everything past
/// this boundary is a soft [`Diagnostic`], never an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	#[error("input is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Convenience wrapper for callers holding raw document text rather than an
/// already-parsed [`serde_json::Value`] (e.g. an HTTP request body, outside
/// this crate's scope but a natural caller of it).
pub fn compile_from_str(
	document_text: &str,
	entity_name: Option<&str>,
	logger: &Logger,
) -> Result<CompileOutput, DocumentError> {
	let document: serde_json::Value = serde_json::from_str(document_text)?;
	Ok(compile(&document, entity_name, logger))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn two_state_toggle_doc() -> serde_json::Value {
		json!({
			"drawflow": {
				"Home": {
					"data": {
						"1": {
							"id": 1, "name": "state",
							"inputs": {}, "outputs": {
								"output_1": {"connections": [{"node": "3", "output": "input_1"}]}
							},
							"data": {"data": ""}
						},
						"2": {
							"id": 2, "name": "state",
							"inputs": {
								"input_1": {"connections": [{"node": "3", "input": "output_1"}]}
							},
							"outputs": {},
							"data": {"data": ""}
						},
						"3": {
							"id": 3, "name": "event",
							"inputs": {
								"input_1": {"connections": [{"node": "1", "input": "output_1"}]}
							},
							"outputs": {
								"output_1": {"connections": [{"node": "2", "output": "input_1"}]}
							},
							"data": {"data": "tick"}
						}
					}
				}
			}
		})
	}

	#[test]
	fn compiles_two_state_toggle_without_panicking() {
		let logger = silent_logger();
		let out = compile(&two_state_toggle_doc(), Some("toggle"), &logger);
		assert_eq!(out.node_count, 3);
		assert!(out.vhdl.contains("entity toggle is"));
		assert!(out.vhdl.contains("tick"));
	}

	#[test]
	fn empty_document_yields_empty_skeleton() {
		let logger = silent_logger();
		let out = compile(&json!({}), None, &logger);
		assert_eq!(out.node_count, 0);
		assert!(out.vhdl.contains(DEFAULT_ENTITY_NAME));
	}

	#[test]
	fn compile_from_str_rejects_non_json_text() {
		let logger = silent_logger();
		let err = compile_from_str("not json", None, &logger).unwrap_err();
		assert!(matches!(err, DocumentError::Parse(_)));
	}

	#[test]
	fn compile_from_str_accepts_valid_json_text() {
		let logger = silent_logger();
		let out = compile_from_str("{}", None, &logger).unwrap();
		assert_eq!(out.node_count, 0);
	}
}
