//! Stage C: Path Annotator. Attaches per-step metadata to each enumerated
//! walk indicating which Decision branch (true/false) was taken.

use crate::diagnostics::Diagnostics;
use crate::node::{NodeIndex, NodeType};
use crate::paths::IdPath;
use slog::Logger;

/// Whether a step was reached via a Decision's true branch, false branch,
/// or neither (the first step, or a non-Decision predecessor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
	True,
	False,
	None,
}

/// One annotated step in a path. `None` (the whole `Option`, not the
/// `Indicator` variant) stands in for a node id that no longer resolves in
/// the index -- the Python's "missing node" placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedStep {
	pub id: String,
	pub text: String,
	pub node_type: NodeType,
	pub indicator: Indicator,
}

/// Annotates every path; a non-resolvable id becomes `None` at that
/// position, never aborting the whole path.
pub fn annotate_paths(
	id_paths: &[IdPath],
	index: &NodeIndex<'_>,
	_diags: &mut Diagnostics,
	logger: &Logger,
) -> Vec<Vec<Option<AnnotatedStep>>> {
	id_paths
		.iter()
		.map(|path| annotate_one(path, index, logger))
		.collect()
}

fn annotate_one(
	path: &IdPath,
	index: &NodeIndex<'_>,
	_logger: &Logger,
) -> Vec<Option<AnnotatedStep>> {
	let mut out = Vec::with_capacity(path.len());
	for (step_index, id) in path.iter().enumerate() {
		let node = match index.get(id.as_str()) {
			Some(n) => *n,
			None => {
				out.push(None);
				continue;
			}
		};

		let indicator = if step_index == 0 {
			Indicator::None
		} else {
			let predecessor_id = &path[step_index - 1];
			indicator_for(node, predecessor_id)
		};

		out.push(Some(AnnotatedStep {
			id: id.clone(),
			text: node.text.clone(),
			node_type: node.node_type,
			indicator,
		}));
	}
	out
}

/// Inspects `node.inputs["input_1"]` for the connection whose peer is
/// `predecessor_id`; `output_1` -> True, `output_2` -> False, anything
/// else (or no such connection) -> None.
fn indicator_for(node: &crate::node::Node, predecessor_id: &str) -> Indicator {
	let connections = match node.inputs.get("input_1") {
		Some(c) => c,
		None => return Indicator::None,
	};
	for connection in connections {
		if connection.node == predecessor_id {
			return match connection.port.as_str() {
				"output_1" => Indicator::True,
				"output_2" => Indicator::False,
				_ => Indicator::None,
			};
		}
	}
	Indicator::None
}
