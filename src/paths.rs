//! Stage B: Path Enumerator. DFS from each state node along outgoing
//! connections, collecting every walk that terminates at another state and
//! detecting cycles through intermediate nodes.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::node::{Node, NodeIndex, NodeType};
use slog::Logger;
use std::collections::HashSet;

/// An enumerated transition walk: an ordered, non-empty sequence of
/// stringified node ids. The first and last are State nodes.
pub type IdPath = Vec<String>;

/// Enumerates every transition walk from each State node, in deterministic
/// order: outer loop by seed-appearance order, inner by port-name order and
/// connection-index order.
pub fn enumerate_paths(nodes: &[Node], diags: &mut Diagnostics, logger: &Logger) -> Vec<IdPath> {
	let index = crate::node::index_by_id(nodes);

	let seeds: Vec<String> = nodes
		.iter()
		.filter(|n| n.node_type == NodeType::State)
		.map(|n| n.id_string())
		.collect();

	if seeds.is_empty() {
		diags.push_logged(Diagnostic::NoStartStates, logger);
		return Vec::new();
	}

	let mut paths = Vec::new();
	for seed in &seeds {
		let mut visited = HashSet::new();
		visited.insert(seed.clone());
		dfs(seed, &mut vec![seed.clone()], &visited, &index, &mut paths, diags, logger);
	}
	paths
}

#[allow(clippy::too_many_arguments)]
fn dfs(
	current_id: &str,
	current_path: &mut Vec<String>,
	visited: &HashSet<String>,
	index: &NodeIndex<'_>,
	out: &mut Vec<IdPath>,
	diags: &mut Diagnostics,
	logger: &Logger,
) {
	let current = match index.get(current_id) {
		Some(n) => *n,
		None => return,
	};

	let mut port_names: Vec<&String> = current.outputs.keys().collect();
	port_names.sort();

	for port in port_names {
		let connections = &current.outputs[port];
		for connection in connections {
			let target_id = &connection.node;
			let target = match index.get(target_id.as_str()) {
				Some(n) => *n,
				None => {
					diags.push_logged(
						Diagnostic::MissingTarget {
							from: current_id.to_string(),
							target: target_id.clone(),
						},
						logger,
					);
					continue;
				}
			};

			if target.node_type == NodeType::State {
				let mut complete = current_path.clone();
				complete.push(target_id.clone());
				out.push(complete);
			} else if visited.contains(target_id) {
				let mut cycle_path = current_path.clone();
				cycle_path.push(target_id.clone());
				diags.push_logged(
					Diagnostic::CycleDetected {
						path: cycle_path,
						repeated: target_id.clone(),
					},
					logger,
				);
			} else {
				let mut branch_visited = visited.clone();
				branch_visited.insert(target_id.clone());
				current_path.push(target_id.clone());
				dfs(target_id, current_path, &branch_visited, index, out, diags, logger);
				current_path.pop();
			}
		}
	}
}
