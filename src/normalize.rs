//! Stage A: Graph Normalizer. Walks the document, emits a flat node table.
//! Fails soft: invalid entries are skipped with a diagnostic; an
//! unrecognized top-level shape returns an empty list. Never throws.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::{RawConnection, RawDocument, RawNode};
use crate::node::{Connection, Node, NodeType, PortMap};
use serde_json::Value;
use slog::Logger;

/// Descends `drawflow.Home.data`, validates each entry, and returns the
/// surviving nodes in source iteration order.
pub fn normalize(document: &Value, diags: &mut Diagnostics, logger: &Logger) -> Vec<Node> {
	let raw: RawDocument = match serde_json::from_value(document.clone()) {
		Ok(doc) => doc,
		Err(_) => {
			debug!(logger, "normalize: document did not match the expected shape");
			return Vec::new();
		}
	};

	let entries = match raw.drawflow.and_then(|d| d.home).and_then(|h| h.data) {
		Some(data) => data,
		None => {
			debug!(logger, "normalize: no drawflow.Home.data subtree present");
			return Vec::new();
		}
	};

	let mut nodes = Vec::with_capacity(entries.len());
	for (key, value) in entries.into_iter() {
		match build_node(&key, value) {
			Ok(Some(node)) => nodes.push(node),
			Ok(None) => {
				// Unrecognized node type: ignored, not a diagnostic.
			}
			Err(diag) => diags.push_logged(diag, logger),
		}
	}
	nodes
}

/// Validates and builds one [`Node`], or decides it should be dropped.
///
/// `Ok(None)` means "valid shape, but not a type this compiler models" --
/// silently ignored per spec. `Err` carries the diagnostic for a shape or
/// id-mismatch problem.
fn build_node(key: &str, value: Value) -> Result<Option<Node>, Diagnostic> {
	let raw: RawNode = serde_json::from_value(value)
		.map_err(|_| Diagnostic::InvalidNodeShape { key: key.to_string() })?;

	let id_value = raw.id.ok_or_else(|| Diagnostic::InvalidNodeShape { key: key.to_string() })?;
	let name = raw.name.ok_or_else(|| Diagnostic::InvalidNodeShape { key: key.to_string() })?;
	let inputs = raw.inputs.ok_or_else(|| Diagnostic::InvalidNodeShape { key: key.to_string() })?;
	let outputs = raw.outputs.ok_or_else(|| Diagnostic::InvalidNodeShape { key: key.to_string() })?;
	let data = raw.data.ok_or_else(|| Diagnostic::InvalidNodeShape { key: key.to_string() })?;

	let stored_id_string = match &id_value {
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		_ => return Err(Diagnostic::InvalidNodeShape { key: key.to_string() }),
	};
	if stored_id_string != key {
		return Err(Diagnostic::IdMismatch {
			key: key.to_string(),
			stored_id: stored_id_string,
		});
	}
	let id: i64 = stored_id_string
		.parse()
		.map_err(|_| Diagnostic::InvalidNodeShape { key: key.to_string() })?;

	let node_type = match NodeType::parse(&name) {
		Some(t) => t,
		None => return Ok(None),
	};

	let text = data.data.unwrap_or_default();

	Ok(Some(Node {
		id,
		node_type,
		inputs: to_port_map(inputs),
		outputs: to_port_map(outputs),
		text,
	}))
}

fn to_port_map(raw: std::collections::HashMap<String, crate::document::RawPort>) -> PortMap {
	raw.into_iter()
		.map(|(port, raw_port)| {
			let connections = raw_port
				.connections
				.into_iter()
				.filter_map(raw_connection_to_connection)
				.collect();
			(port, connections)
		})
		.collect()
}

fn raw_connection_to_connection(raw: RawConnection) -> Option<Connection> {
	let port = raw.peer_port()?.to_string();
	Some(Connection { node: raw.node, port })
}
