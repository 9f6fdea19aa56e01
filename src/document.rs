//! Raw wire types mirroring the external editor's document shape.
//!
//! These are deliberately loose: the document comes from a visual editor
//! whose users routinely leave graphs half-wired while authoring, so every
//! field below is optional or defaulted rather than required. Tightening a
//! field to non-optional here would turn an ordinary "node still being
//! wired up" state into a hard deserialization failure, which is exactly
//! the failure mode the Graph Normalizer (see [`crate::normalize`]) is
//! built to avoid.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The document root. Only `drawflow.Home.data` is consumed; everything
/// else the editor may have stored alongside it is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
	#[serde(default)]
	pub drawflow: Option<RawDrawflow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDrawflow {
	#[serde(default, rename = "Home")]
	pub home: Option<RawHome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHome {
	#[serde(default)]
	pub data: Option<Map<String, Value>>,
}

/// A single node entry, as stored under `drawflow.Home.data[key]`.
///
/// `id`, `name`, `inputs`, `outputs`, and `data` are required for a node to
/// be accepted (a missing one is a skip-with-diagnostic at the normalizer
/// level, not a parse error here) but are still modeled as `Option` so that
/// a missing field fails that shape check instead of aborting deserialization
/// of the whole document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
	pub id: Option<Value>,
	pub name: Option<String>,
	#[serde(default)]
	pub inputs: Option<HashMap<String, RawPort>>,
	#[serde(default)]
	pub outputs: Option<HashMap<String, RawPort>>,
	pub data: Option<RawNodeData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPort {
	#[serde(default)]
	pub connections: Vec<RawConnection>,
}

/// A connection endpoint. The document stores the peer's port name under
/// `input` when this connection sits in an input `PortMap`, and under
/// `output` when it sits in an output `PortMap` -- both are accepted here
/// and [`crate::node::Connection`] construction picks whichever is present.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnection {
	pub node: String,
	#[serde(default)]
	pub input: Option<String>,
	#[serde(default)]
	pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNodeData {
	#[serde(default)]
	pub data: Option<String>,
}

impl RawConnection {
	/// The port name at the peer end, regardless of which document field it
	/// was stored under.
	pub fn peer_port(&self) -> Option<&str> {
		self.input.as_deref().or(self.output.as_deref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_minimal_document() {
		let doc: RawDocument = serde_json::from_value(json!({
			"drawflow": {"Home": {"data": {}}}
		}))
		.unwrap();
		assert!(doc.drawflow.unwrap().home.unwrap().data.unwrap().is_empty());
	}

	#[test]
	fn tolerates_missing_drawflow() {
		let doc: RawDocument = serde_json::from_value(json!({})).unwrap();
		assert!(doc.drawflow.is_none());
	}

	#[test]
	fn connection_prefers_input_field_then_output_field() {
		let c: RawConnection = serde_json::from_value(json!({"node": "3", "input": "output_1"})).unwrap();
		assert_eq!(c.peer_port(), Some("output_1"));
		let c: RawConnection = serde_json::from_value(json!({"node": "3", "output": "input_1"})).unwrap();
		assert_eq!(c.peer_port(), Some("input_1"));
	}
}
