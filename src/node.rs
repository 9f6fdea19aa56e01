//! The normalized node table: [`Node`], [`NodeType`], [`PortMap`], and
//! [`Connection`], as produced by [`crate::normalize`] from a raw document.

use std::collections::HashMap;

/// Exactly the three node variants the compiler understands; every other
/// `name` in the document is dropped before a `Node` is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// A stable FSM state. Its text, split on line breaks, names the Moore
	/// outputs asserted while this state is current.
	State,
	/// A combinational branch on a single-bit input named by its text.
	Decision,
	/// A Mealy output asserted while the walk containing it is active.
	Event,
}

impl NodeType {
	/// Parses the document's `name` field. Returns `None` for any name this
	/// compiler does not recognize -- such nodes are ignored, not an error.
	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"state" => Some(NodeType::State),
			"decision" => Some(NodeType::Decision),
			"event" => Some(NodeType::Event),
			_ => None,
		}
	}
}

/// One endpoint of a connection: the peer node id and the port name at the
/// peer end.
///
/// Per the document's convention (preserved here, not "fixed"): a
/// connection stored under a node's *input* port names the port the
/// **source** exposes it through, not a port on this node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
	pub node: String,
	pub port: String,
}

/// Mapping from port name (`"output_1"`, `"input_1"`, ...) to the
/// connections attached to it, in document order.
pub type PortMap = HashMap<String, Vec<Connection>>;

/// A normalized, typed node. Invariant: `id` equals the document key that
/// indexed this node (enforced by [`crate::normalize`]; violators are
/// dropped before construction).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
	pub id: i64,
	pub node_type: NodeType,
	pub inputs: PortMap,
	pub outputs: PortMap,
	pub text: String,
}

impl Node {
	/// The node id, stringified, as used to key the path-enumeration and
	/// annotation stages (the document's connections reference peers by
	/// stringified id).
	pub fn id_string(&self) -> String {
		self.id.to_string()
	}
}

/// An id -> `&Node` lookup table, built once per compile and threaded
/// through every stage after normalization.
pub type NodeIndex<'a> = HashMap<String, &'a Node>;

/// Builds the id index used by path enumeration and annotation.
pub fn index_by_id(nodes: &[Node]) -> NodeIndex<'_> {
	nodes.iter().map(|n| (n.id_string(), n)).collect()
}
