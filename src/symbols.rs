//! Stage D: Symbol Allocator. Assigns binary codes to states and allocates
//! the three disjoint symbol domains (state bits, inputs, outputs).

use crate::node::{Node, NodeType};
use std::collections::{BTreeMap, BTreeSet};

/// Maps a state id to its fixed-width binary code string, e.g. `"01"`.
pub type StateCodes = BTreeMap<i64, String>;

/// Every unique state id, in sorted order (sorting before allocation is
/// what makes the assignment reproducible across identical documents).
pub fn collect_state_ids(nodes: &[Node]) -> Vec<i64> {
	let mut ids: Vec<i64> = nodes
		.iter()
		.filter(|n| n.node_type == NodeType::State)
		.map(|n| n.id)
		.collect();
	ids.sort_unstable();
	ids.dedup();
	ids
}

/// Assigns sequential binary codes of uniform width
/// `max(1, ceil(log2(n)))` to a sorted list of state ids.
pub fn assign_state_codes(states: &[i64]) -> StateCodes {
	let mut codes = StateCodes::new();
	if states.is_empty() {
		return codes;
	}
	let width = code_width_for_count(states.len());
	for (index, state_id) in states.iter().enumerate() {
		codes.insert(*state_id, to_padded_binary(index, width));
	}
	codes
}

/// Width, in bits, of the codes in `codes` (0 if `codes` is empty).
pub fn code_width(codes: &StateCodes) -> usize {
	codes.values().next().map(|c| c.len()).unwrap_or(0)
}

fn code_width_for_count(num_states: usize) -> usize {
	if num_states <= 1 {
		1
	} else {
		(usize::BITS - (num_states - 1).leading_zeros()) as usize
	}
}

/// Left-pads `number`'s binary representation to `width` characters.
/// Generalized from the original's standalone `padded_binary` utility;
/// here it's a private helper since callers always pass a `number` that
/// already fits within `width` by construction.
fn to_padded_binary(number: usize, width: usize) -> String {
	format!("{number:0width$b}", width = width)
}

/// One input symbol per unique Decision text blob, sorted.
pub fn collect_input_names(nodes: &[Node]) -> Vec<String> {
	let mut set = BTreeSet::new();
	for node in nodes {
		if node.node_type == NodeType::Decision && !node.text.is_empty() {
			set.insert(node.text.clone());
		}
	}
	set.into_iter().collect()
}

/// Moore output names per state: a State's text blob, split on line
/// breaks, when non-empty.
pub fn collect_moore_outputs(nodes: &[Node]) -> BTreeMap<i64, Vec<String>> {
	let mut table = BTreeMap::new();
	for node in nodes {
		if node.node_type == NodeType::State && !node.text.is_empty() {
			let names: Vec<String> = node.text.lines().map(|l| l.to_string()).filter(|l| !l.is_empty()).collect();
			if !names.is_empty() {
				table.insert(node.id, names);
			}
		}
	}
	table
}

/// One Event output name per unique Event text blob. Unlike Moore output
/// names, an Event's text is taken as a single name rather than split on
/// line breaks.
pub fn collect_event_outputs(nodes: &[Node]) -> Vec<String> {
	let mut set = BTreeSet::new();
	for node in nodes {
		if node.node_type == NodeType::Event && !node.text.is_empty() {
			set.insert(node.text.clone());
		}
	}
	set.into_iter().collect()
}

/// Union of Moore and Event output names, sorted, deduplicated.
pub fn union_output_names(moore: &BTreeMap<i64, Vec<String>>, events: &[String]) -> Vec<String> {
	let mut set: BTreeSet<String> = events.iter().cloned().collect();
	for names in moore.values() {
		set.extend(names.iter().cloned());
	}
	set.into_iter().collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn width_is_one_for_up_to_two_states() {
		assert_eq!(code_width_for_count(1), 1);
		assert_eq!(code_width_for_count(2), 1);
	}

	#[test]
	fn width_grows_with_state_count() {
		assert_eq!(code_width_for_count(3), 2);
		assert_eq!(code_width_for_count(4), 2);
		assert_eq!(code_width_for_count(5), 3);
	}

	#[test]
	fn s2_three_states_assigns_expected_codes() {
		let codes = assign_state_codes(&[0, 1, 2]);
		assert_eq!(codes.get(&0).unwrap(), "00");
		assert_eq!(codes.get(&1).unwrap(), "01");
		assert_eq!(codes.get(&2).unwrap(), "10");
	}

	#[test]
	fn moore_outputs_split_on_lines_and_drop_empty() {
		let nodes = vec![Node {
			id: 1,
			node_type: NodeType::State,
			inputs: Default::default(),
			outputs: Default::default(),
			text: "led\nbuzzer\n".to_string(),
		}];
		let moore = collect_moore_outputs(&nodes);
		assert_eq!(moore.get(&1).unwrap(), &vec!["led".to_string(), "buzzer".to_string()]);
	}
}
