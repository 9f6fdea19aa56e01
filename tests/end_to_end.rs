//! Full-pipeline scenario tests, one per documented end-to-end scenario:
//! two-state toggle, conditional branch, Moore output, Mealy output along a
//! branch, a cycle through decisions, and an unreachable decision. Each
//! builds the document the way a visual editor actually would (full node
//! records with real connections) and drives it through [`fsmvhdl::compile`]
//! rather than any one stage in isolation.

use fsmvhdl::{compile, silent_logger};
use serde_json::json;

fn state(id: i64, text: &str) -> serde_json::Value {
    json!({"id": id, "name": "state", "inputs": {}, "outputs": {}, "data": {"data": text}})
}

fn decision(id: i64, text: &str) -> serde_json::Value {
    json!({"id": id, "name": "decision", "inputs": {}, "outputs": {}, "data": {"data": text}})
}

fn event(id: i64, text: &str) -> serde_json::Value {
    json!({"id": id, "name": "event", "inputs": {}, "outputs": {}, "data": {"data": text}})
}

fn ensure_port(node: &mut serde_json::Value, group: &str, port: &str) -> &mut Vec<serde_json::Value> {
    if node[group][port].is_null() {
        node[group][port] = json!({"connections": []});
    }
    node[group][port]["connections"].as_array_mut().unwrap()
}

fn add_output(node: &mut serde_json::Value, port: &str, target: i64, target_port: &str) {
    ensure_port(node, "outputs", port).push(json!({"node": target.to_string(), "output": target_port}));
}

fn add_input(node: &mut serde_json::Value, port: &str, source: i64, source_port: &str) {
    ensure_port(node, "inputs", port).push(json!({"node": source.to_string(), "input": source_port}));
}

fn document(nodes: Vec<(i64, serde_json::Value)>) -> serde_json::Value {
    let mut data = serde_json::Map::new();
    for (id, node) in nodes {
        data.insert(id.to_string(), node);
    }
    json!({"drawflow": {"Home": {"data": data}}})
}

fn led_line(vhdl: &str, name: &str) -> String {
    vhdl.lines()
        .find(|line| line.trim_start().starts_with(&format!("{name} <=")))
        .unwrap_or_else(|| panic!("no '{name} <=' line in:\n{vhdl}"))
        .to_string()
}

/// S1 -- two-state toggle, no inputs: an Event edge from A to B and back
/// from B to A through nodes both named "tick".
#[test]
fn s1_two_state_toggle_has_one_bit_and_always_asserted_tick() {
    let mut a = state(1, "");
    let mut b = state(2, "");
    let mut tick_ab = event(3, "tick");
    let mut tick_ba = event(4, "tick");

    add_output(&mut a, "output_1", 3, "input_1");
    add_input(&mut tick_ab, "input_1", 1, "output_1");
    add_output(&mut tick_ab, "output_1", 2, "input_1");
    add_input(&mut b, "input_1", 3, "output_1");

    add_output(&mut b, "output_1", 4, "input_1");
    add_input(&mut tick_ba, "input_1", 2, "output_1");
    add_output(&mut tick_ba, "output_1", 1, "input_1");
    add_input(&mut a, "input_1", 4, "output_1");

    let doc = document(vec![(1, a), (2, b), (3, tick_ab), (4, tick_ba)]);
    let out = compile(&doc, Some("toggle"), &silent_logger());

    assert_eq!(out.state_bits, 1);
    assert!(out.vhdl.contains("next_state(0) <= (not current_state(0));"));
    assert!(out.vhdl.contains("tick <= '1';"));
}

/// S2 -- conditional branch: from S0, a Decision on `x` sends `output_1` to
/// S1 and `output_2` to S2.
fn s2_document() -> serde_json::Value {
    let mut s0 = state(0, "");
    let mut s1 = state(1, "");
    let mut s2 = state(2, "");
    let mut d = decision(10, "x");

    add_output(&mut s0, "output_1", 10, "input_1");
    add_input(&mut d, "input_1", 0, "output_1");

    add_output(&mut d, "output_1", 1, "input_1");
    add_input(&mut s1, "input_1", 10, "output_1");

    add_output(&mut d, "output_2", 2, "input_1");
    add_input(&mut s2, "input_1", 10, "output_2");

    document(vec![(0, s0), (1, s1), (2, s2), (10, d)])
}

#[test]
fn s2_conditional_branch_assigns_expected_codes_and_equations() {
    let out = compile(&s2_document(), Some("branch"), &silent_logger());
    assert_eq!(out.state_bits, 2);

    let bit0 = led_line(&out.vhdl, "next_state(0)");
    let bit1 = led_line(&out.vhdl, "next_state(1)");
    assert!(bit0.contains("current_state(0)") && bit0.contains("current_state(1)") && bit0.contains('x'));
    assert!(bit1.contains("current_state(0)") && bit1.contains("current_state(1)") && bit1.contains('x'));
}

/// S3 -- Moore output: state S1 carries text "led", asserted whenever S1 is
/// current, independent of which path reaches it.
#[test]
fn s3_moore_output_depends_only_on_present_state() {
    let mut doc = s2_document();
    doc["drawflow"]["Home"]["data"]["1"]["data"]["data"] = json!("led");

    let out = compile(&doc, Some("moore"), &silent_logger());
    let line = led_line(&out.vhdl, "led");
    assert!(line.contains("current_state(0)"));
    assert!(line.contains("not current_state(1)"));
}

/// S4 -- Mealy output along a branch: `S0 -> Decision(x) -> Event("pulse")
/// -> S1`; `pulse` should fire exactly on the S0/x=true branch.
#[test]
fn s4_mealy_output_gated_by_branch_condition() {
    let mut s0 = state(0, "");
    let mut s1 = state(1, "");
    let mut d = decision(10, "x");
    let mut pulse = event(20, "pulse");

    add_output(&mut s0, "output_1", 10, "input_1");
    add_input(&mut d, "input_1", 0, "output_1");

    add_output(&mut d, "output_1", 20, "input_1");
    add_input(&mut pulse, "input_1", 10, "output_1");

    add_output(&mut pulse, "output_1", 1, "input_1");
    add_input(&mut s1, "input_1", 20, "output_1");

    let doc = document(vec![(0, s0), (1, s1), (10, d), (20, pulse)]);
    let out = compile(&doc, Some("mealy"), &silent_logger());

    let line = led_line(&out.vhdl, "pulse");
    assert!(line.contains("not current_state(0)"));
    assert!(line.contains('x') && !line.contains("not x"));
}

/// S5 -- cycle through decisions: `S0 -> D1(x) -> D2(y) -> D1 ...`. The
/// cyclic branch is pruned and diagnosed; the acyclic branch through D2's
/// other output still contributes an equation.
#[test]
fn s5_cycle_is_pruned_but_acyclic_branch_survives() {
    let mut s0 = state(1, "");
    let mut d1 = decision(10, "x");
    let mut d2 = decision(20, "y");

    add_output(&mut s0, "output_1", 10, "input_1");
    add_input(&mut d1, "input_1", 1, "output_1");

    add_output(&mut d1, "output_1", 20, "input_1");
    add_input(&mut d2, "input_1", 10, "output_1");

    add_output(&mut d2, "output_1", 10, "input_1");
    add_input(&mut d1, "input_1", 20, "output_1");

    add_output(&mut d2, "output_2", 1, "input_1");
    add_input(&mut s0, "input_1", 20, "output_2");

    let doc = document(vec![(1, s0), (10, d1), (20, d2)]);
    let out = compile(&doc, Some("cycle"), &silent_logger());

    assert_eq!(out.path_count, 1);
    assert!(out.diagnostics.iter().any(|d| matches!(d, fsmvhdl::Diagnostic::CycleDetected { .. })));
    assert!(out.vhdl.contains("next_state(0)"));
}

/// S6 -- unreachable decision: a Decision with no incoming edge contributes
/// nothing and must not panic.
#[test]
fn s6_unreachable_decision_contributes_nothing() {
    let mut s0 = state(0, "");
    let mut d = decision(10, "x");
    add_output(&mut d, "output_1", 0, "input_1");
    add_input(&mut s0, "input_1", 10, "output_1");

    let doc = document(vec![(0, s0), (10, d)]);
    let out = compile(&doc, None, &silent_logger());

    assert_eq!(out.path_count, 0);
    assert_eq!(out.node_count, 2);
    assert!(out.vhdl.contains("entity fsm is"));
}
