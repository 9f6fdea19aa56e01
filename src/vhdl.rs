//! Stage G: VHDL Emitter. Renders the entity declaration, architecture,
//! combinational block, and state register from the symbol tables and
//! minimized equations.

use crate::expr::Expr;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Renders the complete VHDL source for one entity.
///
/// `inputs` and `outputs` are deduplicated port name lists (callers should
/// pass already-deduplicated, sorted lists; [`crate::symbols`] produces
/// exactly that shape). `next_state_eqns[i]` is bit `i`'s minimized
/// expression; a missing bit defaults to `'0'` with a comment, as does a
/// missing output.
pub fn emit(
	entity_name: &str,
	inputs: &[String],
	outputs: &[String],
	num_bits: usize,
	next_state_eqns: &BTreeMap<String, Expr>,
	output_eqns: &BTreeMap<String, Expr>,
) -> String {
	let mut out = String::new();

	writeln!(out, "library IEEE;").unwrap();
	writeln!(out, "use IEEE.STD_LOGIC_1164.ALL;").unwrap();
	writeln!(out).unwrap();
	writeln!(out, "entity {entity_name} is").unwrap();
	writeln!(out, "    port (").unwrap();
	writeln!(out, "        clk     : in  std_logic;").unwrap();
	write_ports(&mut out, inputs, outputs);
	writeln!(out, "    );").unwrap();
	writeln!(out, "end entity {entity_name};").unwrap();
	writeln!(out).unwrap();
	writeln!(out, "architecture Behavioral of {entity_name} is").unwrap();
	writeln!(out).unwrap();
	writeln!(out, "    -- State register and next state logic signals").unwrap();
	if num_bits > 0 {
		writeln!(
			out,
			"    signal current_state, next_state : std_logic_vector({} downto 0);",
			num_bits - 1
		)
		.unwrap();
	} else {
		writeln!(out, "    -- No state bits defined.").unwrap();
	}
	writeln!(out).unwrap();
	writeln!(out, "begin").unwrap();
	writeln!(out).unwrap();
	write_combinational_process(&mut out, inputs, outputs, num_bits, next_state_eqns, output_eqns);
	writeln!(out).unwrap();
	write_state_register(&mut out, num_bits);
	writeln!(out).unwrap();
	writeln!(out, "end architecture Behavioral;").unwrap();

	out
}

/// Port list, with reset on its own line and the final port having no
/// trailing `;`. Groups are omitted entirely when that list is empty, and
/// the semicolon bookkeeping is fixed up so the last port declared never
/// has a trailing `;`.
fn write_ports(out: &mut String, inputs: &[String], outputs: &[String]) {
	let reset_needs_semicolon = !inputs.is_empty() || !outputs.is_empty();
	writeln!(out, "        reset   : in  std_logic{}", if reset_needs_semicolon { ";" } else { "" }).unwrap();

	if !inputs.is_empty() {
		writeln!(out).unwrap();
		writeln!(out, "        -- Inputs").unwrap();
		for (index, name) in inputs.iter().enumerate() {
			let is_last_port_group = outputs.is_empty() && index == inputs.len() - 1;
			writeln!(
				out,
				"        {:<8}: in  std_logic{}",
				name,
				if is_last_port_group { "" } else { ";" }
			)
			.unwrap();
		}
	}

	if !outputs.is_empty() {
		writeln!(out).unwrap();
		writeln!(out, "        -- Outputs").unwrap();
		for (index, name) in outputs.iter().enumerate() {
			let is_last = index == outputs.len() - 1;
			writeln!(out, "        {:<8}: out std_logic{}", name, if is_last { "" } else { ";" }).unwrap();
		}
	}
}

fn write_combinational_process(
	out: &mut String,
	inputs: &[String],
	outputs: &[String],
	num_bits: usize,
	next_state_eqns: &BTreeMap<String, Expr>,
	output_eqns: &BTreeMap<String, Expr>,
) {
	write!(out, "    process (current_state").unwrap();
	for name in inputs {
		write!(out, ", {name}").unwrap();
	}
	writeln!(out, ")").unwrap();
	writeln!(out, "    begin").unwrap();

	writeln!(out).unwrap();
	writeln!(out, "        -- Next State Logic").unwrap();
	if num_bits > 0 {
		for bit in 0..num_bits {
			let key = format!("Y{bit}");
			match next_state_eqns.get(&key) {
				Some(expr) => {
					writeln!(out, "        next_state({bit}) <= {};", render(expr)).unwrap();
				}
				None => {
					writeln!(
						out,
						"        next_state({bit}) <= '0'; -- Default/missing equation for Y{bit}"
					)
					.unwrap();
				}
			}
		}
	} else {
		writeln!(out, "        -- No next state logic (0 state bits).").unwrap();
	}

	writeln!(out).unwrap();
	writeln!(out, "        -- Output Logic").unwrap();
	if !outputs.is_empty() {
		for name in outputs {
			match output_eqns.get(name) {
				Some(expr) => {
					writeln!(out, "        {name} <= {};", render(expr)).unwrap();
				}
				None => {
					writeln!(out, "        {name} <= '0'; -- Default/missing equation for {name}").unwrap();
				}
			}
		}
	} else {
		writeln!(out, "        -- No output logic defined.").unwrap();
	}

	writeln!(out, "    end process;").unwrap();
}

fn write_state_register(out: &mut String, num_bits: usize) {
	writeln!(out, "    -- State Register (Sequential logic)").unwrap();
	writeln!(out, "    process (clk, reset)").unwrap();
	writeln!(out, "    begin").unwrap();
	writeln!(out, "        if reset = '1' then").unwrap();
	if num_bits > 0 {
		let zeros = "0".repeat(num_bits);
		writeln!(out, "            current_state <= \"{zeros}\"; -- Reset state").unwrap();
	} else {
		writeln!(out, "            -- No state register to reset.").unwrap();
	}
	writeln!(out, "        elsif rising_edge(clk) then").unwrap();
	if num_bits > 0 {
		writeln!(out, "            current_state <= next_state;").unwrap();
	} else {
		writeln!(out, "            -- No state register to update.").unwrap();
	}
	writeln!(out, "        end if;").unwrap();
	writeln!(out, "    end process;").unwrap();
}

/// Recursively renders a symbolic expression as a VHDL boolean expression.
/// State-bit symbols (`Y0`, `Y1`, ...) map to `current_state(i)`; every
/// other symbol renders as its name verbatim. Operands are always
/// parenthesized to avoid VHDL operator-precedence ambiguity.
pub fn render(expr: &Expr) -> String {
	match expr {
		Expr::True => "'1'".to_string(),
		Expr::False => "'0'".to_string(),
		Expr::Var(name) => render_symbol(name),
		Expr::Not(inner) => format!("(not {})", render(inner)),
		Expr::And(terms) => terms.iter().map(|t| format!("({})", render(t))).collect::<Vec<_>>().join(" and "),
		Expr::Or(terms) => terms.iter().map(|t| format!("({})", render(t))).collect::<Vec<_>>().join(" or "),
	}
}

fn render_symbol(name: &str) -> String {
	if let Some(index) = name.strip_prefix('Y').and_then(|rest| rest.parse::<usize>().ok()) {
		format!("current_state({index})")
	} else {
		name.to_string()
	}
}

/// Renders a VHDL comment explaining a hard-precondition failure in place
/// of generated code, matching the original's own
/// `"-- VHDL Generation Error: ..."` convention.
pub fn error_comment(message: &str) -> String {
	format!("-- VHDL Generation Error: {message}.")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn atoms_render_as_expected() {
		assert_eq!(render(&Expr::var("Y0")), "current_state(0)");
		assert_eq!(render(&Expr::var("x")), "x");
		assert_eq!(render(&Expr::True), "'1'");
		assert_eq!(render(&Expr::False), "'0'");
	}

	#[test]
	fn zero_state_bits_omits_state_signal_and_register() {
		let vhdl = emit("fsm", &[], &[], 0, &BTreeMap::new(), &BTreeMap::new());
		assert!(vhdl.contains("No state bits defined."));
		assert!(vhdl.contains("No state register to reset."));
		assert!(!vhdl.contains("std_logic_vector"));
	}

	#[test]
	fn port_list_has_no_trailing_semicolon_on_last_port() {
		let vhdl = emit("fsm", &["x".to_string()], &[], 1, &BTreeMap::new(), &BTreeMap::new());
		assert!(vhdl.contains("x       : in  std_logic\n"));
	}

	#[test]
	fn reset_block_assigns_all_zero_string_matching_width() {
		let vhdl = emit("fsm", &[], &[], 2, &BTreeMap::new(), &BTreeMap::new());
		assert!(vhdl.contains("current_state <= \"00\";"));
	}

	#[test]
	fn s1_toggle_equation_renders_as_expected() {
		let mut next_state = BTreeMap::new();
		next_state.insert("Y0".to_string(), Expr::var("Y0").not());
		let vhdl = emit("fsm", &[], &["tick".to_string()], 1, &next_state, &BTreeMap::new());
		assert!(vhdl.contains("next_state(0) <= (not current_state(0));"));
	}
}
