//! Graphviz output.

use std::io::{self, Write};

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use tcsol_types::{Gate, GateKind, TruthTable};
use tcsol_verify::Verified;

const INPUT_COLOR: &str = "#90EE90";
const OUTPUT_COLOR: &str = "#9090EE";
const NAND_COLOR: &str = "#EE9090";
const OR_COLOR: &str = "#FFFFFF";

/// Writes the circuit as a left-to-right DOT digraph.
///
/// Only what the outputs depend on is drawn, found by walking back from each
/// output. Inputs nothing reads are drawn unconnected, except the constant
/// tables.
pub(crate) fn write_dot(verified: &Verified, out: &mut dyn Write) -> io::Result<()> {
    let desc = verified.description();
    let n = desc.input_count();

    let mut producers = HashMap::<TruthTable, &Gate>::new();
    for gate in verified.order() {
        producers.entry(gate.output()).or_insert(gate);
    }
    let inputs = desc.inputs().iter().copied().collect::<HashSet<_>>();
    let outputs = desc.outputs().iter().copied().collect::<HashSet<_>>();

    writeln!(out, "digraph circuit {{")?;
    writeln!(out, "  rankdir=LR;")?;

    let mut done = HashSet::new();
    let mut stack = desc.outputs().to_vec();
    while let Some(current) = stack.pop() {
        if !done.insert(current) {
            continue;
        }

        let color = if outputs.contains(&current) {
            OUTPUT_COLOR
        } else if inputs.contains(&current) {
            INPUT_COLOR
        } else {
            match producers.get(&current).map(|g| g.kind()) {
                Some(GateKind::Nand | GateKind::Not) => NAND_COLOR,
                _ => OR_COLOR,
            }
        };

        if inputs.contains(&current) {
            node(out, current, &format!("input\\n{}", n.bits(current)), Some(color))?;
        } else if let Some(gate) = producers.get(&current) {
            node(out, current, &format!("{}\\n{}", gate.kind(), n.bits(current)), Some(color))?;
            for source in gate.sources() {
                writeln!(out, "  \"{}\" -> \"{}\";", source.value(), current.value())?;
                if !done.contains(source) {
                    stack.push(*source);
                }
            }
        }
    }

    for input in desc.inputs() {
        let constant = input.value() == 0 || input.value() == n.mask();
        if !done.contains(input) && !constant {
            node(out, *input, &n.bits(*input).to_string(), None)?;
        }
    }

    writeln!(out, "}}")
}

fn node(out: &mut dyn Write, tt: TruthTable, label: &str, fill: Option<&str>) -> io::Result<()> {
    match fill {
        Some(color) => writeln!(
            out,
            "  \"{}\" [label=\"{label}\", style=filled, fillcolor=\"{color}\"];",
            tt.value()
        ),
        None => writeln!(out, "  \"{}\" [label=\"{label}\"];", tt.value()),
    }
}
