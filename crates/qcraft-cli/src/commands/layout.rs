//! Layout command: print the layered schedule of a circuit.

use anyhow::Result;
use console::style;
use serde::Serialize;

use qcraft_ir::{Instruction, LayerRow, LayeredCircuit};

use super::common::load_circuit;

/// JSON form of a layout.
#[derive(Serialize)]
struct LayoutReport<'a> {
    depth: usize,
    names: Vec<String>,
    rows: &'a [LayerRow],
}

/// Execute the layout command.
pub fn execute(input: &str, format: &str, strict: bool) -> Result<()> {
    let circuit = load_circuit(input, strict)?;
    let layout = circuit.layered();

    match format {
        "table" => print!("{}", table(&layout)),
        "json" => {
            let report = LayoutReport {
                depth: layout.depth(),
                names: circuit.instructions().iter().map(|i| i.name()).collect(),
                rows: layout.rows(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }
    Ok(())
}

/// One line per active qubit, one column per layer. `.` is an idle slot and
/// `|` a slot blocked by a gate spanning the wire.
fn table(layout: &LayeredCircuit<'_>) -> String {
    let mut out = format!(
        "{} {} rows x {} layers\n",
        style("Layout:").bold(),
        layout.num_rows(),
        layout.depth()
    );
    let names: Vec<Vec<String>> = (0..layout.num_rows())
        .map(|row| {
            (0..layout.depth())
                .map(|l| {
                    layout
                        .cell(row, l)
                        .map_or_else(|| idle(layout, row, l), Instruction::name)
                })
                .collect()
        })
        .collect();
    let width = names.iter().flatten().map(String::len).max().unwrap_or(1);

    for (row, cells) in layout.rows().iter().zip(&names) {
        out.push_str(&format!("  {:<5}", row.qubit.to_string()));
        for cell in cells {
            out.push_str(&format!(" {cell:<width$}"));
        }
        out.push('\n');
    }
    out
}

/// Marker for an empty slot: `|` when a gate placed above covers it.
fn idle(layout: &LayeredCircuit<'_>, row: usize, layer: usize) -> String {
    let qubit = layout.rows()[row].qubit;
    let covered = layout.layer(layer).any(|(_, inst)| {
        inst.span().is_some_and(|(lo, hi)| lo < qubit && qubit <= hi)
    });
    if covered { "|".into() } else { ".".into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcraft_ir::{Circuit, QubitId};

    #[test]
    fn test_table_marks_spanned_slots() {
        let mut circuit = Circuit::new(3);
        circuit
            .h(QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(2))
            .unwrap();
        let text = table(&circuit.layered());
        let lines: Vec<Vec<&str>> = text
            .lines()
            .skip(1)
            .map(|l| l.split_whitespace().collect())
            .collect();

        // The cx waits for the h it spans over.
        assert_eq!(lines[0], vec!["q0", ".", "cx"]);
        assert_eq!(lines[1], vec!["q1", "h", "|"]);
        assert_eq!(lines[2], vec!["q2", ".", "|"]);
    }
}
