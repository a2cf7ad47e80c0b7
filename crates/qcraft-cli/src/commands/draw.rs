//! Draw command: ASCII rendering of the layered circuit.

use anyhow::Result;

use qcraft_ir::{GateKind, Instruction, LayeredCircuit, StandardGate};

use super::common::load_circuit;

/// Width of the wire label column.
const LABEL_WIDTH: usize = 6;

/// Execute the draw command.
pub fn execute(input: &str, strict: bool) -> Result<()> {
    let circuit = load_circuit(input, strict)?;
    println!("{}", render(&circuit.layered()));
    Ok(())
}

/// Render one wire per active qubit with a gap line between wires.
///
/// Each layer is a column as wide as its widest label plus two, at least
/// three. Vertical bars join the rows a multi-qubit gate spans; `*` marks a
/// control, `+` an X target and `#` any other target, whose name is printed
/// between its outermost rows. Barriers show as `||`.
pub fn render(layout: &LayeredCircuit<'_>) -> String {
    let num_rows = layout.num_rows();
    if num_rows == 0 {
        return String::new();
    }
    let depth = layout.depth();
    let mut grid = vec![vec![String::new(); depth]; 2 * num_rows - 1];
    let mut widths = vec![3; depth];

    for l in 0..depth {
        for row in 0..num_rows {
            if let Some(inst) = layout.cell(row, l) {
                widths[l] = widths[l].max(place(layout, &mut grid, l, inst));
            }
        }
    }

    let circuit = layout.circuit();
    let mut lines = Vec::with_capacity(grid.len());
    for (j, cells) in grid.iter().enumerate() {
        let mut line = String::new();
        if j % 2 == 0 {
            let qubit = layout.rows()[j / 2].qubit;
            line.push_str(&format!("{:<LABEL_WIDTH$}", format!("q[{}]", qubit.0)));
            for (cell, &w) in cells.iter().zip(&widths) {
                line.push_str(&format!("{cell:-^w$}"));
            }
            if let Some(c) = circuit.measures().get(qubit) {
                line.push_str(&format!(" M->c[{}]", c.0));
            }
        } else {
            line.push_str(&" ".repeat(LABEL_WIDTH));
            for (cell, &w) in cells.iter().zip(&widths) {
                line.push_str(&format!("{cell:^w$}"));
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Write the marks of `inst` into layer `l` and return the column width it needs.
fn place(
    layout: &LayeredCircuit<'_>,
    grid: &mut [Vec<String>],
    l: usize,
    inst: &Instruction,
) -> usize {
    let rows: Vec<usize> = inst.qubits.iter().filter_map(|&q| layout.row_of(q)).collect();
    let (Some(&lo), Some(&hi)) = (rows.iter().min(), rows.iter().max()) else {
        return 0;
    };

    let Some(gate) = inst.as_gate() else {
        for line in &mut grid[2 * lo..=2 * hi] {
            line[l] = "||".into();
        }
        return 2;
    };

    if rows.len() == 1 {
        let label = label(gate);
        let width = label.len() + 2;
        grid[2 * lo][l] = label;
        return width;
    }

    for line in &mut grid[2 * lo + 1..2 * hi] {
        line[l] = "|".into();
    }

    let mut width = 3;
    let (controls, base) = match gate {
        GateKind::Controlled(c) => (c.num_controls, c.base),
        GateKind::Standard(s) => (0, *s),
    };
    for (i, &row) in rows.iter().enumerate() {
        let mark = if i < controls {
            width = width.max(5);
            "*"
        } else {
            match base {
                StandardGate::X => "+",
                StandardGate::Swap => "x",
                _ => "#",
            }
        };
        grid[2 * row][l] = mark.into();
    }

    if !matches!(base, StandardGate::X | StandardGate::Swap) {
        let label = label(gate);
        width = width.max(label.len() + 2);
        grid[lo + hi][l] = label;
    }
    width
}

/// Upper-case mnemonic with parameters to three decimals.
fn label(gate: &GateKind) -> String {
    let name = gate.name().to_uppercase();
    let params = gate.parameters();
    if params.is_empty() {
        return name;
    }
    let params: Vec<String> = params.iter().map(|p| format!("{p:.3}")).collect();
    format!("{name}({})", params.join(","))
}
