//! Convert command: import QASM and re-emit it in canonical form.

use anyhow::Result;
use console::style;

use qcraft_qasm::emit;

use super::common::{load_circuit, write_output};

/// Execute the convert command.
pub fn execute(input: &str, output: Option<&str>, strict: bool) -> Result<()> {
    let circuit = load_circuit(input, strict)?;
    eprintln!(
        "{} Loaded {}: {} qubits, {} instructions, depth {}",
        style("→").cyan().bold(),
        style(input).green(),
        circuit.num_qubits(),
        circuit.len(),
        circuit.depth()
    );

    write_output(output, &emit(&circuit))
}
