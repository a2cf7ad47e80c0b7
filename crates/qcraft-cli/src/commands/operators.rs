//! Operators command: dump per-gate operator matrices as JSON.

use anyhow::Result;

use super::common::{load_circuit, write_output};

/// Execute the operators command.
pub fn execute(input: &str, output: Option<&str>, strict: bool) -> Result<()> {
    let circuit = load_circuit(input, strict)?;
    let operators = circuit.operators()?;
    let mut json = serde_json::to_string_pretty(&operators)?;
    json.push('\n');
    write_output(output, &json)
}
