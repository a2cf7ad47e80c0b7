//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qcraft_ir::Circuit;
use qcraft_qasm::{ImportOptions, parse_with};

/// Load a circuit from an `OpenQASM` 2.0 file.
///
/// Import diagnostics are logged as warnings; with `strict` the first one
/// is an error instead.
pub fn load_circuit(path: &str, strict: bool) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let options = ImportOptions { strict };
    let import = parse_with(&source, &options).map_err(|e| anyhow::anyhow!("Parse error: {e}"))?;

    debug!(
        path,
        qubits = import.circuit.num_qubits(),
        instructions = import.circuit.len(),
        "loaded circuit"
    );
    if !import.is_clean() {
        eprintln!(
            "{} {} statement(s) of {} were skipped or removed",
            style("!").yellow().bold(),
            import.diagnostics.len(),
            style(path).green()
        );
    }
    Ok(import.circuit)
}

/// Write `contents` to `output`, or to stdout when no path is given.
pub fn write_output(output: Option<&str>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("Failed to write file: {path}"))?;
            eprintln!("{} Wrote {}", style("✓").green().bold(), style(path).green());
        }
        None => print!("{contents}"),
    }
    Ok(())
}
