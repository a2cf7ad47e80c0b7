//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum circuit layout and OpenQASM 2 tooling",
        style("qcraft").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcraft-ir      Circuit IR, gate algebra and layering");
    println!("  qcraft-qasm    OpenQASM 2.0 reader and writer");
    println!("  qcraft-hal     Execution boundary");
    println!("  qcraft-cli     Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
