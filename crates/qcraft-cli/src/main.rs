//! qcraft Command-Line Interface
//!
//! The main entry point for the `qcraft` tool: inspect, lay out, draw and
//! convert `OpenQASM` 2.0 circuits.

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{convert, draw, layout, operators, version};

/// qcraft - quantum circuit layout and OpenQASM 2 tooling
#[derive(Parser)]
#[command(name = "qcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Reject input with unsupported statements or operations after measurement
    #[arg(long, global = true, env = "QCRAFT_STRICT")]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a QASM file and write it back in canonical form
    Convert {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the layered schedule of a circuit
    Layout {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Draw a circuit as ASCII art
    Draw {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,
    },

    /// Dump per-gate operator matrices as JSON
    Operators {
        /// Input file (OpenQASM 2.0)
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let strict = cli.strict;

    // Execute command
    let result = match cli.command {
        Commands::Convert { input, output } => convert::execute(&input, output.as_deref(), strict),
        Commands::Layout { input, format } => layout::execute(&input, &format, strict),
        Commands::Draw { input } => draw::execute(&input, strict),
        Commands::Operators { input, output } => {
            operators::execute(&input, output.as_deref(), strict)
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
