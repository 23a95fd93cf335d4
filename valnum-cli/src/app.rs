use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// valnum - local value numbering for three-address code
#[derive(Debug, Parser)]
#[command(name = "valnum", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Eliminate redundant computations in a basic block and write the result.
    Optimize {
        /// Program file (or directory with --recursive).
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Output file or directory.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Suffix appended to the input file name (default: "_vno").
        #[arg(long, default_value = "_vno")]
        suffix: String,

        /// Recursively process every `.tac` file in a directory.
        #[arg(long)]
        recursive: bool,

        /// Keep synthetic copies even when their value is never reused.
        #[arg(long)]
        no_cleanup: bool,

        /// Don't annotate rewritten statements with a `// Replaced ...` comment.
        #[arg(long)]
        no_annotate: bool,

        /// Declared block inputs; other identifiers read before assignment are reported.
        #[arg(long, value_name = "NAMES", value_delimiter = ',')]
        inputs: Option<Vec<String>>,

        /// Show per-statement events and counters.
        #[arg(long)]
        stats: bool,

        /// Write detailed JSON report.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Parse a program and list its statements without optimizing.
    Check {
        /// Program file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}
