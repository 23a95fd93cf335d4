mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show valnum info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("valnum", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Optimize {
            path,
            output,
            suffix,
            recursive,
            no_cleanup,
            no_annotate,
            inputs,
            stats,
            report,
        } => commands::optimize::run(
            path,
            &commands::optimize::OptimizeOptions {
                output: output.as_deref(),
                suffix,
                recursive: *recursive,
                no_cleanup: *no_cleanup,
                no_annotate: *no_annotate,
                inputs: inputs.as_deref(),
                show_stats: *stats,
                report: report.as_deref(),
                global: &cli.global,
            },
        ),
        Command::Check { path } => commands::check::run(path, &cli.global),
    }
}
