use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use valnum::{
    ir::Ident,
    lvn::{LocalValueNumbering, LvnConfig, Translation},
    text::{render_program, write_program},
};

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_program, process_directory},
    output::{Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct OptimizeReport {
    file: String,
    output: String,
    statements_in: usize,
    statements_out: usize,
    stats: StatsReport,
    inputs: Vec<String>,
    undeclared: Vec<String>,
    events: Vec<EventReport>,
    program: Vec<String>,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    values_numbered: usize,
    expressions_eliminated: usize,
    bindings_killed: usize,
    dead_copies_removed: usize,
    block_inputs: usize,
    undeclared_inputs: usize,
}

#[derive(Debug, Serialize)]
struct EventReport {
    kind: String,
    statement: Option<usize>,
    message: String,
}

pub struct OptimizeOptions<'a> {
    pub output: Option<&'a Path>,
    pub suffix: &'a str,
    pub recursive: bool,
    pub no_cleanup: bool,
    pub no_annotate: bool,
    pub inputs: Option<&'a [String]>,
    pub show_stats: bool,
    pub report: Option<&'a Path>,
    pub global: &'a GlobalOptions,
}

pub fn run(path: &Path, opts: &OptimizeOptions) -> anyhow::Result<()> {
    if opts.recursive {
        run_recursive(path, opts)
    } else {
        run_single(path, opts)
    }
}

fn run_single(path: &Path, opts: &OptimizeOptions) -> anyhow::Result<()> {
    let pass = LocalValueNumbering::new(build_config(opts)?);
    let output_path = resolve_output_path(path, opts.output, opts.suffix);
    let report = optimize_file(&pass, path, &output_path)?;

    if let Some(report_file) = opts.report {
        write_report(report_file, &report)?;
    }

    if opts.global.json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
        return Ok(());
    }

    for line in &report.program {
        println!("{line}");
    }

    eprintln!(
        "Optimization complete: {} -> {}",
        report.file,
        file_display_name(&output_path)
    );
    eprintln!(
        "  Statements:  {} -> {}",
        report.statements_in, report.statements_out
    );
    eprintln!("  Eliminated:  {}", report.stats.expressions_eliminated);
    if !report.undeclared.is_empty() {
        eprintln!("  Undeclared:  {}", report.undeclared.join(", "));
    }
    if opts.show_stats {
        display_stats(&report);
    }

    Ok(())
}

fn run_recursive(dir: &Path, opts: &OptimizeOptions) -> anyhow::Result<()> {
    let pass = LocalValueNumbering::new(build_config(opts)?);

    if let Some(out_dir) = opts.output {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
    }

    let (reports, fail_count) = process_directory(dir, opts.suffix, |file| {
        let out_path = match opts.output {
            Some(out_dir) => out_dir.join(suffixed_filename(file, opts.suffix)),
            None => resolve_output_path(file, None, opts.suffix),
        };
        let report = optimize_file(&pass, file, &out_path)?;

        if !opts.global.json {
            eprintln!(
                "{}: {} -> {} statements, {} eliminated",
                report.file,
                report.statements_in,
                report.statements_out,
                report.stats.expressions_eliminated
            );
        }
        Ok(report)
    })?;

    let success_count = reports.len();

    if let Some(report_file) = opts.report {
        write_report(report_file, &reports)?;
    }

    if opts.global.json {
        let json = serde_json::to_string_pretty(&reports)?;
        println!("{json}");
    } else {
        eprintln!();
        eprintln!(
            "Processed {} files: {} succeeded, {} failed",
            success_count + fail_count,
            success_count,
            fail_count
        );
        if opts.show_stats {
            let eliminated: usize = reports.iter().map(|r| r.stats.expressions_eliminated).sum();
            let removed: usize = reports.iter().map(|r| r.stats.dead_copies_removed).sum();
            eprintln!("  Total expressions eliminated: {eliminated}");
            eprintln!("  Total dead copies removed:    {removed}");
        }
    }

    if fail_count > 0 {
        anyhow::bail!("{fail_count} file(s) failed");
    }
    Ok(())
}

/// Optimize one file, write the result and describe what happened.
fn optimize_file(
    pass: &LocalValueNumbering,
    path: &Path,
    output_path: &Path,
) -> anyhow::Result<OptimizeReport> {
    let program = load_program(path)?;
    let statements_in = program.len();

    let translation = pass.run(program);

    write_program(output_path, translation.statements())
        .with_context(|| format!("failed to write output: {}", output_path.display()))?;

    Ok(build_report(path, output_path, statements_in, &translation))
}

fn build_config(opts: &OptimizeOptions) -> anyhow::Result<LvnConfig> {
    // an empty suffix would write over the input file
    anyhow::ensure!(!opts.suffix.is_empty(), "--suffix must not be empty");

    let mut config = LvnConfig::default()
        .annotate(!opts.no_annotate)
        .remove_dead_copies(!opts.no_cleanup);

    if let Some(names) = opts.inputs {
        let inputs = names
            .iter()
            .map(|name| {
                Ident::new(name.trim()).with_context(|| format!("invalid input name `{name}`"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        config = config.declared_inputs(inputs);
    }

    Ok(config)
}

fn build_report(
    path: &Path,
    output_path: &Path,
    statements_in: usize,
    translation: &Translation,
) -> OptimizeReport {
    let stats = translation.stats();
    OptimizeReport {
        file: file_display_name(path),
        output: output_path.display().to_string(),
        statements_in,
        statements_out: translation.statements().len(),
        stats: StatsReport {
            values_numbered: stats.values_numbered,
            expressions_eliminated: stats.expressions_eliminated,
            bindings_killed: stats.bindings_killed,
            dead_copies_removed: stats.dead_copies_removed,
            block_inputs: stats.block_inputs,
            undeclared_inputs: stats.undeclared_inputs,
        },
        inputs: translation.inputs().iter().map(ToString::to_string).collect(),
        undeclared: translation
            .undeclared()
            .iter()
            .map(ToString::to_string)
            .collect(),
        events: translation
            .events()
            .iter()
            .map(|event| EventReport {
                kind: event.kind().to_string(),
                statement: event.statement().map(|index| index + 1),
                message: event.text().to_string(),
            })
            .collect(),
        program: render_program(translation.statements())
            .lines()
            .map(str::to_string)
            .collect(),
    }
}

fn display_stats(report: &OptimizeReport) {
    let stats = &report.stats;
    eprintln!("  Values:      {}", stats.values_numbered);
    eprintln!("  Killed:      {}", stats.bindings_killed);
    eprintln!("  Dead copies: {}", stats.dead_copies_removed);
    eprintln!("  Inputs:      {}", report.inputs.join(", "));

    if report.events.is_empty() {
        return;
    }
    eprintln!();
    let mut table = TabWriter::new(&[
        ("Line", Align::Right),
        ("Event", Align::Left),
        ("Detail", Align::Left),
    ])
    .indent("  ");
    for event in &report.events {
        table.row(vec![
            event.statement.map_or_else(|| "-".to_string(), |n| n.to_string()),
            event.kind.clone(),
            event.message.clone(),
        ]);
    }
    table.eprint();
}

fn write_report<T: Serialize>(report_file: &Path, report: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(report_file, json)
        .with_context(|| format!("failed to write report: {}", report_file.display()))?;
    eprintln!("Report written to {}", report_file.display());
    Ok(())
}

fn resolve_output_path(input: &Path, output: Option<&Path>, suffix: &str) -> PathBuf {
    if let Some(out) = output {
        // If output is a directory, place the suffixed file inside it
        if out.is_dir() {
            return out.join(suffixed_filename(input, suffix));
        }
        return out.to_path_buf();
    }

    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(suffixed_filename(input, suffix))
}

/// `block.tac` + `_vno` → `block.tac_vno`
fn suffixed_filename(input: &Path, suffix: &str) -> String {
    let name = input
        .file_name()
        .map_or("output", |s| s.to_str().unwrap_or("output"));
    format!("{name}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options<'a>(global: &'a GlobalOptions, inputs: Option<&'a [String]>) -> OptimizeOptions<'a> {
        OptimizeOptions {
            output: None,
            suffix: "_vno",
            recursive: false,
            no_cleanup: false,
            no_annotate: false,
            inputs,
            show_stats: false,
            report: None,
            global,
        }
    }

    #[test]
    fn test_suffixed_filename_appends_to_full_name() {
        assert_eq!(suffixed_filename(Path::new("dir/block.tac"), "_vno"), "block.tac_vno");
        assert_eq!(suffixed_filename(Path::new("block"), "_out"), "block_out");
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("p.tac");

        assert_eq!(
            resolve_output_path(&input, None, "_vno"),
            dir.path().join("p.tac_vno")
        );
        assert_eq!(
            resolve_output_path(&input, Some(dir.path()), "_x"),
            dir.path().join("p.tac_x")
        );
        let explicit = dir.path().join("result.txt");
        assert_eq!(resolve_output_path(&input, Some(&explicit), "_vno"), explicit);
    }

    #[test]
    fn test_build_config_validates_inputs() {
        let global = GlobalOptions {
            json: false,
            verbose: false,
        };
        let good = vec!["a".to_string(), " b".to_string()];
        let config = build_config(&options(&global, Some(&good))).unwrap();
        assert!(config.is_declared(&Ident::new("b").unwrap()));
        assert!(!config.is_declared(&Ident::new("c").unwrap()));

        let bad = vec!["a+b".to_string()];
        assert!(build_config(&options(&global, Some(&bad))).is_err());
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let global = GlobalOptions {
            json: false,
            verbose: false,
        };
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("block.tac");
        std::fs::write(&input, "x := a + b\n").unwrap();

        let mut opts = options(&global, None);
        opts.suffix = "";
        assert!(build_config(&opts).is_err());
        assert!(run(&input, &opts).is_err());
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "x := a + b\n");

        opts.recursive = true;
        let err = run(dir.path(), &opts).unwrap_err();
        assert!(err.to_string().contains("--suffix"));
    }

    #[test]
    fn test_optimize_file_writes_output_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("block.tac");
        std::fs::write(
            &input,
            "x := a + b\ny := a + b\na := c + d\nz := a + b\n",
        )
        .unwrap();
        let output = dir.path().join("block.tac_vno");

        let pass = LocalValueNumbering::default();
        let report = optimize_file(&pass, &input, &output).unwrap();

        assert_eq!(report.statements_in, 4);
        assert_eq!(report.statements_out, 5);
        assert_eq!(report.stats.expressions_eliminated, 1);
        assert_eq!(report.inputs, ["a", "b", "c", "d"]);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "x := a + b\n%v1 := x\ny := %v1 // Replaced a+b with %v1\na := c + d\nz := a + b\n"
        );

        let eliminated = report
            .events
            .iter()
            .find(|e| e.kind == "expression-eliminated")
            .unwrap();
        assert_eq!(eliminated.statement, Some(2));
    }
}
