use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;
use valnum::{ir::Statement, text::read_program};

/// Extension of program files picked up by `--recursive`.
pub const PROGRAM_EXTENSION: &str = "tac";

/// Read and parse a program file.
pub fn load_program(path: &Path) -> anyhow::Result<Vec<Statement>> {
    log::info!("Reading file {}", path.display());
    read_program(path).with_context(|| format!("failed to load program: {}", path.display()))
}

/// Collect all program files recursively from a directory, skipping files that already
/// carry `suffix` (previous outputs).
pub fn collect_programs(dir: &Path, suffix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_programs_recursive(dir, suffix, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_programs_recursive(
    dir: &Path,
    suffix: &str,
    files: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_programs_recursive(&path, suffix, files)?;
        } else if is_program_file(&path) && !file_display_name(&path).ends_with(suffix) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns true if the path has the program extension.
pub fn is_program_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(PROGRAM_EXTENSION)
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

/// Run `process` over every program file below `dir` in parallel.
///
/// Failures are logged and counted, not propagated, so one bad file does not stop the
/// batch. Returns the successful results (in file order) and the failure count.
pub fn process_directory<T, F>(
    dir: &Path,
    suffix: &str,
    process: F,
) -> anyhow::Result<(Vec<T>, usize)>
where
    T: Send,
    F: Fn(&Path) -> anyhow::Result<T> + Sync,
{
    let files = collect_programs(dir, suffix)?;
    if files.is_empty() {
        anyhow::bail!(
            "no .{PROGRAM_EXTENSION} files found in {}",
            dir.display()
        );
    }

    let outcomes: Vec<_> = files.par_iter().map(|file| process(file)).collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = 0;
    for (file, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("{}: {e:#}", file_display_name(file));
                failures += 1;
            }
        }
    }
    Ok((results, failures))
}
