use std::path::Path;

use serde::Serialize;
use valnum::ir::Statement;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_program},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct CheckReport {
    file: String,
    statements: Vec<StatementReport>,
}

#[derive(Debug, Serialize)]
struct StatementReport {
    result: String,
    operator: Option<String>,
    operands: Vec<String>,
    text: String,
}

pub fn run(path: &Path, global: &GlobalOptions) -> anyhow::Result<()> {
    let program = load_program(path)?;
    if program.is_empty() {
        return Err(valnum::Error::Empty.into());
    }

    let report = CheckReport {
        file: file_display_name(path),
        statements: program.iter().map(statement_report).collect(),
    };

    print_output(&report, global, |report| {
        println!("{}: {} statements", report.file, report.statements.len());
        let mut table = TabWriter::new(&[
            ("#", Align::Right),
            ("Result", Align::Left),
            ("Op", Align::Left),
            ("Statement", Align::Left),
        ])
        .indent("  ");
        for (index, stmt) in report.statements.iter().enumerate() {
            table.row(vec![
                (index + 1).to_string(),
                stmt.result.clone(),
                stmt.operator.clone().unwrap_or_else(|| "copy".to_string()),
                stmt.text.clone(),
            ]);
        }
        for line in table.lines() {
            println!("{line}");
        }
    })
}

fn statement_report(statement: &Statement) -> StatementReport {
    StatementReport {
        result: statement.result().to_string(),
        operator: statement.operator().map(|op| op.to_string()),
        operands: statement.operands().map(ToString::to_string).collect(),
        text: statement.to_string(),
    }
}
