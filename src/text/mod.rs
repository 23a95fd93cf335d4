//! Textual form of a basic block.
//!
//! One statement per line, blank and comment-only lines ignored:
//!
//! ```text
//! x := a + b
//! y := a + b
//!
//! z := x * y
//! ```
//!
//! The renderer is the [`std::fmt::Display`] implementation of
//! [`Statement`]: copies print without operator, annotations print as a trailing
//! `// comment`.

mod parser;

pub use parser::parse_line;

use std::{fmt::Write as _, fs, path::Path};

use crate::{ir::Statement, Result};

/// Parses a whole program, one statement per line that is neither blank nor only a
/// `//` comment.
///
/// # Errors
///
/// Returns [`crate::Error::MalformedStatement`] for the first line that does not match the
/// grammar, with its 1-based line number.
///
/// # Examples
///
/// ```rust
/// use valnum::{text::parse_program, Error};
///
/// let program = parse_program("x := a + b\n\n   \ny := b + a\n")?;
/// assert_eq!(program.len(), 2);
///
/// let err = parse_program("x := a + b\ny := a +\n").unwrap_err();
/// assert!(matches!(err, Error::MalformedStatement { line: 2, .. }));
/// # Ok::<(), valnum::Error>(())
/// ```
pub fn parse_program(source: &str) -> Result<Vec<Statement>> {
    source
        .lines()
        .enumerate()
        .filter(|(_, text)| !parser::code_part(text).trim().is_empty())
        .map(|(index, text)| parser::parse_numbered_line(index + 1, text))
        .collect()
}

/// Renders statements one per line, each terminated by `\n`.
#[must_use]
pub fn render_program(statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        let _ = writeln!(out, "{statement}");
    }
    out
}

/// Reads and parses a program file.
///
/// # Errors
///
/// Returns [`crate::Error::FileError`] if the file cannot be read, or
/// [`crate::Error::MalformedStatement`] if a line does not parse.
pub fn read_program(path: &Path) -> Result<Vec<Statement>> {
    let source = fs::read_to_string(path)?;
    parse_program(&source)
}

/// Writes statements to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`crate::Error::FileError`] if the file cannot be written.
pub fn write_program(path: &Path, statements: &[Statement]) -> Result<()> {
    fs::write(path, render_program(statements))?;
    Ok(())
}
