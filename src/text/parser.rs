//! Line parser for the textual three-address form.
//!
//! Accepted forms, whitespace between tokens optional:
//!
//! ```text
//! <result> := <operand> <op> <operand>      op ∈ { + - * / }
//! <result> := <operand>                     copy
//! ```
//!
//! `<result>` matches `[A-Za-z_][A-Za-z_0-9]*`, `<operand>` matches `[A-Za-z_0-9]+`.
//! A trailing `// comment` is ignored. Anything else is rejected with
//! [`crate::Error::MalformedStatement`].

use crate::{
    ir::{is_ident_char, Ident, Op, Statement},
    Error, Result,
};

/// Parses a single statement.
///
/// Errors report the statement as line 1; use [`crate::text::parse_program`] for
/// multi-line sources.
///
/// # Errors
///
/// Returns [`Error::MalformedStatement`] if `text` does not match the grammar.
///
/// # Examples
///
/// ```rust
/// use valnum::{ir::Op, text::parse_line};
///
/// let stmt = parse_line("  t1:=a*b   ")?;
/// assert_eq!(stmt.result().as_str(), "t1");
/// assert_eq!(stmt.operator(), Some(Op::Mul));
///
/// assert!(parse_line("t1 := a ** b").is_err());
/// # Ok::<(), valnum::Error>(())
/// ```
pub fn parse_line(text: &str) -> Result<Statement> {
    parse_numbered_line(1, text)
}

/// Parses a statement found on the given 1-based source line.
pub(crate) fn parse_numbered_line(line: usize, text: &str) -> Result<Statement> {
    Cursor::new(code_part(text))
        .statement()
        .map_err(|reason| Error::MalformedStatement {
            line,
            text: text.trim().to_string(),
            reason,
        })
}

/// The part of a line before any `//` comment.
pub(crate) fn code_part(text: &str) -> &str {
    match text.find("//") {
        Some(start) => &text[..start],
        None => text,
    }
}

/// Byte cursor over one line. Every token is ASCII, so byte offsets are char boundaries.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn statement(mut self) -> std::result::Result<Statement, String> {
        self.skip_whitespace();
        let result = self.result_ident()?;

        self.skip_whitespace();
        if !self.eat(":=") {
            return Err(self.expected("`:=`"));
        }

        self.skip_whitespace();
        let left = self.operand()?;

        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Ok(Statement::copy(result, left));
        };
        let Some(op) = Op::from_char(c) else {
            return Err(self.expected("an operator (`+`, `-`, `*`, `/`)"));
        };
        self.pos += 1;

        self.skip_whitespace();
        let right = self.operand()?;

        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(self.expected("end of statement"));
        }
        Ok(Statement::binary(result, op, left, right))
    }

    fn result_ident(&mut self) -> std::result::Result<Ident, String> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                Err(format!("result identifier must not start with a digit (`{c}`)"))
            }
            _ => self.ident("a result identifier"),
        }
    }

    fn operand(&mut self) -> std::result::Result<Ident, String> {
        self.ident("an operand")
    }

    fn ident(&mut self, what: &str) -> std::result::Result<Ident, String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.expected(what));
        }
        Ident::new(&self.text[start..self.pos]).map_err(|e| e.to_string())
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += self.peek().map_or(1, char::len_utf8);
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn expected(&self, what: &str) -> String {
        match self.peek() {
            Some(c) => format!("expected {what} at column {}, found `{c}`", self.pos + 1),
            None => format!("expected {what} at column {}, found end of line", self.pos + 1),
        }
    }
}
