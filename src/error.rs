use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The value numbering core itself is total over well-formed statements and never returns an
/// error. Everything here originates in the text boundary (parsing a program) or in file I/O.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::MalformedStatement`] - A source line does not match the statement grammar
/// - [`Error::Malformed`] - A structurally invalid value was constructed outside the grammar
/// - [`Error::Empty`] - The program contains no statements
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use valnum::{text::parse_program, Error};
///
/// match parse_program("x := a + b\ny = a + b\n") {
///     Ok(program) => println!("{} statements", program.len()),
///     Err(Error::MalformedStatement { line, text, reason }) => {
///         eprintln!("line {line}: {reason}: `{text}`");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A source line does not match `<ident> := <ident> <op> <ident>`.
    ///
    /// Raised by the statement parser before the value numbering core ever sees the line.
    /// Parsing stops at the first malformed line, there is no recovery.
    ///
    /// # Fields
    ///
    /// * `line` - 1-based line number inside the source text
    /// * `text` - The offending line, trimmed
    /// * `reason` - What the parser expected at the point of failure
    #[error("Malformed statement on line {line}: {reason} - `{text}`")]
    MalformedStatement {
        /// 1-based source line number
        line: usize,
        /// The trimmed text of the offending line
        text: String,
        /// Human readable description of the mismatch
        reason: String,
    },

    /// An invalid value was built through the programmatic API.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    ///
    /// Returned when a program file contains nothing but blank lines and the caller asked
    /// for a non-empty program.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading a program or writing the
    /// optimized output.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
