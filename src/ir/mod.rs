//! Three-address intermediate representation.
//!
//! A basic block is a `Vec<Statement>`; each [`Statement`] assigns one [`Ident`] either the
//! result of a binary [`Op`] over two identifiers or a copy of one identifier:
//!
//! ```text
//! x := a + b
//! y := x * c
//! z := y        (copy, produced by value numbering)
//! ```
//!
//! There are no constants, no types and no control flow in this form.

mod ident;
mod op;
mod statement;

pub use ident::{is_ident_char, Ident, VALUE_PREFIX};
pub use op::Op;
pub use statement::{Rhs, Statement};
