//! # valnum Prelude
//!
//! Convenient re-exports of the types needed to parse a block, number it and print the
//! result.
//!
//! ```rust
//! use valnum::prelude::*;
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all valnum operations
pub use crate::Error;

/// The result type used throughout valnum
pub use crate::Result;

// ================================================================================================
// Intermediate Representation
// ================================================================================================

/// Statements, identifiers and operators
pub use crate::ir::{Ident, Op, Rhs, Statement};

// ================================================================================================
// Value Numbering
// ================================================================================================

/// The pass driver, its configuration and its output
pub use crate::lvn::{LocalValueNumbering, LvnConfig, Translation};

/// The engine and its building blocks, for statement-at-a-time use
pub use crate::lvn::{eliminate_dead_copies, Engine, EventKind, EventLog, ExprKey};

// ================================================================================================
// Text Boundary
// ================================================================================================

/// Parsing, rendering and file helpers
pub use crate::text::{parse_line, parse_program, read_program, render_program, write_program};
