// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # valnum
//!
//! Local value numbering over straight-line three-address code.
//!
//! `valnum` takes a basic block of statements of the form `x := a + b`, finds computations
//! that are repeated without an intervening redefinition of their operands, rewrites the
//! repetitions into copies of the value computed first, and drops the synthetic
//! temporaries that turned out to be unused.
//!
//! ## Quick Start
//!
//! ```rust
//! use valnum::prelude::*;
//!
//! let block = parse_program("
//!     t1 := a + b
//!     t2 := b + a
//!     t3 := t1 * t2
//! ")?;
//!
//! let translation = LocalValueNumbering::default().run(block);
//! for statement in translation.statements() {
//!     println!("{statement}");
//! }
//! // t1 := a + b
//! // %v1 := t1
//! // t2 := %v1 // Replaced a+b with %v1
//! // t3 := t1 * t2
//!
//! assert_eq!(translation.stats().expressions_eliminated, 1);
//! # Ok::<(), valnum::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - Identifiers, operators and statements
//! - [`lvn`] - The value numbering engine, canonical keys, dead copy elimination
//! - [`text`] - Parsing and rendering the line-oriented textual form
//! - [`Error`] and [`Result`] - Error handling for the text and file boundary
//!
//! The scope is exactly one basic block: there is no control flow graph, no constant
//! folding and no dead code elimination beyond the copies the pass introduces itself.
//!
//! ## Value names
//!
//! Fresh values are named `%v1`, `%v2`, ... in allocation order. `%` cannot appear in a
//! user identifier, so value names never collide with names from the program.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: eliminations and kills at `debug`, every
//! emitted statement at `trace`, undeclared block inputs at `warn`. Install any logger
//! (the `valnum` CLI uses `env_logger`) to see them.

#[macro_use]
pub(crate) mod error;

pub mod ir;
pub mod lvn;
pub mod prelude;
pub mod text;

/// `valnum` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
///
/// # Examples
///
/// ```rust
/// use valnum::{ir::Statement, Result};
///
/// fn load(source: &str) -> Result<Vec<Statement>> {
///     valnum::text::parse_program(source)
/// }
/// # assert!(load("x := a + b").is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `valnum` Error type
///
/// The error type for the text and file boundary. The value numbering core itself never
/// fails.
pub use error::Error;
