//! Local value numbering.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                  LocalValueNumbering::run                      │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  Vec<Statement>  (one basic block, source order)               │
//! │        │                                                       │
//! │        ▼                                                       │
//! │  Engine::process     one call per statement                    │
//! │    ├─ ExprKey         canonical expression keys                │
//! │    ├─ value map       key → value name                         │
//! │    ├─ dependencies    operand → keys to kill on reassignment   │
//! │    └─ used set        value names that replaced a computation  │
//! │        │                                                       │
//! │        ▼                                                       │
//! │  eliminate_dead_copies   drops unused `%vN := x` copies        │
//! │        │                                                       │
//! │        ▼                                                       │
//! │  Translation  (statements + EventLog + block inputs)           │
//! │                                                                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use valnum::{lvn::LocalValueNumbering, text::{parse_program, render_program}};
//!
//! let block = parse_program("
//!     x := a + b
//!     y := a + b
//!     a := c + d
//!     z := a + b
//! ")?;
//!
//! let translation = LocalValueNumbering::default().run(block);
//! assert_eq!(
//!     render_program(translation.statements()),
//!     "x := a + b\n\
//!      %v1 := x\n\
//!      y := %v1 // Replaced a+b with %v1\n\
//!      a := c + d\n\
//!      z := a + b\n"
//! );
//! # Ok::<(), valnum::Error>(())
//! ```

mod cleanup;
mod config;
mod engine;
mod events;
mod key;

pub use cleanup::eliminate_dead_copies;
pub use config::LvnConfig;
pub use engine::{Emitted, Engine, EngineSummary, Resolution};
pub use events::{DerivedStats, Event, EventKind, EventLog};
pub use key::{ExprKey, ValueKey};

use log::debug;

use crate::ir::{Ident, Statement};

/// Runs the engine and the dead copy eliminator over one basic block.
///
/// Each call to [`LocalValueNumbering::run`] uses a fresh [`Engine`], so value names start
/// at `%v1` for every block and nothing leaks between translations.
#[derive(Debug, Clone, Default)]
pub struct LocalValueNumbering {
    config: LvnConfig,
}

impl LocalValueNumbering {
    /// Creates a pass with the given configuration.
    #[must_use]
    pub fn new(config: LvnConfig) -> Self {
        Self { config }
    }

    /// The configuration of this pass.
    #[must_use]
    pub fn config(&self) -> &LvnConfig {
        &self.config
    }

    /// Numbers `block` and returns the optimized statements.
    #[must_use]
    pub fn run(&self, block: Vec<Statement>) -> Translation {
        let input_len = block.len();
        let mut engine = Engine::with_config(self.config.clone());
        let emitted = engine.process_all(block);
        let emitted_len = emitted.len();

        let EngineSummary {
            used,
            mut events,
            inputs,
            undeclared,
            values_allocated,
            minted,
        } = engine.finish();

        let statements = if self.config.removes_dead_copies() {
            let mut removed = EventLog::new();
            let kept = cleanup::eliminate_dead_copies_logged(
                emitted,
                &used,
                |name| minted.contains(name),
                &mut removed,
            );
            events.merge(removed);
            kept
        } else {
            emitted
        };

        debug!(
            "numbered {input_len} statements: {values_allocated} values, {} reused, {emitted_len} emitted, {} kept",
            used.len(),
            statements.len()
        );

        Translation {
            statements,
            events,
            inputs,
            undeclared,
            values_allocated,
        }
    }
}

/// Result of running [`LocalValueNumbering`] over one block.
#[derive(Debug, Clone)]
pub struct Translation {
    statements: Vec<Statement>,
    events: EventLog,
    inputs: Vec<Ident>,
    undeclared: Vec<Ident>,
    values_allocated: usize,
}

impl Translation {
    /// The optimized block.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Consumes the translation, returning the optimized block.
    #[must_use]
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// Everything the pass recorded.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Per-kind counters over [`Translation::events`].
    #[must_use]
    pub fn stats(&self) -> DerivedStats {
        self.events.stats()
    }

    /// Identifiers read before assignment, in first-use order.
    #[must_use]
    pub fn inputs(&self) -> &[Ident] {
        &self.inputs
    }

    /// Block inputs missing from the configured declared inputs.
    #[must_use]
    pub fn undeclared(&self) -> &[Ident] {
        &self.undeclared
    }

    /// Number of value names allocated during numbering.
    #[must_use]
    pub fn values_allocated(&self) -> usize {
        self.values_allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::parse_program;

    fn render(translation: &Translation) -> Vec<String> {
        translation
            .statements()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let block = parse_program("x := a + b\ny := a + b\na := c + d\nz := a + b\n").unwrap();
        let translation = LocalValueNumbering::default().run(block);

        assert_eq!(
            render(&translation),
            [
                "x := a + b",
                "%v1 := x",
                "y := %v1 // Replaced a+b with %v1",
                "a := c + d",
                "z := a + b",
            ]
        );
        assert_eq!(translation.values_allocated(), 3);

        let stats = translation.stats();
        assert_eq!(stats.expressions_eliminated, 1);
        assert_eq!(stats.bindings_killed, 1);
        assert_eq!(stats.dead_copies_removed, 2);
        assert_eq!(stats.values_numbered, 3);
        assert_eq!(stats.block_inputs, 4);
    }

    #[test]
    fn test_without_cleanup_keeps_every_copy() {
        let block = parse_program("p := a - b\nq := b - a\n").unwrap();
        let pass = LocalValueNumbering::new(LvnConfig::default().remove_dead_copies(false));
        let translation = pass.run(block);

        assert_eq!(
            render(&translation),
            ["p := a - b", "%v1 := p", "q := b - a", "%v2 := q"]
        );
        assert_eq!(translation.stats().dead_copies_removed, 0);
    }

    #[test]
    fn test_non_commutative_scenario_after_cleanup() {
        let block = parse_program("p := a - b\nq := b - a\n").unwrap();
        let translation = LocalValueNumbering::default().run(block);
        assert_eq!(render(&translation), ["p := a - b", "q := b - a"]);
    }

    #[test]
    fn test_fresh_numbering_per_run() {
        let pass = LocalValueNumbering::default();
        let block = parse_program("x := a * b\ny := b * a\n").unwrap();

        let first = pass.run(block.clone());
        let second = pass.run(block);
        assert_eq!(render(&first), render(&second));
        assert_eq!(render(&second)[1], "%v1 := x");
    }

    #[test]
    fn test_rerun_on_own_output_is_stable() {
        let pass = LocalValueNumbering::default();
        let block = parse_program("x := a + b\ny := a + b\na := c + d\nz := a + b\n").unwrap();

        let first = pass.run(block);
        let second = pass.run(first.statements().to_vec());

        assert_eq!(render(&second), render(&first));
        // the input already owns %v1, so fresh names start above it
        assert_eq!(second.values_allocated(), 3);
        assert_eq!(second.stats().dead_copies_removed, 3);
    }

    #[test]
    fn test_empty_block() {
        let translation = LocalValueNumbering::default().run(Vec::new());
        assert!(translation.statements().is_empty());
        assert!(translation.events().is_empty());
        assert!(translation.inputs().is_empty());
    }
}
