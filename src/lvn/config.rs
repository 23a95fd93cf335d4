//! Configuration for the value numbering pass.

use std::collections::HashSet;

use crate::ir::Ident;

/// Configuration for [`crate::lvn::LocalValueNumbering`].
///
/// The defaults reproduce the classic behavior: annotate every eliminated expression, drop
/// synthetic copies nobody reads, and accept any identifier read before assignment as a
/// block input.
///
/// # Examples
///
/// ```rust
/// use valnum::{ir::Ident, lvn::LvnConfig};
///
/// let config = LvnConfig::default()
///     .annotate(false)
///     .declared_inputs([Ident::new("a")?, Ident::new("b")?]);
///
/// assert!(!config.annotates());
/// assert!(config.removes_dead_copies());
/// assert!(config.is_declared(&Ident::new("a")?));
/// assert!(!config.is_declared(&Ident::new("c")?));
/// # Ok::<(), valnum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LvnConfig {
    /// Attach a `Replaced <key> with <value>` annotation to rewritten statements (default: true).
    annotate: bool,

    /// Run the dead copy eliminator after numbering (default: true).
    remove_dead_copies: bool,

    /// Identifiers the block is allowed to read before assigning them.
    ///
    /// `None` (the default) accepts every such identifier as a block input.
    declared_inputs: Option<HashSet<Ident>>,
}

impl Default for LvnConfig {
    fn default() -> Self {
        Self {
            annotate: true,
            remove_dead_copies: true,
            declared_inputs: None,
        }
    }
}

impl LvnConfig {
    /// Enables or disables diagnostic annotations.
    #[must_use]
    pub fn annotate(mut self, enabled: bool) -> Self {
        self.annotate = enabled;
        self
    }

    /// Enables or disables dead copy elimination.
    #[must_use]
    pub fn remove_dead_copies(mut self, enabled: bool) -> Self {
        self.remove_dead_copies = enabled;
        self
    }

    /// Declares the identifiers that are live on entry to the block.
    ///
    /// Operands read before assignment that are not in this set are reported as
    /// [`crate::lvn::EventKind::UndeclaredInput`].
    #[must_use]
    pub fn declared_inputs(mut self, inputs: impl IntoIterator<Item = Ident>) -> Self {
        self.declared_inputs = Some(inputs.into_iter().collect());
        self
    }

    /// Returns `true` if rewritten statements get an annotation.
    #[must_use]
    pub fn annotates(&self) -> bool {
        self.annotate
    }

    /// Returns `true` if unused synthetic copies are dropped.
    #[must_use]
    pub fn removes_dead_copies(&self) -> bool {
        self.remove_dead_copies
    }

    /// Returns `true` if a declared input set is configured.
    #[must_use]
    pub fn has_declared_inputs(&self) -> bool {
        self.declared_inputs.is_some()
    }

    /// Returns `true` if `name` may be read before assignment.
    ///
    /// Without a declared input set every identifier qualifies.
    #[must_use]
    pub fn is_declared(&self, name: &Ident) -> bool {
        match &self.declared_inputs {
            Some(inputs) => inputs.contains(name),
            None => true,
        }
    }
}
