//! Change tracking for the value numbering pass.
//!
//! Every decision the pass takes is recorded as an [`Event`] in an [`EventLog`]. The log is
//! what the CLI turns into its report and statistics; the output statements alone do not
//! say which computations were eliminated or which bindings were killed.
//!
//! ```rust,ignore
//! let mut log = EventLog::new();
//! log.record(EventKind::ExpressionEliminated)
//!     .at(3)
//!     .message("Replaced a+b with %v1");
//! ```

use std::fmt;

use strum::{Display, EnumIter, IntoEnumIterator};

/// The kind of change or observation an [`Event`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    /// A fresh value name was allocated for a first-seen expression.
    ValueNumbered,
    /// A redundant computation was rewritten into a copy of an existing value.
    ExpressionEliminated,
    /// A binding was removed because an operand it depended on was reassigned.
    BindingKilled,
    /// A synthetic copy was dropped because its value was never reused.
    DeadCopyRemoved,
    /// An operand was read before any assignment in the block.
    BlockInput,
    /// A block input that is not in the configured set of declared inputs.
    UndeclaredInput,
}

/// A single recorded change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    statement: Option<usize>,
    message: String,
}

impl Event {
    fn new(kind: EventKind) -> Self {
        Self {
            kind,
            statement: None,
            message: String::new(),
        }
    }

    /// Sets the 0-based index of the input statement this event belongs to.
    pub fn at(&mut self, statement: usize) -> &mut Self {
        self.statement = Some(statement);
        self
    }

    /// Sets the human readable description.
    pub fn message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = message.into();
        self
    }

    /// The event kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The 0-based input statement index, if the event is tied to one.
    #[must_use]
    pub fn statement(&self) -> Option<usize> {
        self.statement
    }

    /// The description.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.statement {
            Some(index) => write!(f, "[{}] #{index}: {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Ordered collection of [`Event`]s produced by one translation.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new event of `kind` and returns it for further annotation.
    pub fn record(&mut self, kind: EventKind) -> &mut Event {
        self.events.push(Event::new(kind));
        let last = self.events.len() - 1;
        &mut self.events[last]
    }

    /// Moves all events of `other` to the end of this log.
    pub fn merge(&mut self, other: EventLog) {
        self.events.extend(other.events);
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the events in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Number of events of the given kind.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Summarizes the log into per-kind counters.
    #[must_use]
    pub fn stats(&self) -> DerivedStats {
        let mut stats = DerivedStats::default();
        for kind in EventKind::iter() {
            let count = self.count(kind);
            match kind {
                EventKind::ValueNumbered => stats.values_numbered = count,
                EventKind::ExpressionEliminated => stats.expressions_eliminated = count,
                EventKind::BindingKilled => stats.bindings_killed = count,
                EventKind::DeadCopyRemoved => stats.dead_copies_removed = count,
                EventKind::BlockInput => stats.block_inputs = count,
                EventKind::UndeclaredInput => stats.undeclared_inputs = count,
            }
        }
        stats
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Per-kind counters derived from an [`EventLog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedStats {
    /// Fresh value names allocated
    pub values_numbered: usize,
    /// Redundant computations rewritten into copies
    pub expressions_eliminated: usize,
    /// Bindings removed by reassignment of an operand
    pub bindings_killed: usize,
    /// Unused synthetic copies dropped
    pub dead_copies_removed: usize,
    /// Distinct identifiers read before assignment
    pub block_inputs: usize,
    /// Block inputs missing from the declared input set
    pub undeclared_inputs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.record(EventKind::ValueNumbered).at(0).message("a+b -> %v1");
        log.record(EventKind::ExpressionEliminated)
            .at(1)
            .message("Replaced a+b with %v1");
        log.record(EventKind::ValueNumbered).at(2);

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(EventKind::ValueNumbered), 2);
        assert_eq!(log.count(EventKind::BindingKilled), 0);

        let first = log.iter().next().unwrap();
        assert_eq!(first.statement(), Some(0));
        assert_eq!(first.text(), "a+b -> %v1");
        assert_eq!(first.to_string(), "[value-numbered] #0: a+b -> %v1");
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a = EventLog::new();
        a.record(EventKind::BlockInput).message("a");
        let mut b = EventLog::new();
        b.record(EventKind::DeadCopyRemoved).message("%v2 := z");

        a.merge(b);
        let kinds: Vec<_> = a.iter().map(Event::kind).collect();
        assert_eq!(kinds, [EventKind::BlockInput, EventKind::DeadCopyRemoved]);
        assert_eq!(a.iter().nth(1).unwrap().to_string(), "[dead-copy-removed] %v2 := z");
    }

    #[test]
    fn test_stats() {
        let mut log = EventLog::new();
        log.record(EventKind::ExpressionEliminated);
        log.record(EventKind::ExpressionEliminated);
        log.record(EventKind::BindingKilled);
        log.record(EventKind::UndeclaredInput);

        let stats = log.stats();
        assert_eq!(stats.expressions_eliminated, 2);
        assert_eq!(stats.bindings_killed, 1);
        assert_eq!(stats.undeclared_inputs, 1);
        assert_eq!(stats.values_numbered, 0);
    }
}
