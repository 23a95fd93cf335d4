//! The value numbering engine.
//!
//! The engine makes a single forward sweep over a basic block. For each statement it
//!
//! 1. substitutes every operand with the value it currently holds,
//! 2. builds the canonical [`ExprKey`] of the substituted expression,
//! 3. either rewrites the statement into a copy of the value already bound to that key, or
//!    allocates a fresh value name, binds the key to it and emits `value := result` right
//!    after the (unchanged) statement,
//! 4. kills every binding that depended on the identifier the statement overwrites,
//! 5. rebinds the result to the value of the expression.
//!
//! # Example
//!
//! ```text
//! x := a + b          x := a + b
//!                     %v1 := x
//! y := a + b    →     y := %v1      // Replaced a+b with %v1
//! a := c + d          a := c + d
//!                     %v2 := a      (dead, removed by cleanup)
//! z := a + b          z := a + b    (a was reassigned: %v2+b is a new key)
//!                     %v3 := z      (dead, removed by cleanup)
//! ```
//!
//! # State
//!
//! - the value map binds canonical expressions and assigned identifiers to value names,
//! - the dependency index lists, per plain identifier, the keys whose binding was computed
//!   from it (value names minted here are assigned exactly once and never need tracking),
//! - the used set collects value names that replaced at least one computation.
//!
//! All of it is owned by one [`Engine`], which handles exactly one translation.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use crate::{
    ir::{Ident, Op, Rhs, Statement},
    lvn::{
        key::{ExprKey, ValueKey},
        EventKind, EventLog, LvnConfig,
    },
};

/// Outcome of looking up an operand in the value map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The operand currently holds this value (a value name, or a plain identifier for
    /// copies of block inputs).
    Bound(Ident),

    /// The operand has not been assigned in this block so far; it is live on entry and
    /// stands for itself.
    BlockInput,

    /// The operand was assigned earlier in the block, but the binding was killed when the
    /// identifier it was copied from got reassigned. It stands for itself.
    Detached,
}

/// A live value map entry.
#[derive(Debug, Clone)]
struct Binding {
    /// Value the key is bound to
    value: Ident,
    /// Plain identifiers whose reassignment kills this binding
    depends_on: Vec<Ident>,
}

/// The statements emitted for one input statement.
///
/// Always the (possibly rewritten) statement itself, optionally followed by the synthetic
/// copy that records a freshly numbered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    statement: Statement,
    copy: Option<Statement>,
}

impl Emitted {
    /// The input statement, rewritten into a copy if it was redundant.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// The synthetic `value := result` copy, if a fresh value was allocated.
    #[must_use]
    pub fn copy(&self) -> Option<&Statement> {
        self.copy.as_ref()
    }

    /// Number of emitted statements, 1 or 2.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + usize::from(self.copy.is_some())
    }

    /// Never empty: the input statement is always emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl IntoIterator for Emitted {
    type Item = Statement;
    type IntoIter = std::iter::Chain<std::iter::Once<Statement>, std::option::IntoIter<Statement>>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self.statement).chain(self.copy)
    }
}

/// What an [`Engine`] leaves behind once the block has been processed.
#[derive(Debug, Clone, Default)]
pub struct EngineSummary {
    /// Value names substituted into at least one later statement
    pub used: HashSet<Ident>,
    /// Everything the engine recorded
    pub events: EventLog,
    /// Identifiers read before assignment, in first-use order
    pub inputs: Vec<Ident>,
    /// Block inputs not covered by the configured declared input set
    pub undeclared: Vec<Ident>,
    /// Number of value names allocated
    pub values_allocated: usize,
    /// Value names this engine allocated, as opposed to ones that came with the input
    pub minted: HashSet<Ident>,
}

/// Local value numbering state for a single basic block.
///
/// Call [`Engine::process`] once per statement, in source order, then hand the collected
/// output to [`crate::lvn::eliminate_dead_copies`] together with [`Engine::used`].
///
/// # Examples
///
/// ```rust
/// use valnum::{lvn::Engine, text::parse_program};
///
/// let block = parse_program("t1 := a + b\nt2 := b + a\n")?;
/// let mut engine = Engine::new();
///
/// let first = engine.process(block[0].clone());
/// assert_eq!(first.len(), 2);
///
/// let second = engine.process(block[1].clone());
/// assert_eq!(second.statement().to_string(), "t2 := %v1 // Replaced a+b with %v1");
/// assert!(engine.is_used(&valnum::ir::Ident::value_number(1)));
/// # Ok::<(), valnum::Error>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    /// Canonical expression or identifier → bound value
    values: HashMap<ValueKey, Binding>,
    /// Plain identifier → keys whose binding depends on it
    dependents: HashMap<Ident, Vec<ValueKey>>,
    /// Value names substituted into a later statement
    used: HashSet<Ident>,
    /// Highest value index allocated or reserved so far
    allocated: usize,
    /// Value names allocated by this engine
    minted: HashSet<Ident>,
    /// Number of value names allocated by this engine
    fresh: usize,
    /// Identifiers assigned so far
    defined: HashSet<Ident>,
    /// Block inputs in first-use order
    inputs: Vec<Ident>,
    seen_inputs: HashSet<Ident>,
    undeclared: Vec<Ident>,
    /// Index of the next input statement
    position: usize,
    events: EventLog,
    config: LvnConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LvnConfig::default())
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: LvnConfig) -> Self {
        Self {
            values: HashMap::new(),
            dependents: HashMap::new(),
            used: HashSet::new(),
            allocated: 0,
            minted: HashSet::new(),
            fresh: 0,
            defined: HashSet::new(),
            inputs: Vec::new(),
            seen_inputs: HashSet::new(),
            undeclared: Vec::new(),
            position: 0,
            events: EventLog::new(),
            config,
        }
    }

    /// Processes the next statement of the block.
    ///
    /// Must be called exactly once per statement, in source order. Never fails: every
    /// operand is either bound or treated as standing for itself.
    pub fn process(&mut self, statement: Statement) -> Emitted {
        self.reserve([&statement]);
        let index = self.position;
        self.position += 1;

        let emitted = match statement.rhs().clone() {
            Rhs::Binary { op, left, right } => {
                self.process_binary(index, statement, op, &left, &right)
            }
            Rhs::Copy(source) => self.process_copy(index, statement, &source),
        };

        trace!("#{index}: {}", emitted.statement);
        if let Some(copy) = &emitted.copy {
            trace!("#{index}: {copy}");
        }
        emitted
    }

    /// Processes a whole block and returns every emitted statement, in order.
    ///
    /// Dead copies are still present in the result.
    pub fn process_all(&mut self, statements: impl IntoIterator<Item = Statement>) -> Vec<Statement> {
        let statements: Vec<Statement> = statements.into_iter().collect();
        self.reserve(&statements);

        let mut out = Vec::with_capacity(statements.len() * 2);
        for statement in statements {
            out.extend(self.process(statement));
        }
        out
    }

    /// Keeps fresh value names clear of every `%v` name the given statements mention.
    ///
    /// A block that already went through the pass carries value names of its own. They
    /// are ordinary identifiers to this engine, so allocation continues above the highest
    /// index found. [`Engine::process_all`] reserves the whole block up front; a caller
    /// feeding [`Engine::process`] one statement at a time should reserve first.
    pub fn reserve<'a>(&mut self, statements: impl IntoIterator<Item = &'a Statement>) {
        for statement in statements {
            let names = std::iter::once(statement.result()).chain(statement.operands());
            for name in names {
                let Some(index) = name.value_index() else {
                    continue;
                };
                if index > self.allocated && !self.minted.contains(name) {
                    trace!("reserving value index {index} used by the input");
                    self.allocated = index;
                }
            }
        }
    }

    /// Returns `true` if this engine allocated `value`.
    #[must_use]
    pub fn is_minted(&self, value: &Ident) -> bool {
        self.minted.contains(value)
    }

    /// Looks up the current value of an operand without changing any state.
    #[must_use]
    pub fn resolve(&self, operand: &Ident) -> Resolution {
        match self.values.get(&ValueKey::Name(operand.clone())) {
            Some(binding) => Resolution::Bound(binding.value.clone()),
            None if self.defined.contains(operand) => Resolution::Detached,
            None => Resolution::BlockInput,
        }
    }

    /// Returns the value name bound to `key`, if the binding is live.
    #[must_use]
    pub fn lookup(&self, key: &ValueKey) -> Option<&Ident> {
        self.values.get(key).map(|binding| &binding.value)
    }

    /// Returns the keys whose live binding depends on `operand`.
    #[must_use]
    pub fn dependents(&self, operand: &Ident) -> &[ValueKey] {
        match self.dependents.get(operand) {
            Some(keys) => keys,
            None => &[],
        }
    }

    /// Value names substituted into at least one later statement.
    #[must_use]
    pub fn used(&self) -> &HashSet<Ident> {
        &self.used
    }

    /// Returns `true` if `value` has been substituted into a later statement.
    #[must_use]
    pub fn is_used(&self, value: &Ident) -> bool {
        self.used.contains(value)
    }

    /// Identifiers read before assignment, in first-use order.
    #[must_use]
    pub fn inputs(&self) -> &[Ident] {
        &self.inputs
    }

    /// Number of value names allocated so far.
    #[must_use]
    pub fn values_allocated(&self) -> usize {
        self.fresh
    }

    /// The events recorded so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Consumes the engine, keeping what the cleanup pass and the caller need.
    #[must_use]
    pub fn finish(self) -> EngineSummary {
        EngineSummary {
            used: self.used,
            events: self.events,
            inputs: self.inputs,
            undeclared: self.undeclared,
            values_allocated: self.fresh,
            minted: self.minted,
        }
    }

    fn process_binary(
        &mut self,
        index: usize,
        statement: Statement,
        op: Op,
        left: &Ident,
        right: &Ident,
    ) -> Emitted {
        let result = statement.result().clone();
        let left_value = self.substitute(index, left);
        let right_value = self.substitute(index, right);
        let key = ExprKey::new(op, left_value, right_value);
        let lookup = ValueKey::Expr(key.clone());

        let (value, statement, copy) = match self.values.get(&lookup) {
            Some(binding) => {
                let value = binding.value.clone();
                let note = format!("Replaced {key} with {value}");
                debug!("#{index}: {note}");
                self.events
                    .record(EventKind::ExpressionEliminated)
                    .at(index)
                    .message(note.clone());
                self.used.insert(value.clone());

                let mut rewritten = Statement::copy(result.clone(), value.clone());
                if self.config.annotates() {
                    rewritten = rewritten.with_annotation(note);
                }
                (value, rewritten, None)
            }
            None => {
                let value = self.allocate();
                let mut depends_on: Vec<Ident> = key
                    .operands()
                    .into_iter()
                    .filter(|operand| !self.minted.contains(*operand))
                    .cloned()
                    .collect();
                depends_on.dedup();
                self.bind(lookup, value.clone(), depends_on);
                self.events
                    .record(EventKind::ValueNumbered)
                    .at(index)
                    .message(format!("{key} -> {value}"));

                let copy = Statement::copy(value.clone(), result.clone());
                (value, statement, Some(copy))
            }
        };

        self.kill(index, &result);
        self.bind_name(result, value);

        Emitted { statement, copy }
    }

    fn process_copy(&mut self, index: usize, statement: Statement, source: &Ident) -> Emitted {
        let result = statement.result().clone();
        if &result == source {
            // x := x leaves every binding intact
            if self.resolve(source) == Resolution::BlockInput {
                self.note_input(index, source);
            }
            return Emitted {
                statement,
                copy: None,
            };
        }

        let value = self.substitute(index, source);
        self.kill(index, &result);
        self.bind_name(result, value);

        Emitted {
            statement,
            copy: None,
        }
    }

    /// Resolves an operand for key purposes, noting block inputs on first use.
    fn substitute(&mut self, index: usize, operand: &Ident) -> Ident {
        match self.resolve(operand) {
            Resolution::Bound(value) => value,
            Resolution::BlockInput => {
                self.note_input(index, operand);
                operand.clone()
            }
            Resolution::Detached => operand.clone(),
        }
    }

    fn note_input(&mut self, index: usize, operand: &Ident) {
        if !self.seen_inputs.insert(operand.clone()) {
            return;
        }
        self.inputs.push(operand.clone());
        self.events
            .record(EventKind::BlockInput)
            .at(index)
            .message(operand.to_string());

        if !self.config.is_declared(operand) {
            warn!("#{index}: `{operand}` is read before assignment and is not a declared input");
            self.undeclared.push(operand.clone());
            self.events
                .record(EventKind::UndeclaredInput)
                .at(index)
                .message(operand.to_string());
        }
    }

    fn allocate(&mut self) -> Ident {
        self.allocated += 1;
        self.fresh += 1;
        let value = Ident::value_number(self.allocated);
        self.minted.insert(value.clone());
        value
    }

    /// Binds `key` and registers it with the dependency index.
    fn bind(&mut self, key: ValueKey, value: Ident, depends_on: Vec<Ident>) {
        for operand in &depends_on {
            self.dependents
                .entry(operand.clone())
                .or_default()
                .push(key.clone());
        }
        self.values.insert(key, Binding { value, depends_on });
    }

    /// Binds an assigned identifier to the value it now holds.
    fn bind_name(&mut self, name: Ident, value: Ident) {
        let key = ValueKey::Name(name.clone());
        self.unbind(&key);
        self.defined.insert(name.clone());

        if value == name {
            // holds its own value again, same as an unbound operand
            return;
        }
        let depends_on = if self.minted.contains(&value) {
            Vec::new()
        } else {
            vec![value.clone()]
        };
        self.bind(key, value, depends_on);
    }

    /// Removes a binding and every dependency index entry pointing at it.
    fn unbind(&mut self, key: &ValueKey) -> Option<Binding> {
        let binding = self.values.remove(key)?;
        for operand in &binding.depends_on {
            let now_empty = match self.dependents.get_mut(operand) {
                Some(keys) => {
                    keys.retain(|k| k != key);
                    keys.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.dependents.remove(operand);
            }
        }
        Some(binding)
    }

    /// Kills every binding computed from the old value of `name`.
    fn kill(&mut self, index: usize, name: &Ident) {
        let keys = match self.dependents.remove(name) {
            Some(keys) => keys,
            None => return,
        };

        for key in keys {
            match self.unbind(&key) {
                Some(binding) => {
                    debug!("#{index}: `{name}` reassigned, killing {key} ({})", binding.value);
                    self.events
                        .record(EventKind::BindingKilled)
                        .at(index)
                        .message(format!("{key} ({})", binding.value));
                }
                None => {
                    // each key is listed once per operand, and unbind clears the others
                    debug_assert!(false, "stale dependency entry for {key}");
                }
            }
        }
    }
}
