//! Dead copy elimination.
//!
//! The engine emits `%vN := result` after every first evaluation of an expression, whether
//! or not the value is reused later. This pass drops the copies whose value name never made
//! it into the used set. Everything else, including user copies, is kept in order.
//!
//! Before:
//! ```text
//! x := a + b
//! %v1 := x
//! y := %v1
//! a := c + d
//! %v2 := a
//! ```
//!
//! After:
//! ```text
//! x := a + b
//! %v1 := x
//! y := %v1
//! a := c + d
//! ```

use std::collections::HashSet;

use log::debug;

use crate::{
    ir::{Ident, Statement},
    lvn::{EventKind, EventLog},
};

/// Removes synthetic copies whose value name is not in `used`.
///
/// A statement is dropped if and only if its result is a value name absent from `used`.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
/// use valnum::{ir::{Ident, Statement}, lvn::eliminate_dead_copies};
///
/// let x = Ident::new("x")?;
/// let block = vec![
///     Statement::copy(Ident::value_number(1), x.clone()),
///     Statement::copy(Ident::value_number(2), x.clone()),
/// ];
/// let used: HashSet<_> = [Ident::value_number(2)].into();
///
/// let kept = eliminate_dead_copies(block, &used);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].result(), &Ident::value_number(2));
/// # Ok::<(), valnum::Error>(())
/// ```
#[must_use]
pub fn eliminate_dead_copies(statements: Vec<Statement>, used: &HashSet<Ident>) -> Vec<Statement> {
    let mut scratch = EventLog::new();
    eliminate_dead_copies_logged(statements, used, Ident::is_value_number, &mut scratch)
}

/// Same as [`eliminate_dead_copies`], restricted to results for which `synthesized` holds
/// and recording a [`EventKind::DeadCopyRemoved`] event per dropped statement.
///
/// The driver passes the engine's minted set, so value names that were already part of
/// the input block are never dropped.
pub(crate) fn eliminate_dead_copies_logged(
    statements: Vec<Statement>,
    used: &HashSet<Ident>,
    synthesized: impl Fn(&Ident) -> bool,
    events: &mut EventLog,
) -> Vec<Statement> {
    let mut kept = Vec::with_capacity(statements.len());
    for statement in statements {
        let result = statement.result();
        if synthesized(result) && !used.contains(result) {
            debug!("dropping unused copy `{statement}`");
            events
                .record(EventKind::DeadCopyRemoved)
                .message(statement.to_string());
            continue;
        }
        kept.push(statement);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Op;

    fn id(name: &str) -> Ident {
        Ident::new(name).unwrap()
    }

    #[test]
    fn test_keeps_user_statements() {
        let block = vec![
            Statement::binary(id("x"), Op::Add, id("a"), id("b")),
            Statement::copy(id("y"), id("x")),
        ];
        let kept = eliminate_dead_copies(block.clone(), &HashSet::new());
        assert_eq!(kept, block);
    }

    #[test]
    fn test_drops_only_unused_value_copies() {
        let v1 = Ident::value_number(1);
        let v2 = Ident::value_number(2);
        let block = vec![
            Statement::binary(id("x"), Op::Add, id("a"), id("b")),
            Statement::copy(v1.clone(), id("x")),
            Statement::copy(id("y"), v1.clone()),
            Statement::binary(id("a"), Op::Mul, id("c"), id("d")),
            Statement::copy(v2, id("a")),
        ];
        let used: HashSet<Ident> = [v1].into();

        let mut events = EventLog::new();
        let kept =
            eliminate_dead_copies_logged(block.clone(), &used, Ident::is_value_number, &mut events);

        assert_eq!(kept, block[..4]);
        assert_eq!(events.count(EventKind::DeadCopyRemoved), 1);
        assert_eq!(events.iter().next().unwrap().text(), "%v2 := a");
    }

    #[test]
    fn test_keeps_value_names_not_synthesized() {
        let v1 = Ident::value_number(1);
        let v2 = Ident::value_number(2);
        let block = vec![
            Statement::copy(v1.clone(), id("x")),
            Statement::copy(v2.clone(), id("x")),
        ];
        let minted: HashSet<Ident> = [v2].into();

        let mut events = EventLog::new();
        let kept = eliminate_dead_copies_logged(
            block.clone(),
            &HashSet::new(),
            |name| minted.contains(name),
            &mut events,
        );

        assert_eq!(kept, block[..1]);
        assert_eq!(events.count(EventKind::DeadCopyRemoved), 1);
    }

    #[test]
    fn test_empty_block() {
        assert!(eliminate_dead_copies(Vec::new(), &HashSet::new()).is_empty());
    }
}
