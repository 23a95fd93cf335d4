//! Three-address statements.

use std::fmt;

use crate::ir::{Ident, Op};

/// The right-hand side of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rhs {
    /// `left op right`
    Binary {
        /// The arithmetic operator
        op: Op,
        /// First operand
        left: Ident,
        /// Second operand
        right: Ident,
    },

    /// A plain copy of another name.
    Copy(Ident),
}

/// One statement of a basic block: `result := rhs`, with an optional diagnostic annotation.
///
/// The annotation is attached by the value numbering engine when it rewrites a redundant
/// computation, and is rendered as a trailing `// ...` comment.
///
/// # Examples
///
/// ```rust
/// use valnum::ir::{Ident, Op, Statement};
///
/// let x = Ident::new("x")?;
/// let a = Ident::new("a")?;
/// let b = Ident::new("b")?;
///
/// let stmt = Statement::binary(x.clone(), Op::Add, a.clone(), b);
/// assert_eq!(stmt.to_string(), "x := a + b");
/// assert_eq!(stmt.operator(), Some(Op::Add));
///
/// let copy = Statement::copy(x, a).with_annotation("note");
/// assert_eq!(copy.to_string(), "x := a // note");
/// assert_eq!(copy.operator(), None);
/// assert!(copy.operand2().is_none());
/// # Ok::<(), valnum::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    result: Ident,
    rhs: Rhs,
    annotation: Option<String>,
}

impl Statement {
    /// Creates `result := left op right`.
    #[must_use]
    pub fn binary(result: Ident, op: Op, left: Ident, right: Ident) -> Self {
        Self {
            result,
            rhs: Rhs::Binary { op, left, right },
            annotation: None,
        }
    }

    /// Creates `result := source`.
    #[must_use]
    pub fn copy(result: Ident, source: Ident) -> Self {
        Self {
            result,
            rhs: Rhs::Copy(source),
            annotation: None,
        }
    }

    /// Attaches a diagnostic annotation, replacing any previous one.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Drops the annotation, if any.
    #[must_use]
    pub fn without_annotation(mut self) -> Self {
        self.annotation = None;
        self
    }

    /// The identifier this statement assigns.
    #[must_use]
    pub fn result(&self) -> &Ident {
        &self.result
    }

    /// The right-hand side.
    #[must_use]
    pub fn rhs(&self) -> &Rhs {
        &self.rhs
    }

    /// The operator, or `None` for a copy.
    #[must_use]
    pub fn operator(&self) -> Option<Op> {
        match &self.rhs {
            Rhs::Binary { op, .. } => Some(*op),
            Rhs::Copy(_) => None,
        }
    }

    /// The first operand (the copy source for copies).
    #[must_use]
    pub fn operand1(&self) -> &Ident {
        match &self.rhs {
            Rhs::Binary { left, .. } => left,
            Rhs::Copy(source) => source,
        }
    }

    /// The second operand, absent for copies.
    #[must_use]
    pub fn operand2(&self) -> Option<&Ident> {
        match &self.rhs {
            Rhs::Binary { right, .. } => Some(right),
            Rhs::Copy(_) => None,
        }
    }

    /// The diagnostic annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Returns `true` for `result := source`.
    #[must_use]
    pub fn is_copy(&self) -> bool {
        matches!(self.rhs, Rhs::Copy(_))
    }

    /// Iterates over the identifiers read by this statement, in operand order.
    pub fn operands(&self) -> impl Iterator<Item = &Ident> {
        std::iter::once(self.operand1()).chain(self.operand2())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rhs {
            Rhs::Binary { op, left, right } => {
                write!(f, "{} := {left} {op} {right}", self.result)?;
            }
            Rhs::Copy(source) => write!(f, "{} := {source}", self.result)?,
        }
        if let Some(annotation) = &self.annotation {
            write!(f, " // {annotation}")?;
        }
        Ok(())
    }
}
