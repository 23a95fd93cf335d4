//! Canonical expression keys.
//!
//! Two binary expressions compute the same value when they apply the same operator to the
//! same (already substituted) operands. For commutative operators operand order does not
//! matter, so the key sorts the operands first:
//!
//! ```text
//! b + a   → a+b
//! a + b   → a+b
//! b - a   → b-a     (order kept)
//! ```

use std::fmt;

use crate::ir::{Ident, Op};

/// A hashable key representing a binary expression.
///
/// This captures the "value" of an expression, the operator and operands, but not the
/// destination. Two expressions with the same key compute the same value as long as none
/// of the operands has been reassigned in between.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprKey {
    op: Op,
    left: Ident,
    right: Ident,
}

impl ExprKey {
    /// Builds the canonical key for `left op right`.
    ///
    /// Operands of `+` and `*` are ordered by their text; `-` and `/` keep the given order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use valnum::{ir::{Ident, Op}, lvn::ExprKey};
    ///
    /// let a = Ident::new("a")?;
    /// let b = Ident::new("b")?;
    ///
    /// assert_eq!(
    ///     ExprKey::new(Op::Mul, b.clone(), a.clone()),
    ///     ExprKey::new(Op::Mul, a.clone(), b.clone())
    /// );
    /// assert_ne!(
    ///     ExprKey::new(Op::Div, b.clone(), a.clone()),
    ///     ExprKey::new(Op::Div, a, b)
    /// );
    /// # Ok::<(), valnum::Error>(())
    /// ```
    #[must_use]
    pub fn new(op: Op, left: Ident, right: Ident) -> Self {
        if op.is_commutative() && right < left {
            Self {
                op,
                left: right,
                right: left,
            }
        } else {
            Self { op, left, right }
        }
    }

    /// The operator.
    #[must_use]
    pub fn op(&self) -> Op {
        self.op
    }

    /// The operands in canonical order.
    #[must_use]
    pub fn operands(&self) -> [&Ident; 2] {
        [&self.left, &self.right]
    }
}

impl fmt::Display for ExprKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.op, self.right)
    }
}

/// A key of the value map.
///
/// The map holds two kinds of bindings: canonical expressions bound to the value name that
/// first computed them, and plain identifiers bound to the value they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    /// A canonical binary expression.
    Expr(ExprKey),
    /// An identifier assigned earlier in the block.
    Name(Ident),
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(key) => write!(f, "{key}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}
