//! Binary arithmetic operators of the three-address form.

use strum::{Display, EnumIter, EnumString};

/// A binary arithmetic operator.
///
/// Copies carry no operator at all (see [`crate::ir::Rhs::Copy`]), so there is no
/// "none" variant here.
///
/// The textual form used by the parser and the renderer comes from the `strum`
/// derives:
///
/// ```rust
/// use std::str::FromStr;
/// use valnum::ir::Op;
///
/// assert_eq!(Op::from_str("*").unwrap(), Op::Mul);
/// assert_eq!(Op::Sub.to_string(), "-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum Op {
    /// Addition, `+`
    #[strum(serialize = "+")]
    Add,
    /// Subtraction, `-`
    #[strum(serialize = "-")]
    Sub,
    /// Multiplication, `*`
    #[strum(serialize = "*")]
    Mul,
    /// Division, `/`
    #[strum(serialize = "/")]
    Div,
}

impl Op {
    /// Returns `true` if the operands of this operator can be swapped.
    #[must_use]
    pub const fn is_commutative(&self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }

    /// Returns the operator for a single character, if it is one.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }
}
