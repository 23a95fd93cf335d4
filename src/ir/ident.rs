//! Identifiers and synthetic value names.
//!
//! Every name appearing in a statement is an [`Ident`]. User identifiers come from the
//! program text and are restricted to `[A-Za-z_0-9]+`. Value names are minted by the
//! value numbering engine and carry the reserved [`VALUE_PREFIX`], which contains a
//! character no user identifier can contain. The two namespaces therefore never overlap.
//!
//! Identifiers are compared, hashed and ordered by their text only: two identifiers with
//! equal text are the same identifier. The text is shared behind an [`Arc`], so cloning an
//! identifier into the value map, the dependency index and the emitted statements is cheap.

use std::{fmt, sync::Arc};

use crate::Result;

/// Prefix of every synthetic value name, followed by the 1-based allocation index.
///
/// `%` is outside the identifier grammar, so a value name can never be confused with a
/// name written by the user.
pub const VALUE_PREFIX: &str = "%v";

/// An opaque, cheaply clonable name.
///
/// # Examples
///
/// ```rust
/// use valnum::ir::Ident;
///
/// let a = Ident::new("a")?;
/// assert_eq!(a.as_str(), "a");
/// assert!(!a.is_value_number());
///
/// let v = Ident::value_number(3);
/// assert_eq!(v.to_string(), "%v3");
/// assert_eq!(v.value_index(), Some(3));
/// # Ok::<(), valnum::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(Arc<str>);

impl Ident {
    /// Creates a user identifier.
    ///
    /// # Arguments
    ///
    /// * `name` - The identifier text, `[A-Za-z_0-9]+`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if `name` is empty or contains a character
    /// outside the identifier alphabet (which includes the reserved value-name prefix).
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(malformed_error!("identifier must not be empty"));
        }
        if let Some(bad) = name.chars().find(|c| !is_ident_char(*c)) {
            return Err(malformed_error!(
                "identifier `{}` contains invalid character `{}`",
                name,
                bad
            ));
        }
        Ok(Self(Arc::from(name)))
    }

    /// Creates the synthetic value name for the given allocation index.
    ///
    /// Indices start at 1. Only the value numbering engine allocates indices; this
    /// constructor exists so callers can refer to a known value name.
    #[must_use]
    pub fn value_number(index: usize) -> Self {
        Self(Arc::from(format!("{VALUE_PREFIX}{index}")))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is a synthetic value name.
    #[must_use]
    pub fn is_value_number(&self) -> bool {
        self.0.starts_with(VALUE_PREFIX)
    }

    /// Returns the allocation index of a synthetic value name.
    ///
    /// Returns `None` for user identifiers.
    #[must_use]
    pub fn value_index(&self) -> Option<usize> {
        self.0.strip_prefix(VALUE_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `true` for characters allowed in a user identifier.
#[must_use]
pub const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_ident_equality_by_text() {
        let a1 = Ident::new("alpha").unwrap();
        let a2 = Ident::new("alpha").unwrap();
        let b = Ident::new("beta").unwrap();

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert!(a1 < b);
    }

    #[test]
    fn test_ident_rejects_invalid() {
        assert!(matches!(Ident::new(""), Err(Error::Malformed { .. })));
        assert!(matches!(Ident::new("a-b"), Err(Error::Malformed { .. })));
        assert!(matches!(Ident::new("%v1"), Err(Error::Malformed { .. })));
        assert!(Ident::new("_tmp42").is_ok());
        assert!(Ident::new("42").is_ok());
    }

    #[test]
    fn test_value_number_naming() {
        let v = Ident::value_number(12);
        assert_eq!(v.as_str(), "%v12");
        assert!(v.is_value_number());
        assert_eq!(v.value_index(), Some(12));

        // A user identifier spelled like the prefix without `%` is not a value name
        let user = Ident::new("v12").unwrap();
        assert!(!user.is_value_number());
        assert_eq!(user.value_index(), None);
    }
}
