//! Sensitive data marker for automatic redaction
//!
//! Bound statement parameters carry user data (names, emails, tokens).
//! The gateway logs them wrapped in `Sensitive<T>` so SQL text can be
//! traced without leaking row contents.

use std::fmt;

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use rowbind_core_types::Sensitive;
///
/// let params = Sensitive::new(vec!["ada@example.com"]);
/// assert_eq!(format!("{:?}", params), "***REDACTED***");
/// assert_eq!(params.expose().len(), 1);
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
