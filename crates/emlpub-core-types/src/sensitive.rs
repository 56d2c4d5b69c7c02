//! Sensitive data marker for automatic redaction
//!
//! The repository password travels inside `Credentials`, which derives
//! `Debug`; wrapping it in `Sensitive<T>` keeps it out of logs and error
//! messages.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use emlpub_core_types::Sensitive;
///
/// let password = Sensitive::new("hunter2");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.expose(), &"hunter2");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value, e.g. when building an auth header
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
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

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_redaction() {
        let secret = Sensitive::new("pasta-password");
        let debug_str = format!("{:?}", secret);
        assert_eq!(debug_str, "***REDACTED***");
        assert!(!debug_str.contains("pasta"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let secret = Sensitive::new("sqlite:///var/lib/runs.db");
        assert_eq!(format!("{}", secret), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_into_inner() {
        let secret: Sensitive<String> = String::from("test").into();
        assert_eq!(secret.expose(), "test");
        assert_eq!(secret.into_inner(), "test");
    }

    #[test]
    fn test_sensitive_inside_derived_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            username: String,
            password: Sensitive<String>,
        }

        let creds = Credentials {
            username: "curator".to_string(),
            password: Sensitive::new("secret123".to_string()),
        };

        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("curator"));
        assert!(debug_str.contains("***REDACTED***"));
        assert!(!debug_str.contains("secret123"));
    }
}
