//! Client-side form validation errors.
//!
//! Validation errors are resolved locally by the initiating screen and
//! displayed inline; they never reach a global error state and are never
//! sent over the wire.

use thiserror::Error;

/// A client-side form check that failed before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// The offending form field.
    pub field: &'static str,
    /// Human-readable reason, suitable for inline display.
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ValidationError::new("rating", "must be between 1 and 5");
        assert_eq!(err.to_string(), "invalid rating: must be between 1 and 5");
    }
}
