//! Application layer errors
//!
//! Field-level validation errors for form handling.

use serde::Serialize;
use std::fmt;

/// A single field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collection of field-level validation errors, in submission order.
/// A form is rejected as a unit: every failing field is reported so the
/// caller can re-present the whole form once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First error message recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_errors_in_order() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());

        errors.add("name", "This field is required.");
        errors.add("email", "Enter a valid email address.");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("This field is required."));
        assert_eq!(errors.get("budget"), None);

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[test]
    fn test_display_joins_errors() {
        let mut errors = FieldErrors::new();
        errors.add("name", "required");
        errors.add("email", "invalid");

        assert_eq!(errors.to_string(), "name: required; email: invalid");
    }
}
