//! Error types for Atelier

use thiserror::Error;

/// Result type alias using Atelier's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Atelier error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} '{1}' not found")]
    NotFound(&'static str, String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound("Project", "abc123".to_string());
        assert!(err.to_string().contains("Project"));
        assert!(err.to_string().contains("abc123"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_validation_display() {
        let err = Error::Validation("slug already taken".to_string());
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("slug already taken"));
    }
}
