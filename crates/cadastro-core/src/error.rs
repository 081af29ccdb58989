//! Core error types for cadastro-rs.
//!
//! [`ValidationError`] carries a human-readable message plus a short code and is
//! what form fields report back to the user. [`CadastroError`] is the crate-wide
//! error enum that the other crates convert their own errors into.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A validation failure with a message meant for the end user.
///
/// The `code` identifies the kind of failure (e.g. `"required"`,
/// `"invalid_length"`) so callers can branch on it without matching the
/// (configurable, possibly translated) message text.
///
/// # Examples
///
/// ```
/// use cadastro_core::error::ValidationError;
///
/// let err = ValidationError::new("CPF é obrigatório", "invalid_length")
///     .with_param("found", "8");
/// assert_eq!(err.to_string(), "CPF é obrigatório");
/// assert_eq!(err.code, "invalid_length");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The message shown to the user.
    pub message: String,
    /// A short code identifying the type of validation failure.
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for cadastro-rs.
#[derive(Error, Debug)]
pub enum CadastroError {
    /// A value failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// Access to a protected view was denied.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<ValidationError> for CadastroError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, CadastroError>`.
pub type CadastroResult<T> = Result<T, CadastroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too short.", "invalid_length").with_param("found", "8");
        assert_eq!(err.params.get("found").unwrap(), "8");
    }

    #[test]
    fn test_cadastro_error_display() {
        let err = CadastroError::Unauthorized("session flag missing".into());
        assert_eq!(err.to_string(), "Unauthorized: session flag missing");

        let err: CadastroError = ValidationError::new("CPF é obrigatório", "invalid_length").into();
        assert_eq!(err.to_string(), "Validation error: CPF é obrigatório");
    }
}
