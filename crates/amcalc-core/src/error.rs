use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated input constraint, reported against the wire field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum AmCalcError {
    #[error("Validation failed: {}", join_messages(.0))]
    ValidationFailed(Vec<ValidationError>),

    #[error("Invalid payment frequency: '{0}'")]
    InvalidFrequency(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AmCalcError {
    /// The collected field errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            AmCalcError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AmCalcError {
    fn from(e: serde_json::Error) -> Self {
        AmCalcError::SerializationError(e.to_string())
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_lists_every_message() {
        let err = AmCalcError::ValidationFailed(vec![
            ValidationError::new("principal", "Principal must be at least $1,000"),
            ValidationError::new("interestRate", "Interest rate cannot exceed 25%"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Principal must be at least $1,000, Interest rate cannot exceed 25%"
        );
        assert_eq!(err.validation_errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_invalid_frequency_has_no_field_errors() {
        let err = AmCalcError::InvalidFrequency("fortnightly".into());
        assert!(err.validation_errors().is_none());
        assert!(err.to_string().contains("fortnightly"));
    }
}
