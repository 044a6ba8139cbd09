//! # Error Types
//!
//! Structured error types for knit_core. Every error names the field or
//! calculation it concerns so callers (web handlers, the CLI, scripts) can
//! map it back onto the input that caused it.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::errors::{PatternError, PatternResult};
//!
//! fn require_positive_width(width_cm: f64) -> PatternResult<()> {
//!     if width_cm <= 0.0 {
//!         return Err(PatternError::invalid_input(
//!             "width_cm",
//!             width_cm.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationIssue;

/// Result type alias for knit_core operations
pub type PatternResult<T> = Result<T, PatternError>;

/// Structured error type for validation and calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PatternError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The input validator reported fatal errors; calculation did not run
    #[error("Validation failed with {} error(s)", errors.len())]
    ValidationFailed { errors: Vec<ValidationIssue> },

    /// A gauge or yarn reference could not be resolved to usable values
    #[error("Could not resolve {what}: {reason}")]
    ResolutionFailed { what: String, reason: String },

    /// Calculation could not produce a result
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PatternError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PatternError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        PatternError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ResolutionFailed error
    pub fn resolution_failed(what: impl Into<String>, reason: impl Into<String>) -> Self {
        PatternError::ResolutionFailed {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        PatternError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PatternError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Field-scoped messages for display, one per line item.
    ///
    /// Validation failures expand to every collected error; all other
    /// variants yield their own display string.
    pub fn messages(&self) -> Vec<String> {
        match self {
            PatternError::ValidationFailed { errors } => {
                errors.iter().map(|issue| issue.to_string()).collect()
            }
            other => vec![other.to_string()],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PatternError::InvalidInput { .. } => "INVALID_INPUT",
            PatternError::MissingField { .. } => "MISSING_FIELD",
            PatternError::ValidationFailed { .. } => "VALIDATION_FAILED",
            PatternError::ResolutionFailed { .. } => "RESOLUTION_FAILED",
            PatternError::CalculationFailed { .. } => "CALCULATION_FAILED",
            PatternError::FileError { .. } => "FILE_ERROR",
            PatternError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PatternError::VersionMismatch { .. } => "VERSION_MISMATCH",
            PatternError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for PatternError {
    fn from(e: serde_json::Error) -> Self {
        PatternError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Severity, ValidationIssue};

    #[test]
    fn test_error_serialization() {
        let error = PatternError::invalid_input("gauge.stitches_per_10cm", "-5", "Must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: PatternError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PatternError::missing_field("gauge").error_code(), "MISSING_FIELD");
        assert_eq!(
            PatternError::resolution_failed("yarn", "no profile").error_code(),
            "RESOLUTION_FAILED"
        );
    }

    #[test]
    fn test_validation_failed_messages() {
        let error = PatternError::ValidationFailed {
            errors: vec![
                ValidationIssue::new("gauge.rows_per_10cm", "Must be positive", Severity::Error),
                ValidationIssue::new("components", "At least one component is required", Severity::Error),
            ],
        };
        assert_eq!(error.to_string(), "Validation failed with 2 error(s)");
        let messages = error.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("gauge.rows_per_10cm"));
    }
}
