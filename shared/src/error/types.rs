//! Error types

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The primary error type handed to the rendering layer:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (`field` for inline validation errors)
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Offending field name, if this error is bound to one
    pub fn field(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get("field"))
            .and_then(Value::as_str)
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a field-bound validation error
    pub fn field_invalid(code: ErrorCode, field: &str) -> Self {
        Self::new(code).with_detail("field", field)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidState, msg)
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }
}

/// Result alias used across crates
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::CodeMismatch);
        assert_eq!(err.code, ErrorCode::CodeMismatch);
        assert_eq!(err.message, "Invalid confirmation code. Please try again.");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::field_invalid(ErrorCode::InvalidPhone, "phone");
        assert_eq!(err.field(), Some("phone"));
        assert_eq!(err.to_string(), "Please enter a valid phone number");
    }

    #[test]
    fn test_app_error_not_found() {
        let err = AppError::not_found("Draft BK123456");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Draft BK123456 not found");
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_app_error_serialize() {
        let err = AppError::new(ErrorCode::RetryLimitExceeded);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 2003);
        assert!(json.get("details").is_none());

        let back: AppError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
