use legends_sms::SmsError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::storage::StorageError;

/// Confirmation flow errors
///
/// Every variant is recoverable: the session keeps its draft (or moves it to
/// a terminal state) and the caller shows a notification.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Form input rejected; carries the offending field
    #[error("Validation error: {0}")]
    Validation(AppError),

    #[error("Failed to deliver confirmation code: {0}")]
    DeliveryFailed(#[from] SmsError),

    #[error("Confirmation code does not match")]
    CodeMismatch,

    #[error("Confirmation window elapsed for draft {0}")]
    Expired(String),

    #[error("Resend limit reached ({0})")]
    RetryLimitExceeded(u32),

    #[error("Draft {0} is already awaiting confirmation")]
    DraftAlreadyPending(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    /// Snake-case kind for logs and analytics
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::Validation(_) => "validation_error",
            FlowError::DeliveryFailed(_) => "delivery_failed",
            FlowError::CodeMismatch => "code_mismatch",
            FlowError::Expired(_) => "expired",
            FlowError::RetryLimitExceeded(_) => "retry_limit_exceeded",
            FlowError::DraftAlreadyPending(_) => "draft_already_pending",
            FlowError::InvalidState(_) => "invalid_state",
            FlowError::Storage(_) => "storage",
            FlowError::Config(_) => "config",
        }
    }
}

impl From<AppError> for FlowError {
    fn from(err: AppError) -> Self {
        FlowError::Validation(err)
    }
}

impl From<&FlowError> for AppError {
    fn from(err: &FlowError) -> Self {
        match err {
            FlowError::Validation(e) => e.clone(),
            FlowError::DeliveryFailed(e) => {
                let code = if e.is_unavailable() {
                    ErrorCode::GatewayUnavailable
                } else {
                    ErrorCode::DeliveryFailed
                };
                AppError::with_message(code, ErrorCode::DeliveryFailed.message())
                    .with_detail("reason", e.to_string())
            }
            FlowError::CodeMismatch => {
                AppError::new(ErrorCode::CodeMismatch).with_detail("field", "code")
            }
            FlowError::Expired(id) => {
                AppError::new(ErrorCode::CodeExpired).with_detail("draft_id", id.as_str())
            }
            FlowError::RetryLimitExceeded(max) => {
                AppError::new(ErrorCode::RetryLimitExceeded).with_detail("max_resends", *max)
            }
            FlowError::DraftAlreadyPending(id) => {
                AppError::new(ErrorCode::DraftAlreadyPending).with_detail("draft_id", id.as_str())
            }
            FlowError::InvalidState(msg) => AppError::invalid_state(msg.as_str()),
            FlowError::Storage(e) => {
                tracing::error!(error = %e, "Storage error occurred");
                AppError::storage(e.to_string())
            }
            FlowError::Config(msg) => AppError::with_message(ErrorCode::ConfigError, msg.as_str()),
        }
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        AppError::from(&err)
    }
}
