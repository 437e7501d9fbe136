//! Error types for SMS delivery

use thiserror::Error;

/// SMS delivery error types
#[derive(Debug, Error)]
pub enum SmsError {
    /// Gateway could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Gateway did not answer in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Gateway answered with a non-success HTTP status
    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Gateway accepted the request but refused to send
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// Reply body could not be understood
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    /// Invalid channel configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl SmsError {
    /// Whether the gateway itself was unreachable (as opposed to refusing)
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SmsError::Connection(_) | SmsError::Timeout(_))
    }
}

/// Result type for SMS operations
pub type SmsResult<T> = Result<T, SmsError>;
