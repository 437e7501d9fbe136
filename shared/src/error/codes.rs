//! Unified error codes for the booking workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Validation errors
//! - 2xxx: Confirmation errors
//! - 3xxx: Delivery errors
//! - 4xxx: Booking errors
//! - 5xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values so the rendering layer can map them to
/// localized messages without parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Operation not allowed in the current state
    InvalidState = 4,

    // ==================== 1xxx: Validation ====================
    /// Name shorter than 2 characters
    InvalidName = 1001,
    /// Phone number is not syntactically valid
    InvalidPhone = 1002,
    /// Email address is not syntactically valid
    InvalidEmail = 1003,
    /// Entered confirmation code is not 6 digits
    InvalidCodeFormat = 1004,
    /// Required field missing
    RequiredField = 1005,
    /// Text exceeds its length limit
    TextTooLong = 1006,

    // ==================== 2xxx: Confirmation ====================
    /// Entered code does not match
    CodeMismatch = 2001,
    /// Confirmation window elapsed
    CodeExpired = 2002,
    /// Resend limit reached
    RetryLimitExceeded = 2003,
    /// A draft is already awaiting confirmation
    DraftAlreadyPending = 2005,

    // ==================== 3xxx: Delivery ====================
    /// Message could not be delivered
    DeliveryFailed = 3001,
    /// SMS gateway unreachable
    GatewayUnavailable = 3002,

    // ==================== 4xxx: Booking ====================
    /// Date/time selection missing or unavailable
    SlotUnavailable = 4001,
    /// Table selection missing or unavailable
    TableUnavailable = 4002,
    /// Party size out of range
    PartySizeOutOfRange = 4003,
    /// Date outside the bookable window
    DateOutOfRange = 4004,

    // ==================== 5xxx: Order ====================
    /// Order has no items
    OrderEmpty = 5001,
    /// Order item quantity invalid
    InvalidQuantity = 5002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default user-facing message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidState => "Operation not allowed right now",

            ErrorCode::InvalidName => "Please enter at least 2 characters",
            ErrorCode::InvalidPhone => "Please enter a valid phone number",
            ErrorCode::InvalidEmail => "Please enter a valid email address",
            ErrorCode::InvalidCodeFormat => "Please enter a 6-digit confirmation code",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TextTooLong => "Text is too long",

            ErrorCode::CodeMismatch => "Invalid confirmation code. Please try again.",
            ErrorCode::CodeExpired => "Confirmation timed out. Please start again.",
            ErrorCode::RetryLimitExceeded => {
                "Maximum retry attempts reached. Please start a new booking."
            }
            ErrorCode::DraftAlreadyPending => "A confirmation is already in progress",

            ErrorCode::DeliveryFailed => "Failed to send confirmation code. Please try again.",
            ErrorCode::GatewayUnavailable => "SMS service is unavailable",

            ErrorCode::SlotUnavailable => "Please select an available date and time",
            ErrorCode::TableUnavailable => "Please select an available table",
            ErrorCode::PartySizeOutOfRange => "Party size must be between 1 and 20",
            ErrorCode::DateOutOfRange => "Please select a date within the booking window",

            ErrorCode::OrderEmpty => "Please add at least one item to your order",
            ErrorCode::InvalidQuantity => "Item quantity must be at least 1",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::InvalidState),

            // Validation
            1001 => Ok(ErrorCode::InvalidName),
            1002 => Ok(ErrorCode::InvalidPhone),
            1003 => Ok(ErrorCode::InvalidEmail),
            1004 => Ok(ErrorCode::InvalidCodeFormat),
            1005 => Ok(ErrorCode::RequiredField),
            1006 => Ok(ErrorCode::TextTooLong),

            // Confirmation
            2001 => Ok(ErrorCode::CodeMismatch),
            2002 => Ok(ErrorCode::CodeExpired),
            2003 => Ok(ErrorCode::RetryLimitExceeded),
            2005 => Ok(ErrorCode::DraftAlreadyPending),

            // Delivery
            3001 => Ok(ErrorCode::DeliveryFailed),
            3002 => Ok(ErrorCode::GatewayUnavailable),

            // Booking
            4001 => Ok(ErrorCode::SlotUnavailable),
            4002 => Ok(ErrorCode::TableUnavailable),
            4003 => Ok(ErrorCode::PartySizeOutOfRange),
            4004 => Ok(ErrorCode::DateOutOfRange),

            // Order
            5001 => Ok(ErrorCode::OrderEmpty),
            5002 => Ok(ErrorCode::InvalidQuantity),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
