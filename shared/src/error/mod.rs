//! Unified error system for the booking workspace
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Validation errors (contact / selection fields)
//! - 2xxx: Confirmation errors
//! - 3xxx: Delivery errors
//! - 4xxx: Booking errors
//! - 5xxx: Order errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CodeMismatch);
//! assert_eq!(err.code.code(), 2001);
//!
//! let err = AppError::validation("Please enter at least 2 characters")
//!     .with_detail("field", "name");
//! assert_eq!(err.field(), Some("name"));
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
