//! Shared types for the Legends booking workspace
//!
//! Domain models, error codes, SMS wire types and small utilities used by
//! both `legends-sms` and `booking-engine`.

pub mod error;
pub mod models;
pub mod notification;
pub mod sms;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    BookingSelection, ConfirmationCode, Contact, Draft, DraftKind, DraftStatus, OrderItem,
    OrderSelection, OrderType, Selection, TableRef,
};
pub use notification::{Notification, NotificationLevel};
