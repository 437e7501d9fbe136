//! # legends-sms
//!
//! SMS delivery for confirmation codes - transport only.
//!
//! ## Scope
//!
//! This crate handles HOW a message reaches the customer:
//! - [`SmsChannel`] trait, the seam the confirmation flow depends on
//! - [`MockSmsChannel`] for demos and tests (artificial delay, always succeeds)
//! - [`HttpSmsChannel`] for a real gateway (`POST /api/send-sms`)
//! - Message templates and phone display helpers
//!
//! WHEN to send and what happens on failure stays in `booking-engine`.
//!
//! ## Example
//!
//! ```ignore
//! use legends_sms::{MockSmsChannel, SmsChannel};
//! use shared::sms::SmsRequest;
//!
//! let channel = MockSmsChannel::new(std::time::Duration::from_millis(1000));
//! let receipt = channel.send(&SmsRequest::new("0821234567", "Your code is 483920")).await?;
//! ```

mod channel;
mod error;
mod http;
mod mock;
pub mod template;

// Re-exports
pub use channel::{SmsChannel, SmsReceipt};
pub use error::{SmsError, SmsResult};
pub use http::HttpSmsChannel;
pub use mock::MockSmsChannel;
pub use template::{Branding, format_phone_display, mask_phone};
