//! Delivery channel abstraction

use crate::error::SmsResult;
use async_trait::async_trait;
use shared::sms::SmsRequest;

/// Successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsReceipt {
    /// Provider message id (`mock-<millis>` for the mock channel)
    pub message_id: String,
}

/// Trait for SMS delivery adapters
///
/// Given (destination, message) report success or failure. Sends are never
/// aborted once started.
#[async_trait]
pub trait SmsChannel: Send + Sync {
    /// Deliver one message
    async fn send(&self, request: &SmsRequest) -> SmsResult<SmsReceipt>;

    /// Provider name for logs ("mock", "http")
    fn provider(&self) -> &'static str;
}
