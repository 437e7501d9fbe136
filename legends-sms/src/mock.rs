//! Mock channel: logs instead of sending

use crate::channel::{SmsChannel, SmsReceipt};
use crate::error::SmsResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::sms::SmsRequest;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::template::mask_phone;

/// Demo channel that simulates gateway latency and always succeeds.
///
/// Every message is kept in an in-memory outbox; clones share it.
#[derive(Debug, Clone)]
pub struct MockSmsChannel {
    delay: Duration,
    outbox: Arc<Mutex<Vec<SmsRequest>>>,
}

impl MockSmsChannel {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<SmsRequest> {
        self.outbox.lock().clone()
    }

    /// Most recent message sent to `to`
    pub fn last_message_to(&self, to: &str) -> Option<SmsRequest> {
        self.outbox.lock().iter().rev().find(|m| m.to == to).cloned()
    }
}

impl Default for MockSmsChannel {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl SmsChannel for MockSmsChannel {
    #[instrument(skip_all, fields(to = %mask_phone(&request.to)))]
    async fn send(&self, request: &SmsRequest) -> SmsResult<SmsReceipt> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        info!(body = %request.message, "SMS (mock)");
        self.outbox.lock().push(request.clone());

        Ok(SmsReceipt {
            message_id: format!("mock-{}", shared::util::now_millis()),
        })
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
