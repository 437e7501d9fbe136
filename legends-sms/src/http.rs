//! HTTP gateway channel
//!
//! `POST {base_url}/api/send-sms` with `{to, message}`; the gateway replies
//! `{success, messageId}` or `{success: false, error}`.

use crate::channel::{SmsChannel, SmsReceipt};
use crate::error::{SmsError, SmsResult};
use async_trait::async_trait;
use shared::sms::{SmsRequest, SmsResponse};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::template::mask_phone;

const SEND_PATH: &str = "/api/send-sms";

/// Production channel backed by an HTTP SMS gateway
#[derive(Debug, Clone)]
pub struct HttpSmsChannel {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSmsChannel {
    /// Create a channel for the gateway at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> SmsResult<Self> {
        let base = base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(SmsError::InvalidConfig(format!(
                "Invalid gateway URL: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SmsError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: format!("{}{}", base, SEND_PATH),
            client,
        })
    }

    /// Full URL messages are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SmsChannel for HttpSmsChannel {
    #[instrument(skip_all, fields(to = %mask_phone(&request.to), endpoint = %self.endpoint))]
    async fn send(&self, request: &SmsRequest) -> SmsResult<SmsReceipt> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SmsError::Timeout(e.to_string())
                } else {
                    SmsError::Connection(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "SMS gateway returned error status");
            return Err(SmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: SmsResponse = resp
            .json()
            .await
            .map_err(|e| SmsError::InvalidResponse(e.to_string()))?;

        if !reply.success {
            let reason = reply.error.unwrap_or_else(|| "Unknown error".to_string());
            warn!(error = %reason, "SMS gateway rejected message");
            return Err(SmsError::Rejected(reason));
        }

        let message_id = reply
            .message_id
            .ok_or_else(|| SmsError::InvalidResponse("missing messageId".to_string()))?;

        info!(message_id = %message_id, "SMS sent");
        Ok(SmsReceipt { message_id })
    }

    fn provider(&self) -> &'static str {
        "http"
    }
}
