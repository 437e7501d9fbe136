//! User-visible notifications
//!
//! Every error in the confirmation flow is recovered locally and surfaced
//! as a notification; validation errors carry the offending field so the
//! rendering layer can show them inline.

use crate::error::{AppError, ErrorCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Field to highlight (validation errors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Error code (errors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            field: None,
            code: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            field: None,
            code: None,
        }
    }

    /// Whether the rendering layer should show it next to a form field
    pub fn is_inline(&self) -> bool {
        self.field.is_some()
    }
}

impl From<&AppError> for Notification {
    fn from(err: &AppError) -> Self {
        // 系统错误不向用户暴露技术细节
        let message = if err.code.category() == ErrorCategory::System {
            "Something went wrong. Please try again.".to_string()
        } else {
            err.message.clone()
        };
        Self {
            level: NotificationLevel::Error,
            message,
            field: err.field().map(str::to_string),
            code: Some(err.code.code()),
        }
    }
}
