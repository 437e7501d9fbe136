//! View-model events published by the session
//!
//! The rendering layer subscribes and redraws; nothing here knows about
//! presentation.

use serde::{Deserialize, Serialize};
use shared::models::Draft;
use shared::notification::Notification;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    /// A code went out (first send or resend)
    CodeSent {
        draft_id: String,
        /// `(082) 123-4567`
        phone_display: String,
        expires_at: i64,
        resends_left: u32,
        resent: bool,
    },
    DeliveryFailed {
        draft_id: String,
        notification: Notification,
    },
    /// Once per second while a draft is pending
    CountdownTick {
        draft_id: String,
        remaining_secs: u64,
        /// `m:ss`
        display: String,
    },
    Confirmed {
        draft: Draft,
        notification: Notification,
    },
    Cancelled {
        draft_id: String,
        notification: Notification,
    },
    Expired {
        draft_id: String,
        notification: Notification,
    },
    /// Session is back to an empty form
    Reset,
}

impl FlowEvent {
    pub fn draft_id(&self) -> Option<&str> {
        match self {
            FlowEvent::CodeSent { draft_id, .. }
            | FlowEvent::DeliveryFailed { draft_id, .. }
            | FlowEvent::CountdownTick { draft_id, .. }
            | FlowEvent::Cancelled { draft_id, .. }
            | FlowEvent::Expired { draft_id, .. } => Some(draft_id),
            FlowEvent::Confirmed { draft, .. } => Some(&draft.id),
            FlowEvent::Reset => None,
        }
    }

    /// Event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::CodeSent { .. } => "code_sent",
            FlowEvent::DeliveryFailed { .. } => "delivery_failed",
            FlowEvent::CountdownTick { .. } => "countdown_tick",
            FlowEvent::Confirmed { .. } => "confirmed",
            FlowEvent::Cancelled { .. } => "cancelled",
            FlowEvent::Expired { .. } => "expired",
            FlowEvent::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_wire_format() {
        let event = FlowEvent::CountdownTick {
            draft_id: "BK483920".into(),
            remaining_secs: 299,
            display: "4:59".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "countdown_tick");
        assert_eq!(json["display"], "4:59");
        assert_eq!(event.draft_id(), Some("BK483920"));
        assert_eq!(FlowEvent::Reset.draft_id(), None);
    }
}
