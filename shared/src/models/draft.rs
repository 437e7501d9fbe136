//! Draft - an in-progress booking or order awaiting confirmation

use super::{ConfirmationCode, Contact, Selection};
use crate::util;
use serde::{Deserialize, Serialize};

/// Kind of draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    Booking,
    Order,
}

impl DraftKind {
    pub fn label(&self) -> &'static str {
        match self {
            DraftKind::Booking => "booking",
            DraftKind::Order => "order",
        }
    }
}

/// Draft lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
}

impl DraftStatus {
    /// Confirmed, cancelled and expired drafts never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DraftStatus::Pending)
    }
}

/// In-progress booking or order.
///
/// Owned by one session. Persisted opportunistically for reload-survival;
/// the in-memory copy is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Short textual identifier (`BK123456` / `LEG-...`)
    pub id: String,
    pub contact: Contact,
    pub selection: Selection,
    pub status: DraftStatus,
    /// Current code; replaced on every send/resend
    #[serde(default)]
    pub confirmation_code: Option<ConfirmationCode>,
    /// Number of resends performed for this draft
    #[serde(default)]
    pub resend_count: u32,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
    /// Deadline of the current confirmation window (Unix millis)
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,
}

impl Draft {
    /// Create a pending draft; the identifier format depends on the selection
    pub fn new(contact: Contact, selection: Selection, now: i64) -> Self {
        let id = match &selection {
            Selection::Booking(_) => util::booking_reference(now),
            Selection::Order(_) => util::order_reference(now),
        };
        Self {
            id,
            contact,
            selection,
            status: DraftStatus::Pending,
            confirmation_code: None,
            resend_count: 0,
            created_at: now,
            updated_at: now,
            expires_at: None,
            confirmed_at: None,
            cancelled_at: None,
            expired_at: None,
        }
    }

    pub fn kind(&self) -> DraftKind {
        match self.selection {
            Selection::Booking(_) => DraftKind::Booking,
            Selection::Order(_) => DraftKind::Order,
        }
    }

    /// Party size for bookings
    pub fn party_size(&self) -> Option<u8> {
        match &self.selection {
            Selection::Booking(b) => Some(b.party_size),
            Selection::Order(_) => None,
        }
    }

    /// Milliseconds left in the confirmation window (clamped at 0)
    pub fn remaining_millis(&self, now: i64) -> Option<i64> {
        self.expires_at.map(|at| (at - now).max(0))
    }

    /// Whether the confirmation window has elapsed at `now`
    pub fn is_past_expiry(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingSelection, OrderItem, OrderSelection, OrderType, TableRef};
    use chrono::{NaiveDate, NaiveTime};

    fn booking() -> Selection {
        Selection::Booking(BookingSelection {
            date: NaiveDate::from_ymd_opt(2026, 10, 24).unwrap(),
            time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            table: TableRef::new(1, "Rooftop", 2),
            party_size: 2,
        })
    }

    #[test]
    fn test_new_booking_draft() {
        let draft = Draft::new(
            Contact::new("Thandi", "0821234567"),
            booking(),
            1_760_000_483_920,
        );
        assert_eq!(draft.id, "BK483920");
        assert_eq!(draft.kind(), DraftKind::Booking);
        assert_eq!(draft.status, DraftStatus::Pending);
        assert_eq!(draft.party_size(), Some(2));
        assert!(draft.confirmation_code.is_none());
        assert_eq!(draft.remaining_millis(0), None);
    }

    #[test]
    fn test_new_order_draft() {
        let draft = Draft::new(
            Contact::new("Thandi", "0821234567"),
            Selection::Order(OrderSelection {
                order_type: OrderType::Delivery,
                items: vec![OrderItem::new("Braai Platter", 1)],
            }),
            1_760_000_000_000,
        );
        assert!(draft.id.starts_with("LEG-"));
        assert_eq!(draft.kind(), DraftKind::Order);
        assert_eq!(draft.party_size(), None);
    }

    #[test]
    fn test_expiry_helpers() {
        let mut draft = Draft::new(Contact::new("Thandi", "0821234567"), booking(), 1_000);
        draft.expires_at = Some(301_000);
        assert_eq!(draft.remaining_millis(1_000), Some(300_000));
        assert_eq!(draft.remaining_millis(400_000), Some(0));
        assert!(!draft.is_past_expiry(300_999));
        assert!(draft.is_past_expiry(301_000));
    }

    #[test]
    fn test_status_terminal() {
        assert!(!DraftStatus::Pending.is_terminal());
        assert!(DraftStatus::Confirmed.is_terminal());
        assert!(DraftStatus::Cancelled.is_terminal());
        assert!(DraftStatus::Expired.is_terminal());
        assert_eq!(serde_json::to_string(&DraftStatus::Confirmed).unwrap(), "\"confirmed\"");
    }
}
