//! Input validation helpers
//!
//! Centralized length limits and field checks for the booking and order
//! forms. Every failure is an [`AppError`] bound to the offending field so
//! the rendering layer can show it inline.

use std::ops::RangeInclusive;

use shared::models::{
    BookingSelection, Contact, DraftKind, MAX_PARTY_SIZE, MIN_PARTY_SIZE, OrderSelection,
    Selection,
};

use crate::utils::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 200;

/// Special requests, order notes
pub const MAX_NOTE_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Booking phone digits (excluding an optional leading `+`)
pub const BOOKING_PHONE_DIGITS: RangeInclusive<usize> = 10..=15;

/// Order phone digits: South African numbers only
pub const ORDER_PHONE_DIGITS: RangeInclusive<usize> = 10..=11;

// ── Field helpers ───────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::field_invalid(ErrorCode::RequiredField, field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::with_message(
            ErrorCode::TextTooLong,
            format!("{field} is too long (max {max_len} characters)"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::with_message(
            ErrorCode::TextTooLong,
            format!("{field} is too long (max {max_len} characters)"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// At least two characters after trimming
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(AppError::field_invalid(ErrorCode::InvalidName, "name"));
    }
    validate_required_text(name, "name", MAX_NAME_LEN)
}

/// Normalized phone: optional `+` then a digit count within `allowed`
pub fn validate_phone(phone: &str, allowed: RangeInclusive<usize>) -> AppResult<()> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let ok = allowed.contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());
    if !ok {
        return Err(AppError::field_invalid(ErrorCode::InvalidPhone, "phone"));
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn validate_email(email: &str) -> AppResult<()> {
    let invalid = || AppError::field_invalid(ErrorCode::InvalidEmail, "email");

    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // 域名需要包含一个不在首尾的点
    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1);
    if !has_inner_dot {
        return Err(invalid());
    }
    Ok(())
}

/// Validate the contact block.
///
/// Bookings require an email and accept international numbers; orders take
/// 10-11 digit local numbers and an optional email.
pub fn validate_contact(contact: &Contact, kind: DraftKind) -> AppResult<()> {
    validate_name(&contact.name)?;
    let (digits, require_email) = match kind {
        DraftKind::Booking => (BOOKING_PHONE_DIGITS, true),
        DraftKind::Order => (ORDER_PHONE_DIGITS, false),
    };
    validate_phone(&contact.phone, digits)?;
    match &contact.email {
        Some(email) => validate_email(email)?,
        None if require_email => return Err(AppError::field_invalid(ErrorCode::InvalidEmail, "email")),
        None => {}
    }
    validate_optional_text(&contact.special_requests, "special_requests", MAX_NOTE_LEN)
}

pub fn validate_booking(booking: &BookingSelection) -> AppResult<()> {
    if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&booking.party_size) {
        return Err(AppError::field_invalid(ErrorCode::PartySizeOutOfRange, "party_size"));
    }
    validate_required_text(&booking.table.id, "table", MAX_NAME_LEN)
        .map_err(|_| AppError::field_invalid(ErrorCode::TableUnavailable, "table"))
}

pub fn validate_order(order: &OrderSelection) -> AppResult<()> {
    if order.items.is_empty() {
        return Err(AppError::field_invalid(ErrorCode::OrderEmpty, "items"));
    }
    for item in &order.items {
        validate_required_text(&item.name, "items", MAX_NAME_LEN)?;
        if item.quantity == 0 {
            return Err(AppError::field_invalid(ErrorCode::InvalidQuantity, "items")
                .with_detail("item", item.name.as_str()));
        }
    }
    Ok(())
}

/// Everything required before a confirmation code may be sent
pub fn validate_draft_input(contact: &Contact, selection: &Selection) -> AppResult<()> {
    match selection {
        Selection::Booking(booking) => {
            validate_contact(contact, DraftKind::Booking)?;
            validate_booking(booking)
        }
        Selection::Order(order) => {
            validate_contact(contact, DraftKind::Order)?;
            validate_order(order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared::models::{OrderItem, OrderType, TableRef};

    fn booking(party_size: u8) -> Selection {
        Selection::Booking(BookingSelection {
            date: NaiveDate::from_ymd_opt(2026, 10, 24).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            table: TableRef::new(1, "Rooftop", 2),
            party_size,
        })
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Al").is_ok());
        let err = validate_name(" A ").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidName);
        assert_eq!(err.field(), Some("name"));
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(validate_name(&long).unwrap_err().code, ErrorCode::TextTooLong);
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("0821234567", BOOKING_PHONE_DIGITS).is_ok());
        assert!(validate_phone("+27821234567", BOOKING_PHONE_DIGITS).is_ok());
        assert!(validate_phone("123456789012345", BOOKING_PHONE_DIGITS).is_ok());
        assert!(validate_phone("082123456", BOOKING_PHONE_DIGITS).is_err());
        assert!(validate_phone("1234567890123456", BOOKING_PHONE_DIGITS).is_err());
        assert!(validate_phone("08212x4567", BOOKING_PHONE_DIGITS).is_err());
        assert!(validate_phone("++27821234567", BOOKING_PHONE_DIGITS).is_err());
        // Raw form input must be normalized first
        let raw = shared::models::normalize_phone("(082) 123-4567");
        assert!(validate_phone(&raw, ORDER_PHONE_DIGITS).is_ok());
    }

    #[test]
    fn test_twelve_digit_phone_depends_on_kind() {
        let order = Selection::Order(OrderSelection {
            order_type: OrderType::Collection,
            items: vec![OrderItem::new("Wings", 1)],
        });
        let contact = Contact::new("Sipho", "082123456789").with_email("sipho@example.com");

        let err = validate_draft_input(&contact, &order).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPhone);
        assert_eq!(err.field(), Some("phone"));
        assert!(validate_draft_input(&contact, &booking(2)).is_ok());

        // 11 digits is the longest local number an order accepts
        let contact = Contact::new("Sipho", "+27821234567");
        assert!(validate_draft_input(&contact, &order).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("thandi@example.co.za").is_ok());
        for bad in ["", "thandi", "thandi@", "@example.com", "a@b", "a@.com", "a@b.", "a b@c.com", "a@b@c.com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_booking_requires_email() {
        let contact = Contact::new("Thandi", "0821234567");
        let err = validate_draft_input(&contact, &booking(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEmail);

        let contact = contact.with_email("thandi@example.com");
        assert!(validate_draft_input(&contact, &booking(2)).is_ok());
    }

    #[test]
    fn test_party_size_bounds() {
        let contact = Contact::new("Thandi", "0821234567").with_email("t@example.com");
        assert!(validate_draft_input(&contact, &booking(1)).is_ok());
        assert!(validate_draft_input(&contact, &booking(20)).is_ok());
        let err = validate_draft_input(&contact, &booking(0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PartySizeOutOfRange);
        assert_eq!(err.field(), Some("party_size"));
        assert!(validate_draft_input(&contact, &booking(21)).is_err());
    }

    #[test]
    fn test_order_rules() {
        let contact = Contact::new("Sipho", "0731112222");
        let empty = Selection::Order(OrderSelection {
            order_type: OrderType::Collection,
            items: vec![],
        });
        assert_eq!(
            validate_draft_input(&contact, &empty).unwrap_err().code,
            ErrorCode::OrderEmpty
        );

        let zero = Selection::Order(OrderSelection {
            order_type: OrderType::Collection,
            items: vec![OrderItem::new("Wings", 0)],
        });
        assert_eq!(
            validate_draft_input(&contact, &zero).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );

        let ok = Selection::Order(OrderSelection {
            order_type: OrderType::Delivery,
            items: vec![OrderItem::new("Wings", 2)],
        });
        assert!(validate_draft_input(&contact, &ok).is_ok());
    }

    #[test]
    fn test_special_requests_limit() {
        let contact = Contact::new("Sipho", "0731112222")
            .with_special_requests(&"x".repeat(MAX_NOTE_LEN + 1));
        let err = validate_contact(&contact, DraftKind::Order).unwrap_err();
        assert_eq!(err.code, ErrorCode::TextTooLong);
        assert_eq!(err.field(), Some("special_requests"));
    }
}
