//! Message templates and phone display helpers

use shared::models::{Draft, Selection};

/// Restaurant details printed in every message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub restaurant_name: String,
    pub restaurant_phone: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            restaurant_name: "Legends Rooftop".to_string(),
            restaurant_phone: "031 123 4567".to_string(),
        }
    }
}

/// Message carrying the confirmation code
pub fn confirmation_code_message(
    branding: &Branding,
    draft: &Draft,
    code: &str,
    ttl_minutes: i64,
) -> String {
    let subject = match &draft.selection {
        Selection::Booking(b) => format!(
            "Your booking #{} for {} on {} at {} ({}) is almost done.",
            draft.id,
            guests(b.party_size),
            b.date.format("%a %-d %b"),
            b.time.format("%H:%M"),
            b.table.label(),
        ),
        Selection::Order(o) => format!(
            "Your {} order #{} has been received.",
            o.order_type.label().to_lowercase(),
            draft.id
        ),
    };

    format!(
        "{} {} Confirmation\n\n\
         Hi {}!\n\n\
         {}\n\n\
         Confirmation Code: {}\n\n\
         Enter this code to confirm. It expires in {} minutes.\n\n\
         Call us: {}",
        kind_icon(draft),
        branding.restaurant_name,
        draft.contact.name,
        subject,
        code,
        ttl_minutes,
        branding.restaurant_phone,
    )
}

/// Follow-up message sent once the draft is confirmed
pub fn confirmed_message(branding: &Branding, draft: &Draft) -> String {
    let body = match &draft.selection {
        Selection::Booking(b) => format!(
            "Your table for {} on {} at {} is confirmed ({}).\n\nWe look forward to seeing you!",
            guests(b.party_size),
            b.date.format("%a %-d %b"),
            b.time.format("%H:%M"),
            b.table.label(),
        ),
        Selection::Order(_) => "Your order has been confirmed and is being prepared.\n\n\
             Estimated time: 30-45 minutes\n\n\
             We'll notify you when it's ready!"
            .to_string(),
    };

    format!(
        "✅ {} Confirmed!\n\nHi {},\n\n#{}: {}\n\nCall us: {}",
        capitalize(draft.kind().label()),
        draft.contact.name,
        draft.id,
        body,
        branding.restaurant_phone,
    )
}

/// Human-friendly phone display.
///
/// 10 digits -> `(082) 123-4567`, 11 digits -> `+2 (782) 123-4567`,
/// anything else is returned unchanged.
pub fn format_phone_display(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        11 => format!(
            "+{} ({}) {}-{}",
            &digits[..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        _ => phone.to_string(),
    }
}

/// Phone number for logs: keeps the last 3 digits only
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 3 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 3..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 3), visible)
}

fn guests(n: u8) -> String {
    if n == 1 {
        "1 guest".to_string()
    } else {
        format!("{} guests", n)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn kind_icon(draft: &Draft) -> &'static str {
    match draft.selection {
        Selection::Booking(_) => "🍽️",
        Selection::Order(_) => "🍖",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared::models::{
        BookingSelection, Contact, OrderItem, OrderSelection, OrderType, TableRef,
    };

    fn booking_draft() -> Draft {
        Draft::new(
            Contact::new("Thandi", "0821234567"),
            Selection::Booking(BookingSelection {
                date: NaiveDate::from_ymd_opt(2026, 10, 24).unwrap(),
                time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
                table: TableRef::new(3, "Rooftop", 6),
                party_size: 4,
            }),
            1_760_000_483_920,
        )
    }

    fn order_draft() -> Draft {
        Draft::new(
            Contact::new("Sipho", "0731112222"),
            Selection::Order(OrderSelection {
                order_type: OrderType::Collection,
                items: vec![OrderItem::new("Braai Platter", 2)],
            }),
            1_760_000_000_000,
        )
    }

    #[test]
    fn test_booking_code_message() {
        let msg = confirmation_code_message(&Branding::default(), &booking_draft(), "483920", 5);
        assert!(msg.contains("Legends Rooftop Confirmation"));
        assert!(msg.contains("Hi Thandi!"));
        assert!(msg.contains("#BK483920"));
        assert!(msg.contains("4 guests on Sat 24 Oct at 19:30"));
        assert!(msg.contains("Table 3 (Rooftop)"));
        assert!(msg.contains("Confirmation Code: 483920"));
        assert!(msg.contains("expires in 5 minutes"));
        assert!(msg.ends_with("Call us: 031 123 4567"));
    }

    #[test]
    fn test_order_code_message() {
        let draft = order_draft();
        let msg = confirmation_code_message(&Branding::default(), &draft, "123456", 15);
        assert!(msg.contains(&format!("collection order #{}", draft.id)));
        assert!(msg.contains("expires in 15 minutes"));
    }

    #[test]
    fn test_confirmed_message_uses_branding() {
        let branding = Branding {
            restaurant_name: "Legends".to_string(),
            restaurant_phone: "010 000 0000".to_string(),
        };
        let msg = confirmed_message(&branding, &order_draft());
        assert!(msg.starts_with("✅ Order Confirmed!"));
        assert!(msg.contains("Estimated time: 30-45 minutes"));
        assert!(msg.ends_with("Call us: 010 000 0000"));

        let msg = confirmed_message(&branding, &booking_draft());
        assert!(msg.starts_with("✅ Booking Confirmed!"));
        assert!(msg.contains("#BK483920"));
    }

    #[test]
    fn test_format_phone_display() {
        assert_eq!(format_phone_display("0821234567"), "(082) 123-4567");
        assert_eq!(format_phone_display("27821234567"), "+2 (782) 123-4567");
        assert_eq!(format_phone_display("+27 82 123"), "+27 82 123");
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("0821234567"), "*******567");
        assert_eq!(mask_phone("12"), "**");
    }
}
