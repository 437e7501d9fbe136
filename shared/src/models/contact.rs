//! Customer contact details

use serde::{Deserialize, Serialize};

/// Contact fields captured on the booking / order form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Trimmed display name
    pub name: String,
    /// Normalized phone: optional leading `+` followed by digits
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 特殊要求 / 订单备注
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl Contact {
    /// Build a contact from raw form input
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: normalize_phone(phone),
            email: None,
            special_requests: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        let email = email.trim();
        self.email = (!email.is_empty()).then(|| email.to_string());
        self
    }

    pub fn with_special_requests(mut self, text: &str) -> Self {
        let text = text.trim();
        self.special_requests = (!text.is_empty()).then(|| text.to_string());
        self
    }

    /// Phone digits without the `+` prefix
    pub fn phone_digits(&self) -> &str {
        self.phone.trim_start_matches('+')
    }
}

/// Strip formatting from a phone number.
///
/// Spaces, dashes and parentheses are removed; a single leading `+` is kept.
/// Any other character is kept as-is so validation can reject it.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let (prefix, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };
    let body: String = rest
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    format!("{prefix}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("082 123 4567"), "0821234567");
        assert_eq!(normalize_phone("(082) 123-4567"), "0821234567");
        assert_eq!(normalize_phone(" +27 82 123 4567 "), "+27821234567");
        assert_eq!(normalize_phone("082.123.4567"), "082.123.4567");
    }

    #[test]
    fn test_contact_new_trims() {
        let contact = Contact::new("  Thandi  ", "082 123 4567")
            .with_email(" thandi@example.com ")
            .with_special_requests("   ");
        assert_eq!(contact.name, "Thandi");
        assert_eq!(contact.phone, "0821234567");
        assert_eq!(contact.email.as_deref(), Some("thandi@example.com"));
        assert_eq!(contact.special_requests, None);
        assert_eq!(contact.phone_digits(), "0821234567");
    }
}
