//! Confirmation code (确认码)

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Six ASCII digits sent out-of-band to prove the customer owns the phone.
///
/// Compared by exact string equality against trimmed user input. Generated
/// codes never start with `0` (range 100000..=999999).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Number of digits in a code
    pub const LEN: usize = 6;

    /// Generate a fresh code from the given RNG
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(100_000u32..=999_999).to_string())
    }

    /// Parse user input: trimmed, exactly six ASCII digits
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if Self::is_well_formed(trimmed) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    /// Whether `s` is exactly six ASCII digits
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Exact match against user input (surrounding whitespace ignored)
    pub fn matches(&self, input: &str) -> bool {
        input.trim() == self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_code_is_six_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let code = ConfirmationCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
            assert!(!code.as_str().starts_with('0'));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ConfirmationCode::parse(" 483920 ").map(|c| c.to_string()),
            Some("483920".to_string())
        );
        assert!(ConfirmationCode::parse("48392").is_none());
        assert!(ConfirmationCode::parse("4839201").is_none());
        assert!(ConfirmationCode::parse("48392a").is_none());
        assert!(ConfirmationCode::parse("").is_none());
    }

    #[test]
    fn test_matches_is_exact_after_trim() {
        let code = ConfirmationCode::parse("483920").unwrap();
        assert!(code.matches("483920"));
        assert!(code.matches("  483920\n"));
        assert!(!code.matches("000000"));
        assert!(!code.matches("4839 20"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let code = ConfirmationCode::parse("483920").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"483920\"");
    }
}
