//! Date-token normalization.

use chrono::NaiveDate;

/// Parses block date tokens, trying a 2-digit-year format first and a
/// 4-digit-year variant on failure.
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    primary: &'static str,
    fallback: &'static str,
}

impl DateNormalizer {
    /// "17 Oct 25", retrying as "17 Oct 2025".
    pub fn statement_default() -> Self {
        Self {
            primary: "%d %b %y",
            fallback: "%d %b %Y",
        }
    }

    pub fn parse(&self, token: &str) -> Option<NaiveDate> {
        let token = token.trim();
        NaiveDate::parse_from_str(token, self.primary)
            .or_else(|_| NaiveDate::parse_from_str(token, self.fallback))
            .ok()
    }
}
