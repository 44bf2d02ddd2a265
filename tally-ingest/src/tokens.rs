//! Monetary token extraction.
//!
//! Scans a block's text for strict decimal amounts (optional thousands
//! separators, exactly two decimal places, optional parenthesised-negative
//! form). Only the last three matches are treated as amounts; anything
//! earlier is part of the description (card numbers, reference codes and
//! similar digit runs routinely look numeric).

use anyhow::Result;
use regex::Regex;

use crate::types::MonetaryToken;

/// Upper bound on meaningful trailing amounts: paid-out, paid-in, balance.
pub const MAX_TRAILING_TOKENS: usize = 3;

pub struct TokenExtractor {
    amount: Regex,
}

impl TokenExtractor {
    pub fn new() -> Result<Self> {
        let amount = Regex::new(concat!(
            r"\((?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}\)",
            r"|",
            r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}"
        ))?;
        Ok(Self { amount })
    }

    /// Split a block's text into a description prefix and up to three
    /// trailing monetary tokens. A block yielding zero tokens is
    /// non-transactional and produces no entry.
    pub fn extract(&self, text: &str) -> (String, Vec<MonetaryToken>) {
        let bytes = text.as_bytes();
        let mut matches: Vec<MonetaryToken> = self
            .amount
            .find_iter(text)
            .filter(|m| {
                // Reject matches embedded in a longer digit run, e.g. the
                // "234.56" inside "1234.565".
                let before_ok = m.start() == 0 || !bytes[m.start() - 1].is_ascii_digit();
                let after_ok = m.end() == bytes.len() || !bytes[m.end()].is_ascii_digit();
                before_ok && after_ok
            })
            .map(|m| MonetaryToken {
                raw: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
            .collect();

        if matches.len() > MAX_TRAILING_TOKENS {
            matches.drain(..matches.len() - MAX_TRAILING_TOKENS);
        }

        let prefix_end = matches.first().map_or(text.len(), |t| t.start);
        let description = text[..prefix_end]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        (description, matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> (String, Vec<f64>) {
        let (desc, tokens) = TokenExtractor::new().unwrap().extract(text);
        (desc, tokens.iter().map(|t| t.value()).collect())
    }

    #[test]
    fn test_two_trailing_tokens() {
        let (desc, vals) = extract("TESCO STORES 45.67 954.33");
        assert_eq!(desc, "TESCO STORES");
        assert_eq!(vals, vec![45.67, 954.33]);
    }

    #[test]
    fn test_three_trailing_tokens() {
        let (desc, vals) = extract("CARD PAYMENT 50.00 0.00 1,024.33");
        assert_eq!(desc, "CARD PAYMENT");
        assert_eq!(vals, vec![50.0, 0.0, 1024.33]);
    }

    #[test]
    fn test_earlier_matches_fold_into_description() {
        // Four matches: the first stays in the description.
        let (desc, vals) = extract("INVOICE 12.00 SETTLED 50.00 0.00 954.33");
        assert_eq!(desc, "INVOICE 12.00 SETTLED");
        assert_eq!(vals, vec![50.0, 0.0, 954.33]);
    }

    #[test]
    fn test_no_tokens() {
        let (desc, vals) = extract("12 HIGH STREET LONDON");
        assert_eq!(desc, "12 HIGH STREET LONDON");
        assert!(vals.is_empty());
    }

    #[test]
    fn test_plain_thousands_without_separator() {
        let (_, vals) = extract("OPENING BALANCE 1000.00");
        assert_eq!(vals, vec![1000.0]);
    }

    #[test]
    fn test_parenthesised_negative() {
        let (_, vals) = extract("OVERDRAWN CHARGE 5.00 (12.50)");
        assert_eq!(vals, vec![5.0, -12.5]);
    }

    #[test]
    fn test_reference_digit_runs_are_not_amounts() {
        // "4455" has no decimals; "1234.565" has three.
        let (desc, vals) = extract("REF 4001 2233 4455 SEQ 1234.565 PAYMENT 9.99 100.00");
        assert!(desc.starts_with("REF 4001"));
        assert_eq!(vals, vec![9.99, 100.0]);
    }

    #[test]
    fn test_whitespace_collapsed_in_description() {
        let (desc, _) = extract("CARD   PAYMENT \t COFFEE  3.50 996.50");
        assert_eq!(desc, "CARD PAYMENT COFFEE");
    }
}
