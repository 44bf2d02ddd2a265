//! Keyword-based debit/credit hints.
//!
//! When no balance anchor disambiguates an amount's sign, marker phrases
//! and transaction codes in the description are the only evidence left.
//! Rules are a prioritized list evaluated in declared order, first match
//! wins: explicit in/out markers outrank transaction-type codes, which
//! outrank the generic transfer-context rule. That way a transfer
//! description carrying both a debit code and a payout keyword still
//! resolves as a debit.

use tally_core::Sign;

/// A single ordered rule: predicate over the description, plus the hint it
/// yields.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Marker phrase, matched as a consecutive word sequence.
    Phrase(&'static str),
    /// Transaction code, matched as a whole word (or line-leading token).
    Word(&'static str),
    /// "TRANSFER" co-occurring with any of the listed counterparty tokens.
    TransferWith(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub matcher: Matcher,
    pub sign: Sign,
}

pub struct KeywordSignClassifier {
    rules: Vec<KeywordRule>,
}

/// Marketplace payout services and trading partners whose transfers are
/// inbound settlements rather than outgoing payments.
const PAYOUT_COUNTERPARTIES: &[&str] = &["EBAY", "AMAZON", "PAYPAL", "ETSY", "STRIPE", "PAYOUT"];

impl KeywordSignClassifier {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Rule set for the HSBC statement vocabulary.
    pub fn hsbc_default() -> Self {
        use Matcher::*;
        use Sign::*;

        let rules = vec![
            // Explicit in/out markers first.
            KeywordRule { matcher: Phrase("PAID IN"), sign: Credit },
            KeywordRule { matcher: Word("CR"), sign: Credit },
            KeywordRule { matcher: Phrase("PAID OUT"), sign: Debit },
            // Transaction-type codes.
            KeywordRule { matcher: Word("DD"), sign: Debit },
            KeywordRule { matcher: Word("SO"), sign: Debit },
            KeywordRule { matcher: Word("DR"), sign: Debit },
            KeywordRule { matcher: Word("OBP"), sign: Debit },
            KeywordRule { matcher: Word("VISA"), sign: Debit },
            KeywordRule { matcher: Word("MASTERCARD"), sign: Debit },
            KeywordRule { matcher: Word("MAESTRO"), sign: Debit },
            KeywordRule { matcher: Word("KLARNA"), sign: Debit },
            KeywordRule { matcher: Word("BP"), sign: Debit },
            // Generic transfer context last.
            KeywordRule {
                matcher: TransferWith(PAYOUT_COUNTERPARTIES),
                sign: Credit,
            },
        ];
        Self::new(rules)
    }

    /// First matching rule wins; `None` when no rule applies.
    pub fn classify(&self, description: &str) -> Option<Sign> {
        let upper = description.to_uppercase();
        let words: Vec<&str> = upper
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        for rule in &self.rules {
            let hit = match &rule.matcher {
                Matcher::Phrase(p) => contains_phrase(&words, p),
                Matcher::Word(w) => words.contains(w),
                Matcher::TransferWith(partners) => {
                    words.contains(&"TRANSFER")
                        && partners.iter().any(|p| words.contains(p))
                }
            };
            if hit {
                return Some(rule.sign);
            }
        }
        None
    }
}

/// True when `phrase`'s words appear consecutively in `words`. Word-level
/// matching keeps "PAID IN" from firing inside "REPAID INSTANTLY".
fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    !needle.is_empty() && words.windows(needle.len()).any(|w| w == needle.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(desc: &str) -> Option<Sign> {
        KeywordSignClassifier::hsbc_default().classify(desc)
    }

    #[test]
    fn test_paid_in_is_credit() {
        assert_eq!(classify("PAID IN AT BRANCH"), Some(Sign::Credit));
    }

    #[test]
    fn test_phrase_needs_word_boundaries() {
        // "PAID IN" as a word sequence only; not inside longer words.
        assert_eq!(classify("LOAN REPAID INSTANTLY"), None);
        assert_eq!(classify("OVERPAID OUTSTANDING"), None);
    }

    #[test]
    fn test_cr_whole_word_is_credit() {
        assert_eq!(classify("CR ACME LTD SALARY"), Some(Sign::Credit));
        // "CR" inside a longer word must not match.
        assert_eq!(classify("CREDITON GARAGE"), None);
    }

    #[test]
    fn test_paid_out_is_debit() {
        assert_eq!(classify("PAID OUT COUNTER"), Some(Sign::Debit));
    }

    #[test]
    fn test_transaction_codes_are_debits() {
        assert_eq!(classify("DD BRITISH GAS"), Some(Sign::Debit));
        assert_eq!(classify("SO RENT J SMITH"), Some(Sign::Debit));
        assert_eq!(classify("OBP SUPPLIER LTD"), Some(Sign::Debit));
        assert_eq!(classify("VISA COFFEE HOUSE"), Some(Sign::Debit));
        assert_eq!(classify("KLARNA INSTALMENT"), Some(Sign::Debit));
        assert_eq!(classify("BP COUNCIL TAX"), Some(Sign::Debit));
    }

    #[test]
    fn test_transfer_with_payout_partner_is_credit() {
        assert_eq!(classify("EBAY PAYOUT TRANSFER"), Some(Sign::Credit));
        assert_eq!(classify("TRANSFER FROM PAYPAL"), Some(Sign::Credit));
    }

    #[test]
    fn test_transfer_without_partner_is_unknown() {
        assert_eq!(classify("TRANSFER TO SAVINGS"), None);
    }

    #[test]
    fn test_codes_outrank_transfer_rule() {
        // Debit code checked before the transfer-context rule.
        assert_eq!(classify("DD TRANSFER EBAY"), Some(Sign::Debit));
    }

    #[test]
    fn test_explicit_marker_outranks_codes() {
        assert_eq!(classify("PAID IN DD REVERSAL"), Some(Sign::Credit));
    }

    #[test]
    fn test_unknown_description() {
        assert_eq!(classify("TESCO STORES"), None);
    }
}
