//! Ledger record types shared by the parser and the reporting layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a transaction amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sign {
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
}

impl Sign {
    /// Apply this direction to a magnitude.
    pub fn apply(self, amount_abs: f64) -> f64 {
        match self {
            Sign::Credit => amount_abs,
            Sign::Debit => -amount_abs,
        }
    }
}

/// How an entry's debit/credit direction was determined.
///
/// Statement text frequently omits the sign of an amount, so every emitted
/// entry records which resolution path produced its sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignResolution {
    /// The line carried distinct paid-out/paid-in columns.
    #[serde(rename = "explicit-column")]
    ExplicitColumn,
    /// Assigned by reconciling the segment against a running-balance delta.
    #[serde(rename = "balance-delta")]
    BalanceDelta,
    /// Assigned from a keyword hint in the description.
    #[serde(rename = "keyword")]
    Keyword,
    /// No balance anchor and no keyword matched; the documented default applied.
    #[serde(rename = "default-policy")]
    DefaultPolicy,
}

/// A fully resolved statement transaction.
///
/// Invariants: `debit = max(0, -amount)`, `credit = max(0, amount)`, and at
/// most one of `debit`/`credit` is non-zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount: credit > 0, debit < 0.
    pub amount: f64,
    pub debit: f64,
    pub credit: f64,
    pub resolution: SignResolution,
}

impl LedgerEntry {
    /// Build an entry from a signed amount, deriving the debit/credit columns.
    pub fn from_signed(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        resolution: SignResolution,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            debit: (-amount).max(0.0),
            credit: amount.max(0.0),
            resolution,
        }
    }

    /// Returns true if this entry is an inflow (positive amount)
    pub fn is_credit(&self) -> bool {
        self.amount > 0.0
    }

    /// Returns true if this entry is an outflow (negative amount)
    pub fn is_debit(&self) -> bool {
        self.amount < 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_debit_entry_columns() {
        let e = LedgerEntry::from_signed(
            date(2025, 10, 2),
            "TESCO STORES",
            -45.67,
            SignResolution::BalanceDelta,
        );
        assert_eq!(e.debit, 45.67);
        assert_eq!(e.credit, 0.0);
        assert!(e.is_debit());
        assert!(!e.is_credit());
    }

    #[test]
    fn test_credit_entry_columns() {
        let e = LedgerEntry::from_signed(
            date(2025, 10, 3),
            "EBAY PAYOUT TRANSFER",
            120.0,
            SignResolution::Keyword,
        );
        assert_eq!(e.debit, 0.0);
        assert_eq!(e.credit, 120.0);
        assert!(e.is_credit());
    }

    #[test]
    fn test_column_invariant_holds_for_zero() {
        let e = LedgerEntry::from_signed(date(2025, 10, 4), "VOID", 0.0, SignResolution::ExplicitColumn);
        assert_eq!(e.debit, 0.0);
        assert_eq!(e.credit, 0.0);
        assert_eq!(e.credit - e.debit, e.amount);
    }

    #[test]
    fn test_sign_apply() {
        assert_eq!(Sign::Credit.apply(12.5), 12.5);
        assert_eq!(Sign::Debit.apply(12.5), -12.5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let e = LedgerEntry::from_signed(
            date(2025, 10, 2),
            "TESCO STORES",
            -45.67,
            SignResolution::BalanceDelta,
        );
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"balance-delta\""));
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
