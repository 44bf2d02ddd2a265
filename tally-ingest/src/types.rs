//! Intermediate parse types and non-fatal diagnostics.

use serde::{Deserialize, Serialize};
use tally_core::{LedgerEntry, SignResolution};

/// A substring of a block that matched the strict decimal-amount pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonetaryToken {
    pub raw: String,
    /// Byte offset of the match within the block text.
    pub start: usize,
    pub end: usize,
}

impl MonetaryToken {
    /// Numeric value of the token. Parenthesised amounts are negative.
    pub fn value(&self) -> f64 {
        let s = self.raw.trim();
        let (s, negative) = match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            Some(inner) => (inner, true),
            None => (s, false),
        };
        let v: f64 = s.replace(',', "").parse().unwrap_or(0.0);
        if negative { -v } else { v }
    }
}

/// An entry whose sign has been settled but whose date is still a raw token.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub date_token: String,
    pub description: String,
    /// Signed amount: credit > 0, debit < 0.
    pub amount: f64,
    pub resolution: SignResolution,
}

/// Non-fatal conditions recorded during a parse pass.
///
/// None of these abort the document; a parse always yields a (possibly
/// empty) entry list plus whatever diagnostics accumulated along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// A continuation line arrived with no open block to attach to.
    MalformedLine { line: String },
    /// A dated block carried no trailing monetary token; dropped.
    NoMonetaryToken { date_token: String, text: String },
    /// Neither date format parsed the block's date token; entry dropped.
    DateParseFailure {
        date_token: String,
        description: String,
    },
    /// A balance-bounded segment had more than one sign-unresolved entry:
    /// the assigned signs satisfy the aggregate delta but individual
    /// directions are not verified.
    ReconciliationApproximate { unresolved: usize, delta: f64 },
    /// The segment sum still misses the balance delta after assignment.
    /// Entries are emitted with their best-effort signs regardless.
    ReconciliationMismatch { expected: f64, actual: f64 },
}

/// Result of parsing one document's lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub entries: Vec<LedgerEntry>,
    pub diagnostics: Vec<Diagnostic>,
}
