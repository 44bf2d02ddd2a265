//! HSBC current-account statement parser.
//!
//! Expected extracted-text rows (paid-out / paid-in / balance columns):
//!
//!   01 Oct 25 OPENING BALANCE                              1,000.00
//!   02 Oct 25 CARD PAYMENT TESCO STORES          45.67       954.33
//!   03 Oct 25 EBAY PAYOUT TRANSFER              120.00     1,074.33
//!   BALANCE CARRIED FORWARD                                1,074.33
//!
//! The driver owns no cross-document state: every call to
//! [`StatementParser::parse_document`] runs with a fresh block accumulator
//! and reconciliation engine, so documents can be parsed concurrently.

use anyhow::Result;
use regex::Regex;

use crate::assemble::assemble;
use crate::columns::{ColumnPolicy, PaidOutPaidInBalance};
use crate::dates::DateNormalizer;
use crate::keywords::KeywordSignClassifier;
use crate::lines::{BlockAccumulator, DatedBlock, LineClassifier, LineKind};
use crate::reconcile::{PendingEntry, ReconciliationEngine};
use crate::tokens::TokenExtractor;
use crate::types::{Diagnostic, ParseOutput};

/// Non-transaction markers that must never reach the token extractor.
pub const HSBC_NOISE_PATTERNS: &[&str] = &[
    r"(?i)BALANCE\s+(BROUGHT|CARRIED)\s+FORWARD",
    r"(?i)\b(sheet|page)\s+\d+(\s+of\s+\d+)?\b",
    r"(?i)(www\.|http|lines are open|textphone|call us|customer service)",
    r"(?i)\b(sort code|account number|IBAN|BIC)\b",
];

/// Dated rows that anchor the running balance without being transactions.
/// Leading match only: a description merely mentioning the opening balance
/// ("ADJ RE OPENING BALANCE FEE") is still a transaction.
const BALANCE_ANCHOR_PATTERN: &str = r"(?i)^OPENING\s+BALANCE\b";

pub struct StatementParser {
    classifier: LineClassifier,
    extractor: TokenExtractor,
    keywords: KeywordSignClassifier,
    dates: DateNormalizer,
    policy: Box<dyn ColumnPolicy + Send + Sync>,
    anchor: Regex,
}

impl StatementParser {
    /// Parser configured for the HSBC statement family.
    pub fn hsbc() -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new(HSBC_NOISE_PATTERNS)?,
            extractor: TokenExtractor::new()?,
            keywords: KeywordSignClassifier::hsbc_default(),
            dates: DateNormalizer::statement_default(),
            policy: Box::new(PaidOutPaidInBalance),
            anchor: Regex::new(BALANCE_ANCHOR_PATTERN)?,
        })
    }

    /// Parse one document's extracted text lines into ledger entries plus
    /// diagnostics. Never fails: a document with nothing parseable yields
    /// an empty entry list.
    pub fn parse_document<'a, I>(&self, lines: I) -> ParseOutput
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut acc = BlockAccumulator::new();
        let mut engine = ReconciliationEngine::new();
        let mut diagnostics = Vec::new();

        for line in lines {
            match self.classifier.classify(line) {
                LineKind::Noise => {}
                LineKind::BlockStart { date_token, rest } => {
                    if let Some(block) = acc.start(date_token, rest) {
                        self.handle_block(block, &mut engine, &mut diagnostics);
                    }
                }
                LineKind::Continuation(rest) => {
                    if !acc.append(&rest) {
                        // Orphan continuation: nothing to attach it to.
                        diagnostics.push(Diagnostic::MalformedLine { line: rest });
                    }
                }
            }
        }

        if let Some(block) = acc.finish() {
            self.handle_block(block, &mut engine, &mut diagnostics);
        }

        let resolved = engine.finish();
        let entries = assemble(resolved, &self.dates, &mut diagnostics);

        ParseOutput {
            entries,
            diagnostics,
        }
    }

    fn handle_block(
        &self,
        block: DatedBlock,
        engine: &mut ReconciliationEngine,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let (description, tokens) = self.extractor.extract(&block.text);

        if tokens.is_empty() {
            // Header or address text misclassified as a block start.
            diagnostics.push(Diagnostic::NoMonetaryToken {
                date_token: block.date_token,
                text: description,
            });
            return;
        }

        if self.anchor.is_match(&description) {
            let balance = tokens.last().expect("tokens checked non-empty").value();
            engine.observe_balance(balance, diagnostics);
            return;
        }

        let hint = self.keywords.classify(&description);
        let assignment = self.policy.assign(tokens, hint);
        let balance = assignment.roles.balance.as_ref().map(|t| t.value());

        engine.push(
            PendingEntry {
                date_token: block.date_token,
                description,
                amount_abs: assignment.amount_abs,
                signed: assignment.signed,
                hint,
                fallback: assignment.fallback,
                resolution: assignment.resolution,
            },
            balance,
            diagnostics,
        );
    }
}
