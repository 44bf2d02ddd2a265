//! tally-ingest: statement-line parsing and sign reconciliation.
//!
//! Bank-statement text extracted from a page often lists amounts in
//! paid-out / paid-in / balance columns without an explicit sign. This crate
//! segments raw lines into transaction blocks, pulls the trailing monetary
//! tokens off each block, and resolves debit/credit direction by reconciling
//! consecutive entries against running-balance deltas, falling back to
//! keyword heuristics when no balance anchor is available.

pub mod assemble;
pub mod columns;
pub mod dates;
pub mod keywords;
pub mod lines;
pub mod parsers;
pub mod reconcile;
pub mod tokens;
pub mod types;

pub use columns::{Assignment, ColumnPolicy, ColumnRoles, PaidOutPaidInBalance};
pub use dates::DateNormalizer;
pub use keywords::KeywordSignClassifier;
pub use lines::{BlockAccumulator, DatedBlock, LineClassifier, LineKind};
pub use parsers::hsbc::StatementParser;
pub use reconcile::{PendingEntry, ReconciliationEngine};
pub use tokens::TokenExtractor;
pub use types::{Diagnostic, MonetaryToken, ParseOutput, ResolvedEntry};
