//! Final ledger assembly: date normalization, ordering, de-duplication.

use std::collections::HashSet;

use tally_core::LedgerEntry;

use crate::dates::DateNormalizer;
use crate::types::{Diagnostic, ResolvedEntry};

/// Convert resolved entries into ledger entries in document order, dropping
/// those whose date token fails both formats, then sort by date (stable, so
/// ties keep document order) and remove exact duplicate
/// (date, amount, description) triples — a guard against a page being
/// scanned twice.
pub fn assemble(
    resolved: Vec<ResolvedEntry>,
    dates: &DateNormalizer,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = Vec::with_capacity(resolved.len());

    for entry in resolved {
        let Some(date) = dates.parse(&entry.date_token) else {
            diagnostics.push(Diagnostic::DateParseFailure {
                date_token: entry.date_token,
                description: entry.description,
            });
            continue;
        };
        entries.push(LedgerEntry::from_signed(
            date,
            entry.description,
            entry.amount,
            entry.resolution,
        ));
    }

    entries.sort_by_key(|e| e.date);

    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert((e.date, e.amount.to_bits(), e.description.clone())));

    entries
}
