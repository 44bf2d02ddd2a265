//! Sign reconciliation against running-balance deltas.
//!
//! Entries with unresolved signs accumulate in a pending segment. When a
//! row carries a balance snapshot, the delta against the last confirmed
//! balance tells us what the segment must sum to: signs are assigned to
//! the unresolved entries to make that hold, then the segment is flushed
//! in document order. A segment with a single unresolved entry reconciles
//! exactly; with more than one, all unresolved entries get a uniform
//! direction and the segment is flagged approximate.

use tally_core::{Sign, SignResolution};

use crate::types::{Diagnostic, ResolvedEntry};

/// Tolerance for comparing reconstructed segment sums to balance deltas.
const BALANCE_EPSILON: f64 = 0.005;

/// An entry whose final sign is not yet determined.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub date_token: String,
    pub description: String,
    /// Magnitude, always > 0 for real transactions.
    pub amount_abs: f64,
    /// Signed amount when already known from explicit columns.
    pub signed: Option<f64>,
    /// Keyword-derived direction guess, if any.
    pub hint: Option<Sign>,
    /// Direction assumed when neither delta nor keyword applies.
    pub fallback: Sign,
    /// Resolution path when `signed` is known.
    pub resolution: Option<SignResolution>,
}

/// Per-document reconciliation state: the pending segment and the last
/// confirmed balance. Must be reset for every document.
#[derive(Debug, Default)]
pub struct ReconciliationEngine {
    segment: Vec<PendingEntry>,
    last_balance: Option<f64>,
    resolved: Vec<ResolvedEntry>,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one parsed block. `balance` is the row's running-balance
    /// figure, when present; seeing one reconciles and flushes the segment.
    pub fn push(
        &mut self,
        entry: PendingEntry,
        balance: Option<f64>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        self.segment.push(entry);
        if let Some(new_balance) = balance {
            self.reconcile(new_balance, diagnostics);
        }
    }

    /// Record a standalone balance snapshot (an opening-balance row), which
    /// anchors the running balance without producing an entry.
    pub fn observe_balance(&mut self, new_balance: f64, diagnostics: &mut Vec<Diagnostic>) {
        self.reconcile(new_balance, diagnostics);
    }

    /// End of document: anything still pending never saw a trailing balance
    /// and resolves by keyword hint alone.
    pub fn finish(mut self) -> Vec<ResolvedEntry> {
        for entry in &mut self.segment {
            resolve_by_hint(entry);
        }
        let segment = std::mem::take(&mut self.segment);
        self.flush(segment);
        self.resolved
    }

    fn reconcile(&mut self, new_balance: f64, diagnostics: &mut Vec<Diagnostic>) {
        let mut segment = std::mem::take(&mut self.segment);

        match self.last_balance {
            None => {
                // First balance seen in the document: no delta to anchor
                // against, so unresolved entries fall back to keywords.
                for entry in &mut segment {
                    if entry.signed.is_none() {
                        resolve_by_hint(entry);
                    }
                }
            }
            Some(last_balance) => {
                let delta = new_balance - last_balance;
                let known_sum: f64 = segment.iter().filter_map(|e| e.signed).sum();
                let remaining = delta - known_sum;

                let unresolved = segment.iter().filter(|e| e.signed.is_none()).count();
                if unresolved > 1 {
                    diagnostics.push(Diagnostic::ReconciliationApproximate { unresolved, delta });
                }

                // Uniform direction for every unresolved entry, each at its
                // own magnitude. Mixed true directions within one segment
                // cannot be recovered from a single delta.
                let direction = if remaining >= 0.0 { Sign::Credit } else { Sign::Debit };
                for entry in &mut segment {
                    if entry.signed.is_none() {
                        entry.signed = Some(direction.apply(entry.amount_abs));
                        entry.resolution = Some(SignResolution::BalanceDelta);
                    }
                }

                let actual: f64 = segment.iter().filter_map(|e| e.signed).sum();
                if (actual - delta).abs() > BALANCE_EPSILON {
                    diagnostics.push(Diagnostic::ReconciliationMismatch {
                        expected: delta,
                        actual,
                    });
                }
            }
        }

        self.last_balance = Some(new_balance);
        self.flush(segment);
    }

    fn flush(&mut self, segment: Vec<PendingEntry>) {
        for entry in segment {
            let amount = entry.signed.unwrap_or(0.0);
            let resolution = entry.resolution.unwrap_or(SignResolution::DefaultPolicy);
            self.resolved.push(ResolvedEntry {
                date_token: entry.date_token,
                description: entry.description,
                amount,
                resolution,
            });
        }
    }
}

fn resolve_by_hint(entry: &mut PendingEntry) {
    if entry.signed.is_some() {
        return;
    }
    match entry.hint {
        Some(sign) => {
            entry.signed = Some(sign.apply(entry.amount_abs));
            entry.resolution = Some(SignResolution::Keyword);
        }
        None => {
            entry.signed = Some(entry.fallback.apply(entry.amount_abs));
            entry.resolution = Some(SignResolution::DefaultPolicy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(description: &str, amount_abs: f64) -> PendingEntry {
        PendingEntry {
            date_token: "01 Oct 25".to_string(),
            description: description.to_string(),
            amount_abs,
            signed: None,
            hint: None,
            fallback: Sign::Debit,
            resolution: None,
        }
    }

    #[test]
    fn test_single_unresolved_entry_reconciles_exactly() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        engine.observe_balance(1000.0, &mut diags);
        engine.push(pending("TESCO STORES", 45.67), Some(954.33), &mut diags);

        let resolved = engine.finish();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].amount, -45.67);
        assert_eq!(resolved[0].resolution, SignResolution::BalanceDelta);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_positive_delta_assigns_credit() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        engine.observe_balance(954.33, &mut diags);
        engine.push(pending("EBAY PAYOUT TRANSFER", 120.0), Some(1074.33), &mut diags);

        let resolved = engine.finish();
        assert_eq!(resolved[0].amount, 120.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_known_signs_subtract_from_delta() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        engine.observe_balance(100.0, &mut diags);
        let mut known = pending("CARD PAYMENT", 30.0);
        known.signed = Some(-30.0);
        known.resolution = Some(SignResolution::ExplicitColumn);
        engine.push(known, None, &mut diags);
        // 100 - 30 + 50 = 120
        engine.push(pending("UNKNOWN RECEIPT", 50.0), Some(120.0), &mut diags);

        let resolved = engine.finish();
        assert_eq!(resolved[0].amount, -30.0);
        assert_eq!(resolved[1].amount, 50.0);
        assert_eq!(resolved[1].resolution, SignResolution::BalanceDelta);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_multiple_unresolved_flagged_approximate() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        engine.observe_balance(500.0, &mut diags);
        engine.push(pending("MYSTERY ONE", 10.0), None, &mut diags);
        engine.push(pending("MYSTERY TWO", 20.0), None, &mut diags);
        engine.push(pending("SHOP", 5.0), Some(465.0), &mut diags);

        let resolved = engine.finish();
        assert_eq!(
            resolved.iter().map(|e| e.amount).collect::<Vec<_>>(),
            vec![-10.0, -20.0, -5.0]
        );
        assert_eq!(
            diags,
            vec![Diagnostic::ReconciliationApproximate {
                unresolved: 3,
                delta: -35.0,
            }]
        );
    }

    #[test]
    fn test_mismatch_reported_but_entries_still_emitted() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        engine.observe_balance(100.0, &mut diags);
        // Delta says -15 but the only candidate magnitude is 10.
        engine.push(pending("SHOP", 10.0), Some(85.0), &mut diags);

        let resolved = engine.finish();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].amount, -10.0);
        assert!(matches!(
            diags[0],
            Diagnostic::ReconciliationMismatch { expected, actual }
                if (expected - -15.0).abs() < 1e-9 && (actual - -10.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_first_balance_resolves_by_keyword() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        let mut hinted = pending("VISA COFFEE", 3.5);
        hinted.hint = Some(Sign::Debit);
        engine.push(hinted, Some(996.5), &mut diags);

        let resolved = engine.finish();
        assert_eq!(resolved[0].amount, -3.5);
        assert_eq!(resolved[0].resolution, SignResolution::Keyword);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_trailing_segment_uses_hint_then_fallback() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        let mut hinted = pending("DD BRITISH GAS", 40.0);
        hinted.hint = Some(Sign::Debit);
        engine.push(hinted, None, &mut diags);

        let mut unhinted = pending("UNKNOWN", 7.0);
        unhinted.fallback = Sign::Credit;
        engine.push(unhinted, None, &mut diags);

        let resolved = engine.finish();
        assert_eq!(resolved[0].amount, -40.0);
        assert_eq!(resolved[0].resolution, SignResolution::Keyword);
        assert_eq!(resolved[1].amount, 7.0);
        assert_eq!(resolved[1].resolution, SignResolution::DefaultPolicy);
    }

    #[test]
    fn test_segment_bounded_by_two_balances_sums_to_delta() {
        let mut engine = ReconciliationEngine::new();
        let mut diags = Vec::new();

        engine.observe_balance(1000.0, &mut diags);
        let mut known = pending("CARD PAYMENT", 25.0);
        known.signed = Some(-25.0);
        known.resolution = Some(SignResolution::ExplicitColumn);
        engine.push(known, None, &mut diags);
        engine.push(pending("RECEIPT", 75.0), Some(1050.0), &mut diags);

        let resolved = engine.finish();
        let sum: f64 = resolved.iter().map(|e| e.amount).sum();
        assert!((sum - 50.0).abs() < 1e-9);
        assert!(diags.is_empty());
    }
}
