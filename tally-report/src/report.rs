//! Report assembly: merging documents, date filtering, monthly grouping,
//! and credit split arithmetic.

use std::collections::{BTreeMap, HashSet};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tally_core::{month_key, LedgerEntry};

use crate::categories::categorize;

/// A ledger entry tagged with the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcedEntry {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    pub source: String,
}

/// Concatenate per-document outputs, sort by date (stable, preserving
/// per-document order within a day), and drop exact duplicate
/// (date, amount, description) triples across documents.
pub fn merge_documents(docs: Vec<(String, Vec<LedgerEntry>)>) -> Vec<SourcedEntry> {
    let mut merged: Vec<SourcedEntry> = docs
        .into_iter()
        .flat_map(|(source, entries)| {
            entries.into_iter().map(move |entry| SourcedEntry {
                entry,
                source: source.clone(),
            })
        })
        .collect();

    merged.sort_by_key(|s| s.entry.date);

    let mut seen = HashSet::new();
    merged.retain(|s| {
        seen.insert((
            s.entry.date,
            s.entry.amount.to_bits(),
            s.entry.description.clone(),
        ))
    });

    merged
}

/// A named share of every credit, e.g. a 20%/80% revenue split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitParty {
    pub name: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Inclusive start of the date range.
    pub from: Option<NaiveDate>,
    /// Inclusive end of the date range.
    pub to: Option<NaiveDate>,
    /// Credit split parties; empty disables split columns. Fractions must
    /// sum to 1.
    pub split: Vec<SplitParty>,
}

/// One detail line of the report, ready for tabular or CSV rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub date: NaiveDate,
    pub description: String,
    pub category: &'static str,
    pub debit: f64,
    pub credit: f64,
    pub amount: f64,
    /// Per-party share of this row's credit, aligned with the options'
    /// split parties.
    pub splits: Vec<f64>,
    pub source: String,
}

/// Month × category aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCategoryRow {
    pub month: String,
    pub category: &'static str,
    pub amount: f64,
    pub count: usize,
    pub splits: Vec<f64>,
}

/// Month-level aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: String,
    pub amount: f64,
    pub count: usize,
    pub splits: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_in: f64,
    /// Reported as a positive magnitude.
    pub total_out: f64,
    pub net: f64,
    pub count: usize,
    pub split_totals: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<DetailRow>,
    pub summary: Summary,
    /// Inbound month × category breakdown (credits only).
    pub inbound: Vec<MonthlyCategoryRow>,
    /// Inbound monthly totals.
    pub inbound_overview: Vec<MonthlyRow>,
    /// Outbound month × category breakdown (debits only).
    pub outbound: Vec<MonthlyCategoryRow>,
}

/// Build a report over merged entries. Fails only on invalid options.
pub fn build_report(entries: &[SourcedEntry], opts: &ReportOptions) -> Result<Report> {
    if !opts.split.is_empty() {
        let total: f64 = opts.split.iter().map(|p| p.fraction).sum();
        if (total - 1.0).abs() > 1e-9 {
            bail!("split fractions must sum to 1, got {total}");
        }
        for p in &opts.split {
            if p.fraction < 0.0 {
                bail!("split fraction for {} is negative", p.name);
            }
        }
    }

    let rows: Vec<DetailRow> = entries
        .iter()
        .filter(|s| {
            opts.from.is_none_or(|from| s.entry.date >= from)
                && opts.to.is_none_or(|to| s.entry.date <= to)
        })
        .map(|s| {
            let splits = opts
                .split
                .iter()
                .map(|p| s.entry.credit * p.fraction)
                .collect();
            DetailRow {
                date: s.entry.date,
                description: s.entry.description.clone(),
                category: categorize(&s.entry.description, s.entry.amount),
                debit: s.entry.debit,
                credit: s.entry.credit,
                amount: s.entry.amount,
                splits,
                source: s.source.clone(),
            }
        })
        .collect();

    let total_in: f64 = rows.iter().map(|r| r.credit).sum();
    let total_out: f64 = rows.iter().map(|r| r.debit).sum();
    let split_totals = opts
        .split
        .iter()
        .map(|p| (p.name.clone(), total_in * p.fraction))
        .collect();

    let summary = Summary {
        total_in,
        total_out,
        net: total_in - total_out,
        count: rows.len(),
        split_totals,
    };

    let inbound = group_by_month_category(&rows, opts, true);
    let outbound = group_by_month_category(&rows, opts, false);
    let inbound_overview = group_by_month(&rows, opts);

    Ok(Report {
        rows,
        summary,
        inbound,
        inbound_overview,
        outbound,
    })
}

fn group_by_month_category(
    rows: &[DetailRow],
    opts: &ReportOptions,
    inbound: bool,
) -> Vec<MonthlyCategoryRow> {
    let mut groups: BTreeMap<(String, &'static str), (f64, usize)> = BTreeMap::new();
    for row in rows {
        if inbound != (row.amount > 0.0) {
            continue;
        }
        let magnitude = if inbound { row.credit } else { row.debit };
        let g = groups
            .entry((month_key(row.date), row.category))
            .or_insert((0.0, 0));
        g.0 += magnitude;
        g.1 += 1;
    }

    groups
        .into_iter()
        .map(|((month, category), (amount, count))| MonthlyCategoryRow {
            month,
            category,
            amount,
            count,
            splits: if inbound {
                opts.split.iter().map(|p| amount * p.fraction).collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}

fn group_by_month(rows: &[DetailRow], opts: &ReportOptions) -> Vec<MonthlyRow> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in rows {
        if row.amount <= 0.0 {
            continue;
        }
        let g = groups.entry(month_key(row.date)).or_insert((0.0, 0));
        g.0 += row.credit;
        g.1 += 1;
    }

    groups
        .into_iter()
        .map(|(month, (amount, count))| MonthlyRow {
            month,
            amount,
            count,
            splits: opts.split.iter().map(|p| amount * p.fraction).collect(),
        })
        .collect()
}
