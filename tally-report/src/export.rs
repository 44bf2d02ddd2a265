//! CSV rendering of report detail rows.

use std::io::Write;

use anyhow::Result;

use crate::report::{Report, SplitParty};

/// Write the report's detail rows as CSV:
/// `date,description,category,debit,credit,amount,<party...>,source_file`.
pub fn write_detail_csv<W: Write>(writer: W, report: &Report, split: &[SplitParty]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);

    let mut header = vec![
        "date".to_string(),
        "description".to_string(),
        "category".to_string(),
        "debit".to_string(),
        "credit".to_string(),
        "amount".to_string(),
    ];
    header.extend(split.iter().map(|p| p.name.clone()));
    header.push("source_file".to_string());
    w.write_record(&header)?;

    for row in &report.rows {
        let mut record = vec![
            row.date.format("%Y-%m-%d").to_string(),
            row.description.clone(),
            row.category.to_string(),
            format!("{:.2}", row.debit),
            format!("{:.2}", row.credit),
            format!("{:.2}", row.amount),
        ];
        record.extend(row.splits.iter().map(|v| format!("{v:.2}")));
        record.push(row.source.clone());
        w.write_record(&record)?;
    }

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{build_report, merge_documents, ReportOptions};
    use chrono::NaiveDate;
    use tally_core::{LedgerEntry, SignResolution};

    #[test]
    fn test_csv_layout() {
        let entries = merge_documents(vec![(
            "oct.txt".to_string(),
            vec![
                LedgerEntry::from_signed(
                    NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
                    "EBAY PAYOUT TRANSFER",
                    120.0,
                    SignResolution::BalanceDelta,
                ),
                LedgerEntry::from_signed(
                    NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
                    "TESCO STORES",
                    -45.67,
                    SignResolution::BalanceDelta,
                ),
            ],
        )]);
        let split = vec![
            SplitParty { name: "Alpha".into(), fraction: 0.2 },
            SplitParty { name: "Beta".into(), fraction: 0.8 },
        ];
        let report = build_report(
            &entries,
            &ReportOptions {
                split: split.clone(),
                ..Default::default()
            },
        )
        .unwrap();

        let mut buf = Vec::new();
        write_detail_csv(&mut buf, &report, &split).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "date,description,category,debit,credit,amount,Alpha,Beta,source_file"
        );
        assert_eq!(
            lines[1],
            "2025-10-02,TESCO STORES,Other spending,45.67,0.00,-45.67,0.00,0.00,oct.txt"
        );
        assert_eq!(
            lines[2],
            "2025-10-03,EBAY PAYOUT TRANSFER,Marketplace payout,0.00,120.00,120.00,24.00,96.00,oct.txt"
        );
    }
}
