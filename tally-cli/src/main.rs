use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use tally_core::{month_bounds, previous_month_bounds};
use tally_ingest::{ParseOutput, StatementParser};
use tally_report::{build_report, merge_documents, write_detail_csv, ReportOptions, SplitParty};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Bank-statement text parser and analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse extracted statement text files and print the resolved entries
    Parse {
        /// Text files, one document per file
        files: Vec<PathBuf>,

        /// Emit entries and diagnostics as JSON
        #[arg(long)]
        json: bool,

        /// Show how each entry's sign was resolved
        #[arg(long)]
        audit: bool,
    },

    /// Parse, merge, and summarize with monthly grouping and credit splits
    Report {
        /// Text files, one document per file
        files: Vec<PathBuf>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["this_month", "last_month"])]
        from: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["this_month", "last_month"])]
        to: Option<String>,

        /// Restrict to the current calendar month
        #[arg(long)]
        this_month: bool,

        /// Restrict to the previous calendar month
        #[arg(long, conflicts_with = "this_month")]
        last_month: bool,

        /// Credit split, e.g. "alpha=0.2,beta=0.8"
        #[arg(long)]
        split: Option<String>,

        /// Write detail rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { files, json, audit } => run_parse(files, json, audit),
        Command::Report {
            files,
            from,
            to,
            this_month,
            last_month,
            split,
            csv,
        } => {
            let (from, to) = resolve_range(from, to, this_month, last_month)?;
            let split = split.map(|s| parse_split(&s)).transpose()?.unwrap_or_default();
            run_report(files, from, to, split, csv)
        }
    }
}

fn parse_files(files: &[PathBuf]) -> Result<Vec<(String, ParseOutput)>> {
    if files.is_empty() {
        bail!("no input files (pass one extracted-text file per statement)");
    }

    let parser = StatementParser::hsbc()?;
    let mut outputs = Vec::new();

    for path in files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let output = parser.parse_document(text.lines());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if output.entries.is_empty() {
            println!("{}: no transactions parsed", name);
        }
        outputs.push((name, output));
    }

    Ok(outputs)
}

fn run_parse(files: Vec<PathBuf>, json: bool, audit: bool) -> Result<()> {
    let outputs = parse_files(&files)?;

    if json {
        let payload: Vec<_> = outputs
            .iter()
            .map(|(name, output)| serde_json::json!({ "file": name, "output": output }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for (name, output) in &outputs {
        println!(
            "{}: {} entries, {} diagnostics",
            name,
            output.entries.len(),
            output.diagnostics.len()
        );
        for e in &output.entries {
            if audit {
                println!(
                    "  {} {:>10.2} [{:?}] {}",
                    e.date, e.amount, e.resolution, e.description
                );
            } else {
                println!("  {} {:>10.2} {}", e.date, e.amount, e.description);
            }
        }
        for d in &output.diagnostics {
            println!("  diagnostic: {:?}", d);
        }
    }

    Ok(())
}

fn run_report(
    files: Vec<PathBuf>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    split: Vec<SplitParty>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let outputs = parse_files(&files)?;
    let diagnostics: usize = outputs.iter().map(|(_, o)| o.diagnostics.len()).sum();

    let merged = merge_documents(
        outputs
            .into_iter()
            .map(|(name, o)| (name, o.entries))
            .collect(),
    );

    let opts = ReportOptions {
        from,
        to,
        split: split.clone(),
    };
    let report = build_report(&merged, &opts)?;

    if report.rows.is_empty() {
        println!("No transactions in the selected date range.");
        return Ok(());
    }

    let s = &report.summary;
    println!(
        "Credits: {:.2} | Debits: {:.2} | Net: {:.2} | Transactions: {}",
        s.total_in, s.total_out, s.net, s.count
    );
    for (name, total) in &s.split_totals {
        println!("  {}: {:.2}", name, total);
    }

    if !report.inbound.is_empty() {
        println!("\nInbound by month and category:");
        for row in &report.inbound {
            println!(
                "  {} {:<24} {:>10.2}  x{}",
                row.month, row.category, row.amount, row.count
            );
        }
    }

    if !report.outbound.is_empty() {
        println!("\nOutbound by month and category:");
        for row in &report.outbound {
            println!(
                "  {} {:<24} {:>10.2}  x{}",
                row.month, row.category, row.amount, row.count
            );
        }
    }

    println!("\nDetails:");
    for row in &report.rows {
        println!(
            "  {} {:>10.2} {:<24} {}",
            row.date, row.amount, row.category, row.description
        );
    }

    if diagnostics > 0 {
        println!("\n{} diagnostics recorded (run `tally parse` to inspect)", diagnostics);
    }

    if let Some(path) = csv {
        let file = fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_detail_csv(file, &report, &split)?;
        println!("Wrote {} rows to {}", report.rows.len(), path.display());
    }

    Ok(())
}

fn resolve_range(
    from: Option<String>,
    to: Option<String>,
    this_month: bool,
    last_month: bool,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    if this_month || last_month {
        let today = Local::now().date_naive();
        let (first, last) = if this_month {
            month_bounds(today)
        } else {
            previous_month_bounds(today)
        };
        return Ok((Some(first), Some(last)));
    }

    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
    };
    Ok((
        from.as_deref().map(parse).transpose()?,
        to.as_deref().map(parse).transpose()?,
    ))
}

/// Parse "alpha=0.2,beta=0.8" into split parties.
fn parse_split(spec: &str) -> Result<Vec<SplitParty>> {
    let mut parties = Vec::new();
    for part in spec.split(',') {
        let (name, fraction) = part
            .split_once('=')
            .with_context(|| format!("invalid split part '{part}' (expected name=fraction)"))?;
        let fraction: f64 = fraction
            .trim()
            .parse()
            .with_context(|| format!("invalid fraction in '{part}'"))?;
        parties.push(SplitParty {
            name: name.trim().to_string(),
            fraction,
        });
    }
    Ok(parties)
}
