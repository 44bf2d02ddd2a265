//! tally-report: display categorization, date filtering, monthly grouping,
//! split arithmetic, and CSV export over parsed ledger entries.

pub mod categories;
pub mod export;
pub mod report;

pub use categories::categorize;
pub use export::write_detail_csv;
pub use report::{
    build_report, merge_documents, DetailRow, MonthlyCategoryRow, MonthlyRow, Report,
    ReportOptions, SourcedEntry, SplitParty, Summary,
};
