//! tally-core: shared domain types for statement parsing and reporting

pub mod dates;
pub mod ledger;

pub use dates::{month_bounds, month_key, previous_month_bounds};
pub use ledger::{LedgerEntry, Sign, SignResolution};
