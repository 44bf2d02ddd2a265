//! Calendar helpers for month-based filtering and grouping.

use chrono::{Datelike, NaiveDate};

/// Grouping key for monthly summaries, e.g. "2025-10".
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).expect("day 1 always valid");
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .expect("first of month always valid");
    (first, next_month.pred_opt().expect("not before epoch"))
}

/// Bounds of the month before the one containing `date`.
pub fn previous_month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).expect("day 1 always valid");
    let last_of_prev = first.pred_opt().expect("not before epoch");
    month_bounds(last_of_prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key_zero_pads() {
        assert_eq!(month_key(date(2025, 3, 7)), "2025-03");
        assert_eq!(month_key(date(2025, 12, 31)), "2025-12");
    }

    #[test]
    fn test_month_bounds_mid_year() {
        let (first, last) = month_bounds(date(2025, 10, 17));
        assert_eq!(first, date(2025, 10, 1));
        assert_eq!(last, date(2025, 10, 31));
    }

    #[test]
    fn test_month_bounds_december() {
        let (first, last) = month_bounds(date(2025, 12, 5));
        assert_eq!(first, date(2025, 12, 1));
        assert_eq!(last, date(2025, 12, 31));
    }

    #[test]
    fn test_previous_month_bounds_january() {
        let (first, last) = previous_month_bounds(date(2026, 1, 15));
        assert_eq!(first, date(2025, 12, 1));
        assert_eq!(last, date(2025, 12, 31));
    }
}
