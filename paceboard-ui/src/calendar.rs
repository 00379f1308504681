//! Calendar grid math
//!
//! Pure date arithmetic for the calendar page: days in a month,
//! leading blank cells (weeks start on Sunday), month navigation,
//! and per-day entry lookup. No timezone handling; everything is a
//! plain calendar date.

use chrono::{Datelike, NaiveDate};

use crate::state::Entry;

/// The month currently shown on the calendar page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl MonthView {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Header label, e.g. "January 2024"
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    /// A date inside this month
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

/// Number of days in a month, leap-aware
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

/// Blank cells before the 1st in a Sunday-first grid
pub fn leading_blanks(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// The entries that belong to exactly this date
pub fn entries_on(entries: &[Entry], date: NaiveDate) -> Vec<Entry> {
    entries.iter().filter(|e| e.date == date).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, amount: f64) -> Entry {
        Entry {
            id: 0,
            date: date.parse().unwrap(),
            entry_type: "sales".to_string(),
            category: "Training".to_string(),
            amount,
            title: "test".to_string(),
            content: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1), 31);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 2), 29); // leap year
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_leading_blanks_sunday_first() {
        // January 2024 starts on a Monday
        assert_eq!(leading_blanks(2024, 1), 1);
        // September 2024 starts on a Sunday
        assert_eq!(leading_blanks(2024, 9), 0);
        // June 2024 starts on a Saturday
        assert_eq!(leading_blanks(2024, 6), 6);
    }

    #[test]
    fn test_month_navigation_rolls_over_years() {
        assert_eq!(MonthView::new(2024, 1).prev(), MonthView::new(2023, 12));
        assert_eq!(MonthView::new(2024, 12).next(), MonthView::new(2025, 1));
        assert_eq!(MonthView::new(2024, 5).next().prev(), MonthView::new(2024, 5));
    }

    #[test]
    fn test_month_label() {
        assert_eq!(MonthView::new(2024, 1).label(), "January 2024");
    }

    #[test]
    fn test_day_bucket_contains_exactly_that_days_entries() {
        let entries = vec![
            entry("2024-01-15", 2500.0),
            entry("2024-01-15", 1800.0),
            entry("2024-01-16", 999.0),
            entry("2023-01-15", 111.0), // same day, different year
        ];

        let day = entries_on(&entries, "2024-01-15".parse().unwrap());
        assert_eq!(day.len(), 2);
        assert!(day.iter().all(|e| e.date.to_string() == "2024-01-15"));

        let empty = entries_on(&entries, "2024-02-01".parse().unwrap());
        assert!(empty.is_empty());
    }
}
