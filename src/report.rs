//! Report aggregation
//!
//! Pure functions over entry lists. The dashboard's monthly view is a
//! fixed trailing 12-month window ending at an explicit anchor month,
//! so callers (and tests) control "now".

use crate::store::{Category, Entry, EntryType};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Number of months in the trailing window
pub const WINDOW_MONTHS: usize = 12;

/// A calendar month bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The month before this one, rolling over year boundaries
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// True when the date falls inside this month
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Short chart label, e.g. "Jan 2024"
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

/// The trailing window ending at the anchor's month, oldest first
pub fn trailing_months(anchor: NaiveDate) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(WINDOW_MONTHS);
    let mut current = YearMonth::of(anchor);
    for _ in 0..WINDOW_MONTHS {
        months.push(current);
        current = current.prev();
    }
    months.reverse();
    months
}

/// Per-category summary over the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    /// Sum over the window
    pub total: f64,
    /// Arithmetic mean over months with nonzero activity; zero when
    /// no month is active
    pub active_mean: f64,
    /// Sum of the 12 buckets divided by 12, zero months included
    pub running_rate: f64,
}

/// One category's 12-slot series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    pub category: Category,
    pub values: Vec<f64>,
}

/// Everything the dashboard needs for one entry type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeReport {
    pub entry_type: EntryType,
    /// One series per category, in `Category::ALL` order
    pub series: Vec<CategorySeries>,
    /// Per-month totals across categories
    pub totals: Vec<f64>,
    /// Per-category stats, in `Category::ALL` order
    pub stats: Vec<CategoryStats>,
    /// Sum over the whole window
    pub total: f64,
    /// Trailing average across the window, zero months included
    pub running_rate: f64,
}

/// The trailing 12-month report for both entry types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub months: Vec<YearMonth>,
    pub sales: TypeReport,
    pub delivery: TypeReport,
}

/// Bucket entries into the trailing 12-month window ending at the
/// anchor's month. Months with no matching entries report zero.
pub fn monthly_report(entries: &[Entry], anchor: NaiveDate) -> MonthlyReport {
    let months = trailing_months(anchor);

    MonthlyReport {
        sales: type_report(entries, EntryType::Sales, &months),
        delivery: type_report(entries, EntryType::Delivery, &months),
        months,
    }
}

fn type_report(entries: &[Entry], entry_type: EntryType, months: &[YearMonth]) -> TypeReport {
    let mut series: Vec<CategorySeries> = Category::ALL
        .iter()
        .map(|&category| CategorySeries {
            category,
            values: vec![0.0; months.len()],
        })
        .collect();

    for entry in entries.iter().filter(|e| e.entry_type == entry_type) {
        let Some(slot) = months.iter().position(|m| m.contains(entry.date)) else {
            continue;
        };
        let row = Category::ALL
            .iter()
            .position(|&c| c == entry.category)
            .expect("category is a member of Category::ALL");
        series[row].values[slot] += entry.amount;
    }

    let totals: Vec<f64> = (0..months.len())
        .map(|slot| series.iter().map(|s| s.values[slot]).sum())
        .collect();

    let stats: Vec<CategoryStats> = series
        .iter()
        .map(|s| {
            let total: f64 = s.values.iter().sum();
            let active = s.values.iter().filter(|&&v| v != 0.0).count();
            CategoryStats {
                category: s.category,
                total,
                active_mean: if active > 0 { total / active as f64 } else { 0.0 },
                running_rate: total / WINDOW_MONTHS as f64,
            }
        })
        .collect();

    let total: f64 = totals.iter().sum();

    TypeReport {
        entry_type,
        series,
        totals,
        stats,
        total,
        running_rate: total / WINDOW_MONTHS as f64,
    }
}

/// One pie slice: a category's total over the selected range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Category totals for one entry type over an inclusive date range.
/// Always returns all three categories; empty ones total zero.
pub fn category_totals(
    entries: &[Entry],
    entry_type: EntryType,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CategoryTotal> {
    Category::ALL
        .iter()
        .map(|&category| CategoryTotal {
            category,
            total: entries
                .iter()
                .filter(|e| {
                    e.entry_type == entry_type
                        && e.category == category
                        && e.date >= start
                        && e.date <= end
                })
                .map(|e| e.amount)
                .sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(date: &str, ty: EntryType, category: Category, amount: f64) -> Entry {
        Entry {
            id: 0,
            user_id: "alice".to_string(),
            date: date.parse().unwrap(),
            entry_type: ty,
            category,
            amount,
            title: "test".to_string(),
            content: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn anchor() -> NaiveDate {
        "2024-06-15".parse().unwrap()
    }

    #[test]
    fn test_trailing_months_window() {
        let months = trailing_months(anchor());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], YearMonth::new(2023, 7));
        assert_eq!(months[11], YearMonth::new(2024, 6));
    }

    #[test]
    fn test_year_month_labels() {
        assert_eq!(YearMonth::new(2024, 1).label(), "Jan 2024");
        assert_eq!(YearMonth::new(2023, 12).label(), "Dec 2023");
    }

    #[test]
    fn test_monthly_sums_match_entries() {
        let entries = vec![
            entry("2024-01-15", EntryType::Sales, Category::Training, 2500.0),
            entry("2024-01-20", EntryType::Sales, Category::Training, 500.0),
            entry("2024-01-15", EntryType::Delivery, Category::Coaching, 1800.0),
            entry("2024-03-01", EntryType::Sales, Category::Speaking, 750.0),
        ];

        let report = monthly_report(&entries, anchor());
        let jan = report
            .months
            .iter()
            .position(|m| *m == YearMonth::new(2024, 1))
            .unwrap();
        let mar = report
            .months
            .iter()
            .position(|m| *m == YearMonth::new(2024, 3))
            .unwrap();

        assert_eq!(report.sales.series[0].values[jan], 3000.0); // Training
        assert_eq!(report.sales.series[2].values[mar], 750.0); // Speaking
        assert_eq!(report.sales.totals[jan], 3000.0);
        assert_eq!(report.delivery.totals[jan], 1800.0);

        // Months with no matching entries report zero
        let feb = report
            .months
            .iter()
            .position(|m| *m == YearMonth::new(2024, 2))
            .unwrap();
        assert_eq!(report.sales.totals[feb], 0.0);
        assert_eq!(report.delivery.totals[feb], 0.0);
    }

    #[test]
    fn test_entries_outside_window_are_excluded() {
        let entries = vec![
            entry("2023-06-30", EntryType::Sales, Category::Training, 9999.0), // 13 months back
            entry("2024-07-01", EntryType::Sales, Category::Training, 9999.0), // next month
            entry("2023-07-01", EntryType::Sales, Category::Training, 100.0),  // oldest slot
        ];

        let report = monthly_report(&entries, anchor());
        assert_eq!(report.sales.total, 100.0);
        assert_eq!(report.sales.series[0].values[0], 100.0);
    }

    #[test]
    fn test_running_rate_includes_zero_months() {
        // A single active month still spreads over all 12
        let entries = vec![entry(
            "2024-06-01",
            EntryType::Sales,
            Category::Coaching,
            1200.0,
        )];

        let report = monthly_report(&entries, anchor());
        let coaching = &report.sales.stats[1];
        assert_eq!(coaching.total, 1200.0);
        assert_eq!(coaching.running_rate, 100.0);
        assert_eq!(report.sales.running_rate, 100.0);
    }

    #[test]
    fn test_active_mean_skips_zero_months() {
        let entries = vec![
            entry("2024-04-10", EntryType::Sales, Category::Training, 300.0),
            entry("2024-06-10", EntryType::Sales, Category::Training, 500.0),
        ];

        let report = monthly_report(&entries, anchor());
        let training = &report.sales.stats[0];
        // Two active months out of twelve
        assert_eq!(training.active_mean, 400.0);

        // No activity at all means a zero mean, not NaN
        let speaking = &report.sales.stats[2];
        assert_eq!(speaking.active_mean, 0.0);
    }

    #[test]
    fn test_worked_example_day_and_month_totals() {
        let entries = vec![
            entry("2024-01-15", EntryType::Sales, Category::Training, 2500.0),
            entry("2024-01-15", EntryType::Delivery, Category::Coaching, 1800.0),
            entry("2024-01-28", EntryType::Sales, Category::Coaching, 400.0),
        ];

        let report = monthly_report(&entries, anchor());
        let jan = report
            .months
            .iter()
            .position(|m| *m == YearMonth::new(2024, 1))
            .unwrap();

        // Month total for sales is the worked example plus other January sales
        assert_eq!(report.sales.totals[jan], 2500.0 + 400.0);
        assert_eq!(report.delivery.totals[jan], 1800.0);
    }

    #[test]
    fn test_category_totals_filters_by_range() {
        let entries = vec![
            entry("2024-01-15", EntryType::Sales, Category::Training, 2500.0),
            entry("2024-02-15", EntryType::Sales, Category::Training, 1000.0),
            entry("2024-02-15", EntryType::Sales, Category::Coaching, 300.0),
            entry("2024-02-15", EntryType::Delivery, Category::Coaching, 999.0),
        ];

        let totals = category_totals(
            &entries,
            EntryType::Sales,
            "2024-02-01".parse().unwrap(),
            "2024-02-29".parse().unwrap(),
        );

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].category, Category::Training);
        assert_eq!(totals[0].total, 1000.0); // January entry filtered out
        assert_eq!(totals[1].total, 300.0);
        assert_eq!(totals[2].total, 0.0); // Speaking present with zero
    }

    #[test]
    fn test_category_totals_range_is_inclusive() {
        let entries = vec![
            entry("2024-02-01", EntryType::Sales, Category::Training, 10.0),
            entry("2024-02-29", EntryType::Sales, Category::Training, 20.0),
        ];

        let totals = category_totals(
            &entries,
            EntryType::Sales,
            "2024-02-01".parse().unwrap(),
            "2024-02-29".parse().unwrap(),
        );
        assert_eq!(totals[0].total, 30.0);
    }
}
