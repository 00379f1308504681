//! Report Routes
//!
//! Aggregations the dashboard charts are drawn from.
//!
//! - GET /api/v1/reports/monthly    - Trailing 12-month report
//! - GET /api/v1/reports/categories - Category totals for a pie chart

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::api::dto::{CategoryReportParams, CategoryTotalsResponse, MonthlyReportParams};
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use crate::api::routes::entries::parse_entry_type;
use crate::api::state::AppState;
use crate::report::{category_totals, monthly_report, trailing_months, MonthlyReport};
use crate::store::EntryType;

/// GET /api/v1/reports/monthly
///
/// The trailing 12-month matrix for both entry types, anchored at
/// today unless the caller pins the window (used by tests and
/// historical views).
pub async fn monthly(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<MonthlyReportParams>,
) -> ApiResult<Json<MonthlyReport>> {
    let anchor = params.anchor.unwrap_or_else(today);
    let entries = state.store.list(&user.user_id).await?;

    Ok(Json(monthly_report(&entries, anchor)))
}

/// GET /api/v1/reports/categories
///
/// Per-category totals for one entry type over an inclusive date
/// range. The range always filters; it defaults to the trailing
/// 12-month window.
pub async fn categories(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<CategoryReportParams>,
) -> ApiResult<Json<CategoryTotalsResponse>> {
    let entry_type = match params.entry_type.as_deref() {
        Some(raw) => parse_entry_type(raw)?,
        None => EntryType::Sales,
    };

    let end = params.end.unwrap_or_else(today);
    let start = params.start.unwrap_or_else(|| window_start(end));

    let entries = state.store.list_range(&user.user_id, start, end).await?;
    let totals = category_totals(&entries, entry_type, start, end);

    Ok(Json(CategoryTotalsResponse {
        entry_type: entry_type.to_string(),
        start,
        end,
        totals,
    }))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the oldest month in the trailing window ending at `end`
fn window_start(end: NaiveDate) -> NaiveDate {
    let oldest = trailing_months(end)[0];
    NaiveDate::from_ymd_opt(oldest.year, oldest.month, 1).expect("first of month is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start() {
        let end = "2024-06-15".parse().unwrap();
        assert_eq!(window_start(end).to_string(), "2023-07-01");

        let end = "2024-01-31".parse().unwrap();
        assert_eq!(window_start(end).to_string(), "2023-02-01");
    }
}
