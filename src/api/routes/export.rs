//! Export Route
//!
//! CSV download of the caller's entries, optionally bounded to an
//! inclusive date range.
//!
//! - GET /api/v1/export?start=yyyy-MM-dd&end=yyyy-MM-dd

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::store::Entry;

/// GET /api/v1/export
pub async fn export_entries(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let entries = match (params.start, params.end) {
        (Some(start), Some(end)) => state.store.list_range(&user.user_id, start, end).await?,
        (None, None) => state.store.list(&user.user_id).await?,
        _ => {
            return Err(ApiError::Validation(
                "Export range needs both start and end".to_string(),
            ))
        }
    };

    let csv = entries_to_csv(&entries)?;

    tracing::info!(user_id = %user.user_id, rows = entries.len(), "Exported entries");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"entries.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

fn entries_to_csv(entries: &[Entry]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "date",
            "type",
            "category",
            "amount",
            "title",
            "content",
            "created_at",
            "updated_at",
        ])
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;

    for entry in entries {
        writer
            .write_record([
                entry.id.to_string(),
                entry.date.to_string(),
                entry.entry_type.to_string(),
                entry.category.to_string(),
                entry.amount.to_string(),
                entry.title.clone(),
                entry.content.clone(),
                entry.created_at.to_rfc3339(),
                entry.updated_at.to_rfc3339(),
            ])
            .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| ApiError::Internal(format!("CSV encoding: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Category, EntryType};
    use chrono::Utc;

    #[test]
    fn test_csv_shape() {
        let entries = vec![Entry {
            id: 1,
            user_id: "alice".to_string(),
            date: "2024-01-15".parse().unwrap(),
            entry_type: EntryType::Sales,
            category: Category::Training,
            amount: 2500.0,
            title: "Workshop, day one".to_string(),
            content: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];

        let csv = entries_to_csv(&entries).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,type,category,amount,title,content,created_at,updated_at"
        );
        // Comma in the title gets quoted
        assert!(lines.next().unwrap().contains("\"Workshop, day one\""));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = entries_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
