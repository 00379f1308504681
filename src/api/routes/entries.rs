//! Entries Routes
//!
//! CRUD endpoints for the caller's entries. Every handler takes
//! `CurrentUser`, so all reads and writes are scoped to the session
//! user; rows owned by other users answer 404.
//!
//! - GET    /api/v1/entries     - List entries, newest date first
//! - POST   /api/v1/entries     - Create an entry
//! - PUT    /api/v1/entries/:id - Update an entry
//! - DELETE /api/v1/entries/:id - Delete an entry

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateEntryRequest, EntryListResponse, EntryResponse, UpdateEntryRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::store::{Category, EntryPatch, EntryType, NewEntry};

/// GET /api/v1/entries
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<EntryListResponse>> {
    let entries = state.store.list(&user.user_id).await?;

    let responses: Vec<EntryResponse> = entries.iter().map(EntryResponse::from).collect();

    Ok(Json(EntryListResponse {
        total: responses.len(),
        entries: responses,
    }))
}

/// POST /api/v1/entries
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    let new = NewEntry {
        date: req.date,
        entry_type: parse_entry_type(&req.entry_type)?,
        category: parse_category(&req.category)?,
        amount: req.amount,
        title: req.title,
        content: req.content,
    };

    let entry = state.store.create(&user.user_id, new).await?;

    tracing::info!(
        user_id = %user.user_id,
        entry_id = entry.id,
        entry_type = %entry.entry_type,
        category = %entry.category,
        "Created entry"
    );

    Ok((StatusCode::CREATED, Json(EntryResponse::from(&entry))))
}

/// PUT /api/v1/entries/:id
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> ApiResult<Json<EntryResponse>> {
    let patch = EntryPatch {
        date: req.date,
        entry_type: req.entry_type.as_deref().map(parse_entry_type).transpose()?,
        category: req.category.as_deref().map(parse_category).transpose()?,
        amount: req.amount,
        title: req.title,
        content: req.content,
    };

    let entry = state.store.update(&user.user_id, id, patch).await?;

    tracing::info!(user_id = %user.user_id, entry_id = id, "Updated entry");

    Ok(Json(EntryResponse::from(&entry)))
}

/// DELETE /api/v1/entries/:id
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete(&user.user_id, id).await?;

    tracing::info!(user_id = %user.user_id, entry_id = id, "Deleted entry");

    Ok(StatusCode::NO_CONTENT)
}

/// Parse entry type string
pub(crate) fn parse_entry_type(s: &str) -> ApiResult<EntryType> {
    s.parse().map_err(ApiError::Validation)
}

/// Parse category string
pub(crate) fn parse_category(s: &str) -> ApiResult<Category> {
    s.parse().map_err(ApiError::Validation)
}
