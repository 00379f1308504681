//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::report::CategoryTotal;
use crate::store::{Entry, User};

// ============================================
// ENTRY DTOs
// ============================================

/// Create entry request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    /// Calendar date the entry belongs to (yyyy-MM-dd)
    pub date: NaiveDate,
    /// Entry type: sales or delivery
    pub entry_type: String,
    /// Category: Training, Coaching, or Speaking
    pub category: String,
    /// Monetary amount, non-negative
    pub amount: f64,
    /// Free-text label (required, non-empty)
    pub title: String,
    /// Free-text notes
    #[serde(default)]
    pub content: String,
}

/// Update entry request; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntryRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Entry response
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub entry_type: String,
    pub category: String,
    pub amount: f64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Entry> for EntryResponse {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            entry_type: entry.entry_type.to_string(),
            category: entry.category.to_string(),
            amount: entry.amount,
            title: entry.title.clone(),
            content: entry.content.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// List entries response
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryResponse>,
    pub total: usize,
}

// ============================================
// SESSION DTOs
// ============================================

/// Current session response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: UserResponse,
}

/// User profile
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub handle: String,
    pub display_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            handle: user.handle,
            display_name: user.display_name,
        }
    }
}

// ============================================
// REPORT DTOs
// ============================================

/// Monthly report query parameters
#[derive(Debug, Deserialize)]
pub struct MonthlyReportParams {
    /// Anchor date for the trailing window (defaults to today)
    #[serde(default)]
    pub anchor: Option<NaiveDate>,
}

/// Category totals (pie chart) query parameters
#[derive(Debug, Deserialize)]
pub struct CategoryReportParams {
    /// Entry type: sales or delivery (default sales)
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    /// Inclusive range start (defaults to the trailing window start)
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Inclusive range end (defaults to today)
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Category totals response
#[derive(Debug, Serialize)]
pub struct CategoryTotalsResponse {
    pub entry_type: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub totals: Vec<CategoryTotal>,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Inclusive range start; omit for all entries
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Inclusive range end; omit for all entries
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Entries store status
    pub store: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
