//! HTTP API Client
//!
//! Functions for communicating with the Paceboard REST API. The
//! session cookie set by the OAuth callback rides along on every
//! request, so all calls include credentials.

use chrono::NaiveDate;
use gloo_net::http::{Request, RequestBuilder, Response};
use web_sys::RequestCredentials;

use crate::state::global::{Entry, UserProfile};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(url)) = storage.get_item("paceboard_api_url") {
                url
            } else {
                DEFAULT_API_BASE.to_string()
            }
        } else {
            DEFAULT_API_BASE.to_string()
        }
    } else {
        DEFAULT_API_BASE.to_string()
    };
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// The sign-in URL the auth page sends the browser to
pub fn login_url() -> String {
    format!("{}/auth/login", get_api_base())
}

/// Download link for the CSV export
pub fn export_url() -> String {
    format!("{}/api/v1/export", get_api_base())
}

fn get(path: &str) -> RequestBuilder {
    Request::get(&format!("{}{}", get_api_base(), path))
        .credentials(RequestCredentials::Include)
}

fn post(path: &str) -> RequestBuilder {
    Request::post(&format!("{}{}", get_api_base(), path))
        .credentials(RequestCredentials::Include)
}

fn put(path: &str) -> RequestBuilder {
    Request::put(&format!("{}{}", get_api_base(), path))
        .credentials(RequestCredentials::Include)
}

fn delete(path: &str) -> RequestBuilder {
    Request::delete(&format!("{}{}", get_api_base(), path))
        .credentials(RequestCredentials::Include)
}

// ============ Response Types ============

#[derive(Debug, serde::Deserialize)]
pub struct EntryListResponse {
    pub entries: Vec<Entry>,
    pub total: usize,
}

#[derive(Debug, serde::Deserialize)]
pub struct SessionResponse {
    pub user: UserProfile,
}

/// One month slot of the trailing window
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Month {
    /// Short chart label, e.g. "Jan 24"
    pub fn label(&self) -> String {
        format!(
            "{} {:02}",
            MONTH_NAMES[(self.month - 1) as usize],
            self.year % 100
        )
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CategorySeries {
    pub category: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub total: f64,
    pub active_mean: f64,
    pub running_rate: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TypeReport {
    pub entry_type: String,
    pub series: Vec<CategorySeries>,
    pub totals: Vec<f64>,
    pub stats: Vec<CategoryStats>,
    pub total: f64,
    pub running_rate: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MonthlyReport {
    pub months: Vec<Month>,
    pub sales: TypeReport,
    pub delivery: TypeReport,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CategoryTotalsResponse {
    pub entry_type: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub totals: Vec<CategoryTotal>,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the error message out of a failed response
async fn error_message(response: Response) -> String {
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => format!("Request failed with status {}", response.status()),
    }
}

// ============ Request Types ============

#[derive(Debug, serde::Serialize)]
pub struct NewEntryRequest {
    pub date: NaiveDate,
    pub entry_type: String,
    pub category: String,
    pub amount: f64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, serde::Serialize)]
pub struct EntryPatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ============ API Functions ============

/// Resolve the current session; `None` means signed out
pub async fn fetch_session() -> Result<Option<UserProfile>, String> {
    let response = get("/api/v1/session")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status() == 401 {
        return Ok(None);
    }

    if !response.ok() {
        return Err(error_message(response).await);
    }

    let session: SessionResponse = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    Ok(Some(session.user))
}

/// End the current session
pub async fn logout() -> Result<(), String> {
    let response = post("/api/v1/logout")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    Ok(())
}

/// Fetch all entries, newest date first
pub async fn fetch_entries() -> Result<Vec<Entry>, String> {
    let response = get("/api/v1/entries")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    let result: EntryListResponse = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    Ok(result.entries)
}

/// Create a new entry
pub async fn create_entry(request: &NewEntryRequest) -> Result<Entry, String> {
    let response = post("/api/v1/entries")
        .json(request)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Update an existing entry
pub async fn update_entry(id: i64, patch: &EntryPatchRequest) -> Result<Entry, String> {
    let response = put(&format!("/api/v1/entries/{}", id))
        .json(patch)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Delete an entry
pub async fn delete_entry(id: i64) -> Result<(), String> {
    let response = delete(&format!("/api/v1/entries/{}", id))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    Ok(())
}

/// Fetch the trailing 12-month report
pub async fn fetch_monthly_report() -> Result<MonthlyReport, String> {
    let response = get("/api/v1/reports/monthly")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Fetch category totals for one type over an inclusive range
pub async fn fetch_category_totals(
    entry_type: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<CategoryTotalsResponse, String> {
    let response = get(&format!(
        "/api/v1/reports/categories?type={}&start={}&end={}",
        entry_type, start, end
    ))
    .send()
    .await
    .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}
