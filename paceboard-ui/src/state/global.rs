//! Global Application State
//!
//! Reactive state management using Leptos signals. The entries list
//! is a session-scoped cache provided as an explicit context object:
//! provided at the root, reset on sign-out, repopulated after
//! sign-in.

use chrono::NaiveDate;
use leptos::*;

use crate::api;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// The signed-in user, if any
    pub user: RwSignal<Option<UserProfile>>,
    /// True once the initial session check has resolved
    pub auth_checked: RwSignal<bool>,
    /// The entries cache; refreshed after every mutation
    pub entries: RwSignal<Vec<Entry>>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// User profile from the API
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UserProfile {
    pub id: String,
    pub handle: String,
    pub display_name: String,
}

/// An entry as served by the API
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Entry {
    pub id: i64,
    pub date: NaiveDate,
    pub entry_type: String,
    pub category: String,
    pub amount: f64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Entry {
    pub fn is_sales(&self) -> bool {
        self.entry_type == "sales"
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        user: create_rw_signal(None),
        auth_checked: create_rw_signal(false),
        entries: create_rw_signal(Vec::new()),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Re-fetch the entries list from the API
    pub async fn refresh_entries(&self) {
        match api::fetch_entries().await {
            Ok(entries) => self.entries.set(entries),
            Err(e) => self.show_error(&e),
        }
    }

    /// Clear everything tied to the session (sign-out)
    pub fn reset(&self) {
        self.user.set(None);
        self.entries.set(Vec::new());
    }

    /// Sum of amounts for one type on one day
    pub fn day_total(&self, date: NaiveDate, sales: bool) -> f64 {
        self.entries
            .get()
            .iter()
            .filter(|e| e.date == date && e.is_sales() == sales)
            .map(|e| e.amount)
            .sum()
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
