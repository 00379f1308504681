//! # Paceboard
//!
//! Sales & Delivery Pace Dashboard - A full-stack Rust application for
//! logging sales and delivery entries by category and tracking monthly
//! pace.
//!
//! ## Features
//!
//! - **Owner-scoped storage**: every read and write is scoped to the
//!   authenticated user at the statement level
//! - **OAuth sign-in**: session tokens issued after a Twitter/X
//!   OAuth 2.0 (PKCE) flow
//! - **Reports**: trailing 12-month matrix per type and category,
//!   running rate, and range-filtered category totals
//! - **CSV export**: download all entries or a date range
//!
//! ## Modules
//!
//! - [`store`]: SQLite entries store
//! - [`auth`]: OAuth provider client and session store
//! - [`report`]: pure aggregation over entry lists
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paceboard::store::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EntryStore::open(&StoreConfig::new("paceboard_data"))?;
//!
//!     let entry = store
//!         .create(
//!             "user-1",
//!             NewEntry {
//!                 date: "2024-01-15".parse()?,
//!                 entry_type: EntryType::Sales,
//!                 category: Category::Training,
//!                 amount: 2500.0,
//!                 title: "Workshop deposit".to_string(),
//!                 content: String::new(),
//!             },
//!         )
//!         .await?;
//!
//!     println!("Logged entry {} on {}", entry.id, entry.date);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod report;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    Category, Entry, EntryPatch, EntryStore, EntryType, NewEntry, StoreConfig, StoreError,
    StoreResult, User,
};

pub use auth::{AuthError, AuthResult, OauthConfig, Session, SessionStore, TwitterOauth};

pub use report::{
    category_totals, monthly_report, trailing_months, CategoryStats, CategoryTotal, MonthlyReport,
    TypeReport, YearMonth,
};

pub use api::{build_router, serve, ApiError, ApiResult, AppState, CurrentUser};

pub use config::{Config, ConfigError};
