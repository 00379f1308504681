//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod entry_form;
pub mod loading;
pub mod nav;
pub mod pie;
pub mod stat_card;
pub mod toast;

pub use chart::MonthlyChart;
pub use entry_form::EntryForm;
pub use loading::{ChartSkeleton, Loading};
pub use nav::Nav;
pub use pie::PieChart;
pub use stat_card::StatCard;
pub use toast::Toast;
