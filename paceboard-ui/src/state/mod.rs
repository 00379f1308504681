//! State Management
//!
//! Global application state shared across pages.

pub mod global;

pub use global::{provide_global_state, Entry, GlobalState, UserProfile};
