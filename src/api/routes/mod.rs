//! Route handlers

pub mod auth;
pub mod entries;
pub mod export;
pub mod health;
pub mod reports;
