//! Paceboard Dashboard
//!
//! Sales & Delivery pace dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - OAuth sign-in gate in front of every page
//! - Calendar page for logging entries day by day
//! - Data table with inline editing
//! - Monthly pace charts and category breakdowns
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It communicates with the Paceboard API via HTTP; the session
//! cookie set by the OAuth callback authenticates every call.

use leptos::*;

mod api;
mod app;
mod calendar;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
