//! Stat Card Component
//!
//! Displays a single headline figure with a secondary line.

use leptos::*;

/// Stat card with a label, a value, and a hint underneath
#[component]
pub fn StatCard(
    /// Card label, e.g. "Sales (12 mo)"
    #[prop(into)]
    label: String,
    /// Headline value
    #[prop(into)]
    value: Signal<String>,
    /// Secondary line, e.g. the running rate
    #[prop(into)]
    hint: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700 hover:border-gray-600 transition-colors">
            <span class="text-gray-400 text-sm">{label}</span>

            <div class="text-3xl font-bold mt-2">
                {move || value.get()}
            </div>

            <div class="text-sm text-gray-400 mt-1">
                {move || hint.get()}
            </div>
        </div>
    }
}
