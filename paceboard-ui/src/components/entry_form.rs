//! Entry Form Component
//!
//! Form for logging a new entry from the calendar page. On success
//! the entries cache is refreshed so every view stays consistent.

use chrono::NaiveDate;
use leptos::*;

use crate::api;
use crate::state::GlobalState;

/// Add-entry form
#[component]
pub fn EntryForm(
    /// Initial date, usually the selected calendar day
    #[prop(into)]
    initial_date: Signal<NaiveDate>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (date, set_date) = create_signal(initial_date.get_untracked());
    let (entry_type, set_entry_type) = create_signal("sales".to_string());
    let (category, set_category) = create_signal("Training".to_string());
    let (amount, set_amount) = create_signal(String::new());
    let (title, set_title) = create_signal(String::new());
    let (content, set_content) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    // Follow the selected calendar day
    create_effect(move |_| {
        set_date.set(initial_date.get());
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let parsed_amount = match amount.get().trim().parse::<f64>() {
            Ok(v) if v >= 0.0 => v,
            _ => {
                state.show_error("Amount must be a non-negative number");
                return;
            }
        };

        if title.get().trim().is_empty() {
            state.show_error("Title is required");
            return;
        }

        let request = api::NewEntryRequest {
            date: date.get(),
            entry_type: entry_type.get(),
            category: category.get(),
            amount: parsed_amount,
            title: title.get(),
            content: content.get(),
        };

        set_submitting.set(true);

        let state_clone = state.clone();
        spawn_local(async move {
            match api::create_entry(&request).await {
                Ok(entry) => {
                    state_clone.show_success(&format!(
                        "Logged {} {} for {:.0}",
                        entry.entry_type, entry.category, entry.amount
                    ));
                    state_clone.refresh_entries().await;
                    set_amount.set(String::new());
                    set_title.set(String::new());
                    set_content.set(String::new());
                }
                Err(e) => {
                    state_clone.show_error(&e);
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            // Date
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Date"</label>
                <input
                    type="date"
                    prop:value=move || date.get().to_string()
                    on:input=move |ev| {
                        if let Ok(d) = event_target_value(&ev).parse::<NaiveDate>() {
                            set_date.set(d);
                        }
                    }
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            // Type and category side by side
            <div class="grid grid-cols-2 gap-4">
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Type"</label>
                    <select
                        on:change=move |ev| set_entry_type.set(event_target_value(&ev))
                        prop:value=move || entry_type.get()
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    >
                        <option value="sales">"Sales"</option>
                        <option value="delivery">"Delivery"</option>
                    </select>
                </div>

                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Category"</label>
                    <select
                        on:change=move |ev| set_category.set(event_target_value(&ev))
                        prop:value=move || category.get()
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    >
                        <option value="Training">"Training"</option>
                        <option value="Coaching">"Coaching"</option>
                        <option value="Speaking">"Speaking"</option>
                    </select>
                </div>
            </div>

            // Amount
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Amount"</label>
                <input
                    type="number"
                    min="0"
                    step="0.01"
                    placeholder="e.g. 2500"
                    prop:value=move || amount.get()
                    on:input=move |ev| set_amount.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            // Title
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Title"</label>
                <input
                    type="text"
                    placeholder="e.g. Workshop deposit"
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            // Notes
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Notes (optional)"</label>
                <textarea
                    rows="2"
                    prop:value=move || content.get()
                    on:input=move |ev| set_content.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            // Submit button
            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                       transition-colors flex items-center justify-center space-x-2"
            >
                {move || if submitting.get() {
                    view! {
                        <div class="loading-spinner w-5 h-5" />
                        <span>"Saving..."</span>
                    }.into_view()
                } else {
                    view! {
                        <span>"Add Entry"</span>
                    }.into_view()
                }}
            </button>
        </form>
    }
}
