//! Data Page
//!
//! Table of all entries, newest date first, with inline editing and
//! delete. Every mutation refreshes the cache and reports a toast.

use chrono::NaiveDate;
use leptos::*;

use crate::api;
use crate::state::{Entry, GlobalState};

/// Data table page component
#[component]
pub fn DataPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Load entries on mount
    let state_for_effect = state.clone();
    create_effect(move |_| {
        let state = state_for_effect.clone();
        spawn_local(async move {
            state.loading.set(true);
            state.refresh_entries().await;
            state.loading.set(false);
        });
    });

    let entries_signal = state.entries;

    view! {
        <div class="space-y-8">
            // Header
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Data"</h1>
                    <p class="text-gray-400 mt-1">"All entries, newest first"</p>
                </div>

                <a
                    href=api::export_url()
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg font-medium transition-colors"
                >
                    "Export CSV"
                </a>
            </div>

            // Table
            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto">
                <table class="w-full text-left text-sm">
                    <thead>
                        <tr class="text-gray-400 border-b border-gray-700">
                            <th class="py-2 px-2">"Date"</th>
                            <th class="py-2 px-2">"Type"</th>
                            <th class="py-2 px-2">"Category"</th>
                            <th class="py-2 px-2 text-right">"Amount"</th>
                            <th class="py-2 px-2">"Title"</th>
                            <th class="py-2 px-2">"Notes"</th>
                            <th class="py-2 px-2 text-right">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let entries = entries_signal.get();
                            if entries.is_empty() {
                                view! {
                                    <tr>
                                        <td colspan="7" class="py-8 text-center text-gray-400">
                                            "No entries yet. Add your first one on the calendar."
                                        </td>
                                    </tr>
                                }.into_view()
                            } else {
                                entries.into_iter().map(|entry| {
                                    view! { <EntryRow entry=entry /> }
                                }).collect_view()
                            }
                        }}
                    </tbody>
                </table>
            </section>
        </div>
    }
}

/// One table row, toggling between display and edit mode
#[component]
fn EntryRow(entry: Entry) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (editing, set_editing) = create_signal(false);
    let (saving, set_saving) = create_signal(false);

    // Edit buffers, seeded from the stored row
    let (date, set_date) = create_signal(entry.date);
    let (entry_type, set_entry_type) = create_signal(entry.entry_type.clone());
    let (category, set_category) = create_signal(entry.category.clone());
    let (amount, set_amount) = create_signal(entry.amount.to_string());
    let (title, set_title) = create_signal(entry.title.clone());
    let (content, set_content) = create_signal(entry.content.clone());

    let id = entry.id;
    let display = entry.clone();

    let state_for_save = state.clone();
    let on_save = move |_| {
        let parsed_amount = match amount.get().trim().parse::<f64>() {
            Ok(v) if v >= 0.0 => v,
            _ => {
                state_for_save.show_error("Amount must be a non-negative number");
                return;
            }
        };

        if title.get().trim().is_empty() {
            state_for_save.show_error("Title is required");
            return;
        }

        let patch = api::EntryPatchRequest {
            date: Some(date.get()),
            entry_type: Some(entry_type.get()),
            category: Some(category.get()),
            amount: Some(parsed_amount),
            title: Some(title.get()),
            content: Some(content.get()),
        };

        set_saving.set(true);

        let state = state_for_save.clone();
        spawn_local(async move {
            match api::update_entry(id, &patch).await {
                Ok(_) => {
                    state.show_success("Entry updated");
                    state.refresh_entries().await;
                    set_editing.set(false);
                }
                Err(e) => {
                    state.show_error(&e);
                }
            }
            set_saving.set(false);
        });
    };

    let state_for_delete = state.clone();
    let on_delete = move |_| {
        let state = state_for_delete.clone();
        spawn_local(async move {
            match api::delete_entry(id).await {
                Ok(()) => {
                    state.show_success("Entry deleted");
                    state.refresh_entries().await;
                }
                Err(e) => {
                    state.show_error(&e);
                }
            }
        });
    };

    view! {
        {move || {
            if editing.get() {
                let on_save = on_save.clone();
                view! {
                    <tr class="border-b border-gray-700 bg-gray-750">
                        <td class="py-2 px-2">
                            <input
                                type="date"
                                prop:value=move || date.get().to_string()
                                on:input=move |ev| {
                                    if let Ok(d) = event_target_value(&ev).parse::<NaiveDate>() {
                                        set_date.set(d);
                                    }
                                }
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600 w-36"
                            />
                        </td>
                        <td class="py-2 px-2">
                            <select
                                on:change=move |ev| set_entry_type.set(event_target_value(&ev))
                                prop:value=move || entry_type.get()
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600"
                            >
                                <option value="sales">"sales"</option>
                                <option value="delivery">"delivery"</option>
                            </select>
                        </td>
                        <td class="py-2 px-2">
                            <select
                                on:change=move |ev| set_category.set(event_target_value(&ev))
                                prop:value=move || category.get()
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600"
                            >
                                <option value="Training">"Training"</option>
                                <option value="Coaching">"Coaching"</option>
                                <option value="Speaking">"Speaking"</option>
                            </select>
                        </td>
                        <td class="py-2 px-2 text-right">
                            <input
                                type="number"
                                min="0"
                                step="0.01"
                                prop:value=move || amount.get()
                                on:input=move |ev| set_amount.set(event_target_value(&ev))
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600 w-24 text-right"
                            />
                        </td>
                        <td class="py-2 px-2">
                            <input
                                type="text"
                                prop:value=move || title.get()
                                on:input=move |ev| set_title.set(event_target_value(&ev))
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600 w-full"
                            />
                        </td>
                        <td class="py-2 px-2">
                            <input
                                type="text"
                                prop:value=move || content.get()
                                on:input=move |ev| set_content.set(event_target_value(&ev))
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600 w-full"
                            />
                        </td>
                        <td class="py-2 px-2 text-right whitespace-nowrap">
                            <button
                                on:click=on_save
                                disabled=move || saving.get()
                                class="px-3 py-1 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded text-sm transition-colors"
                            >
                                {move || if saving.get() { "Saving..." } else { "Save" }}
                            </button>
                            <button
                                on:click=move |_| set_editing.set(false)
                                class="ml-2 px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded text-sm transition-colors"
                            >
                                "Cancel"
                            </button>
                        </td>
                    </tr>
                }.into_view()
            } else {
                let entry = display.clone();
                let on_delete = on_delete.clone();
                let type_class = if entry.is_sales() {
                    "text-green-400"
                } else {
                    "text-blue-400"
                };

                view! {
                    <tr class="border-b border-gray-700 hover:bg-gray-750">
                        <td class="py-2 px-2">{entry.date.to_string()}</td>
                        <td class=format!("py-2 px-2 {}", type_class)>{entry.entry_type.clone()}</td>
                        <td class="py-2 px-2">{entry.category.clone()}</td>
                        <td class="py-2 px-2 text-right">{format!("{:.2}", entry.amount)}</td>
                        <td class="py-2 px-2">{entry.title.clone()}</td>
                        <td class="py-2 px-2 text-gray-400">{entry.content.clone()}</td>
                        <td class="py-2 px-2 text-right whitespace-nowrap">
                            <button
                                on:click=move |_| set_editing.set(true)
                                class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded text-sm transition-colors"
                            >
                                "Edit"
                            </button>
                            <button
                                on:click=on_delete
                                class="ml-2 px-3 py-1 bg-gray-700 hover:bg-red-700 rounded text-sm transition-colors"
                            >
                                "Delete"
                            </button>
                        </td>
                    </tr>
                }.into_view()
            }
        }}
    }
}
