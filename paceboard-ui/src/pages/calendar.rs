//! Calendar Page
//!
//! Month grid with per-day entries and totals, a day selector, and
//! the add-entry form. This is the default page.

use chrono::{NaiveDate, Utc};
use leptos::*;

use crate::api;
use crate::calendar::{days_in_month, entries_on, leading_blanks, MonthView};
use crate::components::EntryForm;
use crate::state::GlobalState;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Calendar page component
#[component]
pub fn CalendarPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let today = Utc::now().date_naive();
    let (month, set_month) = create_signal(MonthView::of(today));
    let (selected, set_selected) = create_signal(today);

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

    let state_for_grid = state.clone();

    view! {
        <div class="space-y-8">
            // Page header with month navigation
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Calendar"</h1>
                    <p class="text-gray-400 mt-1">"Log entries day by day"</p>
                </div>

                <div class="flex items-center space-x-2">
                    <button
                        on:click=move |_| set_month.update(|m| *m = m.prev())
                        class="px-3 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                    >
                        "←"
                    </button>
                    <span class="text-lg font-semibold w-44 text-center">
                        {move || month.get().label()}
                    </span>
                    <button
                        on:click=move |_| set_month.update(|m| *m = m.next())
                        class="px-3 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                    >
                        "→"
                    </button>
                </div>
            </div>

            // Month grid
            <section class="bg-gray-800 rounded-xl p-4">
                <div class="grid grid-cols-7 gap-1 mb-1">
                    {WEEKDAYS.into_iter().map(|day| view! {
                        <div class="text-center text-sm text-gray-400 py-1">{day}</div>
                    }).collect_view()}
                </div>

                <div class="grid grid-cols-7 gap-1">
                    {move || {
                        let m = month.get();
                        let blanks = leading_blanks(m.year, m.month);
                        let days = days_in_month(m.year, m.month);
                        let state = state_for_grid.clone();

                        let mut cells = Vec::new();

                        for _ in 0..blanks {
                            cells.push(view! { <div class="h-24" /> }.into_view());
                        }

                        for day in 1..=days {
                            let Some(date) = m.date(day) else { continue };
                            let sales = state.day_total(date, true);
                            let delivery = state.day_total(date, false);
                            let is_selected = selected.get() == date;

                            let cell_class = if is_selected {
                                "h-24 p-1 rounded-lg bg-gray-700 border border-primary-500 \
                                 cursor-pointer text-left align-top"
                            } else {
                                "h-24 p-1 rounded-lg bg-gray-900 border border-gray-700 \
                                 hover:border-gray-500 cursor-pointer text-left align-top"
                            };

                            cells.push(view! {
                                <button
                                    on:click=move |_| set_selected.set(date)
                                    class=cell_class
                                >
                                    <div class="text-sm text-gray-400">{day}</div>
                                    {(sales > 0.0).then(|| view! {
                                        <div class="text-xs text-green-400 truncate">
                                            {format!("S {:.0}", sales)}
                                        </div>
                                    })}
                                    {(delivery > 0.0).then(|| view! {
                                        <div class="text-xs text-blue-400 truncate">
                                            {format!("D {:.0}", delivery)}
                                        </div>
                                    })}
                                </button>
                            }.into_view());
                        }

                        cells.into_iter().collect_view()
                    }}
                </div>
            </section>

            // Selected day details and the add form
            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">
                        {move || format!("Entries on {}", selected.get())}
                    </h2>
                    <DayEntries date=selected />
                </section>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Add Entry"</h2>
                    <EntryForm initial_date=selected />
                </section>
            </div>
        </div>
    }
}

/// Entries belonging to one day, with delete actions
#[component]
fn DayEntries(
    #[prop(into)]
    date: Signal<NaiveDate>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="space-y-2">
            {move || {
                let day_entries = entries_on(&state.entries.get(), date.get());

                if day_entries.is_empty() {
                    view! {
                        <p class="text-gray-400 text-sm">"No entries on this day"</p>
                    }.into_view()
                } else {
                    let state = state.clone();
                    day_entries.into_iter().map(|entry| {
                        let state = state.clone();
                        let id = entry.id;
                        let type_class = if entry.is_sales() {
                            "text-green-400"
                        } else {
                            "text-blue-400"
                        };

                        let on_delete = move |_| {
                            let state = state.clone();
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
                            <div class="flex items-center justify-between py-2 border-b border-gray-700 last:border-0">
                                <div>
                                    <span class=type_class>
                                        {format!("{:.0}", entry.amount)}
                                    </span>
                                    <span class="text-gray-400 text-sm ml-2">
                                        {format!("{} · {}", entry.category, entry.title)}
                                    </span>
                                </div>
                                <button
                                    on:click=on_delete
                                    class="text-gray-500 hover:text-red-400 transition-colors"
                                >
                                    "✕"
                                </button>
                            </div>
                        }
                    }).collect_view()
                }
            }}
        </div>
    }
}
