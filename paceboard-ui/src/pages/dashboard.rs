//! Dashboard Page
//!
//! Stat cards, the trailing 12-month chart, the category pie with a
//! working range selector, and the per-category breakdown table.

use chrono::{NaiveDate, Utc};
use leptos::*;

use crate::api;
use crate::api::client::{CategoryTotal, MonthlyReport, TypeReport};
use crate::calendar::MonthView;
use crate::components::{ChartSkeleton, MonthlyChart, PieChart, StatCard};
use crate::state::GlobalState;

/// Dashboard page component
#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let report = create_rw_signal(None::<MonthlyReport>);
    let pie_totals = create_rw_signal(Vec::<CategoryTotal>::new());
    let (pie_type, set_pie_type) = create_signal("sales".to_string());
    let (pie_months, set_pie_months) = create_signal(12u32);

    // Fetch the report and the initial pie on mount
    let state_for_effect = state.clone();
    create_effect(move |_| {
        let state = state_for_effect.clone();
        spawn_local(async move {
            state.loading.set(true);

            match api::fetch_monthly_report().await {
                Ok(r) => report.set(Some(r)),
                Err(e) => state.show_error(&e),
            }

            load_pie(state.clone(), pie_totals, "sales".to_string(), 12).await;

            state.loading.set(false);
        });
    });

    // Stat card values
    let sales_total = Signal::derive(move || {
        report
            .get()
            .map(|r| format!("{:.0}", r.sales.total))
            .unwrap_or_else(|| "0".to_string())
    });
    let sales_rate = Signal::derive(move || {
        report
            .get()
            .map(|r| format!("{:.0} / month pace", r.sales.running_rate))
            .unwrap_or_default()
    });
    let delivery_total = Signal::derive(move || {
        report
            .get()
            .map(|r| format!("{:.0}", r.delivery.total))
            .unwrap_or_else(|| "0".to_string())
    });
    let delivery_rate = Signal::derive(move || {
        report
            .get()
            .map(|r| format!("{:.0} / month pace", r.delivery.running_rate))
            .unwrap_or_default()
    });

    let loading = state.loading;
    let state_for_pie = state.clone();

    view! {
        <div class="space-y-8">
            // Page header
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Your sales and delivery pace at a glance"</p>
            </div>

            // Summary row
            <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <StatCard label="Sales (12 mo)" value=sales_total hint=sales_rate />
                <StatCard label="Delivery (12 mo)" value=delivery_total hint=delivery_rate />
            </section>

            // Main chart
            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Monthly Pace"</h2>

                {move || {
                    if loading.get() && report.get().is_none() {
                        view! { <ChartSkeleton /> }.into_view()
                    } else {
                        view! { <MonthlyChart report=report /> }.into_view()
                    }
                }}
            </section>

            // Two column layout for pie and breakdown
            <div class="grid md:grid-cols-2 gap-8">
                // Category share with range selector
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Category Share"</h2>

                    // Type toggle
                    <div class="flex space-x-2 mb-4">
                        {["sales", "delivery"].into_iter().map(|ty| {
                            let state = state_for_pie.clone();
                            view! {
                                <button
                                    on:click=move |_| {
                                        set_pie_type.set(ty.to_string());
                                        let state = state.clone();
                                        spawn_local(async move {
                                            load_pie(state, pie_totals, ty.to_string(), pie_months.get_untracked()).await;
                                        });
                                    }
                                    class=move || {
                                        let base = "px-4 py-2 rounded-lg text-sm font-medium transition-colors capitalize";
                                        if pie_type.get() == ty {
                                            format!("{} bg-primary-600 text-white", base)
                                        } else {
                                            format!("{} bg-gray-700 text-gray-300 hover:bg-gray-600", base)
                                        }
                                    }
                                >
                                    {ty}
                                </button>
                            }
                        }).collect_view()}
                    </div>

                    <PieChart totals=pie_totals />

                    // Range selector, wired to the fetch
                    <div class="flex justify-center space-x-2 mt-4">
                        {[("3M", 3u32), ("6M", 6), ("12M", 12)].into_iter().map(|(label, months)| {
                            let state = state_for_pie.clone();
                            view! {
                                <button
                                    on:click=move |_| {
                                        set_pie_months.set(months);
                                        let state = state.clone();
                                        spawn_local(async move {
                                            load_pie(state, pie_totals, pie_type.get_untracked(), months).await;
                                        });
                                    }
                                    class=move || {
                                        let base = "px-4 py-2 rounded-lg text-sm font-medium transition-colors";
                                        if pie_months.get() == months {
                                            format!("{} bg-primary-600 text-white", base)
                                        } else {
                                            format!("{} bg-gray-700 text-gray-300 hover:bg-gray-600", base)
                                        }
                                    }
                                >
                                    {label}
                                </button>
                            }
                        }).collect_view()}
                    </div>
                </section>

                // Per-category breakdown
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Category Breakdown"</h2>

                    {move || {
                        match report.get() {
                            None => view! {
                                <p class="text-gray-400 text-sm">"No report yet"</p>
                            }.into_view(),
                            Some(r) => view! {
                                <div class="space-y-6">
                                    <BreakdownTable title="Sales" report=r.sales.clone() />
                                    <BreakdownTable title="Delivery" report=r.delivery.clone() />
                                </div>
                            }.into_view(),
                        }
                    }}
                </section>
            </div>
        </div>
    }
}

/// Fetch pie totals for the current selection
async fn load_pie(
    state: GlobalState,
    totals: RwSignal<Vec<CategoryTotal>>,
    entry_type: String,
    months: u32,
) {
    let today = Utc::now().date_naive();
    let start = range_start(today, months);

    match api::fetch_category_totals(&entry_type, start, today).await {
        Ok(response) => totals.set(response.totals),
        Err(e) => state.show_error(&e),
    }
}

/// First day of the oldest month in a trailing window of `months`
fn range_start(today: NaiveDate, months: u32) -> NaiveDate {
    let mut month = MonthView::of(today);
    for _ in 1..months.max(1) {
        month = month.prev();
    }
    month.date(1).unwrap_or(today)
}

/// One type's per-category stats table
#[component]
fn BreakdownTable(
    title: &'static str,
    report: TypeReport,
) -> impl IntoView {
    view! {
        <div>
            <h3 class="font-semibold mb-2">{title}</h3>
            <table class="w-full text-sm text-left">
                <thead>
                    <tr class="text-gray-400 border-b border-gray-700">
                        <th class="py-1">"Category"</th>
                        <th class="py-1 text-right">"Total"</th>
                        <th class="py-1 text-right">"Active mean"</th>
                        <th class="py-1 text-right">"Running rate"</th>
                    </tr>
                </thead>
                <tbody>
                    {report.stats.into_iter().map(|s| view! {
                        <tr class="border-b border-gray-700 last:border-0">
                            <td class="py-1">{s.category}</td>
                            <td class="py-1 text-right">{format!("{:.0}", s.total)}</td>
                            <td class="py-1 text-right">{format!("{:.0}", s.active_mean)}</td>
                            <td class="py-1 text-right">{format!("{:.0}", s.running_rate)}</td>
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}
