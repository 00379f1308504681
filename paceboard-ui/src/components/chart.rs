//! Monthly Chart Component
//!
//! Trailing 12-month bar chart using HTML5 Canvas: one sales bar and
//! one delivery bar per month, each stacked by category.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::client::MonthlyReport;

/// Category colors, in Training / Coaching / Speaking order
pub const CATEGORY_COLORS: [&str; 3] = [
    "#FF9800", // Orange - Training
    "#2196F3", // Blue - Coaching
    "#9C27B0", // Purple - Speaking
];

/// Monthly pace chart
#[component]
pub fn MonthlyChart(
    #[prop(into)]
    report: Signal<Option<MonthlyReport>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw when the report changes
    create_effect(move |_| {
        let report = report.get();

        if let (Some(canvas), Some(report)) = (canvas_ref.get(), report) {
            draw_monthly(&canvas, &report);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-96 rounded-lg"
            />

            // Legend
            <div class="flex justify-center flex-wrap gap-4 mt-4">
                {["Training", "Coaching", "Speaking"]
                    .into_iter()
                    .enumerate()
                    .map(|(idx, category)| {
                        view! {
                            <div class="flex items-center space-x-2">
                                <div
                                    class="w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", CATEGORY_COLORS[idx])
                                />
                                <span class="text-sm text-gray-300">{category}</span>
                            </div>
                        }
                    })
                    .collect_view()}
                <div class="flex items-center space-x-2">
                    <div class="w-3 h-3 bg-gray-300" />
                    <span class="text-sm text-gray-300">"Sales (left), Delivery (right, faded)"</span>
                </div>
            </div>
        </div>
    }
}

/// Draw the grouped, stacked bars on canvas
fn draw_monthly(canvas: &HtmlCanvasElement, report: &MonthlyReport) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 60.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    // Clear canvas
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    // Y scale from the tallest month of either type
    let mut max_value = report
        .sales
        .totals
        .iter()
        .chain(report.delivery.totals.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v));
    if max_value <= 0.0 {
        max_value = 1.0;
    }
    max_value *= 1.1;

    // Draw grid lines and y labels
    ctx.set_line_width(1.0);
    for i in 0..=5 {
        let y = margin_top + (i as f64 / 5.0) * chart_height;
        ctx.set_stroke_style(&"#374151".into()); // gray-700
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = max_value - (i as f64 / 5.0) * max_value;
        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        ctx.set_font("12px sans-serif");
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    let slots = report.months.len().max(1);
    let group_width = chart_width / slots as f64;
    let bar_width = group_width * 0.32;
    let baseline = margin_top + chart_height;

    for slot in 0..report.months.len() {
        let group_x = margin_left + slot as f64 * group_width;

        // Sales bar on the left, delivery faded on the right
        draw_stack(
            &ctx,
            group_x + group_width * 0.12,
            bar_width,
            baseline,
            chart_height,
            max_value,
            report.sales.series.iter().map(|s| s.values[slot]),
            1.0,
        );
        draw_stack(
            &ctx,
            group_x + group_width * 0.56,
            bar_width,
            baseline,
            chart_height,
            max_value,
            report.delivery.series.iter().map(|s| s.values[slot]),
            0.55,
        );
    }

    // X labels every other month
    ctx.set_fill_style(&"#9ca3af".into());
    ctx.set_font("12px sans-serif");
    for (slot, month) in report.months.iter().enumerate() {
        if slot % 2 != 0 {
            continue;
        }
        let x = margin_left + slot as f64 * group_width + group_width * 0.1;
        let _ = ctx.fill_text(&month.label(), x, height - 10.0);
    }

    // "No data" message if everything is zero
    let empty = report.sales.total == 0.0 && report.delivery.total == 0.0;
    if empty {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No entries in the last 12 months", width / 2.0 - 110.0, height / 2.0);
    }
}

/// One stacked bar, bottom-up in category order
#[allow(clippy::too_many_arguments)]
fn draw_stack(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    bar_width: f64,
    baseline: f64,
    chart_height: f64,
    max_value: f64,
    values: impl Iterator<Item = f64>,
    alpha: f64,
) {
    ctx.set_global_alpha(alpha);

    let mut bottom = baseline;
    for (idx, value) in values.enumerate() {
        if value <= 0.0 {
            continue;
        }
        let segment = (value / max_value) * chart_height;
        ctx.set_fill_style(&CATEGORY_COLORS[idx % CATEGORY_COLORS.len()].into());
        ctx.fill_rect(x, bottom - segment, bar_width, segment);
        bottom -= segment;
    }

    ctx.set_global_alpha(1.0);
}
