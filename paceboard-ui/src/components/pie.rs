//! Pie Chart Component
//!
//! Category share for one entry type over the selected range, drawn
//! on HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::client::CategoryTotal;
use crate::components::chart::CATEGORY_COLORS;

/// Category pie chart with legend
#[component]
pub fn PieChart(
    #[prop(into)]
    totals: Signal<Vec<CategoryTotal>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let totals = totals.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_pie(&canvas, &totals);
        }
    });

    view! {
        <div class="flex flex-col items-center">
            <canvas
                node_ref=canvas_ref
                width="260"
                height="260"
                class="rounded-lg"
            />

            // Legend with shares
            <div class="flex flex-col space-y-1 mt-4 w-full max-w-xs">
                {move || {
                    let totals = totals.get();
                    let sum: f64 = totals.iter().map(|t| t.total).sum();

                    totals.into_iter().enumerate().map(|(idx, t)| {
                        let share = if sum > 0.0 { t.total / sum * 100.0 } else { 0.0 };
                        view! {
                            <div class="flex items-center justify-between text-sm">
                                <div class="flex items-center space-x-2">
                                    <div
                                        class="w-3 h-3 rounded-full"
                                        style=format!("background-color: {}", CATEGORY_COLORS[idx % CATEGORY_COLORS.len()])
                                    />
                                    <span class="text-gray-300">{t.category.clone()}</span>
                                </div>
                                <span class="text-gray-400">
                                    {format!("{:.0} ({:.0}%)", t.total, share)}
                                </span>
                            </div>
                        }
                    }).collect_view()
                }}
            </div>
        </div>
    }
}

fn draw_pie(canvas: &HtmlCanvasElement, totals: &[CategoryTotal]) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let cx = width / 2.0;
    let cy = height / 2.0;
    let radius = width.min(height) / 2.0 - 10.0;

    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    let sum: f64 = totals.iter().map(|t| t.total).sum();
    if sum <= 0.0 {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("14px sans-serif");
        let _ = ctx.fill_text("No entries in range", cx - 60.0, cy);
        return;
    }

    let mut angle = -std::f64::consts::FRAC_PI_2;
    for (idx, t) in totals.iter().enumerate() {
        if t.total <= 0.0 {
            continue;
        }
        let sweep = t.total / sum * std::f64::consts::PI * 2.0;

        ctx.set_fill_style(&CATEGORY_COLORS[idx % CATEGORY_COLORS.len()].into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, angle, angle + sweep);
        ctx.close_path();
        ctx.fill();

        angle += sweep;
    }
}
