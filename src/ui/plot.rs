use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::Gradient;
use crate::data::stats::{RankedCount, RatingHistogram};

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

/// Histogram bars with the density curve on top.
pub fn rating_histogram(ui: &mut Ui, histogram: &RatingHistogram) {
    if histogram.is_empty() {
        ui.label("No ratings to plot.");
        return;
    }

    let bars: Vec<Bar> = histogram
        .buckets
        .iter()
        .map(|b| {
            Bar::new(b.midpoint(), b.count as f64)
                .width(b.width())
                .name(format!("{:.1} – {:.1}", b.lower, b.upper))
                .fill(Color32::from_rgb(135, 206, 235))
        })
        .collect();

    Plot::new("rating_histogram")
        .legend(Legend::default())
        .x_axis_label("Rating")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_y(0.0)
        .height(ui.available_height().max(240.0))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("ratings"));
            if !histogram.density.is_empty() {
                let points: PlotPoints = histogram.density.clone().into();
                plot_ui.line(
                    Line::new(points)
                        .name("density")
                        .color(Color32::from_rgb(30, 58, 138))
                        .width(2.0_f32),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Ranked counts (horizontal bars)
// ---------------------------------------------------------------------------

/// Horizontal bar chart, most frequent on top, labels on the y axis.
pub fn ranked_bars(ui: &mut Ui, id: &str, title: &str, counts: &[RankedCount], gradient: Gradient) {
    ui.strong(title);
    if counts.is_empty() {
        ui.label("Nothing to rank.");
        return;
    }

    let n = counts.len();
    let colors = gradient.sample(n);
    let bars: Vec<Bar> = counts
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (entry, color))| {
            Bar::new((n - 1 - i) as f64, entry.count as f64)
                .width(0.7)
                .name(&entry.label)
                .fill(color)
        })
        .collect();

    // Tick value → label, ticks between bars stay blank.
    let labels: Vec<String> = counts.iter().rev().map(|c| c.label.clone()).collect();

    Plot::new(id)
        .x_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_x(0.0)
        .y_axis_min_width(120.0)
        .y_axis_formatter(move |mark, _range| {
            let v = mark.value;
            if (v - v.round()).abs() > 1e-6 || v < 0.0 {
                return String::new();
            }
            labels.get(v.round() as usize).cloned().unwrap_or_default()
        })
        .height(ui.available_height().max(280.0))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}
