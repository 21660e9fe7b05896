use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text, uniform_grid_spacer};

use crate::color::PassColors;
use crate::data::analysis::ChartData;

// ---------------------------------------------------------------------------
// Score bar chart
// ---------------------------------------------------------------------------

/// One bar per student in sorted order, with the integer score above it.
pub fn score_chart(ui: &mut Ui, chart: &ChartData, colors: &PassColors) {
    let bars: Vec<Bar> = chart
        .names
        .iter()
        .zip(&chart.scores)
        .zip(&chart.passed)
        .enumerate()
        .map(|(i, ((name, &score), &passed))| {
            Bar::new(i as f64, score)
                .name(name)
                .fill(colors.color_for(passed))
                .width(0.6)
        })
        .collect();

    let names = chart.names.clone();
    let last = chart.names.len().saturating_sub(1) as f64;

    Plot::new("score_chart")
        .height(320.0)
        .y_axis_label("Score")
        .include_x(-0.5)
        .include_x(last + 0.5)
        .include_y(0.0)
        .include_y(chart.y_max)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            names.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for (i, (&score, label)) in chart.scores.iter().zip(&chart.labels).enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, score), label.to_string())
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        for (label, color) in colors.legend_entries() {
            ui.label(RichText::new(format!("■ {label}")).color(color));
        }
    });
}
