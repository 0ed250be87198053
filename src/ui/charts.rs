use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{country_distribution, trend_series};
use crate::data::model::RankingDataset;

/// Bar colour matching the dashboard accent.
const BAR_COLOR: Color32 = Color32::from_rgb(0x00, 0x83, 0xB8);

// ---------------------------------------------------------------------------
// Country distribution (horizontal bar chart)
// ---------------------------------------------------------------------------

/// Render the per-country record counts as horizontal bars, largest on top.
pub fn distribution_chart(ui: &mut Ui, dataset: &RankingDataset, selection: &[usize]) {
    ui.strong("University Distribution by Country");

    let dist = country_distribution(dataset, selection);
    if dist.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let n = dist.len();
    // Entry 0 has the largest count; put it at the top (largest y).
    let bars: Vec<Bar> = dist
        .iter()
        .enumerate()
        .map(|(j, (_, count))| {
            Bar::new((n - 1 - j) as f64, *count as f64)
                .width(0.6)
                .fill(BAR_COLOR)
        })
        .collect();
    let labels: Vec<String> = dist.iter().map(|(country, _)| country.clone()).collect();

    Plot::new("country_distribution")
        .height(260.0)
        .legend(Legend::default())
        .x_axis_label("Number of Universities")
        .y_axis_formatter(move |mark, _range| {
            // Only whole-number marks correspond to bars.
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < n {
                labels[n - 1 - idx as usize].clone()
            } else {
                String::new()
            }
        })
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Universities"));
        });
}

// ---------------------------------------------------------------------------
// Ranking trend (one line per institution)
// ---------------------------------------------------------------------------

/// Render each institution's (year, world_rank) series as a line. With the
/// year filter active every series is a single point, so markers are drawn
/// alongside the lines to keep those visible.
pub fn trend_chart(ui: &mut Ui, dataset: &RankingDataset, selection: &[usize]) {
    ui.strong("University Ranking Trend");

    let series = trend_series(dataset, selection);
    if series.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let color_map = ColorMap::from_labels(series.iter().map(|(name, _)| name.as_str()));

    Plot::new("ranking_trend")
        .height(260.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("World Rank")
        .show(ui, |plot_ui| {
            for (institution, points) in &series {
                let color = color_map.color_for(institution);

                let line_points: PlotPoints = points
                    .iter()
                    .map(|&(year, rank)| [year as f64, rank as f64])
                    .collect();
                plot_ui.line(
                    Line::new(line_points)
                        .name(institution)
                        .color(color)
                        .width(1.5),
                );

                let marker_points: PlotPoints = points
                    .iter()
                    .map(|&(year, rank)| [year as f64, rank as f64])
                    .collect();
                plot_ui.points(
                    Points::new(marker_points)
                        .name(institution)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}
