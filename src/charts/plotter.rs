//! Chart Plotter Module
//! Draws the dashboard's interactive charts with egui and egui_plot.

use crate::charts::{format_count, PALETTE};
use crate::data::Department;
use crate::stats::{Distribution, Status, StatusCount};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use std::f32::consts::{FRAC_PI_2, TAU};

const PLOT_HEIGHT: f32 = 300.0;
/// Inner radius as a share of the outer radius.
const DONUT_HOLE: f32 = 0.3;
/// Largest angle covered by one ring segment polygon.
const SEGMENT_STEP: f32 = 0.05;

/// Draws donuts, trend lines and bar charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        let [r, g, b] = PALETTE[index % PALETTE.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Draw a titled donut chart with a legend below it.
    pub fn draw_donut(ui: &mut egui::Ui, dist: &Distribution, max_size: f32) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&dist.title).size(14.0).strong());
        });

        let size = ui.available_width().min(max_size);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let outer = size / 2.0 - 4.0;
        let inner = outer * DONUT_HOLE;

        let total = dist.total();
        if total <= 0 {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No data",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let mut start = -FRAC_PI_2;
        for (i, slice) in dist.slices.iter().enumerate() {
            let share = slice.count.max(0) as f32 / total as f32;
            let sweep = TAU * share;
            let color = Self::series_color(i);
            Self::ring_segment(&painter, center, inner, outer, start, sweep, color);

            // Skip labels on slivers
            if share >= 0.05 {
                let mid = start + sweep / 2.0;
                let radius = (inner + outer) / 2.0;
                painter.text(
                    center + egui::vec2(mid.cos(), mid.sin()) * radius,
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", share * 100.0),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
            start += sweep;
        }

        ui.horizontal_wrapped(|ui| {
            for (i, slice) in dist.slices.iter().enumerate() {
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, Self::series_color(i));
                ui.label(
                    RichText::new(format!("{} ({})", slice.label, format_count(slice.count)))
                        .size(12.0),
                );
                ui.add_space(8.0);
            }
        });
    }

    /// Fill an annulus segment from `start` over `sweep` radians.
    fn ring_segment(
        painter: &egui::Painter,
        center: Pos2,
        inner: f32,
        outer: f32,
        start: f32,
        sweep: f32,
        color: Color32,
    ) {
        if sweep <= 0.0 {
            return;
        }
        let steps = ((sweep / SEGMENT_STEP).ceil() as usize).max(1);
        let step = sweep / steps as f32;
        let at = |angle: f32, radius: f32| center + egui::vec2(angle.cos(), angle.sin()) * radius;

        for i in 0..steps {
            let a0 = start + step * i as f32;
            let a1 = a0 + step;
            // Each piece is a convex quad; a thin stroke hides the seams.
            painter.add(Shape::convex_polygon(
                vec![at(a0, outer), at(a1, outer), at(a1, inner), at(a0, inner)],
                color,
                Stroke::new(0.5, color),
            ));
        }
    }

    /// Draw a year-over-year line with markers.
    pub fn draw_trend(
        ui: &mut egui::Ui,
        id: &str,
        name: &str,
        points: &[[f64; 2]],
        y_label: &str,
        color: Color32,
    ) {
        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .x_axis_formatter(|mark, _range| Self::integer_tick(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(color)
                        .width(2.0)
                        .name(name),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(color),
                );
            });
    }

    /// Draw Passed and Failed bars side by side for every department.
    pub fn draw_grouped_bars(ui: &mut egui::Ui, id: &str, title: &str, pivot: &[StatusCount]) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(title).size(14.0).strong());
        });

        let mut passed = Vec::new();
        let mut failed = Vec::new();
        for entry in pivot {
            let Some(slot) = Department::ALL.iter().position(|d| *d == entry.department) else {
                continue;
            };
            let (offset, bars) = match entry.status {
                Status::Passed => (-0.2, &mut passed),
                Status::Failed => (0.2, &mut failed),
            };
            bars.push(
                Bar::new(slot as f64 + offset, entry.count as f64)
                    .width(0.38)
                    .name(entry.department.label()),
            );
        }

        let labels: Vec<String> = Department::ALL.iter().map(|d| d.label().to_string()).collect();
        Plot::new(id)
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_drag(false)
            .allow_zoom(false)
            .y_axis_label("Count")
            .x_axis_formatter(move |mark, _range| Self::category_tick(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(passed)
                        .name(Status::Passed.label())
                        .color(Self::series_color(0)),
                );
                plot_ui.bar_chart(
                    BarChart::new(failed)
                        .name(Status::Failed.label())
                        .color(Self::series_color(1)),
                );
            });
    }

    /// Draw one bar per slice of a distribution.
    pub fn draw_bars(ui: &mut egui::Ui, id: &str, dist: &Distribution, y_label: &str) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&dist.title).size(14.0).strong());
        });

        let bars: Vec<Bar> = dist
            .slices
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Bar::new(i as f64, s.count as f64)
                    .width(0.6)
                    .name(&s.label)
                    .fill(Self::series_color(i))
            })
            .collect();

        let labels: Vec<String> = dist.slices.iter().map(|s| s.label.clone()).collect();
        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .allow_drag(false)
            .allow_zoom(false)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| Self::category_tick(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&dist.title));
            });
    }

    /// Label only whole-number grid marks, e.g. years.
    fn integer_tick(value: f64) -> String {
        if (value - value.round()).abs() < 1e-6 {
            format!("{:.0}", value)
        } else {
            String::new()
        }
    }

    fn category_tick(labels: &[String], value: f64) -> String {
        if value < -0.5 || (value - value.round()).abs() > 1e-6 {
            return String::new();
        }
        labels
            .get(value.round() as usize)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_tick_skips_fractions() {
        assert_eq!(ChartPlotter::integer_tick(2024.0), "2024");
        assert_eq!(ChartPlotter::integer_tick(2024.5), "");
    }

    #[test]
    fn test_category_tick_maps_positions_to_labels() {
        let labels = vec!["Business Studies".to_string(), "Science".to_string()];
        assert_eq!(ChartPlotter::category_tick(&labels, 1.0), "Science");
        assert_eq!(ChartPlotter::category_tick(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_tick(&labels, 2.0), "");
        assert_eq!(ChartPlotter::category_tick(&labels, -1.0), "");
    }

    #[test]
    fn test_series_colors_wrap_around() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(PALETTE.len()));
    }
}
