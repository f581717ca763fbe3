//! Shared dashboard widgets: KPI cards, headings and the raw data grid.

use crate::charts::format_count;
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::{AnyValue, DataFrame};

/// Title color (vibrant teal).
pub const TITLE_COLOR: Color32 = Color32::from_rgb(14, 116, 144);
/// Section header color (contrasting red).
pub const SECTION_COLOR: Color32 = Color32::from_rgb(220, 38, 38);
pub const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

const CARD_HEIGHT: f32 = 80.0;

/// Card with a bold label over a large formatted count.
pub fn metric_card(ui: &mut egui::Ui, label: &str, value: i64) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .rounding(10.0)
        .stroke(egui::Stroke::new(2.0, TITLE_COLOR))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_height(CARD_HEIGHT);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(label).size(18.0).strong());
                ui.add_space(4.0);
                ui.label(RichText::new(format_count(value)).size(28.0).strong());
            });
        });
}

pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.separator();
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(text).size(24.0).strong().color(SECTION_COLOR));
    });
    ui.add_space(8.0);
}

pub fn sub_heading(ui: &mut egui::Ui, text: &str) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(text).size(18.0).strong());
    });
    ui.add_space(6.0);
}

/// Shown in place of a section whose data could not be computed.
pub fn section_error(ui: &mut egui::Ui, err: &impl std::fmt::Display) {
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(format!("⚠ {}", err))
                .size(14.0)
                .color(ERROR_COLOR),
        );
    });
}

/// Format every cell of a table once, row by row.
pub fn format_rows(df: &DataFrame) -> Vec<Vec<String>> {
    let columns = df.get_columns();
    (0..df.height())
        .map(|i| {
            columns
                .iter()
                .map(|col| match col.get(i) {
                    Ok(AnyValue::Null) | Err(_) => String::new(),
                    Ok(val) => val.to_string().trim_matches('"').to_string(),
                })
                .collect()
        })
        .collect()
}

/// Striped grid with a header row.
pub fn raw_table(ui: &mut egui::Ui, headers: &[String], rows: &[Vec<String>]) {
    ScrollArea::horizontal().show(ui, |ui| {
        egui::Grid::new("raw_data_table")
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for header in headers {
                    ui.label(RichText::new(header).strong().size(12.0));
                }
                ui.end_row();

                for row in rows {
                    for cell in row {
                        ui.label(RichText::new(cell).size(12.0));
                    }
                    ui.end_row();
                }
            });
    });
}
