//! Dashboard Page
//! The four dashboard sections for one loaded table.
//!
//! Overall and trend views are computed once per table; the year view is
//! rebuilt whenever the selected year changes.

use crate::charts::ChartPlotter;
use crate::data::column_names;
use crate::gui::widgets::{
    format_rows, metric_card, raw_table, section_error, section_heading, sub_heading,
};
use crate::stats::{AggregateError, Aggregator, OverallView, TrendView, YearView};
use egui::{ComboBox, RichText};
use polars::prelude::DataFrame;
use std::sync::Arc;
use tracing::{info, warn};

const DONUT_SIZE: f32 = 240.0;

pub struct Dashboard {
    table: Arc<DataFrame>,
    overall: Result<OverallView, AggregateError>,
    trends: Result<TrendView, AggregateError>,
    years: Result<Vec<i64>, AggregateError>,
    selected_year: Option<i64>,
    year_view: Option<Result<YearView, AggregateError>>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dashboard {
    pub fn new(table: Arc<DataFrame>, preferred_year: i64) -> Self {
        let overall = OverallView::build(&table);
        let trends = TrendView::build(&table);
        let years = Aggregator::sorted_years(&table);

        for err in [overall.as_ref().err(), trends.as_ref().err(), years.as_ref().err()]
            .into_iter()
            .flatten()
        {
            warn!("Dashboard section unavailable: {}", err);
        }

        let selected_year = years
            .as_ref()
            .ok()
            .and_then(|years| Aggregator::default_year(years, preferred_year));

        let mut dashboard = Self {
            headers: column_names(&table),
            rows: format_rows(&table),
            table,
            overall,
            trends,
            years,
            selected_year: None,
            year_view: None,
        };
        if let Some(year) = selected_year {
            dashboard.select_year(year);
        }
        dashboard
    }

    pub fn selected_year(&self) -> Option<i64> {
        self.selected_year
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rebuild the year-specific view for `year`.
    pub fn select_year(&mut self, year: i64) {
        info!("Selected year {}", year);
        let view = YearView::build(&self.table, year);
        if let Err(ref err) = view {
            warn!("Year view for {} unavailable: {}", year, err);
        }
        self.selected_year = Some(year);
        self.year_view = Some(view);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        section_heading(ui, "1. Overall Performance (All Years)");
        match &self.overall {
            Ok(view) => Self::show_overall(ui, view),
            Err(err) => section_error(ui, err),
        }

        section_heading(ui, "2. Annual Performance Trends");
        match &self.trends {
            Ok(view) => Self::show_trends(ui, view),
            Err(err) => section_error(ui, err),
        }

        section_heading(ui, "3. Year-Specific Analysis");
        self.show_year_selector(ui);
        match &self.year_view {
            Some(Ok(view)) => Self::show_year(ui, view),
            Some(Err(err)) => section_error(ui, err),
            None => {}
        }

        section_heading(ui, "4. Raw Data Table");
        raw_table(ui, &self.headers, &self.rows);
        ui.add_space(50.0);
    }

    fn show_overall(ui: &mut egui::Ui, view: &OverallView) {
        sub_heading(ui, "Key Performance Indicators (KPIs)");
        for (i, row) in view.kpi_rows().iter().enumerate() {
            if i == 2 {
                sub_heading(ui, "Departmental Performance");
            }
            ui.columns(3, |cols| {
                for (col, (label, value)) in cols.iter_mut().zip(row.iter()) {
                    metric_card(col, label, *value);
                }
            });
            ui.add_space(8.0);
        }

        ui.separator();
        sub_heading(ui, "Overall Data Relations");
        for chunk in view.relations.chunks(3) {
            ui.columns(3, |cols| {
                for (col, dist) in cols.iter_mut().zip(chunk) {
                    ChartPlotter::draw_donut(col, dist, DONUT_SIZE);
                }
            });
            ui.add_space(12.0);
        }

        sub_heading(ui, "Pass vs Fail by Department");
        ui.columns(3, |cols| {
            for (col, dist) in cols.iter_mut().zip(&view.department_pass_fail) {
                ChartPlotter::draw_donut(col, dist, DONUT_SIZE);
            }
        });
    }

    fn show_trends(ui: &mut egui::Ui, view: &TrendView) {
        let span = view.span_label();

        sub_heading(ui, "Year-wise Pass Percentage Trend");
        ui.label(RichText::new(format!("SSC Pass Percentage Trend {}", span)).strong());
        ChartPlotter::draw_trend(
            ui,
            "pass_rate_trend",
            "Pass Rate (%)",
            &view.pass_rate,
            "Pass Rate (%)",
            ChartPlotter::series_color(0),
        );
        ui.add_space(12.0);

        sub_heading(ui, "Year-wise GPA 5 Count Trend");
        ui.label(RichText::new(format!("Total GPA 5 Achieved Trend {}", span)).strong());
        ChartPlotter::draw_trend(
            ui,
            "gpa5_trend",
            "Total GPA 5",
            &view.gpa5,
            "Total GPA 5 Count",
            ChartPlotter::series_color(2),
        );
    }

    fn show_year_selector(&mut self, ui: &mut egui::Ui) {
        let years = match &self.years {
            Ok(years) => years,
            Err(err) => {
                section_error(ui, err);
                return;
            }
        };

        let mut selected = self.selected_year;
        ui.horizontal(|ui| {
            ui.label("Select a Year for Detailed Analysis:");
            ComboBox::from_id_salt("year_selector")
                .selected_text(selected.map(|y| y.to_string()).unwrap_or_default())
                .show_ui(ui, |ui| {
                    for &year in years {
                        ui.selectable_value(&mut selected, Some(year), year.to_string());
                    }
                });
        });

        if selected != self.selected_year {
            if let Some(year) = selected {
                self.select_year(year);
            }
        }
    }

    fn show_year(ui: &mut egui::Ui, view: &YearView) {
        sub_heading(ui, &format!("Detailed Results for Year {}", view.year));

        ui.columns(3, |cols| {
            ChartPlotter::draw_donut(&mut cols[0], &view.pass_fail, DONUT_SIZE);
            ChartPlotter::draw_donut(&mut cols[1], &view.gender_examinees, DONUT_SIZE);
            ChartPlotter::draw_donut(&mut cols[2], &view.department_examinees, DONUT_SIZE);
        });
        ui.add_space(12.0);

        ui.columns(3, |cols| {
            ChartPlotter::draw_grouped_bars(
                &mut cols[0],
                &format!("year_pass_fail_{}", view.year),
                &format!("{} Dept. Pass vs Fail", view.year),
                &view.pivot,
            );
            ChartPlotter::draw_bars(
                &mut cols[1],
                &format!("year_gpa5_{}", view.year),
                &view.department_gpa5,
                "GPA 5 Count",
            );
            ChartPlotter::draw_donut(&mut cols[2], &view.gender_gpa5, DONUT_SIZE);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{csv_with_years, two_year_csv, write_csv};
    use crate::data::DataLoader;

    fn table(csv: &str) -> Arc<DataFrame> {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "data.csv", csv);
        Arc::new(DataLoader::read_csv(&path).unwrap())
    }

    #[test]
    fn test_preferred_year_is_selected_when_present() {
        let dashboard = Dashboard::new(table(&two_year_csv()), 2025);
        assert_eq!(dashboard.selected_year(), Some(2025));
        assert!(matches!(dashboard.year_view, Some(Ok(ref v)) if v.year == 2025));
        assert_eq!(dashboard.row_count(), 2);
    }

    #[test]
    fn test_latest_year_is_selected_when_preferred_is_absent() {
        let dashboard = Dashboard::new(table(&csv_with_years(&[2023, 2024])), 2025);
        assert_eq!(dashboard.selected_year(), Some(2024));
    }

    #[test]
    fn test_changing_year_rebuilds_year_view() {
        let mut dashboard = Dashboard::new(table(&two_year_csv()), 2025);
        dashboard.select_year(2024);

        assert_eq!(dashboard.selected_year(), Some(2024));
        match &dashboard.year_view {
            Some(Ok(view)) => assert_eq!(view.pass_fail.slices[1].count, 20),
            other => panic!("unexpected year view: {:?}", other.as_ref().map(|r| r.is_ok())),
        }
    }

    #[test]
    fn test_broken_sections_fail_independently() {
        let dashboard = Dashboard::new(table("Year,Examinee\n2024,10\n"), 2025);

        assert!(dashboard.overall.is_err());
        assert!(dashboard.trends.is_err());
        assert_eq!(dashboard.years.as_ref().unwrap(), &vec![2024]);
        assert!(matches!(dashboard.year_view, Some(Err(AggregateError::MissingColumn(_)))));
        assert_eq!(dashboard.headers, vec!["Year".to_string(), "Examinee".to_string()]);
    }
}
