//! Static Report Export
//! Writes the dashboard views as `summary.json` plus one PNG per chart.

use crate::charts::StaticChartRenderer;
use crate::config::ExportConfig;
use crate::data::Metric;
use crate::stats::{
    AggregateError, Aggregator, DeptRecord, OverallView, ResultRecord, StatusCount, TrendView,
    YearView,
};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to render {chart}: {message}")]
    Render { chart: String, message: String },
}

/// JSON document written next to the charts.
#[derive(Serialize)]
pub struct SummaryReport<'a> {
    pub source: String,
    pub years: &'a [i64],
    pub overall: Option<&'a ResultRecord>,
    pub departments: Option<&'a [DeptRecord]>,
    pub selected_year: Option<YearSummary<'a>>,
    /// Sections left out because their aggregation failed.
    pub unavailable: &'a [SectionFailure],
}

#[derive(Serialize)]
pub struct YearSummary<'a> {
    pub year: i64,
    pub snapshot: &'a ResultRecord,
    pub departments: &'a [DeptRecord],
    pub pivot: &'a [StatusCount],
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionFailure {
    pub section: String,
    pub error: String,
}

/// Every exported section, each built independently of the others.
pub struct ReportSections {
    pub overall: Option<OverallView>,
    pub trends: Option<TrendView>,
    pub years: Vec<i64>,
    pub year_view: Option<YearView>,
    pub failures: Vec<SectionFailure>,
}

impl ReportSections {
    /// Build all sections. A section that fails to aggregate is logged and
    /// recorded in `failures`; the others are unaffected.
    pub fn build(df: &DataFrame, preferred_year: i64) -> Self {
        let mut failures = Vec::new();
        let overall = section("overall", OverallView::build(df), &mut failures);
        let trends = section("trends", TrendView::build(df), &mut failures);
        let years = section("years", Aggregator::sorted_years(df), &mut failures).unwrap_or_default();
        let year_view = Aggregator::default_year(&years, preferred_year)
            .and_then(|year| section("year", YearView::build(df, year), &mut failures));

        Self {
            overall,
            trends,
            years,
            year_view,
            failures,
        }
    }

    pub fn summary(&self, source: &Path) -> SummaryReport<'_> {
        SummaryReport {
            source: source.display().to_string(),
            years: &self.years,
            overall: self.overall.as_ref().map(|view| &view.summary),
            departments: self.overall.as_ref().map(|view| &view.departments[..]),
            selected_year: self.year_view.as_ref().map(|view| YearSummary {
                year: view.year,
                snapshot: &view.snapshot,
                departments: &view.departments,
                pivot: &view.pivot,
            }),
            unavailable: &self.failures,
        }
    }
}

/// Writes every dashboard section to a directory.
pub struct ReportExporter {
    renderer: StaticChartRenderer,
}

impl ReportExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            renderer: StaticChartRenderer::new(config.width, config.height),
        }
    }

    /// Export the summary and every chart whose section could be built.
    /// Returns the files written.
    pub fn export(
        &self,
        df: &DataFrame,
        source: &Path,
        preferred_year: i64,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let sections = ReportSections::build(df, preferred_year);

        let mut written = vec![Self::write_summary(&sections.summary(source), out_dir)?];
        if let Some(ref view) = sections.overall {
            written.extend(self.render_overall(view, out_dir)?);
        }
        if let Some(ref view) = sections.trends {
            written.extend(self.render_trends(view, out_dir)?);
        }
        if let Some(ref view) = sections.year_view {
            written.extend(self.render_year(view, out_dir)?);
        }

        info!(
            "Exported {} files to {} ({} sections skipped)",
            written.len(),
            out_dir.display(),
            sections.failures.len()
        );
        Ok(written)
    }

    /// Write `summary.json` into `out_dir`.
    pub fn write_summary(report: &SummaryReport<'_>, out_dir: &Path) -> Result<PathBuf, ExportError> {
        let path = out_dir.join(SUMMARY_FILE);
        let file = File::create(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), report)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn render_overall(&self, view: &OverallView, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();
        for dist in view.relations.iter().chain(&view.department_pass_fail) {
            let path = out_dir.join(format!("overall_{}.png", slug(&dist.title)));
            self.renderer
                .render_donut(dist, &path)
                .map_err(|e| render_error(&dist.title, e))?;
            written.push(path);
        }
        Ok(written)
    }

    fn render_trends(&self, view: &TrendView, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let span = view.span_label();
        let charts = [
            (
                format!("SSC Pass Percentage Trend {span}"),
                &view.pass_rate,
                "Pass Rate (%)",
                "pass_rate_trend.png",
            ),
            (
                format!("Total GPA 5 Achieved Trend {span}"),
                &view.gpa5,
                "Total GPA 5 Count",
                "gpa5_trend.png",
            ),
        ];

        let mut written = Vec::new();
        for (title, points, y_desc, file) in charts {
            let path = out_dir.join(file);
            self.renderer
                .render_trend(title.trim(), points, y_desc, &path)
                .map_err(|e| render_error(&title, e))?;
            written.push(path);
        }
        Ok(written)
    }

    fn render_year(&self, view: &YearView, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();

        for dist in [
            &view.pass_fail,
            &view.gender_examinees,
            &view.department_examinees,
            &view.gender_gpa5,
        ] {
            let path = out_dir.join(format!("{}.png", slug(&dist.title)));
            self.renderer
                .render_donut(dist, &path)
                .map_err(|e| render_error(&dist.title, e))?;
            written.push(path);
        }

        let title = format!("{} Dept. Pass vs Fail", view.year);
        let path = out_dir.join(format!("{}.png", slug(&title)));
        self.renderer
            .render_grouped_bars(&title, &view.pivot, &path)
            .map_err(|e| render_error(&title, e))?;
        written.push(path);

        let path = out_dir.join(format!("{}.png", slug(&view.department_gpa5.title)));
        self.renderer
            .render_bars(&view.department_gpa5, Metric::TotalGpa5.column(), &path)
            .map_err(|e| render_error(&view.department_gpa5.title, e))?;
        written.push(path);

        Ok(written)
    }
}

/// Keep a section's value, or record why it is missing.
fn section<T>(
    name: &str,
    result: Result<T, AggregateError>,
    failures: &mut Vec<SectionFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping {} section: {}", name, e);
            failures.push(SectionFailure {
                section: name.to_string(),
                error: e.to_string(),
            });
            None
        }
    }
}

fn render_error(chart: &str, err: Box<dyn std::error::Error + Send + Sync>) -> ExportError {
    ExportError::Render {
        chart: chart.to_string(),
        message: err.to_string(),
    }
}

/// File-name friendly form of a chart title.
fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{two_year_csv, write_csv};
    use crate::data::DataLoader;

    #[test]
    fn test_slug() {
        assert_eq!(slug("2025 GPA 5: Male vs Female"), "2025_gpa_5_male_vs_female");
        assert_eq!(slug("Examinees vs Passed (All Years)"), "examinees_vs_passed_all_years");
    }

    fn without_pass_rate() -> String {
        two_year_csv()
            .lines()
            .map(|line| {
                let mut fields: Vec<&str> = line.split(',').collect();
                fields.remove(6);
                fields.join(",") + "\n"
            })
            .collect()
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_csv(dir.path(), "data.csv", &two_year_csv());
        let df = DataLoader::read_csv(&source).unwrap();

        let sections = ReportSections::build(&df, 2025);
        assert!(sections.failures.is_empty());
        let path = ReportExporter::write_summary(&sections.summary(&source), dir.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["years"], serde_json::json!([2025, 2024]));
        assert_eq!(json["overall"]["Appeared"], 220);
        assert_eq!(json["overall"]["Total Failed"], 40);
        assert_eq!(json["departments"][0]["department"], "Business Studies");
        assert_eq!(json["departments"][0]["failed"], 20);
        assert_eq!(json["selected_year"]["year"], 2025);
        assert_eq!(json["selected_year"]["snapshot"]["Year"], 2025);
        assert_eq!(json["selected_year"]["pivot"].as_array().unwrap().len(), 6);
        assert_eq!(json["selected_year"]["pivot"][1]["status"], "Failed");
        assert_eq!(json["unavailable"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_trend_column_only_drops_trends() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_csv(dir.path(), "data.csv", &without_pass_rate());
        let df = DataLoader::read_csv(&source).unwrap();

        let sections = ReportSections::build(&df, 2025);
        assert!(sections.overall.is_some());
        assert!(sections.trends.is_none());
        assert!(matches!(sections.year_view, Some(ref v) if v.year == 2025));
        assert_eq!(sections.failures.len(), 1);
        assert_eq!(sections.failures[0].section, "trends");
        assert!(sections.failures[0].error.contains("Percentage of Pass"));

        let path = ReportExporter::write_summary(&sections.summary(&source), dir.path()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["overall"]["Appeared"], 220);
        assert_eq!(json["selected_year"]["year"], 2025);
        assert_eq!(json["unavailable"][0]["section"], "trends");
    }

    #[test]
    fn test_export_still_writes_summary_when_every_section_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_csv(dir.path(), "data.csv", "Year,Examinee\n2024,10\n");
        let df = DataLoader::read_csv(&source).unwrap();
        let out_dir = dir.path().join("out");

        let exporter = ReportExporter::new(&ExportConfig::default());
        let written = exporter.export(&df, &source, 2025, &out_dir).unwrap();

        assert_eq!(written, vec![out_dir.join(SUMMARY_FILE)]);
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(json["years"], serde_json::json!([2024]));
        assert!(json["overall"].is_null());
        let sections: Vec<&str> = json["unavailable"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["section"].as_str().unwrap())
            .collect();
        assert_eq!(sections, vec!["overall", "trends", "year"]);
    }
}
