//! Dashboard Views Module
//! Assembles aggregator output into the data sets each dashboard section draws.

use crate::data::{Department, Metric, PASS_RATE_COLUMN};
use crate::stats::aggregator::{AggregateError, Aggregator};
use crate::stats::record::{DeptRecord, ResultRecord, StatusCount};
use polars::prelude::DataFrame;

/// One labelled share of a pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: i64,
}

/// A titled set of slices rendered as one donut chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl Distribution {
    fn new(title: impl Into<String>, slices: &[(&str, i64)]) -> Self {
        Self {
            title: title.into(),
            slices: slices
                .iter()
                .map(|(label, count)| Slice {
                    label: label.to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    /// Sum of the slices drawn; negative counts take no share of the chart.
    pub fn total(&self) -> i64 {
        self.slices.iter().map(|s| s.count.max(0)).sum()
    }

    pub fn pass_fail(record: &ResultRecord, title: impl Into<String>) -> Self {
        Self::new(
            title,
            &[
                ("Passed", record.get(Metric::TotalPassed)),
                ("Failed", record.total_failed()),
            ],
        )
    }

    pub fn gender_examinees(record: &ResultRecord, title: impl Into<String>) -> Self {
        Self::new(
            title,
            &[
                ("Male", record.get(Metric::Male)),
                ("Female", record.get(Metric::Female)),
            ],
        )
    }

    pub fn gender_passed(record: &ResultRecord, title: impl Into<String>) -> Self {
        Self::new(
            title,
            &[
                ("Male Passed", record.get(Metric::MalePassed)),
                ("Female Passed", record.get(Metric::FemalePassed)),
            ],
        )
    }

    pub fn gender_gpa5(record: &ResultRecord, title: impl Into<String>) -> Self {
        Self::new(
            title,
            &[
                ("Male GPA 5", record.get(Metric::Gpa5Male)),
                ("Female GPA 5", record.get(Metric::Gpa5Female)),
            ],
        )
    }

    pub fn department_examinees(record: &ResultRecord, title: impl Into<String>) -> Self {
        Self::by_department(title, |d| record.get(d.appeared_metric()))
    }

    pub fn department_gpa5(record: &ResultRecord, title: impl Into<String>) -> Self {
        Self::by_department(title, |d| record.get(d.gpa5_metric()))
    }

    /// Passed against failed inside a single department.
    pub fn department_pass_fail(dept: &DeptRecord) -> Self {
        Self::new(
            format!("{} Pass vs Fail", dept.department),
            &[("Passed", dept.passed), ("Failed", dept.failed)],
        )
    }

    fn by_department(title: impl Into<String>, count: impl Fn(Department) -> i64) -> Self {
        Self {
            title: title.into(),
            slices: Department::ALL
                .iter()
                .map(|&d| Slice {
                    label: d.label().to_string(),
                    count: count(d),
                })
                .collect(),
        }
    }
}

/// Section 1: KPIs and distributions over all years.
#[derive(Debug, Clone)]
pub struct OverallView {
    pub summary: ResultRecord,
    pub departments: [DeptRecord; 3],
    pub relations: Vec<Distribution>,
    pub department_pass_fail: Vec<Distribution>,
}

impl OverallView {
    pub fn build(df: &DataFrame) -> Result<Self, AggregateError> {
        let summary = Aggregator::overall_summary(df)?;
        let departments = Aggregator::department_breakdown(&summary);

        let relations = vec![
            Distribution::pass_fail(&summary, "Examinees vs Passed (All Years)"),
            Distribution::gender_examinees(&summary, "Male vs Female Examinees (All Years)"),
            Distribution::gender_passed(&summary, "Male vs Female Passed (All Years)"),
            Distribution::department_examinees(&summary, "Examinee Distribution by Department"),
            Distribution::department_gpa5(&summary, "GPA 5 Distribution by Department"),
            Distribution::gender_gpa5(&summary, "Male vs Female GPA 5"),
        ];
        let department_pass_fail = departments
            .iter()
            .map(Distribution::department_pass_fail)
            .collect();

        Ok(Self {
            summary,
            departments,
            relations,
            department_pass_fail,
        })
    }

    /// KPI cards as (label, value) rows of three.
    pub fn kpi_rows(&self) -> Vec<[(String, i64); 3]> {
        let s = &self.summary;
        let dept_row = |label: &str, metric: fn(Department) -> Metric| {
            Department::ALL.map(|d| (format!("{} {}", d.short_label(), label), s.get(metric(d))))
        };

        vec![
            [
                ("Total Examinees".to_string(), s.get(Metric::Examinee)),
                ("Total Passed".to_string(), s.get(Metric::TotalPassed)),
                ("Total Failed".to_string(), s.total_failed()),
            ],
            [
                ("Total Male Examinees".to_string(), s.get(Metric::Male)),
                ("Total Female Examinees".to_string(), s.get(Metric::Female)),
                ("Total GPA 5 Achieved".to_string(), s.get(Metric::TotalGpa5)),
            ],
            dept_row("Examinees", Department::appeared_metric),
            dept_row("Passed", Department::passed_metric),
        ]
    }
}

/// Section 2: year-over-year lines.
#[derive(Debug, Clone)]
pub struct TrendView {
    pub pass_rate: Vec<[f64; 2]>,
    pub gpa5: Vec<[f64; 2]>,
    /// First and last year covered, for chart titles.
    pub span: Option<(i64, i64)>,
}

impl TrendView {
    pub fn build(df: &DataFrame) -> Result<Self, AggregateError> {
        let pass_rate = Aggregator::trend(df, PASS_RATE_COLUMN)?;
        let gpa5 = Aggregator::trend(df, Metric::TotalGpa5.column())?;
        let years = Aggregator::sorted_years(df)?;
        let span = match (years.last(), years.first()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        };

        Ok(Self {
            pass_rate,
            gpa5,
            span,
        })
    }

    pub fn span_label(&self) -> String {
        match self.span {
            Some((first, last)) => format!("({} - {})", first, last),
            None => String::new(),
        }
    }
}

/// Section 3: drill-down for the selected year.
#[derive(Debug, Clone)]
pub struct YearView {
    pub year: i64,
    pub snapshot: ResultRecord,
    pub departments: [DeptRecord; 3],
    pub pivot: Vec<StatusCount>,
    pub pass_fail: Distribution,
    pub gender_examinees: Distribution,
    pub department_examinees: Distribution,
    pub department_gpa5: Distribution,
    pub gender_gpa5: Distribution,
}

impl YearView {
    pub fn build(df: &DataFrame, year: i64) -> Result<Self, AggregateError> {
        let snapshot = Aggregator::year_snapshot(df, year)?;
        let departments = Aggregator::department_breakdown(&snapshot);
        let pivot = Aggregator::pivot_status_by_department(&departments);

        Ok(Self {
            year,
            pass_fail: Distribution::pass_fail(&snapshot, format!("{year} Examinee vs Passed")),
            gender_examinees: Distribution::gender_examinees(
                &snapshot,
                format!("{year} Male vs Female Examinees"),
            ),
            department_examinees: Distribution::department_examinees(
                &snapshot,
                format!("{year} Dept. Examinee Distribution"),
            ),
            department_gpa5: Distribution::department_gpa5(
                &snapshot,
                format!("{year} GPA 5 by Department"),
            ),
            gender_gpa5: Distribution::gender_gpa5(
                &snapshot,
                format!("{year} GPA 5: Male vs Female"),
            ),
            snapshot,
            departments,
            pivot,
        })
    }
}
