//! Result Aggregator Module
//! Sums, per-year lookups and reshaping of the result table.
//!
//! Every function here is a pure transform over an already-loaded table.

use crate::data::{Department, Metric, YEAR_COLUMN};
use crate::stats::record::{DeptRecord, ResultRecord, Status, StatusCount};
use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Year shown when the user has not picked one.
pub const DEFAULT_YEAR: i64 = 2025;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Column '{0}' is missing from the dataset")]
    MissingColumn(String),
    #[error("No result row for year {0}")]
    YearNotFound(i64),
    #[error("Year {year} matches {matches} rows, expected exactly one")]
    AmbiguousYear { year: i64, matches: usize },
    #[error("Column '{column}' holds {dtype} values, expected whole-number counts")]
    NonNumericColumn { column: String, dtype: String },
    #[error("Column '{column}' has an empty cell{}", .year.map(|y| format!(" for year {y}")).unwrap_or_default())]
    MissingValue { column: String, year: Option<i64> },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Stateless aggregation over result tables.
pub struct Aggregator;

impl Aggregator {
    /// Sum every tracked field across all rows.
    ///
    /// Rows sharing a year are summed like any other row.
    pub fn overall_summary(df: &DataFrame) -> Result<ResultRecord, AggregateError> {
        Self::sum_metrics(df, None)
    }

    /// Appeared, passed, failed and GPA 5 counts per department.
    pub fn department_breakdown(record: &ResultRecord) -> [DeptRecord; 3] {
        Department::ALL.map(|department| {
            let appeared = record.get(department.appeared_metric());
            let passed = record.get(department.passed_metric());
            DeptRecord {
                department,
                appeared,
                passed,
                failed: appeared - passed,
                gpa5: record.get(department.gpa5_metric()),
            }
        })
    }

    /// The single raw row for `year`, with every column of the table.
    pub fn year_row(df: &DataFrame, year: i64) -> Result<DataFrame, AggregateError> {
        Self::require_columns(df, &[YEAR_COLUMN])?;

        let rows = df
            .clone()
            .lazy()
            .filter(col(YEAR_COLUMN).eq(lit(year)))
            .collect()?;

        match rows.height() {
            0 => Err(AggregateError::YearNotFound(year)),
            1 => Ok(rows),
            matches => Err(AggregateError::AmbiguousYear { year, matches }),
        }
    }

    /// Tracked fields of the single row for `year`.
    pub fn year_snapshot(df: &DataFrame, year: i64) -> Result<ResultRecord, AggregateError> {
        let row = Self::year_row(df, year)?;
        Self::sum_metrics(&row, Some(year))
    }

    /// Flatten department records into (Status, Department, Count) rows.
    ///
    /// Department order is kept; within a department Passed comes before Failed.
    pub fn pivot_status_by_department(departments: &[DeptRecord]) -> Vec<StatusCount> {
        departments
            .iter()
            .flat_map(|dept| {
                [
                    StatusCount {
                        status: Status::Passed,
                        department: dept.department,
                        count: dept.passed,
                    },
                    StatusCount {
                        status: Status::Failed,
                        department: dept.department,
                        count: dept.failed,
                    },
                ]
            })
            .collect()
    }

    /// Distinct years, latest first.
    pub fn sorted_years(df: &DataFrame) -> Result<Vec<i64>, AggregateError> {
        Self::require_columns(df, &[YEAR_COLUMN])?;

        let years = df.column(YEAR_COLUMN)?.cast(&DataType::Int64)?;
        let distinct: BTreeSet<i64> = years.i64()?.into_iter().flatten().collect();
        Ok(distinct.into_iter().rev().collect())
    }

    /// The whole table ordered by ascending year. Rows sharing a year keep their order.
    pub fn sorted_by_year(df: &DataFrame) -> Result<DataFrame, AggregateError> {
        Self::require_columns(df, &[YEAR_COLUMN])?;

        let sorted = df
            .clone()
            .lazy()
            .sort_by_exprs(
                vec![col(YEAR_COLUMN)],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        Ok(sorted)
    }

    /// (year, value) points for one column, ascending by year. Null values are skipped.
    pub fn trend(df: &DataFrame, column: &str) -> Result<Vec<[f64; 2]>, AggregateError> {
        Self::require_columns(df, &[YEAR_COLUMN, column])?;

        let sorted = Self::sorted_by_year(df)?;
        let years = sorted.column(YEAR_COLUMN)?.cast(&DataType::Float64)?;
        let values = sorted.column(column)?.cast(&DataType::Float64)?;

        let points = years
            .f64()?
            .into_iter()
            .zip(values.f64()?.into_iter())
            .filter_map(|(year, value)| Some([year?, value?]))
            .collect();
        Ok(points)
    }

    /// `preferred` when the table has it, otherwise the latest year available.
    pub fn default_year(years: &[i64], preferred: i64) -> Option<i64> {
        if years.contains(&preferred) {
            Some(preferred)
        } else {
            years.iter().copied().max()
        }
    }

    fn sum_metrics(df: &DataFrame, year: Option<i64>) -> Result<ResultRecord, AggregateError> {
        let columns: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
        Self::require_columns(df, &columns)?;
        Self::require_counts(df, &columns, year)?;

        let exprs: Vec<Expr> = Metric::ALL
            .iter()
            .map(|m| {
                col(m.column())
                    .strict_cast(DataType::Int64)
                    .sum()
                    .alias(m.column())
            })
            .collect();

        let totals = df.clone().lazy().select(exprs).collect()?;
        debug!("Summed {} fields over {} rows", Metric::ALL.len(), df.height());

        let mut record = ResultRecord::new(year);
        for metric in Metric::ALL {
            // An empty table sums to zero.
            let value = totals.column(metric.column())?.i64()?.get(0).unwrap_or(0);
            record.set(metric, value);
        }
        Ok(record)
    }

    /// Count columns must be integer typed and fully populated; nothing is coerced.
    fn require_counts(
        df: &DataFrame,
        columns: &[&str],
        year: Option<i64>,
    ) -> Result<(), AggregateError> {
        for name in columns {
            let column = df.column(name)?;
            if !column.dtype().is_integer() {
                return Err(AggregateError::NonNumericColumn {
                    column: name.to_string(),
                    dtype: column.dtype().to_string(),
                });
            }
            if column.null_count() > 0 {
                return Err(AggregateError::MissingValue {
                    column: name.to_string(),
                    year,
                });
            }
        }
        Ok(())
    }

    fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), AggregateError> {
        match columns.iter().find(|name| df.column(name).is_err()) {
            Some(missing) => Err(AggregateError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{
        csv_with_years, two_year_csv, write_csv, HEADER, ROW_2024, ROW_2025,
    };
    use crate::data::{DataLoader, PASS_RATE_COLUMN};

    fn load(csv: &str) -> DataFrame {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "data.csv", csv);
        DataLoader::read_csv(&path).unwrap()
    }

    fn dept(department: Department, appeared: i64, passed: i64) -> DeptRecord {
        DeptRecord {
            department,
            appeared,
            passed,
            failed: appeared - passed,
            gpa5: 0,
        }
    }

    #[test]
    fn test_overall_summary_sums_all_years() {
        let df = load(&two_year_csv());
        let summary = Aggregator::overall_summary(&df).unwrap();

        assert_eq!(summary.year, None);
        assert_eq!(summary.get(Metric::Appeared), 220);
        assert_eq!(summary.get(Metric::TotalPassed), 180);
        assert_eq!(summary.total_failed(), 40);
        assert_eq!(summary.get(Metric::Examinee), 230);
        assert_eq!(summary.get(Metric::SciGpa5), 23);
    }

    #[test]
    fn test_overall_summary_is_idempotent() {
        let df = load(&csv_with_years(&[2023, 2025, 2024]));
        let first = Aggregator::overall_summary(&df).unwrap();
        let second = Aggregator::overall_summary(&df).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_row_summary_equals_that_row() {
        let df = load(&csv_with_years(&[2024]));
        let summary = Aggregator::overall_summary(&df).unwrap();
        let row = Aggregator::year_snapshot(&df, 2024).unwrap();

        for metric in Metric::ALL {
            assert_eq!(summary.get(metric), row.get(metric), "{}", metric.column());
        }
        assert_eq!(summary.total_failed(), 20);
        assert_eq!(
            summary.total_failed(),
            row.get(Metric::Appeared) - row.get(Metric::TotalPassed)
        );
    }

    #[test]
    fn test_duplicate_years_are_both_summed() {
        let df = load(&csv_with_years(&[2024, 2024]));
        let summary = Aggregator::overall_summary(&df).unwrap();
        assert_eq!(summary.get(Metric::Appeared), 200);
    }

    #[test]
    fn test_year_snapshot_returns_matching_row() {
        let df = load(&two_year_csv());
        let snapshot = Aggregator::year_snapshot(&df, 2025).unwrap();

        assert_eq!(snapshot.year, Some(2025));
        assert_eq!(snapshot.get(Metric::Appeared), 120);
        assert_eq!(snapshot.get(Metric::TotalPassed), 100);
        assert_eq!(snapshot.get(Metric::BsAppeared), 55);
        assert_eq!(snapshot.total_failed(), 20);

        let row = Aggregator::year_row(&df, 2025).unwrap();
        assert_eq!(row.height(), 1);
        assert_eq!(row.width(), df.width());
    }

    #[test]
    fn test_unknown_year_is_not_found() {
        let df = load(&two_year_csv());
        let err = Aggregator::year_snapshot(&df, 1999).unwrap_err();
        assert!(matches!(err, AggregateError::YearNotFound(1999)));
    }

    #[test]
    fn test_duplicated_year_is_ambiguous() {
        let df = load(&csv_with_years(&[2024, 2025, 2024]));
        let err = Aggregator::year_snapshot(&df, 2024).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::AmbiguousYear {
                year: 2024,
                matches: 2
            }
        ));
    }

    #[test]
    fn test_missing_column_surfaces_at_aggregation() {
        let df = load("Year,Examinee\n2024,10\n");

        let err = Aggregator::overall_summary(&df).unwrap_err();
        assert!(matches!(err, AggregateError::MissingColumn(ref name) if name == "Male"));

        // Year lookups only need the key column.
        assert_eq!(Aggregator::sorted_years(&df).unwrap(), vec![2024]);
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let bad_2025 = ROW_2025.replacen(",120,", ",N/A,", 1);
        let df = load(&format!("{}\n{}\n{}\n", HEADER, ROW_2024, bad_2025));

        let err = Aggregator::overall_summary(&df).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::NonNumericColumn { ref column, .. } if column == "Appeared"
        ));
        assert!(matches!(
            Aggregator::year_snapshot(&df, 2024),
            Err(AggregateError::NonNumericColumn { .. })
        ));
    }

    #[test]
    fn test_empty_count_cell_is_rejected() {
        let blank_2024 = ROW_2024.replacen(",100,", ",,", 1);
        let df = load(&format!("{}\n{}\n{}\n", HEADER, ROW_2025, blank_2024));

        let err = Aggregator::overall_summary(&df).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::MissingValue { ref column, year: None } if column == "Appeared"
        ));

        let err = Aggregator::year_snapshot(&df, 2024).unwrap_err();
        assert!(matches!(err, AggregateError::MissingValue { year: Some(2024), .. }));
        assert_eq!(err.to_string(), "Column 'Appeared' has an empty cell for year 2024");

        // The fully populated year is still available.
        assert_eq!(Aggregator::year_snapshot(&df, 2025).unwrap().get(Metric::Appeared), 120);
    }

    #[test]
    fn test_department_breakdown_derives_failed() {
        let df = load(&two_year_csv());
        let summary = Aggregator::overall_summary(&df).unwrap();
        let [bs, hum, sci] = Aggregator::department_breakdown(&summary);

        assert_eq!(bs, DeptRecord {
            department: Department::BusinessStudies,
            appeared: 105,
            passed: 85,
            failed: 20,
            gpa5: 6,
        });
        assert_eq!((hum.appeared, hum.passed, hum.failed, hum.gpa5), (65, 55, 10, 3));
        assert_eq!((sci.appeared, sci.passed, sci.failed, sci.gpa5), (50, 40, 10, 23));
    }

    #[test]
    fn test_fixture_years_never_fail_more_than_appeared() {
        let df = load(&csv_with_years(&[2023, 2024, 2025]));
        for year in Aggregator::sorted_years(&df).unwrap() {
            let snapshot = Aggregator::year_snapshot(&df, year).unwrap();
            for dept in Aggregator::department_breakdown(&snapshot) {
                assert!(dept.appeared >= dept.passed, "{year} {}", dept.department);
                assert!(dept.passed >= 0);
                assert!(dept.failed >= 0);
            }
        }
    }

    #[test]
    fn test_pivot_status_by_department() {
        let departments = [
            dept(Department::BusinessStudies, 50, 40),
            dept(Department::Humanities, 30, 25),
            dept(Department::Science, 20, 18),
        ];

        let pivot = Aggregator::pivot_status_by_department(&departments);

        assert_eq!(pivot.len(), 6);
        assert!(pivot.contains(&StatusCount {
            status: Status::Failed,
            department: Department::BusinessStudies,
            count: 10,
        }));
        assert_eq!(pivot[0].status, Status::Passed);
        assert_eq!(pivot[1].status, Status::Failed);
        assert_eq!(pivot[4].department, Department::Science);
        assert_eq!(pivot[5].count, 2);
    }

    #[test]
    fn test_sorted_years_are_distinct_and_descending() {
        let df = load(&csv_with_years(&[2024, 2023, 2025, 2024]));
        assert_eq!(Aggregator::sorted_years(&df).unwrap(), vec![2025, 2024, 2023]);
    }

    #[test]
    fn test_sorted_by_year_round_trips_each_row() {
        let df = load(&csv_with_years(&[2025, 2023, 2024]));
        let sorted = Aggregator::sorted_by_year(&df).unwrap();

        let order: Vec<i64> = sorted
            .column(YEAR_COLUMN)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(order, vec![2023, 2024, 2025]);

        for year in Aggregator::sorted_years(&df).unwrap() {
            let original = Aggregator::year_row(&df, year).unwrap();
            let reselected = Aggregator::year_row(&sorted, year).unwrap();
            assert!(original.equals(&reselected), "row for {year} changed");
        }
    }

    #[test]
    fn test_trend_is_ascending_and_skips_nulls() {
        let df = load("Year,Percentage of Pass\n2012,\n2011,75.5\n2013,80\n");
        let points = Aggregator::trend(&df, PASS_RATE_COLUMN).unwrap();
        assert_eq!(points, vec![[2011.0, 75.5], [2013.0, 80.0]]);
    }

    #[test]
    fn test_default_year_prefers_configured_year() {
        assert_eq!(Aggregator::default_year(&[2025, 2024], DEFAULT_YEAR), Some(2025));
        assert_eq!(Aggregator::default_year(&[2023, 2022], DEFAULT_YEAR), Some(2023));
        assert_eq!(Aggregator::default_year(&[], DEFAULT_YEAR), None);
    }
}
