//! Result Records
//! Typed views over summed or single-year result rows.

use crate::data::{Department, Metric};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Tracked counts for either one year or the sum over all years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// `Some` for a single-year snapshot, `None` for the all-years summary.
    pub year: Option<i64>,
    counts: [i64; Metric::ALL.len()],
}

impl ResultRecord {
    pub fn new(year: Option<i64>) -> Self {
        Self {
            year,
            counts: [0; Metric::ALL.len()],
        }
    }

    pub fn get(&self, metric: Metric) -> i64 {
        self.counts[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: i64) {
        self.counts[metric.index()] = value;
    }

    /// Examinees who sat the exam but did not pass.
    pub fn total_failed(&self) -> i64 {
        self.get(Metric::Appeared) - self.get(Metric::TotalPassed)
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = if self.year.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(Metric::ALL.len() + extra))?;
        if let Some(year) = self.year {
            map.serialize_entry("Year", &year)?;
        }
        for metric in Metric::ALL {
            map.serialize_entry(metric.column(), &self.get(metric))?;
        }
        map.serialize_entry("Total Failed", &self.total_failed())?;
        map.end()
    }
}

/// Appeared, passed, failed and GPA 5 counts for one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DeptRecord {
    pub department: Department,
    pub appeared: i64,
    pub passed: i64,
    pub failed: i64,
    pub gpa5: i64,
}

/// Outcome bucket in the status by department pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Status {
    Passed,
    Failed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Passed => "Passed",
            Status::Failed => "Failed",
        }
    }
}

/// One long-form row of the pivot: (Status, Department, Count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub department: Department,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_failed_is_appeared_minus_passed() {
        let mut record = ResultRecord::new(None);
        record.set(Metric::Appeared, 220);
        record.set(Metric::TotalPassed, 180);
        assert_eq!(record.total_failed(), 40);
    }

    #[test]
    fn test_serialized_record_uses_column_names() {
        let mut record = ResultRecord::new(Some(2025));
        record.set(Metric::Appeared, 120);
        record.set(Metric::TotalPassed, 100);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Year"], 2025);
        assert_eq!(value["Appeared"], 120);
        assert_eq!(value["Total Failed"], 20);
        assert_eq!(value["SCIENCE GPA 5"], 0);
    }

    #[test]
    fn test_status_label_matches_serialized_name() {
        for status in [Status::Passed, Status::Failed] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.label());
        }
    }
}
