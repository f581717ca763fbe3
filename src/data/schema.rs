//! Dataset Schema Module
//! Column names of the exam result table and the departments they describe.

use serde::Serialize;
use std::fmt;

/// Key column, one row per exam year.
pub const YEAR_COLUMN: &str = "Year";

/// Floating-point pass rate, only used by the trend section.
pub const PASS_RATE_COLUMN: &str = "Percentage of Pass";

/// Numeric fields that are summed across years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Examinee,
    Male,
    Female,
    TotalPassed,
    Appeared,
    TotalGpa5,
    MalePassed,
    FemalePassed,
    Gpa5Male,
    Gpa5Female,
    BsAppeared,
    BsPassed,
    BsGpa5,
    HumAppeared,
    HumPassed,
    HumGpa5,
    SciAppeared,
    SciPassed,
    SciGpa5,
}

impl Metric {
    /// All tracked fields, in summary order.
    pub const ALL: [Metric; 19] = [
        Metric::Examinee,
        Metric::Male,
        Metric::Female,
        Metric::TotalPassed,
        Metric::Appeared,
        Metric::TotalGpa5,
        Metric::MalePassed,
        Metric::FemalePassed,
        Metric::Gpa5Male,
        Metric::Gpa5Female,
        Metric::BsAppeared,
        Metric::BsPassed,
        Metric::BsGpa5,
        Metric::HumAppeared,
        Metric::HumPassed,
        Metric::HumGpa5,
        Metric::SciAppeared,
        Metric::SciPassed,
        Metric::SciGpa5,
    ];

    /// Column header in the source CSV (after trimming).
    pub fn column(self) -> &'static str {
        match self {
            Metric::Examinee => "Examinee",
            Metric::Male => "Male",
            Metric::Female => "Female",
            Metric::TotalPassed => "Total Passed",
            Metric::Appeared => "Appeared",
            Metric::TotalGpa5 => "Total GPA 5",
            Metric::MalePassed => "Male Passed",
            Metric::FemalePassed => "Female Passed",
            Metric::Gpa5Male => "GPA 5 - Male",
            Metric::Gpa5Female => "GPA 5 - Female",
            Metric::BsAppeared => "BS_Appeared",
            Metric::BsPassed => "BUSINESS STUDIES Passed",
            Metric::BsGpa5 => "BUSINESS STUDIES GPA 5",
            Metric::HumAppeared => "HUM_Appeared",
            Metric::HumPassed => "HUMANITIES Passed",
            Metric::HumGpa5 => "HUMANITIES GPA 5",
            Metric::SciAppeared => "SCI_Appeared",
            Metric::SciPassed => "SCIENCE Passed",
            Metric::SciGpa5 => "SCIENCE GPA 5",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Academic streams reported separately in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Department {
    #[serde(rename = "Business Studies")]
    BusinessStudies,
    #[serde(rename = "Humanities")]
    Humanities,
    #[serde(rename = "Science")]
    Science,
}

impl Department {
    pub const ALL: [Department; 3] = [
        Department::BusinessStudies,
        Department::Humanities,
        Department::Science,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Department::BusinessStudies => "Business Studies",
            Department::Humanities => "Humanities",
            Department::Science => "Science",
        }
    }

    /// Abbreviation used on KPI cards.
    pub fn short_label(self) -> &'static str {
        match self {
            Department::BusinessStudies => "BS",
            Department::Humanities => "HUM",
            Department::Science => "SCI",
        }
    }

    pub fn appeared_metric(self) -> Metric {
        match self {
            Department::BusinessStudies => Metric::BsAppeared,
            Department::Humanities => Metric::HumAppeared,
            Department::Science => Metric::SciAppeared,
        }
    }

    pub fn passed_metric(self) -> Metric {
        match self {
            Department::BusinessStudies => Metric::BsPassed,
            Department::Humanities => Metric::HumPassed,
            Department::Science => Metric::SciPassed,
        }
    }

    pub fn gpa5_metric(self) -> Metric {
        match self {
            Department::BusinessStudies => Metric::BsGpa5,
            Department::Humanities => Metric::HumGpa5,
            Department::Science => Metric::SciGpa5,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_index_matches_summary_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn department_metrics_point_at_their_own_columns() {
        assert_eq!(Department::Humanities.appeared_metric().column(), "HUM_Appeared");
        assert_eq!(
            Department::BusinessStudies.passed_metric().column(),
            "BUSINESS STUDIES Passed"
        );
        assert_eq!(Department::Science.gpa5_metric().column(), "SCIENCE GPA 5");
    }
}
