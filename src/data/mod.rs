//! Data module - CSV loading and dataset schema

mod loader;
mod schema;

pub use loader::{column_names, DataLoader};
pub use schema::{Department, Metric, PASS_RATE_COLUMN, YEAR_COLUMN};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const HEADER: &str = " Year , Examinee ,Male,Female,Appeared,Total Passed,Percentage of Pass,\
Male Passed,Female Passed,Total GPA 5,GPA 5 - Male,GPA 5 - Female,BS_Appeared,\
BUSINESS STUDIES Passed,BUSINESS STUDIES GPA 5,HUM_Appeared,HUMANITIES Passed,\
HUMANITIES GPA 5,SCI_Appeared,SCIENCE Passed,SCIENCE GPA 5 ";

    pub const ROW_2024: &str = "2024,105,55,50,100,80,80.0,44,36,12,5,7,50,40,2,30,25,1,20,15,9";
    pub const ROW_2025: &str = "2025,125,60,65,120,100,83.33,52,48,20,9,11,55,45,4,35,30,2,30,25,14";
    const ROW_2023: &str = "2023,90,45,45,88,70,79.55,36,34,8,3,5,40,30,1,28,22,0,20,18,7";

    /// Two years, stored out of order.
    pub fn two_year_csv() -> String {
        csv_with_years(&[2025, 2024])
    }

    /// Build a CSV body from the named fixture years.
    pub fn csv_with_years(years: &[i64]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for year in years {
            let row = match year {
                2023 => ROW_2023,
                2024 => ROW_2024,
                2025 => ROW_2025,
                other => panic!("no fixture row for {other}"),
            };
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}
