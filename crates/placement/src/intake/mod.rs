//! Bulk mock-test intake from CSV score sheets.
//!
//! A sheet needs an `Index Number` column; `Name`, `Gender`, `Test Name`,
//! `Mock Type`, and `Date` are optional. Every other heading is matched against the subject catalog by
//! code or display name, and unrecognised columns are ignored. Blank score
//! cells mean the subject was not written.

mod parser;

use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::engine::{RawScores, SubjectCatalog, SubjectCode};
use crate::records::{Gender, TestHeader};

pub const DEFAULT_TEST_NAME: &str = "Imported Test";
pub const DEFAULT_MOCK_TYPE: &str = "Mock 1";

/// One parsed sheet row, ready to be recorded against a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSheetRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub index_number: String,
    /// Used when the index number is not registered yet.
    pub student_name: Option<String>,
    pub gender: Option<Gender>,
    pub header: TestHeader,
    pub scores: RawScores,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreSheetError {
    #[error("failed to read score sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score sheet CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("score sheet has no Index Number column")]
    MissingIndexColumn,
    #[error("line {line}: missing index number")]
    MissingIndexNumber { line: u64 },
    #[error("line {line}: '{value}' is not a valid score for {subject}")]
    InvalidScore {
        line: u64,
        subject: SubjectCode,
        value: String,
    },
    #[error("line {line}: '{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { line: u64, value: String },
}

pub struct ScoreSheetImporter;

impl ScoreSheetImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &SubjectCatalog,
        today: NaiveDate,
    ) -> Result<Vec<ScoreSheetRow>, ScoreSheetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        debug!(path = %path.display(), "reading score sheet");
        Self::from_reader(file, catalog, today)
    }

    /// Parses a sheet; `today` stands in for rows without a date.
    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &SubjectCatalog,
        today: NaiveDate,
    ) -> Result<Vec<ScoreSheetRow>, ScoreSheetError> {
        let rows = parser::parse_rows(reader, catalog, today)?;
        debug!(rows = rows.len(), "parsed score sheet");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 12).expect("valid date")
    }

    fn import(csv: &str) -> Result<Vec<ScoreSheetRow>, ScoreSheetError> {
        ScoreSheetImporter::from_reader(Cursor::new(csv), &SubjectCatalog::bece(), today())
    }

    #[test]
    fn headers_match_codes_and_display_names() {
        let catalog = SubjectCatalog::bece();
        assert_eq!(
            parser::classify_header("English Language", &catalog),
            parser::Column::Subject(SubjectCode::new("ENG"))
        );
        assert_eq!(
            parser::classify_header("frn", &catalog),
            parser::Column::Subject(SubjectCode::new("FRN"))
        );
        assert_eq!(
            parser::classify_header("\u{feff}Index  Number", &catalog),
            parser::Column::IndexNumber
        );
        assert_eq!(
            parser::classify_header("Class", &catalog),
            parser::Column::Ignored
        );
    }

    #[test]
    fn rows_fill_defaults_and_skip_blank_cells() {
        let csv = "Index Number,English Language,MATH,Science,Social Studies,French,Notes\n\
0101001,65,85,78,58,,needs support\n";
        let rows = import(csv).expect("sheet parses");

        let row = rows.first().expect("one row");
        assert_eq!(row.line, 2);
        assert_eq!(row.index_number, "0101001");
        assert_eq!(row.student_name, None);
        assert_eq!(row.header.test_name, DEFAULT_TEST_NAME);
        assert_eq!(row.header.mock_type, DEFAULT_MOCK_TYPE);
        assert_eq!(row.header.date, today());
        assert_eq!(row.scores.len(), 4);
        assert!(!row.scores.contains("FRN"));
    }

    #[test]
    fn optional_name_and_gender_columns_are_captured() {
        let csv = "Student Name,Sex,Index Number,ENG\nAma Mensah,F,0101001,71\n";
        let rows = import(csv).expect("sheet parses");
        assert_eq!(rows[0].student_name.as_deref(), Some("Ama Mensah"));
        assert_eq!(rows[0].gender, Some(Gender::Female));
        assert_eq!(rows[0].scores.get("ENG"), Some(71));
    }

    #[test]
    fn invalid_score_reports_line_and_subject() {
        let csv = "Index Number,ENG\n0101001,80\n0101002,eighty\n";
        let error = import(csv).expect_err("non-numeric score");
        match error {
            ScoreSheetError::InvalidScore {
                line,
                subject,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(subject.as_str(), "ENG");
                assert_eq!(value, "eighty");
            }
            other => panic!("expected invalid score, got {other:?}"),
        }
    }

    #[test]
    fn fractional_score_is_rejected_not_truncated() {
        let csv = "Index Number,ENG,MATH\n0101001,80.0,89.5\n";
        let error = import(csv).expect_err("fractional score");
        match error {
            ScoreSheetError::InvalidScore {
                line,
                subject,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(subject.as_str(), "MATH");
                assert_eq!(value, "89.5");
            }
            other => panic!("expected invalid score, got {other:?}"),
        }
    }

    #[test]
    fn sheet_without_index_column_is_rejected() {
        let csv = "Name,ENG\nAma,80\n";
        let error = import(csv).expect_err("missing index column");
        assert!(matches!(error, ScoreSheetError::MissingIndexColumn));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = ScoreSheetImporter::from_path(
            "./does-not-exist.csv",
            &SubjectCatalog::bece(),
            today(),
        )
        .expect_err("expected io error");
        assert!(matches!(error, ScoreSheetError::Io(_)));
    }

    #[test]
    fn scores_and_dates_accept_common_spreadsheet_formats() {
        assert_eq!(parser::parse_score_for_tests("72"), Some(72));
        assert_eq!(parser::parse_score_for_tests("72.0"), Some(72));
        assert_eq!(parser::parse_score_for_tests("72.9"), None);
        assert_eq!(parser::parse_score_for_tests("1e12"), None);
        assert_eq!(parser::parse_score_for_tests("-3"), Some(-3));
        assert_eq!(parser::parse_score_for_tests("NaN"), None);
        assert_eq!(parser::parse_date_for_tests("2025-05-12"), Some(today()));
        assert_eq!(
            parser::parse_date_for_tests("2025-05-12T08:30:00Z"),
            Some(today())
        );
        assert!(parser::parse_date_for_tests("12/05/2025").is_none());
    }
}
