use chrono::{DateTime, NaiveDate};
use std::io::Read;

use crate::engine::{normalize_label, RawScores, SubjectCatalog, SubjectCode};
use crate::records::{Gender, TestHeader};

use super::{ScoreSheetError, ScoreSheetRow, DEFAULT_MOCK_TYPE, DEFAULT_TEST_NAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Column {
    IndexNumber,
    StudentName,
    StudentGender,
    TestName,
    MockType,
    Date,
    Subject(SubjectCode),
    Ignored,
}

pub(crate) fn classify_header(header: &str, catalog: &SubjectCatalog) -> Column {
    match normalize_label(header).as_str() {
        "index number" | "indexnumber" | "index" => Column::IndexNumber,
        "name" | "student name" | "student" => Column::StudentName,
        "gender" | "sex" => Column::StudentGender,
        "test name" | "testname" => Column::TestName,
        "mock type" | "mocktype" => Column::MockType,
        "date" | "test date" => Column::Date,
        _ => catalog
            .lookup(header)
            .map(|subject| Column::Subject(subject.code.clone()))
            .unwrap_or(Column::Ignored),
    }
}

pub(crate) fn parse_rows<R: Read>(
    reader: R,
    catalog: &SubjectCatalog,
    today: NaiveDate,
) -> Result<Vec<ScoreSheetRow>, ScoreSheetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Column> = csv_reader
        .headers()?
        .iter()
        .map(|header| classify_header(header, catalog))
        .collect();
    if !columns.contains(&Column::IndexNumber) {
        return Err(ScoreSheetError::MissingIndexColumn);
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut index_number = None;
        let mut student_name = None;
        let mut gender = None;
        let mut test_name = None;
        let mut mock_type = None;
        let mut date = None;
        let mut scores = RawScores::new();

        for (column, cell) in columns.iter().zip(record.iter()) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match column {
                Column::IndexNumber => index_number = Some(cell.to_string()),
                Column::StudentName => student_name = Some(cell.to_string()),
                Column::StudentGender => gender = Some(Gender::parse(cell)),
                Column::TestName => test_name = Some(cell.to_string()),
                Column::MockType => mock_type = Some(cell.to_string()),
                Column::Date => {
                    date = Some(parse_date(cell).ok_or_else(|| ScoreSheetError::InvalidDate {
                        line,
                        value: cell.to_string(),
                    })?)
                }
                Column::Subject(code) => {
                    let score = parse_score(cell).ok_or_else(|| ScoreSheetError::InvalidScore {
                        line,
                        subject: code.clone(),
                        value: cell.to_string(),
                    })?;
                    scores.insert(code.clone(), score);
                }
                Column::Ignored => {}
            }
        }

        let index_number = index_number.ok_or(ScoreSheetError::MissingIndexNumber { line })?;
        rows.push(ScoreSheetRow {
            line,
            index_number,
            student_name,
            gender,
            header: TestHeader {
                mock_type: mock_type.unwrap_or_else(|| DEFAULT_MOCK_TYPE.to_string()),
                test_name: test_name.unwrap_or_else(|| DEFAULT_TEST_NAME.to_string()),
                date: date.unwrap_or(today),
            },
            scores,
        });
    }

    Ok(rows)
}

/// Whole numbers. Spreadsheet exports like `72.0` are accepted, but a real
/// fraction such as `72.9` is not a score.
fn parse_score(value: &str) -> Option<i32> {
    if let Ok(score) = value.parse::<i32>() {
        return Some(score);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite() && score.fract() == 0.0)
        .filter(|score| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(score))
        .map(|score| score as i32)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc().date())
}

#[cfg(test)]
pub(crate) fn parse_score_for_tests(value: &str) -> Option<i32> {
    parse_score(value)
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
