use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::{
    Category, Placement, PlacementEngine, RawScores, SchoolDirectory, NO_PLACEMENT, NO_PROGRAM,
};

/// Identifier wrapper for registered students.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for recorded mock tests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TestId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Self::Male,
            "f" | "female" => Self::Female,
            _ => Self::Unspecified,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unspecified => "Unspecified",
        }
    }
}

/// Registration details captured by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub index_number: String,
    pub class_name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub parent_contact: Option<String>,
}

impl StudentProfile {
    pub const MIN_NAME_LEN: usize = 2;
    pub const MIN_INDEX_LEN: usize = 5;

    /// Lists every problem with the profile; empty when it can be registered.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().chars().count() < Self::MIN_NAME_LEN {
            problems.push(format!(
                "name must be at least {} characters long",
                Self::MIN_NAME_LEN
            ));
        }
        if self.index_number.trim().chars().count() < Self::MIN_INDEX_LEN {
            problems.push(format!(
                "index number must be at least {} characters long",
                Self::MIN_INDEX_LEN
            ));
        }
        problems
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub profile: StudentProfile,
    #[serde(default)]
    pub mock_tests: Vec<MockTest>,
}

impl Student {
    pub fn new(id: StudentId, profile: StudentProfile) -> Self {
        Self {
            id,
            profile,
            mock_tests: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn index_number(&self) -> &str {
        &self.profile.index_number
    }

    /// Tests ordered by date; same-day tests keep the order they were recorded in.
    pub fn tests_by_date(&self) -> Vec<&MockTest> {
        let mut tests: Vec<&MockTest> = self.mock_tests.iter().collect();
        tests.sort_by_key(|test| test.header.date);
        tests
    }

    pub fn latest_test(&self) -> Option<&MockTest> {
        self.tests_by_date().pop()
    }

    pub fn first_test(&self) -> Option<&MockTest> {
        self.tests_by_date().first().copied()
    }

    pub fn test_mut(&mut self, id: &TestId) -> Option<&mut MockTest> {
        self.mock_tests.iter_mut().find(|test| &test.id == id)
    }
}

/// Descriptive fields of a mock test attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestHeader {
    pub mock_type: String,
    pub test_name: String,
    pub date: NaiveDate,
}

impl TestHeader {
    pub fn new(mock_type: &str, test_name: &str, date: NaiveDate) -> Self {
        Self {
            mock_type: mock_type.to_string(),
            test_name: test_name.to_string(),
            date,
        }
    }
}

/// One graded mock test.
///
/// The aggregate, category, and predicted placement are stored alongside the
/// raw scores so reports never regrade. They can only change through
/// [`MockTest::rescore`] or [`MockTest::refresh`], which regrade in the same step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockTest {
    pub id: TestId,
    pub header: TestHeader,
    scores: RawScores,
    aggregate: u32,
    raw_total: i64,
    category: Category,
    predicted_school: String,
    predicted_program: String,
}

impl MockTest {
    pub fn record(
        id: TestId,
        header: TestHeader,
        scores: RawScores,
        engine: &PlacementEngine,
        directory: &SchoolDirectory,
    ) -> Self {
        let placement = engine.place(&scores, directory);
        let mut test = Self {
            id,
            header,
            scores,
            aggregate: 0,
            raw_total: 0,
            category: Category::CommunityDay,
            predicted_school: NO_PLACEMENT.to_string(),
            predicted_program: NO_PROGRAM.to_string(),
        };
        test.apply(&placement);
        test
    }

    pub fn scores(&self) -> &RawScores {
        &self.scores
    }

    pub fn aggregate(&self) -> u32 {
        self.aggregate
    }

    pub fn raw_total(&self) -> i64 {
        self.raw_total
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn predicted_school(&self) -> &str {
        &self.predicted_school
    }

    pub fn predicted_program(&self) -> &str {
        &self.predicted_program
    }

    /// Replaces the raw scores and regrades.
    pub fn rescore(
        &mut self,
        scores: RawScores,
        engine: &PlacementEngine,
        directory: &SchoolDirectory,
    ) {
        self.scores = scores;
        let placement = engine.place(&self.scores, directory);
        self.apply(&placement);
    }

    /// Whether the stored fields disagree with a fresh grading of the raw scores.
    pub fn is_stale(&self, engine: &PlacementEngine, directory: &SchoolDirectory) -> bool {
        let placement = engine.place(&self.scores, directory);
        !self.matches(&placement)
    }

    /// Regrades in place, returning `true` when any stored field changed.
    pub fn refresh(&mut self, engine: &PlacementEngine, directory: &SchoolDirectory) -> bool {
        let placement = engine.place(&self.scores, directory);
        if self.matches(&placement) {
            return false;
        }
        self.apply(&placement);
        true
    }

    fn matches(&self, placement: &Placement) -> bool {
        self.aggregate == placement.result.aggregate
            && self.raw_total == placement.result.raw_total
            && self.category == placement.category
            && self.predicted_school == placement.school_label()
            && self.predicted_program == placement.program_label()
    }

    fn apply(&mut self, placement: &Placement) {
        self.aggregate = placement.result.aggregate;
        self.raw_total = placement.result.raw_total;
        self.category = placement.category;
        self.predicted_school = placement.school_label().to_string();
        self.predicted_program = placement.program_label().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ThresholdPreset;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
    }

    fn sheet(score: i32) -> RawScores {
        ["ENG", "MATH", "SCI", "SOC", "RME", "FRN"]
            .into_iter()
            .map(|code| (code, score))
            .collect()
    }

    fn test_on(day: u32, score: i32) -> MockTest {
        MockTest::record(
            TestId(format!("MT{day:03}")),
            TestHeader::new("Mock 1", "Term test", date(day)),
            sheet(score),
            &PlacementEngine::default(),
            &SchoolDirectory::ghana_sample(),
        )
    }

    #[test]
    fn recording_freezes_grading_outcome() {
        let test = test_on(1, 92);
        assert_eq!(test.aggregate(), 6);
        assert_eq!(test.raw_total(), 552);
        assert_eq!(test.category(), Category::TopTier);
        assert_eq!(test.predicted_school(), "Achimota School");
        assert_eq!(test.predicted_program(), "Science");
    }

    #[test]
    fn rescore_keeps_stored_fields_consistent() {
        let engine = PlacementEngine::default();
        let directory = SchoolDirectory::ghana_sample();
        let mut test = test_on(1, 92);

        test.rescore(sheet(20), &engine, &directory);
        assert_eq!(test.aggregate(), 54);
        assert_eq!(test.category(), Category::CommunityDay);
        assert_eq!(test.predicted_school(), NO_PLACEMENT);
        assert!(!test.is_stale(&engine, &directory));
    }

    #[test]
    fn refresh_detects_tests_graded_under_another_table() {
        let directory = SchoolDirectory::ghana_sample();
        let legacy = PlacementEngine::with_preset(ThresholdPreset::Legacy);
        let mut test = MockTest::record(
            TestId("MT900".to_string()),
            TestHeader::new("Mock 2", "Legacy", date(2)),
            sheet(30),
            &legacy,
            &directory,
        );
        assert_eq!(test.category(), Category::Standard);
        assert_eq!(test.predicted_school(), "St. Monica's Senior High School");

        let engine = PlacementEngine::default();
        assert!(test.is_stale(&engine, &directory));
        assert!(test.refresh(&engine, &directory));
        assert_eq!(test.category(), Category::CommunityDay);
        assert_eq!(test.predicted_school(), NO_PLACEMENT);
        assert!(!test.refresh(&engine, &directory));
    }

    #[test]
    fn latest_and_first_tests_follow_dates_not_insertion() {
        let mut student = Student::new(
            StudentId("stu-1".to_string()),
            StudentProfile {
                name: "Ama Mensah".to_string(),
                index_number: "0101001".to_string(),
                class_name: "JHS 3A".to_string(),
                gender: Gender::Female,
                date_of_birth: None,
                parent_contact: None,
            },
        );
        student.mock_tests.push(test_on(10, 70));
        student.mock_tests.push(test_on(3, 50));
        student.mock_tests.push(test_on(7, 60));

        assert_eq!(student.latest_test().map(|t| t.header.date), Some(date(10)));
        assert_eq!(student.first_test().map(|t| t.header.date), Some(date(3)));
    }

    #[test]
    fn profile_problems_cover_name_and_index() {
        let profile = StudentProfile {
            name: "A".to_string(),
            index_number: "123".to_string(),
            class_name: "JHS 3B".to_string(),
            gender: Gender::parse("m"),
            date_of_birth: None,
            parent_contact: None,
        };
        assert_eq!(profile.problems().len(), 2);
        assert_eq!(profile.gender, Gender::Male);
    }
}
