//! BECE grading, aggregate scoring, and school placement.
//!
//! Everything in this module is pure: no I/O, no shared mutable state, and no
//! failure paths once the engine is constructed. Range checks on raw scores
//! happen earlier, in [`RawScores::validated`].

mod aggregate;
mod category;
mod directory;
mod grade;
mod performance;
mod scores;
mod subjects;

pub use aggregate::{AggregateResult, COUNTED_ELECTIVES};
pub use category::{Category, CategoryThresholds, ThresholdBand, ThresholdError, ThresholdPreset};
pub use directory::{match_school, School, SchoolDirectory, NO_PLACEMENT, NO_PROGRAM};
pub use grade::{convert_score_to_grade, Grade};
pub use performance::PerformanceLevel;
pub use scores::{RawScores, ScorePolicy, ScoreValidationError, MAX_RAW_SCORE, MIN_RAW_SCORE};
pub use subjects::{SubjectCatalog, SubjectCode, SubjectInfo, SubjectKind};

pub(crate) use subjects::normalize_label;

use serde::{Deserialize, Serialize};

/// Stateless grader holding the subject catalog and the single threshold
/// table every caller classifies with.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    catalog: SubjectCatalog,
    thresholds: CategoryThresholds,
}

impl PlacementEngine {
    pub fn new(catalog: SubjectCatalog, thresholds: CategoryThresholds) -> Self {
        Self {
            catalog,
            thresholds,
        }
    }

    pub fn with_preset(preset: ThresholdPreset) -> Self {
        Self::new(
            SubjectCatalog::bece(),
            CategoryThresholds::from_preset(preset),
        )
    }

    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }

    pub fn thresholds(&self) -> &CategoryThresholds {
        &self.thresholds
    }

    pub fn convert_score_to_grade(&self, raw_score: i32) -> Grade {
        convert_score_to_grade(raw_score)
    }

    pub fn compute_aggregate(&self, scores: &RawScores) -> AggregateResult {
        aggregate::compute_aggregate(scores, &self.catalog)
    }

    pub fn classify_category(&self, aggregate: u32) -> Category {
        self.thresholds.classify(aggregate)
    }

    /// Grades the scores and picks the top-ranked school for the resulting category.
    pub fn place(&self, scores: &RawScores, directory: &SchoolDirectory) -> Placement {
        let result = self.compute_aggregate(scores);
        let category = self.classify_category(result.aggregate);
        let school = directory.match_school(category).cloned();

        Placement {
            result,
            category,
            school,
        }
    }

    /// Places a student honouring their ranked school and program choices.
    ///
    /// The first preference naming a school in the student's category that
    /// offers the requested program wins. Preferences missing either the
    /// school or the program are skipped. Without a match, the top-ranked
    /// school of the category is suggested with its first program.
    pub fn predict(
        &self,
        scores: &RawScores,
        preferences: &[Preference],
        directory: &SchoolDirectory,
    ) -> Prediction {
        let result = self.compute_aggregate(scores);
        let category = self.classify_category(result.aggregate);
        let available_schools: Vec<School> = directory.in_category(category).cloned().collect();

        let preferred = preferences
            .iter()
            .enumerate()
            .filter(|(_, preference)| preference.is_complete())
            .find_map(|(rank, preference)| {
                let program = preference.program.trim();
                available_schools
                    .iter()
                    .find(|school| school.name.eq_ignore_ascii_case(preference.school.trim()))
                    .filter(|school| school.offers(program))
                    .map(|school| (rank, school.clone(), program.to_string()))
            });

        let (matched_preference, placed_school, placed_program) = match preferred {
            Some((rank, school, program)) => (Some(rank), Some(school), Some(program)),
            None => {
                let school = available_schools.first().cloned();
                let program = school
                    .as_ref()
                    .and_then(|school| school.first_program().map(str::to_string));
                (None, school, program)
            }
        };

        Prediction {
            aggregate: result.aggregate,
            raw_total: result.raw_total,
            category,
            performance: PerformanceLevel::from_category(category),
            placed_school,
            placed_program,
            matched_preference,
            available_schools,
        }
    }
}

/// Graded attempt with its category and top-ranked candidate school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub result: AggregateResult,
    pub category: Category,
    pub school: Option<School>,
}

impl Placement {
    pub fn aggregate(&self) -> u32 {
        self.result.aggregate
    }

    pub fn school_label(&self) -> &str {
        self.school
            .as_ref()
            .map(|school| school.name.as_str())
            .unwrap_or(NO_PLACEMENT)
    }

    pub fn program_label(&self) -> &str {
        self.school
            .as_ref()
            .and_then(School::first_program)
            .unwrap_or(NO_PROGRAM)
    }

    pub fn performance(&self) -> PerformanceLevel {
        PerformanceLevel::from_category(self.category)
    }
}

/// One ranked school and program choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub school: String,
    pub program: String,
}

impl Preference {
    pub fn new(school: &str, program: &str) -> Self {
        Self {
            school: school.to_string(),
            program: program.to_string(),
        }
    }

    /// Both a school and a program are named.
    pub fn is_complete(&self) -> bool {
        !self.school.trim().is_empty() && !self.program.trim().is_empty()
    }
}

/// Placement outcome after weighing the student's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub aggregate: u32,
    pub raw_total: i64,
    pub category: Category,
    pub performance: PerformanceLevel,
    pub placed_school: Option<School>,
    pub placed_program: Option<String>,
    /// Index into the preference list that produced the placement, if any.
    pub matched_preference: Option<usize>,
    pub available_schools: Vec<School>,
}

impl Prediction {
    pub fn school_label(&self) -> &str {
        self.placed_school
            .as_ref()
            .map(|school| school.name.as_str())
            .unwrap_or(NO_PLACEMENT)
    }

    pub fn program_label(&self) -> &str {
        self.placed_program.as_deref().unwrap_or(NO_PROGRAM)
    }
}
