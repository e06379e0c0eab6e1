use super::grade::{convert_score_to_grade, Grade};
use super::scores::RawScores;
use super::subjects::{SubjectCatalog, SubjectCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of elective grades that count toward the aggregate.
pub const COUNTED_ELECTIVES: usize = 2;

/// Outcome of grading one test attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Core grades plus the best elective grades; lower is better.
    pub aggregate: u32,
    /// Sum of every raw score supplied, core or elective.
    pub raw_total: i64,
    pub subject_grades: BTreeMap<SubjectCode, Grade>,
    /// Core subjects absent from the input that were graded 9.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted_core: Vec<SubjectCode>,
    /// Electives whose grades entered the aggregate, best first.
    #[serde(default)]
    pub counted_electives: Vec<SubjectCode>,
}

impl AggregateResult {
    pub fn grade_for(&self, code: &str) -> Option<Grade> {
        self.subject_grades
            .get(SubjectCode::new(code).as_str())
            .copied()
    }
}

pub(crate) fn compute_aggregate(scores: &RawScores, catalog: &SubjectCatalog) -> AggregateResult {
    let mut subject_grades: BTreeMap<SubjectCode, Grade> = scores
        .iter()
        .map(|(code, raw)| (code.clone(), convert_score_to_grade(raw)))
        .collect();

    let mut electives: Vec<(Grade, SubjectCode)> = subject_grades
        .iter()
        .filter(|(code, _)| !catalog.is_core(code.as_str()))
        .map(|(code, grade)| (*grade, code.clone()))
        .collect();

    let mut aggregate: u32 = 0;
    let mut defaulted_core = Vec::new();
    for code in catalog.core_codes() {
        let grade = match subject_grades.get(code) {
            Some(grade) => *grade,
            None => {
                defaulted_core.push(code.clone());
                Grade::WORST
            }
        };
        aggregate += u32::from(grade.value());
    }
    for code in &defaulted_core {
        subject_grades.insert(code.clone(), Grade::WORST);
    }

    // Code breaks grade ties so the reported electives are stable; the sum is unaffected.
    electives.sort();
    electives.truncate(COUNTED_ELECTIVES);
    aggregate += electives
        .iter()
        .map(|(grade, _)| u32::from(grade.value()))
        .sum::<u32>();

    AggregateResult {
        aggregate,
        raw_total: scores.total(),
        subject_grades,
        defaulted_core,
        counted_electives: electives.into_iter().map(|(_, code)| code).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, i32)]) -> RawScores {
        entries.iter().map(|(code, score)| (*code, *score)).collect()
    }

    #[test]
    fn worked_example_sums_core_and_best_two_electives() {
        let input = scores(&[
            ("ENG", 65),
            ("MATH", 85),
            ("SCI", 78),
            ("SOC", 58),
            ("RME", 72),
            ("ICT", 68),
            ("GHL", 70),
            ("FRN", 45),
        ]);
        let result = compute_aggregate(&input, &SubjectCatalog::bece());

        let core: Vec<u8> = ["ENG", "MATH", "SCI", "SOC"]
            .iter()
            .map(|code| result.grade_for(code).expect("core graded").value())
            .collect();
        assert_eq!(core, vec![4, 2, 3, 5]);
        assert_eq!(result.grade_for("ICT").map(Grade::value), Some(4));
        assert_eq!(result.grade_for("FRN").map(Grade::value), Some(7));
        assert_eq!(result.aggregate, 20);
        assert_eq!(
            result.counted_electives,
            vec![SubjectCode::new("GHL"), SubjectCode::new("RME")]
        );
        assert_eq!(result.raw_total, 541);
        assert!(result.defaulted_core.is_empty());
    }

    #[test]
    fn missing_core_subject_counts_as_grade_nine() {
        let result = compute_aggregate(
            &scores(&[("MATH", 90), ("SCI", 90), ("SOC", 90)]),
            &SubjectCatalog::bece(),
        );
        assert_eq!(result.grade_for("ENG"), Some(Grade::WORST));
        assert_eq!(result.defaulted_core, vec![SubjectCode::new("ENG")]);
        assert_eq!(result.aggregate, 9 + 1 + 1 + 1);
        assert_eq!(result.raw_total, 270);
    }

    #[test]
    fn single_elective_is_not_padded() {
        let result = compute_aggregate(
            &scores(&[("ENG", 90), ("MATH", 90), ("SCI", 90), ("SOC", 90), ("FRN", 36)]),
            &SubjectCatalog::bece(),
        );
        assert_eq!(result.aggregate, 4 + 8);
        assert_eq!(result.counted_electives, vec![SubjectCode::new("FRN")]);
    }

    #[test]
    fn empty_input_grades_every_core_subject_nine() {
        let result = compute_aggregate(&RawScores::new(), &SubjectCatalog::bece());
        assert_eq!(result.aggregate, 36);
        assert_eq!(result.raw_total, 0);
        assert_eq!(result.subject_grades.len(), 4);
        assert!(result.counted_electives.is_empty());
    }

    #[test]
    fn perfect_and_worst_sheets_hit_the_aggregate_bounds() {
        let catalog = SubjectCatalog::bece();
        let best = compute_aggregate(
            &scores(&[
                ("ENG", 100),
                ("MATH", 100),
                ("SCI", 100),
                ("SOC", 100),
                ("RME", 100),
                ("CAD", 100),
                ("FRN", 0),
            ]),
            &catalog,
        );
        assert_eq!(best.aggregate, 6);

        let worst = compute_aggregate(
            &scores(&[
                ("ENG", 0),
                ("MATH", 0),
                ("SCI", 0),
                ("SOC", 0),
                ("RME", 0),
                ("CAD", 0),
            ]),
            &catalog,
        );
        assert_eq!(worst.aggregate, 54);
    }
}
