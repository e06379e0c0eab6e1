use super::views::{
    CategoryCountEntry, GenderCountEntry, ImprovementEntry, SchoolPredictionEntry,
    SubjectAverageEntry, TopPerformerEntry,
};
use crate::engine::{Category, SubjectCatalog};
use crate::records::{Gender, MockTest, Student};
use serde::Serialize;
use std::collections::HashMap;

/// How many rows the ranked sections of a [`ClassReport`] keep.
#[derive(Debug, Clone, Copy)]
pub struct ReportLimits {
    pub top_performers: usize,
    pub predicted_schools: usize,
    pub improvement_trend: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            top_performers: 5,
            predicted_schools: 8,
            improvement_trend: 10,
        }
    }
}

/// Dashboard statistics for a class, computed from each student's stored tests.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub total_students: usize,
    pub students_with_tests: usize,
    pub top_performers: Vec<TopPerformerEntry>,
    pub category_distribution: Vec<CategoryCountEntry>,
    pub gender_distribution: Vec<GenderCountEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_aggregate: Option<f32>,
    /// Share of students with two or more tests whose latest aggregate beats their first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_rate_pct: Option<f32>,
    pub subject_averages: Vec<SubjectAverageEntry>,
    pub predicted_schools: Vec<SchoolPredictionEntry>,
    pub improvement_trend: Vec<ImprovementEntry>,
}

impl ClassReport {
    pub fn build(students: &[Student], catalog: &SubjectCatalog, limits: ReportLimits) -> Self {
        let latest: Vec<(&Student, &MockTest)> = students
            .iter()
            .filter_map(|student| student.latest_test().map(|test| (student, test)))
            .collect();

        let mut ranked = latest.clone();
        ranked.sort_by_key(|(_, test)| test.aggregate());
        let top_performers = ranked
            .iter()
            .take(limits.top_performers)
            .map(|(student, test)| TopPerformerEntry {
                student_id: student.id.clone(),
                name: student.name().to_string(),
                index_number: student.index_number().to_string(),
                aggregate: test.aggregate(),
                category_label: test.category().label(),
                predicted_school: test.predicted_school().to_string(),
            })
            .collect();

        let category_distribution = Category::ordered()
            .into_iter()
            .map(|category| CategoryCountEntry {
                category,
                category_label: category.label(),
                students: latest
                    .iter()
                    .filter(|(_, test)| test.category() == category)
                    .count(),
            })
            .collect();

        let gender_distribution = [Gender::Male, Gender::Female, Gender::Unspecified]
            .into_iter()
            .map(|gender| GenderCountEntry {
                gender,
                gender_label: gender.label(),
                students: students
                    .iter()
                    .filter(|student| student.profile.gender == gender)
                    .count(),
            })
            .collect();

        let average_aggregate = mean(latest.iter().map(|(_, test)| f64::from(test.aggregate())));

        let improvement_trend = improvement_trend(students, limits.improvement_trend);
        let repeat_takers = students
            .iter()
            .filter(|student| student.mock_tests.len() > 1)
            .count();
        let improved = students
            .iter()
            .filter(|student| student.mock_tests.len() > 1)
            .filter(|student| match (student.first_test(), student.latest_test()) {
                (Some(first), Some(latest)) => latest.aggregate() < first.aggregate(),
                _ => false,
            })
            .count();
        let improvement_rate_pct =
            (repeat_takers > 0).then(|| (improved as f32 / repeat_takers as f32) * 100.0);

        let subject_averages = catalog
            .subjects()
            .iter()
            .filter_map(|subject| {
                mean(
                    latest
                        .iter()
                        .filter_map(|(_, test)| test.scores().get(subject.code.as_str()))
                        .map(f64::from),
                )
                .map(|average_score| SubjectAverageEntry {
                    code: subject.code.to_string(),
                    name: subject.name.clone(),
                    average_score,
                })
            })
            .collect();

        Self {
            total_students: students.len(),
            students_with_tests: latest.len(),
            top_performers,
            category_distribution,
            gender_distribution,
            average_aggregate,
            improvement_rate_pct,
            subject_averages,
            predicted_schools: predicted_schools(&latest, limits.predicted_schools),
            improvement_trend,
        }
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.category_distribution
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.students)
            .unwrap_or(0)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f32> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| (sum / count as f64) as f32)
}

fn predicted_schools(latest: &[(&Student, &MockTest)], limit: usize) -> Vec<SchoolPredictionEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, test) in latest {
        *counts.entry(test.predicted_school()).or_default() += 1;
    }

    let mut entries: Vec<SchoolPredictionEntry> = counts
        .into_iter()
        .map(|(school, students)| SchoolPredictionEntry {
            school: school.to_string(),
            students,
        })
        .collect();
    entries.sort_by(|a, b| b.students.cmp(&a.students).then_with(|| a.school.cmp(&b.school)));
    entries.truncate(limit);
    entries
}

fn improvement_trend(students: &[Student], limit: usize) -> Vec<ImprovementEntry> {
    let mut entries: Vec<ImprovementEntry> = students
        .iter()
        .filter(|student| student.mock_tests.len() > 1)
        .filter_map(|student| {
            let first = student.first_test()?;
            let latest = student.latest_test()?;
            Some(ImprovementEntry {
                student_id: student.id.clone(),
                name: student.name().to_string(),
                first_aggregate: first.aggregate(),
                latest_aggregate: latest.aggregate(),
                improvement: i64::from(first.aggregate()) - i64::from(latest.aggregate()),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.improvement.cmp(&a.improvement));
    entries.truncate(limit);
    entries
}
