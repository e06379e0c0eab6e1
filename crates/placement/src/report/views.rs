use crate::engine::Category;
use crate::records::{Gender, StudentId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCountEntry {
    pub category: Category,
    pub category_label: &'static str,
    pub students: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenderCountEntry {
    pub gender: Gender,
    pub gender_label: &'static str,
    pub students: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopPerformerEntry {
    pub student_id: StudentId,
    pub name: String,
    pub index_number: String,
    pub aggregate: u32,
    pub category_label: &'static str,
    pub predicted_school: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectAverageEntry {
    pub code: String,
    pub name: String,
    pub average_score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolPredictionEntry {
    pub school: String,
    pub students: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImprovementEntry {
    pub student_id: StudentId,
    pub name: String,
    pub first_aggregate: u32,
    pub latest_aggregate: u32,
    /// First minus latest; positive means the aggregate went down (better).
    pub improvement: i64,
}
