use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower raw-score bound of each grade band, best band first.
///
/// | Raw score | Grade |
/// |-----------|-------|
/// | 90-100    | 1     |
/// | 80-89     | 2     |
/// | 70-79     | 3     |
/// | 60-69     | 4     |
/// | 55-59     | 5     |
/// | 50-54     | 6     |
/// | 40-49     | 7     |
/// | 35-39     | 8     |
/// | 0-34      | 9     |
const GRADE_BANDS: [(i32, u8); 8] = [
    (90, 1),
    (80, 2),
    (70, 3),
    (60, 4),
    (55, 5),
    (50, 6),
    (40, 7),
    (35, 8),
];

/// BECE grade on the 1 (best) to 9 (worst) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const BEST: Grade = Grade(1);
    pub const WORST: Grade = Grade(9);

    pub fn new(value: u8) -> Option<Self> {
        (Self::BEST.0..=Self::WORST.0)
            .contains(&value)
            .then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value).ok_or_else(|| format!("grade {value} outside 1..=9"))
    }
}

/// Converts a raw score to its BECE grade.
///
/// Total over `i32`: anything above 100 lands in grade 1 and anything below 0
/// in grade 9. Range checks belong to [`super::ScorePolicy`].
pub fn convert_score_to_grade(raw_score: i32) -> Grade {
    GRADE_BANDS
        .iter()
        .find(|(floor, _)| raw_score >= *floor)
        .map(|(_, grade)| Grade(*grade))
        .unwrap_or(Grade::WORST)
}
