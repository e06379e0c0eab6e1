use super::category::Category;
use serde::{Deserialize, Serialize};

/// Coarse performance band shown to students and parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub const fn from_category(category: Category) -> Self {
        match category {
            Category::TopTier => Self::Excellent,
            Category::Good => Self::Good,
            Category::Standard | Category::CommunityDay => Self::NeedsImprovement,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Excellent => "Outstanding performance, on track for top-tier schools.",
            Self::Good => "Good performance, with room to aim higher.",
            Self::NeedsImprovement => "Room for improvement; every point counts.",
        }
    }

    pub const fn advice(self) -> &'static str {
        match self {
            Self::Excellent => "Keep up the excellent work and maintain your high standards.",
            Self::Good => {
                "Focus on your weaker subjects to improve your aggregate and reach top-tier schools."
            }
            Self::NeedsImprovement => {
                "Create a study plan, focus on core subjects, and practice regularly."
            }
        }
    }
}
