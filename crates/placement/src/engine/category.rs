use serde::{Deserialize, Serialize};

/// Placement bracket derived from an aggregate, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TopTier,
    Good,
    Standard,
    CommunityDay,
}

impl Category {
    pub const fn ordered() -> [Category; 4] {
        [
            Category::TopTier,
            Category::Good,
            Category::Standard,
            Category::CommunityDay,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TopTier => "Category A (Top Tier)",
            Self::Good => "Category B (Good Schools)",
            Self::Standard => "Category C (Standard Schools)",
            Self::CommunityDay => "Category D (Community/Day Schools)",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::TopTier => "Category A",
            Self::Good => "Category B",
            Self::Standard => "Category C",
            Self::CommunityDay => "Category D",
        }
    }

    /// Accepts snake_case names, single letters, or the full label.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "top_tier" | "a" | "category_a" => Some(Self::TopTier),
            "good" | "b" | "category_b" => Some(Self::Good),
            "standard" | "c" | "category_c" => Some(Self::Standard),
            "community_day" | "community" | "d" | "category_d" => Some(Self::CommunityDay),
            _ => Self::ordered()
                .into_iter()
                .find(|category| category.label().eq_ignore_ascii_case(value.trim())),
        }
    }
}

/// Named threshold tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
    /// Four tiers with breakpoints 10, 15, 20.
    #[default]
    Bece,
    /// Three tiers with breakpoints 6, 15; kept for parity with records scored
    /// before the four-tier table existed.
    Legacy,
}

impl ThresholdPreset {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bece" | "four_tier" | "4-tier" => Some(Self::Bece),
            "legacy" | "three_tier" | "3-tier" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bece => "bece",
            Self::Legacy => "legacy",
        }
    }
}

/// One row of a threshold table: aggregates up to and including
/// `max_aggregate` fall into `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub max_aggregate: u32,
    pub category: Category,
}

/// Ordered aggregate breakpoints, evaluated first match wins, with a fallback
/// for anything above the last breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryThresholds {
    bands: Vec<ThresholdBand>,
    fallback: Category,
}

impl CategoryThresholds {
    /// Builds a table. Breakpoints must rise strictly and categories must get
    /// strictly worse down the table, ending at the fallback.
    pub fn new(bands: Vec<ThresholdBand>, fallback: Category) -> Result<Self, ThresholdError> {
        for pair in bands.windows(2) {
            if pair[1].max_aggregate <= pair[0].max_aggregate {
                return Err(ThresholdError::NotAscending {
                    previous: pair[0].max_aggregate,
                    next: pair[1].max_aggregate,
                });
            }
            if pair[1].category <= pair[0].category {
                return Err(ThresholdError::CategoryOutOfOrder(pair[1].category));
            }
        }

        if let Some(last) = bands.last() {
            if fallback <= last.category {
                return Err(ThresholdError::CategoryOutOfOrder(fallback));
            }
        }

        Ok(Self { bands, fallback })
    }

    pub fn bece() -> Self {
        Self {
            bands: vec![
                ThresholdBand {
                    max_aggregate: 10,
                    category: Category::TopTier,
                },
                ThresholdBand {
                    max_aggregate: 15,
                    category: Category::Good,
                },
                ThresholdBand {
                    max_aggregate: 20,
                    category: Category::Standard,
                },
            ],
            fallback: Category::CommunityDay,
        }
    }

    pub fn legacy() -> Self {
        Self {
            bands: vec![
                ThresholdBand {
                    max_aggregate: 6,
                    category: Category::TopTier,
                },
                ThresholdBand {
                    max_aggregate: 15,
                    category: Category::Good,
                },
            ],
            fallback: Category::Standard,
        }
    }

    pub fn from_preset(preset: ThresholdPreset) -> Self {
        match preset {
            ThresholdPreset::Bece => Self::bece(),
            ThresholdPreset::Legacy => Self::legacy(),
        }
    }

    pub fn bands(&self) -> &[ThresholdBand] {
        &self.bands
    }

    pub fn fallback(&self) -> Category {
        self.fallback
    }

    pub fn classify(&self, aggregate: u32) -> Category {
        self.bands
            .iter()
            .find(|band| aggregate <= band.max_aggregate)
            .map(|band| band.category)
            .unwrap_or(self.fallback)
    }

    /// Categories this table can produce, best first.
    pub fn categories(&self) -> Vec<Category> {
        self.bands
            .iter()
            .map(|band| band.category)
            .chain(std::iter::once(self.fallback))
            .collect()
    }
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self::bece()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThresholdError {
    #[error("threshold {next} must be greater than the previous threshold {previous}")]
    NotAscending { previous: u32, next: u32 },
    #[error("{0:?} appears out of best-to-worst order")]
    CategoryOutOfOrder(Category),
}
