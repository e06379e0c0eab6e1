use super::subjects::SubjectCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const MIN_RAW_SCORE: i32 = 0;
pub const MAX_RAW_SCORE: i32 = 100;

/// Raw scores for one test attempt, keyed by subject code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawScores(BTreeMap<SubjectCode, i32>);

impl RawScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a score, returning the one it replaced.
    pub fn insert(&mut self, code: impl Into<SubjectCode>, score: i32) -> Option<i32> {
        self.0.insert(code.into(), score)
    }

    pub fn get(&self, code: &str) -> Option<i32> {
        self.0.get(SubjectCode::new(code).as_str()).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectCode, i32)> {
        self.0.iter().map(|(code, score)| (code, *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unweighted sum of every score present.
    pub fn total(&self) -> i64 {
        self.0.values().map(|score| i64::from(*score)).sum()
    }

    /// Runs the scores through the ingestion boundary before they reach the engine.
    pub fn validated(self, policy: ScorePolicy) -> Result<Self, ScoreValidationError> {
        let mut validated = BTreeMap::new();
        for (code, score) in self.0 {
            if code.is_blank() {
                return Err(ScoreValidationError::BlankSubjectCode);
            }
            let score = policy.apply(&code, score)?;
            validated.insert(code, score);
        }
        Ok(Self(validated))
    }
}

impl<K: Into<SubjectCode>> FromIterator<(K, i32)> for RawScores {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, score)| (code.into(), score))
                .collect(),
        )
    }
}

/// How out-of-range raw scores are handled at ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Pull scores into `0..=100`.
    #[default]
    Clamp,
    /// Refuse any score outside `0..=100`.
    Reject,
}

impl ScorePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clamp" => Some(Self::Clamp),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        }
    }

    fn apply(self, code: &SubjectCode, score: i32) -> Result<i32, ScoreValidationError> {
        if (MIN_RAW_SCORE..=MAX_RAW_SCORE).contains(&score) {
            return Ok(score);
        }

        match self {
            Self::Clamp => {
                let clamped = score.clamp(MIN_RAW_SCORE, MAX_RAW_SCORE);
                debug!(subject = %code, score, clamped, "clamped out-of-range raw score");
                Ok(clamped)
            }
            Self::Reject => Err(ScoreValidationError::OutOfRange {
                subject: code.clone(),
                score,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreValidationError {
    #[error("score for {subject} must be between 0 and 100 (got {score})")]
    OutOfRange { subject: SubjectCode, score: i32 },
    #[error("subject code must not be blank")]
    BlankSubjectCode,
}
