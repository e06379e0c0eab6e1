use serde::Serialize;

use super::domain::{Student, StudentId};

/// Aggregate swing, in points, that counts as a significant change.
pub const SIGNIFICANT_CHANGE: i64 = 5;
/// Latest aggregates in `(AT_RISK_FLOOR, AT_RISK_CEILING]` raise an at-risk alert.
pub const AT_RISK_FLOOR: u32 = 24;
pub const AT_RISK_CEILING: u32 = 30;
/// Latest aggregates below this raise an excellence alert.
pub const EXCELLENT_BELOW: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Improvement,
    Decline,
    AtRisk,
    Excellent,
}

impl AlertKind {
    pub const fn severity(self) -> AlertSeverity {
        match self {
            Self::Improvement | Self::Excellent => AlertSeverity::Positive,
            Self::Decline => AlertSeverity::Warning,
            Self::AtRisk => AlertSeverity::Critical,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Improvement => "Significant Improvement",
            Self::Decline => "Performance Decline",
            Self::AtRisk => "At-Risk Student",
            Self::Excellent => "Excellent Performance",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Improvement => "improvement",
            Self::Decline => "decline",
            Self::AtRisk => "at-risk",
            Self::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Positive,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceAlert {
    pub id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: &'static str,
    pub student_id: StudentId,
    pub student_name: String,
    pub index_number: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_aggregate: Option<u32>,
    pub current_aggregate: u32,
}

/// Compares each student's two most recent tests and flags notable movement.
///
/// Students with fewer than two tests are skipped entirely.
pub fn generate_alerts(students: &[Student]) -> Vec<PerformanceAlert> {
    let mut alerts = Vec::new();

    for student in students {
        let tests = student.tests_by_date();
        let [.., previous, latest] = tests.as_slice() else {
            continue;
        };

        let previous_aggregate = previous.aggregate();
        let current = latest.aggregate();
        let improvement = i64::from(previous_aggregate) - i64::from(current);
        let change_pct = if previous_aggregate == 0 {
            0.0
        } else {
            (improvement.abs() as f64 / f64::from(previous_aggregate)) * 100.0
        };

        let mut push = |kind: AlertKind, message: String, previous: Option<u32>| {
            alerts.push(PerformanceAlert {
                id: format!("{}-{}", student.id, kind.slug()),
                kind,
                severity: kind.severity(),
                title: kind.title(),
                student_id: student.id.clone(),
                student_name: student.name().to_string(),
                index_number: student.index_number().to_string(),
                message,
                previous_aggregate: previous,
                current_aggregate: current,
            });
        };

        if improvement > SIGNIFICANT_CHANGE {
            push(
                AlertKind::Improvement,
                format!(
                    "{} has improved their aggregate by {} points ({:.1}%)",
                    student.name(),
                    improvement,
                    change_pct
                ),
                Some(previous_aggregate),
            );
        }

        if improvement < -SIGNIFICANT_CHANGE {
            push(
                AlertKind::Decline,
                format!(
                    "{} has declined by {} points ({:.1}%)",
                    student.name(),
                    improvement.abs(),
                    change_pct
                ),
                Some(previous_aggregate),
            );
        }

        if current > AT_RISK_FLOOR && current <= AT_RISK_CEILING {
            push(
                AlertKind::AtRisk,
                format!(
                    "{} is at risk with an aggregate of {}",
                    student.name(),
                    current
                ),
                None,
            );
        }

        if current < EXCELLENT_BELOW {
            push(
                AlertKind::Excellent,
                format!(
                    "{} is performing excellently with an aggregate of {}",
                    student.name(),
                    current
                ),
                None,
            );
        }
    }

    alerts
}
