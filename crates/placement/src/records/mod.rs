//! Student records, graded mock tests, and the service that keeps them in step
//! with the placement engine.

mod alerts;
pub mod domain;
pub mod repository;
pub mod service;

pub use alerts::{
    generate_alerts, AlertKind, AlertSeverity, PerformanceAlert, AT_RISK_CEILING, AT_RISK_FLOOR,
    EXCELLENT_BELOW, SIGNIFICANT_CHANGE,
};
pub use domain::{Gender, MockTest, Student, StudentId, StudentProfile, TestHeader, TestId};
pub use repository::{InMemoryStudentRepository, RepositoryError, StudentRepository};
pub use service::{PlacementService, PlacementServiceError};
