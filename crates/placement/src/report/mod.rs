mod summary;
pub mod views;

pub use summary::{ClassReport, ReportLimits};
