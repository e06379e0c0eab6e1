//! Mock-exam grading and senior high school placement for BECE candidates.
//!
//! [`engine`] holds the pure grading rules. [`records`], [`report`], and
//! [`intake`] build the school-office workflow on top of it.

pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod records;
pub mod report;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_env;
