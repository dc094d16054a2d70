//! Sample QC core data models.
//!
//! This crate defines the data structures shared by the QC pipeline:
//! sample identities, threshold rules, raw statistics, metric results and
//! the analysis record written for every run.

#![warn(missing_docs)]

// Sample identities
mod id;

// Thresholds, statistics and results
mod quality;

// Output handling
mod submission;

mod error;

// Re-exports
pub use id::{ClimbId, Server};

pub use quality::{
    ClassifierCall, MetricConfig, ThresholdRule, DirectionalRule, RangeRule,
    RawStats, QcStatus, MetricResult, AnalysisRecord,
};
pub use submission::SubmissionMode;
pub use error::{QcError, Result};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
