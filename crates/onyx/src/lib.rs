//! Onyx integration for sample QC.
//!
//! An HTTP client for the Onyx metadata API, the sample statistics source
//! built on it, and the analysis object submitted back to Onyx.

#![warn(missing_docs)]

pub mod error;
pub mod config;
pub mod client;
pub mod trait_;
pub mod analysis;
pub mod collector;
pub mod submitter;

pub use error::{OnyxError, Result};
pub use config::OnyxConfig;
pub use client::{OnyxClient, SampleRecord};
pub use trait_::{SampleSource, AnalysisSubmitter, SubmitTarget, SubmissionOutcome};
pub use analysis::AnalysisObject;
