//! Seams between the QC pipeline and Onyx.

use async_trait::async_trait;
use sampleqc_core::{ClimbId, RawStats, Server};
use serde::{Deserialize, Serialize};
use crate::analysis::AnalysisObject;
use crate::error::Result;

/// Where an analysis submission goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    /// Validation endpoint; nothing is persisted
    Test,
    /// Live endpoint; the analysis is created
    Prod,
}

impl SubmitTarget {
    /// Path of the analysis endpoint for a project.
    pub fn endpoint(&self, server: Server) -> String {
        match self {
            SubmitTarget::Test => format!("projects/{}/analysis/test/", server),
            SubmitTarget::Prod => format!("projects/{}/analysis/", server),
        }
    }
}

/// Onyx's answer to a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Whether Onyx accepted the analysis
    pub accepted: bool,

    /// Identifier of the created analysis (prod submissions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,

    /// Validation errors reported by Onyx
    #[serde(default)]
    pub errors: Vec<String>,
}

impl SubmissionOutcome {
    /// An accepted submission.
    pub fn accepted(analysis_id: Option<String>) -> Self {
        Self {
            accepted: true,
            analysis_id,
            errors: Vec::new(),
        }
    }

    /// A rejected submission.
    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            accepted: false,
            analysis_id: None,
            errors,
        }
    }
}

/// Source of raw statistics for a sample.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Retrieve the statistics for `climb_id` on `server`.
    async fn fetch_stats(&self, climb_id: &ClimbId, server: Server) -> sampleqc_core::Result<RawStats>;
}

/// Destination for analysis objects.
#[async_trait]
pub trait AnalysisSubmitter: Send + Sync {
    /// Submit an analysis object.
    async fn submit(
        &self,
        server: Server,
        analysis: &AnalysisObject,
        target: SubmitTarget,
    ) -> Result<SubmissionOutcome>;
}
