//! What happens to a QC result after it is written locally.

use serde::{Deserialize, Serialize};

/// Output mode for a run. Exactly one applies per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionMode {
    /// Write the result file only
    NoOnyx,
    /// Also write the Onyx analysis object to a file for later upload
    StoreOnyx,
    /// Also validate the analysis object against Onyx without persisting it
    TestOnyx,
    /// Also create the analysis in Onyx
    ProdOnyx,
}

impl std::fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SubmissionMode::NoOnyx => "no-onyx",
            SubmissionMode::StoreOnyx => "store-onyx",
            SubmissionMode::TestOnyx => "test-onyx",
            SubmissionMode::ProdOnyx => "prod-onyx",
        };
        f.write_str(label)
    }
}
