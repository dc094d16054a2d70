//! A single QC run: collect, evaluate, write, then hand off to Onyx.

use std::path::PathBuf;

use sampleqc_core::{
    AnalysisRecord, ClimbId, MetricConfig, QcError, Result, Server, SubmissionMode,
};
use sampleqc_onyx::{AnalysisObject, AnalysisSubmitter, SampleSource, SubmissionOutcome, SubmitTarget};
use sampleqc_quality::{assemble, evaluate};
use sampleqc_storage::JsonResultStore;
use tracing::{info, warn};

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Sample to check
    pub climb_id: ClimbId,
    /// Onyx project holding the sample
    pub server: Server,
    /// Thresholds to apply
    pub config: MetricConfig,
    /// What to do with the result
    pub mode: SubmissionMode,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// The QC record
    pub record: AnalysisRecord,
    /// Where the QC record was written
    pub record_path: PathBuf,
    /// Where the analysis object was written (`store-onyx`)
    pub analysis_path: Option<PathBuf>,
    /// Onyx's answer (`test-onyx` / `prod-onyx`)
    pub submission: Option<SubmissionOutcome>,
}

/// Run QC for one sample.
///
/// The record file is written before anything is sent to Onyx and is left in
/// place when the submission fails.
pub async fn run<S, U>(
    request: &RunRequest,
    source: &S,
    submitter: &U,
    store: &JsonResultStore,
) -> Result<RunOutcome>
where
    S: SampleSource + ?Sized,
    U: AnalysisSubmitter + ?Sized,
{
    info!(climb_id = %request.climb_id, server = %request.server, mode = %request.mode, "starting sample QC");

    let stats = source.fetch_stats(&request.climb_id, request.server).await?;
    let metrics = evaluate(&request.config, &stats)?;
    let record = assemble(
        request.climb_id.clone(),
        request.server,
        metrics,
        stats,
        chrono::Utc::now(),
    );

    let record_path = store.save_record(&record).await?;
    info!(path = %record_path.display(), result = %record.result, "wrote QC results");
    if !record.all_passed() {
        warn!(climb_id = %record.climb_id, "sample did not pass every QC check");
    }

    let mut outcome = RunOutcome {
        record,
        record_path,
        analysis_path: None,
        submission: None,
    };

    let target = match request.mode {
        SubmissionMode::NoOnyx => return Ok(outcome),
        SubmissionMode::StoreOnyx => {
            let analysis = AnalysisObject::from_record(&outcome.record, &request.config);
            let path = store.save_analysis(&request.climb_id, &analysis).await?;
            info!(path = %path.display(), "stored onyx analysis fields");
            outcome.analysis_path = Some(path);
            return Ok(outcome);
        }
        SubmissionMode::TestOnyx => SubmitTarget::Test,
        SubmissionMode::ProdOnyx => SubmitTarget::Prod,
    };

    let analysis = AnalysisObject::from_record(&outcome.record, &request.config);
    let submission = submitter
        .submit(request.server, &analysis, target)
        .await
        .map_err(|e| QcError::Submission {
            message: e.to_string(),
            errors: Vec::new(),
        })?;

    if !submission.accepted {
        return Err(QcError::Submission {
            message: format!("{} rejected analysis for {}", request.mode, request.climb_id),
            errors: submission.errors,
        });
    }

    outcome.submission = Some(submission);
    Ok(outcome)
}
