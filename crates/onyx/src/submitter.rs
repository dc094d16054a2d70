//! Analysis submission through the Onyx client.

use async_trait::async_trait;
use sampleqc_core::Server;
use tracing::info;

use crate::analysis::AnalysisObject;
use crate::client::OnyxClient;
use crate::error::Result;
use crate::trait_::{AnalysisSubmitter, SubmissionOutcome, SubmitTarget};

#[async_trait]
impl AnalysisSubmitter for OnyxClient {
    async fn submit(
        &self,
        server: Server,
        analysis: &AnalysisObject,
        target: SubmitTarget,
    ) -> Result<SubmissionOutcome> {
        let outcome = self.create_analysis(server, analysis, target).await?;
        info!(
            %server,
            ?target,
            accepted = outcome.accepted,
            analysis_id = outcome.analysis_id.as_deref().unwrap_or("-"),
            "onyx submission finished"
        );
        Ok(outcome)
    }
}
