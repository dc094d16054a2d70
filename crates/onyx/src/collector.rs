//! Sample statistics collected from Onyx.

use async_trait::async_trait;
use sampleqc_core::{ClimbId, QcError, RawStats, Server};
use sampleqc_quality::read_proportions;
use tracing::{debug, info};

use crate::client::OnyxClient;
use crate::error::OnyxError;
use crate::trait_::SampleSource;

#[async_trait]
impl SampleSource for OnyxClient {
    async fn fetch_stats(&self, climb_id: &ClimbId, server: Server) -> sampleqc_core::Result<RawStats> {
        let record = self
            .get_record(server, climb_id)
            .await
            .map_err(|e| collection_error(e, climb_id, server))?;

        info!(
            %climb_id,
            %server,
            classifier_calls = record.classifier_calls.len(),
            "retrieved sample record"
        );

        let stats = read_proportions(&record.classifier_calls);
        debug!(?stats, "derived read proportions");
        Ok(stats)
    }
}

fn collection_error(err: OnyxError, climb_id: &ClimbId, server: Server) -> QcError {
    match err {
        OnyxError::NotFound { .. } => QcError::SampleNotFound {
            climb_id: climb_id.clone(),
            server,
        },
        other => QcError::Collection {
            climb_id: climb_id.clone(),
            message: other.to_string(),
        },
    }
}
