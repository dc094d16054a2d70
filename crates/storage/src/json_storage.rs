//! JSON file storage for QC results.
//!
//! One run writes `<climb_id>_qc_results.json` and, when the analysis object
//! is stored for later upload, `<climb_id>_qc_metrics_analysis_fields.json`.

use std::path::{Path, PathBuf};
use sampleqc_core::{AnalysisRecord, ClimbId};
use serde::Serialize;
use tokio::fs;
use tracing::debug;
use super::{Result, StoreError};

/// File-based JSON result store rooted at the run's output directory.
#[derive(Debug, Clone)]
pub struct JsonResultStore {
    root: PathBuf,
}

impl JsonResultStore {
    /// Create the store, creating the output directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the QC result file for a sample.
    pub fn record_path(&self, climb_id: &ClimbId) -> PathBuf {
        self.root.join(format!("{}_qc_results.json", climb_id))
    }

    /// Path of the stored analysis object for a sample.
    pub fn analysis_path(&self, climb_id: &ClimbId) -> PathBuf {
        self.root.join(format!("{}_qc_metrics_analysis_fields.json", climb_id))
    }

    /// Write the QC record, returning the file path.
    pub async fn save_record(&self, record: &AnalysisRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.climb_id);
        write_json(&path, record).await?;
        Ok(path)
    }

    /// Load a previously written QC record.
    pub async fn load_record(&self, climb_id: &ClimbId) -> Result<Option<AnalysisRecord>> {
        read_json(&self.record_path(climb_id)).await
    }

    /// Write an analysis object for later upload, returning the file path.
    pub async fn save_analysis<T: Serialize>(&self, climb_id: &ClimbId, analysis: &T) -> Result<PathBuf> {
        let path = self.analysis_path(climb_id);
        write_json(&path, analysis).await?;
        Ok(path)
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes())
        .await
        .map_err(|e| StoreError::io(path, e))?;
    debug!(path = %path.display(), bytes = json.len(), "wrote JSON file");
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
