//! The analysis object submitted to Onyx for a QC run.

use chrono::NaiveDate;
use sampleqc_core::{AnalysisRecord, ClimbId, MetricConfig};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Analysis name registered in Onyx.
pub const ANALYSIS_NAME: &str = "ukhsa-classifier-qc-metrics";

/// Analysis description registered in Onyx.
pub const ANALYSIS_DESCRIPTION: &str =
    "This is an analysis to generate QC statistics for individual samples";

/// Pipeline name recorded on the analysis.
pub const PIPELINE_NAME: &str = "mscape-sample-qc";

/// Fields of an Onyx analysis record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisObject {
    /// Date of the QC run
    pub analysis_date: NaiveDate,

    /// Analysis name
    pub name: String,

    /// Analysis description
    pub description: String,

    /// Producing pipeline
    pub pipeline_name: String,

    /// Pipeline source location
    pub pipeline_url: String,

    /// Pipeline version
    pub pipeline_version: String,

    /// Thresholds the results were evaluated against
    pub methods: MetricConfig,

    /// Headline result
    pub result: String,

    /// Flat `metric` / `metric_qc` / `spike_detected` map
    pub result_metrics: Map<String, Value>,

    /// `<server>_records` -> samples the analysis is attached to
    #[serde(flatten)]
    pub records: BTreeMap<String, Vec<ClimbId>>,
}

impl AnalysisObject {
    /// Wrap a QC record for submission.
    pub fn from_record(record: &AnalysisRecord, methods: &MetricConfig) -> Self {
        let mut result_metrics = Map::new();
        for metric in &record.metrics {
            result_metrics.insert(metric.metric.clone(), number(metric.value));
            result_metrics.insert(
                format!("{}_qc", metric.metric),
                Value::String(metric.status.to_string()),
            );
        }
        if let Some(spike) = record.spike_detected {
            result_metrics.insert("spike_detected".to_string(), Value::String(spike.to_string()));
        }

        let mut records = BTreeMap::new();
        records.insert(format!("{}_records", record.server), vec![record.climb_id.clone()]);

        Self {
            analysis_date: record.run_timestamp.date_naive(),
            name: ANALYSIS_NAME.to_string(),
            description: ANALYSIS_DESCRIPTION.to_string(),
            pipeline_name: PIPELINE_NAME.to_string(),
            pipeline_url: env!("CARGO_PKG_REPOSITORY").to_string(),
            pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
            methods: methods.clone(),
            result: record.result.clone(),
            result_metrics,
            records,
        }
    }
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sampleqc_core::{
        DirectionalRule, MetricResult, QcStatus, RawStats, Server, ThresholdRule,
    };

    fn record(server: Server) -> (AnalysisRecord, MetricConfig) {
        let rule = ThresholdRule::Directional(DirectionalRule { pass: 10000.0, fail: 2000.0 });
        let config = MetricConfig::new().with_metric("total_reads", rule.clone());
        let record = AnalysisRecord {
            climb_id: ClimbId::new("C-1A2B3C4D5E").unwrap(),
            server,
            result: "Warning: Check QC results before use".to_string(),
            metrics: vec![MetricResult {
                metric: "total_reads".to_string(),
                value: 5000.0,
                status: QcStatus::Warn,
                threshold: rule,
            }],
            spike_detected: Some(QcStatus::Pass),
            statistics: RawStats::new(),
            run_timestamp: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap(),
        };
        (record, config)
    }

    #[test]
    fn test_from_record_fields() {
        let (record, config) = record(Server::Mscape);
        let analysis = AnalysisObject::from_record(&record, &config);
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["analysis_date"], "2024-05-01");
        assert_eq!(json["name"], ANALYSIS_NAME);
        assert_eq!(json["pipeline_name"], PIPELINE_NAME);
        assert_eq!(json["pipeline_version"], env!("CARGO_PKG_VERSION"));
        assert!(json["pipeline_url"].as_str().unwrap().starts_with("https://"));
        assert_eq!(json["result"], "Warning: Check QC results before use");
        assert_eq!(json["methods"]["total_reads"]["pass"], 10000.0);
        assert_eq!(json["result_metrics"]["total_reads"], 5000.0);
        assert_eq!(json["result_metrics"]["total_reads_qc"], "Warn");
        assert_eq!(json["result_metrics"]["spike_detected"], "Pass");
        assert_eq!(json["mscape_records"], serde_json::json!(["C-1A2B3C4D5E"]));
    }

    #[test]
    fn test_records_follow_server() {
        let (record, config) = record(Server::Synthscape);
        let json = serde_json::to_value(AnalysisObject::from_record(&record, &config)).unwrap();

        assert_eq!(json["synthscape_records"], serde_json::json!(["C-1A2B3C4D5E"]));
        assert!(json.get("mscape_records").is_none());
    }
}
