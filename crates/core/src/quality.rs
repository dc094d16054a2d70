//! Quality model - threshold rules, statistics and results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::id::{ClimbId, Server};
use crate::Time;

/// A single classifier call attached to an Onyx sample record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierCall {
    /// NCBI taxon ID (0 = unclassified)
    pub taxon_id: u64,

    /// Taxonomic rank code (`G` = genus, `S` = species, ...)
    #[serde(default)]
    pub rank: String,

    /// Reads assigned directly to this taxon
    #[serde(default)]
    pub count_direct: u64,

    /// Reads assigned to this taxon or any descendant
    #[serde(default)]
    pub count_descendants: u64,

    /// Percentage of reads assigned to this clade
    #[serde(default)]
    pub percentage: f64,
}

/// Metric name -> threshold rule, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricConfig {
    metrics: IndexMap<String, ThresholdRule>,
}

impl MetricConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metric; re-declaring a metric replaces its rule in place.
    pub fn with_metric(mut self, name: impl Into<String>, rule: ThresholdRule) -> Self {
        self.metrics.insert(name.into(), rule);
        self
    }

    /// Iterate metrics in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdRule)> {
        self.metrics.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Look up the rule for a metric.
    pub fn get(&self, name: &str) -> Option<&ThresholdRule> {
        self.metrics.get(name)
    }

    /// Number of declared metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no metric is declared.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Threshold rule for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdRule {
    /// `{pass, fail}` pair; direction follows from which one is larger
    Directional(DirectionalRule),
    /// `{min, max, warn_below, warn_above}` band
    Range(RangeRule),
}

/// Pass/fail pair.
///
/// When `pass > fail` larger values are better, otherwise smaller values are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectionalRule {
    /// Value at which the metric passes
    pub pass: f64,
    /// Value at which the metric fails
    pub fail: f64,
}

/// Fail outside `(min, max)`, warn at or beyond the warn margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeRule {
    /// Values at or below fail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Values at or above fail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Values at or below warn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_below: Option<f64>,
    /// Values at or above warn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_above: Option<f64>,
}

impl RangeRule {
    /// Whether no bound is set.
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
            && self.max.is_none()
            && self.warn_below.is_none()
            && self.warn_above.is_none()
    }
}

/// Raw per-sample statistics, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStats(BTreeMap<String, f64>);

impl RawStats {
    /// Create an empty set of statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a statistic.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Look up a statistic.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Iterate statistics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of statistics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no statistics.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RawStats {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// QC status of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QcStatus {
    /// Within the passing threshold
    Pass,
    /// Between the passing and failing thresholds
    Warn,
    /// At or beyond the failing threshold
    Fail,
}

impl QcStatus {
    /// Label used in result files.
    pub fn as_str(&self) -> &'static str {
        match self {
            QcStatus::Pass => "Pass",
            QcStatus::Warn => "Warn",
            QcStatus::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for QcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Metric name
    pub metric: String,

    /// Observed value
    pub value: f64,

    /// Classification
    pub status: QcStatus,

    /// Rule that produced the classification
    pub threshold: ThresholdRule,
}

/// Record written for every QC run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Sample
    pub climb_id: ClimbId,

    /// Onyx project the sample was read from
    pub server: Server,

    /// Headline result
    pub result: String,

    /// Metric results in config order
    pub metrics: Vec<MetricResult>,

    /// Spike-in presence check, when the spike-in count was collected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spike_detected: Option<QcStatus>,

    /// All statistics collected for the sample
    pub statistics: RawStats,

    /// When the run happened
    pub run_timestamp: Time,
}

impl AnalysisRecord {
    /// Whether every metric and the spike-in check passed.
    pub fn all_passed(&self) -> bool {
        self.metrics.iter().all(|m| m.status == QcStatus::Pass)
            && self.spike_detected.map_or(true, |s| s == QcStatus::Pass)
    }

    /// Look up a metric result by name.
    pub fn metric(&self, name: &str) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.metric == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_config_keeps_declaration_order() {
        let config = MetricConfig::new()
            .with_metric("total_reads", ThresholdRule::Directional(DirectionalRule { pass: 10000.0, fail: 2000.0 }))
            .with_metric("gc_content", ThresholdRule::Range(RangeRule { min: Some(30.0), max: Some(70.0), ..Default::default() }))
            .with_metric("percentage_host", ThresholdRule::Directional(DirectionalRule { pass: 5.0, fail: 10.0 }));

        let names: Vec<_> = config.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["total_reads", "gc_content", "percentage_host"]);
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_threshold_rule_untagged_json() {
        let directional: ThresholdRule = serde_json::from_str(r#"{"pass": 80, "fail": 60}"#).unwrap();
        assert_eq!(directional, ThresholdRule::Directional(DirectionalRule { pass: 80.0, fail: 60.0 }));

        let range: ThresholdRule = serde_json::from_str(r#"{"min": 30, "max": 70}"#).unwrap();
        assert!(matches!(range, ThresholdRule::Range(RangeRule { min: Some(_), max: Some(_), .. })));

        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json, serde_json::json!({"min": 30.0, "max": 70.0}));
    }

    #[test]
    fn test_threshold_rule_rejects_mixed_fields() {
        let mixed = serde_json::from_str::<ThresholdRule>(r#"{"pass": 80, "min": 60}"#);
        assert!(mixed.is_err());
    }

    #[test]
    fn test_qc_status_labels() {
        assert_eq!(serde_json::to_string(&QcStatus::Warn).unwrap(), "\"Warn\"");
        assert_eq!(QcStatus::Fail.to_string(), "Fail");
    }

    #[test]
    fn test_raw_stats_from_iter() {
        let stats: RawStats = [("total_reads", 100.0), ("percentage_host", 2.5)].into_iter().collect();
        assert_eq!(stats.get("total_reads"), Some(100.0));
        assert_eq!(stats.get("missing"), None);
        assert_eq!(stats.len(), 2);
    }
}
