//! Metric evaluation against threshold rules.

use sampleqc_core::{
    DirectionalRule, MetricConfig, MetricResult, QcError, QcStatus, RangeRule, RawStats, Result,
    ThresholdRule,
};
use tracing::{debug, warn};

/// Classify a single value against a rule.
///
/// Non-finite values (NaN, infinities) always fail.
pub fn classify(rule: &ThresholdRule, value: f64) -> QcStatus {
    if !value.is_finite() {
        return QcStatus::Fail;
    }
    match rule {
        ThresholdRule::Directional(rule) => classify_directional(rule, value),
        ThresholdRule::Range(rule) => classify_range(rule, value),
    }
}

fn classify_directional(rule: &DirectionalRule, value: f64) -> QcStatus {
    if rule.pass > rule.fail {
        // Large values = better
        if value >= rule.pass {
            QcStatus::Pass
        } else if value > rule.fail {
            QcStatus::Warn
        } else {
            QcStatus::Fail
        }
    } else if value <= rule.pass {
        QcStatus::Pass
    } else if value < rule.fail {
        QcStatus::Warn
    } else {
        QcStatus::Fail
    }
}

fn classify_range(rule: &RangeRule, value: f64) -> QcStatus {
    let at_or_below = |bound: Option<f64>| bound.is_some_and(|b| value <= b);
    let at_or_above = |bound: Option<f64>| bound.is_some_and(|b| value >= b);

    if at_or_below(rule.min) || at_or_above(rule.max) {
        QcStatus::Fail
    } else if at_or_below(rule.warn_below) || at_or_above(rule.warn_above) {
        QcStatus::Warn
    } else {
        QcStatus::Pass
    }
}

/// Evaluate every configured metric, in config order.
///
/// Fails on the first metric with no matching statistic; no partial results
/// are returned.
pub fn evaluate(config: &MetricConfig, stats: &RawStats) -> Result<Vec<MetricResult>> {
    let mut results = Vec::with_capacity(config.len());

    for (metric, rule) in config.iter() {
        let value = stats.get(metric).ok_or_else(|| QcError::MissingStatistic {
            statistic: metric.to_string(),
        })?;
        let status = classify(rule, value);

        if status == QcStatus::Pass {
            debug!(metric, value, "metric passed");
        } else {
            warn!(metric, value, status = %status, "metric outside pass threshold");
        }

        results.push(MetricResult {
            metric: metric.to_string(),
            value,
            status,
            threshold: rule.clone(),
        });
    }

    Ok(results)
}
