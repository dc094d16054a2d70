//! Assembly of the per-run QC record.

use sampleqc_core::{AnalysisRecord, ClimbId, MetricResult, QcStatus, RawStats, Server, Time};

/// Headline when every check passed.
pub const PASSED_HEADLINE: &str = "QC results passed thresholds";

/// Headline when any check warned or failed.
pub const WARNING_HEADLINE: &str = "Warning: Check QC results before use";

/// Statistic the spike-in presence check reads.
const SPIKE_IN_COUNT: &str = "count_descendants_spike_in";

/// Spike-in presence check: fails when no read was assigned to the spike-in.
///
/// Returns `None` when the statistic was not collected.
pub fn check_spike(stats: &RawStats) -> Option<QcStatus> {
    stats.get(SPIKE_IN_COUNT).map(|count| {
        if count > 0.0 {
            QcStatus::Pass
        } else {
            QcStatus::Fail
        }
    })
}

/// Headline result for a set of metric results and the spike-in check.
pub fn headline(metrics: &[MetricResult], spike_detected: Option<QcStatus>) -> &'static str {
    let all_passed = metrics.iter().all(|m| m.status == QcStatus::Pass)
        && spike_detected.map_or(true, |s| s == QcStatus::Pass);
    if all_passed {
        PASSED_HEADLINE
    } else {
        WARNING_HEADLINE
    }
}

/// Build the QC record for a run. Pure: the timestamp is supplied by the caller.
pub fn assemble(
    climb_id: ClimbId,
    server: Server,
    metrics: Vec<MetricResult>,
    statistics: RawStats,
    run_timestamp: Time,
) -> AnalysisRecord {
    let spike_detected = check_spike(&statistics);
    let result = headline(&metrics, spike_detected).to_string();

    AnalysisRecord {
        climb_id,
        server,
        result,
        metrics,
        spike_detected,
        statistics,
        run_timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sampleqc_core::{DirectionalRule, ThresholdRule};

    fn result(metric: &str, status: QcStatus) -> MetricResult {
        MetricResult {
            metric: metric.to_string(),
            value: 1.0,
            status,
            threshold: ThresholdRule::Directional(DirectionalRule { pass: 1.0, fail: 0.0 }),
        }
    }

    fn timestamp() -> Time {
        chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_check_spike() {
        let detected: RawStats = [("count_descendants_spike_in", 12.0)].into_iter().collect();
        let absent: RawStats = [("count_descendants_spike_in", 0.0)].into_iter().collect();

        assert_eq!(check_spike(&detected), Some(QcStatus::Pass));
        assert_eq!(check_spike(&absent), Some(QcStatus::Fail));
        assert_eq!(check_spike(&RawStats::new()), None);
    }

    #[test]
    fn test_headline() {
        let passing = vec![result("a", QcStatus::Pass), result("b", QcStatus::Pass)];
        assert_eq!(headline(&passing, Some(QcStatus::Pass)), PASSED_HEADLINE);
        assert_eq!(headline(&passing, None), PASSED_HEADLINE);
        assert_eq!(headline(&passing, Some(QcStatus::Fail)), WARNING_HEADLINE);

        let warning = vec![result("a", QcStatus::Pass), result("b", QcStatus::Warn)];
        assert_eq!(headline(&warning, Some(QcStatus::Pass)), WARNING_HEADLINE);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let id = ClimbId::new("C-1A2B3C4D5E").unwrap();
        let metrics = vec![result("total_reads", QcStatus::Pass)];
        let stats: RawStats = [("total_reads", 1.0), ("count_descendants_spike_in", 0.0)].into_iter().collect();

        let first = assemble(id.clone(), Server::Mscape, metrics.clone(), stats.clone(), timestamp());
        let second = assemble(id, Server::Mscape, metrics, stats, timestamp());

        assert_eq!(first, second);
        assert_eq!(first.spike_detected, Some(QcStatus::Fail));
        assert_eq!(first.result, WARNING_HEADLINE);
        assert!(!first.all_passed());
    }

    #[test]
    fn test_record_json_shape() {
        let record = assemble(
            ClimbId::new("C-1A2B3C4D5E").unwrap(),
            Server::Synthscape,
            vec![result("total_reads", QcStatus::Pass)],
            [("total_reads", 1.0)].into_iter().collect(),
            timestamp(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["climb_id"], "C-1A2B3C4D5E");
        assert_eq!(json["server"], "synthscape");
        assert_eq!(json["metrics"][0]["metric"], "total_reads");
        assert_eq!(json["metrics"][0]["status"], "Pass");
        assert_eq!(json["run_timestamp"], "2024-05-01T12:00:00Z");
        assert!(json.get("spike_detected").is_none());
    }
}
