//! Threshold config loading.
//!
//! Configs are YAML documents with a top-level `sample_thresholds` mapping
//! from metric name to threshold rule. Metric order in the file is the order
//! results are reported in.

use sampleqc_core::{MetricConfig, QcError, Result, ThresholdRule};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Bundled default thresholds.
pub const DEFAULT_THRESHOLDS: &str = include_str!("../config/qc_thresholds.yaml");

#[derive(Debug, Deserialize)]
struct ThresholdsFile {
    sample_thresholds: MetricConfig,
}

/// Load thresholds from `path`, or the bundled defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<MetricConfig> {
    let Some(path) = path else {
        info!("No config file specified, using bundled default thresholds");
        return default_config();
    };

    info!(path = %path.display(), "Reading QC thresholds from file");
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            QcError::config(format!("config file not found: {}", path.display()))
        } else {
            QcError::config(format!("failed to read {}: {}", path.display(), e))
        }
    })?;

    parse_config(&content)
        .map_err(|e| QcError::config(format!("{} ({})", message_of(&e), path.display())))
}

/// The bundled default thresholds.
pub fn default_config() -> Result<MetricConfig> {
    parse_config(DEFAULT_THRESHOLDS)
}

/// Parse and validate a threshold document.
pub fn parse_config(content: &str) -> Result<MetricConfig> {
    let file: ThresholdsFile = serde_yaml::from_str(content)
        .map_err(|e| QcError::config(format!("malformed threshold config: {}", e)))?;
    let config = file.sample_thresholds;

    if config.is_empty() {
        return Err(QcError::config("sample_thresholds declares no metrics"));
    }
    for (name, rule) in config.iter() {
        validate_rule(name, rule)?;
    }

    debug!(metrics = config.len(), "Loaded threshold config");
    Ok(config)
}

fn validate_rule(name: &str, rule: &ThresholdRule) -> Result<()> {
    match rule {
        ThresholdRule::Directional(r) => {
            if !r.pass.is_finite() || !r.fail.is_finite() {
                return Err(QcError::config(format!("metric '{}': pass and fail must be finite numbers", name)));
            }
        }
        ThresholdRule::Range(r) => {
            if r.is_empty() {
                return Err(QcError::config(format!(
                    "metric '{}' needs pass/fail or at least one of min, max, warn_below, warn_above",
                    name
                )));
            }
            let bounds = [r.min, r.max, r.warn_below, r.warn_above];
            if bounds.iter().flatten().any(|v| !v.is_finite()) {
                return Err(QcError::config(format!("metric '{}': bounds must be finite numbers", name)));
            }
            if let (Some(min), Some(max)) = (r.min, r.max) {
                if min >= max {
                    return Err(QcError::config(format!("metric '{}': min ({}) must be below max ({})", name, min, max)));
                }
            }
        }
    }
    Ok(())
}

fn message_of(err: &QcError) -> String {
    match err {
        QcError::Config { message } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampleqc_core::{DirectionalRule, RangeRule};
    use std::io::Write;

    fn directional(pass: f64, fail: f64) -> ThresholdRule {
        ThresholdRule::Directional(DirectionalRule { pass, fail })
    }

    #[test]
    fn test_default_config() {
        let config = default_config().unwrap();
        let names: Vec<_> = config.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["total_reads", "percentage_spike_in", "percentage_host", "percentage_unclassified", "percentage_genus"]
        );
        assert_eq!(config.get("total_reads"), Some(&directional(10000.0, 2000.0)));
        assert_eq!(config.get("percentage_genus"), Some(&directional(80.0, 60.0)));
    }

    #[test]
    fn test_load_config_without_path_uses_default() {
        let config = load_config(None).unwrap();
        assert_eq!(config, default_config().unwrap());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "sample_thresholds:\n  gc_content:\n    min: 30\n    max: 70\n    warn_below: 35\n  total_reads:\n    pass: 5000\n    fail: 1000"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(
            config.get("gc_content"),
            Some(&ThresholdRule::Range(RangeRule {
                min: Some(30.0),
                max: Some(70.0),
                warn_below: Some(35.0),
                warn_above: None,
            }))
        );
        assert_eq!(config.iter().next().unwrap().0, "gc_content");
    }

    #[test]
    fn test_json_config_is_accepted() {
        let config = parse_config(r#"{"sample_thresholds": {"percentage_host": {"pass": 5, "fail": 10}}}"#).unwrap();
        assert_eq!(config.get("percentage_host"), Some(&directional(5.0, 10.0)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/qc_thresholds.yaml"))).unwrap_err();
        assert!(matches!(err, QcError::Config { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = parse_config("sample_thresholds: [unclosed").unwrap_err();
        assert!(matches!(err, QcError::Config { .. }));
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let err = parse_config("thresholds:\n  total_reads:\n    pass: 1\n    fail: 0\n").unwrap_err();
        assert!(err.to_string().contains("sample_thresholds"));
    }

    #[test]
    fn test_empty_section_is_config_error() {
        assert!(parse_config("sample_thresholds: {}\n").is_err());
    }

    #[test]
    fn test_rule_without_fields_is_config_error() {
        let err = parse_config("sample_thresholds:\n  gc_content: {}\n").unwrap_err();
        assert!(err.to_string().contains("gc_content"));
    }

    #[test]
    fn test_partial_pass_fail_is_config_error() {
        assert!(parse_config("sample_thresholds:\n  total_reads:\n    pass: 10\n").is_err());
    }

    #[test]
    fn test_non_numeric_threshold_is_config_error() {
        assert!(parse_config("sample_thresholds:\n  total_reads:\n    pass: lots\n    fail: 10\n").is_err());
    }

    #[test]
    fn test_inverted_range_is_config_error() {
        let err = parse_config("sample_thresholds:\n  gc_content:\n    min: 70\n    max: 30\n").unwrap_err();
        assert!(err.to_string().contains("min"));
    }
}
