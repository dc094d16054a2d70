//! Errors that end a QC run.

use crate::id::{ClimbId, Server};

/// Result type for QC operations.
pub type Result<T> = std::result::Result<T, QcError>;

/// Errors that can occur while running QC on a sample.
#[derive(Debug, thiserror::Error)]
pub enum QcError {
    /// Threshold config or connection settings are missing or malformed
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Onyx has no record for the sample
    #[error("sample {climb_id} not found on {server}")]
    SampleNotFound { climb_id: ClimbId, server: Server },

    /// Statistics could not be retrieved
    #[error("failed to collect statistics for {climb_id}: {message}")]
    Collection { climb_id: ClimbId, message: String },

    /// A configured metric has no matching statistic
    #[error("statistic '{statistic}' is missing for configured metric")]
    MissingStatistic { statistic: String },

    /// Onyx refused or could not take the analysis
    #[error("onyx submission failed: {message}{}", format_details(.errors))]
    Submission { message: String, errors: Vec<String> },

    /// Result files could not be written
    #[error("failed to write results: {message}")]
    Output { message: String },
}

impl QcError {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::SampleNotFound { .. } => 3,
            Self::Collection { .. } => 4,
            Self::MissingStatistic { .. } => 5,
            Self::Submission { .. } => 6,
            Self::Output { .. } => 7,
        }
    }
}

fn format_details(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(" ({})", errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_non_zero() {
        let errors = [
            QcError::config("bad"),
            QcError::SampleNotFound {
                climb_id: ClimbId::new("C-1").unwrap(),
                server: Server::Mscape,
            },
            QcError::Collection {
                climb_id: ClimbId::new("C-1").unwrap(),
                message: "timeout".to_string(),
            },
            QcError::MissingStatistic { statistic: "gc_content".to_string() },
            QcError::Submission { message: "rejected".to_string(), errors: Vec::new() },
            QcError::Output { message: "disk full".to_string() },
        ];
        for error in &errors {
            assert_ne!(error.exit_code(), 0, "{}", error);
        }
    }

    #[test]
    fn test_submission_message_lists_server_errors() {
        let error = QcError::Submission {
            message: "analysis rejected".to_string(),
            errors: vec!["result: required".to_string(), "name: too long".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "onyx submission failed: analysis rejected (result: required; name: too long)"
        );
    }

    #[test]
    fn test_missing_statistic_names_statistic() {
        let error = QcError::MissingStatistic { statistic: "gc_content".to_string() };
        assert!(error.to_string().contains("gc_content"));
    }
}
