//! Sample and server identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a sample submitted to CLIMB (e.g. `C-1A2B3C4D5E`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClimbId(String);

impl ClimbId {
    /// Create a climb ID, rejecting values that cannot name a file or URL segment.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("climb ID must not be empty".to_string());
        }
        // Separators and URL delimiters would change the record path.
        if trimmed.contains(['/', '\\', '?', '#', '%']) || trimmed.chars().any(char::is_whitespace) {
            return Err(format!("invalid climb ID '{}'", id));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClimbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ClimbId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Onyx project the sample lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    /// Production metagenomics project
    Mscape,
    /// Synthetic data project
    Synthscape,
}

impl Server {
    /// Project code as used in Onyx URLs and record fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Server::Mscape => "mscape",
            Server::Synthscape => "synthscape",
        }
    }
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Server {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mscape" => Ok(Server::Mscape),
            "synthscape" => Ok(Server::Synthscape),
            other => Err(format!("unknown server '{}', expected mscape or synthscape", other)),
        }
    }
}
