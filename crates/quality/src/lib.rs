//! Sample QC evaluation.
//!
//! Threshold config loading, read-proportion statistics, metric evaluation
//! and result assembly.

#![warn(missing_docs)]

pub mod config;
pub mod proportions;
pub mod engine;
pub mod report;

pub use config::{load_config, parse_config, default_config, DEFAULT_THRESHOLDS};
pub use proportions::read_proportions;
pub use engine::{classify, evaluate};
pub use report::{assemble, check_spike, headline, PASSED_HEADLINE, WARNING_HEADLINE};
