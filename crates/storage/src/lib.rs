//! Result file storage for sample QC.
//!
//! Writes the per-run QC record and the Onyx analysis object as JSON files
//! in the run's output directory.

#![warn(missing_docs)]

pub mod error;
pub mod json_storage;

pub use error::{StoreError, Result};
pub use json_storage::JsonResultStore;
