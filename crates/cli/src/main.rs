//! mscape-sample-qc - QC a sample against pre-defined criteria.
//!
//! Queries Onyx for the sample's classifier calls, evaluates read
//! proportions against the QC thresholds and writes the results as JSON,
//! optionally recording them as an Onyx analysis.

mod pipeline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use sampleqc_core::{ClimbId, QcError, Server, SubmissionMode};
use sampleqc_onyx::OnyxClient;
use sampleqc_quality::load_config;
use sampleqc_storage::JsonResultStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::pipeline::{RunOutcome, RunRequest};

#[derive(Parser, Debug)]
#[command(name = "mscape-sample-qc")]
#[command(about = "Quality check mscape samples against a set of pre-defined criteria", long_about = None)]
#[command(version)]
#[command(group(
    ArgGroup::new("onyx_mode")
        .required(true)
        .args(["no_onyx", "store_onyx", "test_onyx", "prod_onyx"]),
))]
struct Cli {
    /// Sample climb ID
    #[arg(short, long)]
    input: ClimbId,

    /// Path to file with QC criteria (defaults to the bundled thresholds)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder to save QC results to
    #[arg(short, long)]
    output: PathBuf,

    /// Server the sample lives on (mscape or synthscape)
    #[arg(short, long)]
    server: Server,

    /// Only write results to file
    #[arg(long)]
    no_onyx: bool,

    /// Also store results as an onyx analysis object for later upload
    #[arg(long)]
    store_onyx: bool,

    /// Do a test upload to onyx and report validation errors
    #[arg(long)]
    test_onyx: bool,

    /// Upload results to onyx
    #[arg(long)]
    prod_onyx: bool,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn mode(&self) -> SubmissionMode {
        if self.prod_onyx {
            SubmissionMode::ProdOnyx
        } else if self.test_onyx {
            SubmissionMode::TestOnyx
        } else if self.store_onyx {
            SubmissionMode::StoreOnyx
        } else {
            SubmissionMode::NoOnyx
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

async fn run(cli: &Cli) -> sampleqc_core::Result<RunOutcome> {
    // Thresholds are checked before anything touches the network.
    let config = load_config(cli.config.as_deref())?;
    let client = OnyxClient::from_env().map_err(|e| QcError::config(e.to_string()))?;
    let store = JsonResultStore::new(&cli.output).await?;

    let request = RunRequest {
        climb_id: cli.input.clone(),
        server: cli.server,
        config,
        mode: cli.mode(),
    };

    pipeline::run(&request, &client, &client, &store).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(outcome) => {
            info!(
                climb_id = %outcome.record.climb_id,
                result = %outcome.record.result,
                "sample QC complete"
            );
            println!("{}", outcome.record_path.display());
            if let Some(path) = &outcome.analysis_path {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(exit_code = e.exit_code(), "{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mscape-sample-qc").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = parse(&["-i", "C-1A2B3C4D5E", "-o", "out", "-s", "synthscape", "--no-onyx"]).unwrap();
        assert_eq!(cli.input.as_str(), "C-1A2B3C4D5E");
        assert_eq!(cli.server, Server::Synthscape);
        assert_eq!(cli.output, PathBuf::from("out"));
        assert!(cli.config.is_none());
        assert_eq!(cli.mode(), SubmissionMode::NoOnyx);
    }

    #[test]
    fn test_each_mode_flag() {
        for (flag, mode) in [
            ("--no-onyx", SubmissionMode::NoOnyx),
            ("--store-onyx", SubmissionMode::StoreOnyx),
            ("--test-onyx", SubmissionMode::TestOnyx),
            ("--prod-onyx", SubmissionMode::ProdOnyx),
        ] {
            let cli = parse(&["--input", "C-1", "--output", "out", "--server", "mscape", flag]).unwrap();
            assert_eq!(cli.mode(), mode, "{}", flag);
        }
    }

    #[test]
    fn test_mode_is_required() {
        assert!(parse(&["-i", "C-1", "-o", "out", "-s", "mscape"]).is_err());
    }

    #[test]
    fn test_modes_are_exclusive() {
        assert!(parse(&["-i", "C-1", "-o", "out", "-s", "mscape", "--test-onyx", "--prod-onyx"]).is_err());
    }

    #[test]
    fn test_unknown_server_rejected() {
        assert!(parse(&["-i", "C-1", "-o", "out", "-s", "elsewhere", "--no-onyx"]).is_err());
    }

    #[test]
    fn test_config_and_log_file() {
        let cli = parse(&[
            "-i", "C-1", "-o", "out", "-s", "mscape", "-c", "thresholds.yaml",
            "--log-file", "qc.log", "--store-onyx",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("thresholds.yaml")));
        assert_eq!(cli.log_file, Some(PathBuf::from("qc.log")));
    }
}
