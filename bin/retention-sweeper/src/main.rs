mod logging;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use config::Config;
use logging::init_logging;
use sweeper::SweepError;
use tracing::{error, info};
use types::PurgeSummary;

mod app_storage;
use app_storage::open_storage;

const START_MESSAGE: &str = "Init: Running a scheduled database clean up job";

const ENV_HELP: &str = "\
Configuration is read from the environment:
  DB_HOST               MongoDB host
  DB_PORT               MongoDB port
  MONGO_DBNAME          database to clean, also used as the authentication source
  DB_USER               user name
  DB_PASSWORD           password
  MONGO_RETENTION_DAYS  days of data to keep (fractions are dropped)

Logging is controlled with RUST_LOG (default: info) and LOG_FORMAT=json.";

/// Deletes ledger documents (transactions, blocks, contracts) older than the
/// retention period from a MongoDB database
#[derive(Debug, Parser)]
#[clap(name = "retention-sweeper", author, version, about, after_help = ENV_HELP)]
pub(crate) struct Args {}

/// Maps the outcome of a run to the process exit status and the line to
/// print on stdout, if any.
fn report(result: Result<PurgeSummary, SweepError>) -> (u8, Option<String>) {
    match result {
        Ok(summary) => {
            info!(
                summary = %serde_json::to_string(&summary).unwrap_or_default(),
                "Clean up finished, removed {} documents from {} collections",
                summary.total_deleted(),
                summary.collections.len()
            );
            (0, None)
        }
        Err(e) => {
            error!(kind = ?e.kind(), "Clean up failed: {}", e);
            (1, Some(format!("Error: {e}")))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _args = Args::parse();
    init_logging();

    info!("{}", START_MESSAGE);
    let result = sweeper::run_job(Config::from_env, open_storage, Utc::now()).await;
    let (status, line) = report(result);
    if let Some(line) = line {
        println!("{line}");
    }
    ExitCode::from(status)
}
