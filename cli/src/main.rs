//! Batch quote-request submission from the command line.
//!
//! ```text
//! quotient <run-key> <input.csv> [report.json]
//! ```
//!
//! The run key is the external request/RFQ number; it keys the run lock, so
//! the same batch cannot be submitted twice concurrently. Credentials come
//! from `QUOTIENT_ACCOUNT` / `QUOTIENT_USERNAME` / `QUOTIENT_PASSWORD`.

mod input;
mod output;

use anyhow::{bail, Context, Result};
use quotient_batch::{BatchError, BatchOrchestrator};
use quotient_core::{AppConfig, RunKey};
use quotient_marketplace::{BrowserMarketplace, NoPricing};
use quotient_selection::SelectionPlanner;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("Usage: quotient <run-key> <input.csv> [report.json]");
    eprintln!("Example: quotient 1008627 rfq_1008627.csv");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        usage();
    }

    let run_key = RunKey::new(args[0].as_str()).context("invalid run key")?;
    let input_path = PathBuf::from(&args[1]);
    let report_path = args
        .get(2)
        .map_or_else(|| default_report_path(&run_key), PathBuf::from);

    let config = AppConfig::load_with_env().context("cannot load configuration")?;
    config.validate().context("invalid configuration")?;
    if !config.marketplace.has_credentials() {
        bail!(
            "marketplace credentials missing; set QUOTIENT_ACCOUNT, \
             QUOTIENT_USERNAME and QUOTIENT_PASSWORD"
        );
    }

    let requests = input::read_part_requests(&input_path)?;
    tracing::info!(
        run_key = %run_key,
        parts = requests.len(),
        input = %input_path.display(),
        "batch loaded"
    );
    for request in &requests {
        tracing::debug!(
            request_id = %request.request_id,
            part = %request.part_number,
            quantity = request.quantity,
            "line"
        );
    }

    let marketplace = Arc::new(BrowserMarketplace::new(
        config.marketplace.clone(),
        config.browser.clone(),
    ));
    let orchestrator = BatchOrchestrator::new(
        marketplace,
        Arc::new(NoPricing),
        SelectionPlanner::from_settings(&config.selection),
        config.batch.clone(),
        config.marketplace.europe_comment.clone(),
        config.lock_dir().context("cannot resolve lock directory")?,
    );

    let report = match orchestrator.run(&run_key, requests).await {
        Ok(report) => report,
        Err(BatchError::Lock(e)) => {
            bail!("{e}\nAnother run is active for this batch; a run whose owner has exited is reclaimed automatically.")
        }
        Err(e) => return Err(e).context("batch run failed"),
    };

    output::write_report(&report_path, &report)?;
    output::print_summary(&report);
    println!("Report: {}", report_path.display());

    Ok(())
}

fn default_report_path(run_key: &RunKey) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S");
    PathBuf::from(format!("RFQ_{run_key}")).join(format!("results_{stamp}.json"))
}
