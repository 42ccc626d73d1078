//! Award floor scan runner.
//!
//! Loads the scan configuration, runs both passes for every route and writes
//! the CSV report.
//!
//! # Usage
//!
//! ```bash
//! # Use scan.toml from the current, backend/ or parent directory
//! cargo run --bin award-scan
//!
//! # Explicit configuration file
//! cargo run --bin award-scan -- path/to/scan.toml
//!
//! # Replay captured calendar pages
//! FETCHER_TYPE=snapshot SNAPSHOT_DIR=captures cargo run --bin award-scan
//! ```
//!
//! # Environment Variables
//!
//! - `AWARD_SCAN_CONFIG`: Configuration file (overridden by the first argument)
//! - `AWARD_SCAN_OUTPUT`: Report path (default: `output.path`, or `awards_<HUB>.csv`)
//! - `FETCHER_TYPE`: `local` | `snapshot`
//! - `SNAPSHOT_DIR`: Snapshot directory for the snapshot fetcher
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use award_floor::config::ScanConfig;
use award_floor::fetcher::FetcherFactory;
use award_floor::services::{run_scan, ScanTracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting award floor scan");

    let config = ScanConfig::load_from(env::args().nth(1).as_deref())
        .context("loading scan configuration")?;
    let plan = config
        .into_plan()
        .context("validating scan configuration")?;
    info!(
        "Configuration loaded: hub {}, {} routes, {} months",
        plan.hub(),
        plan.routes.len(),
        plan.window().len()
    );

    let fetcher = FetcherFactory::create(&plan.fetcher).context("creating page fetcher")?;
    info!(
        "Using {} fetcher ({} concurrent, {:?} pause)",
        fetcher.name(),
        plan.fetcher.max_concurrent_fetches,
        plan.fetcher.pause
    );

    let tracker = ScanTracker::new();
    let outcome = run_scan(fetcher, &plan, &tracker).await;

    outcome
        .report
        .write_csv(&plan.output_path)
        .with_context(|| format!("writing report to {}", plan.output_path.display()))?;
    info!(
        "Report written to {} ({} rows)",
        plan.output_path.display(),
        outcome.report.rows.len()
    );

    if !outcome.issues.is_empty() {
        warn!(
            "{} calendar pages could not be fetched and were left blank",
            outcome.issues.len()
        );
        for issue in &outcome.issues {
            warn!(
                "  [{}] {} {} {}: {}",
                issue.pass, issue.route, issue.direction, issue.month, issue.kind
            );
        }
    }

    let with_inventory = outcome
        .summaries
        .iter()
        .filter(|s| s.outbound.has_inventory() || s.inbound.has_inventory())
        .count();
    info!(
        "{} of {} routes have award inventory within their cap",
        with_inventory,
        outcome.summaries.len()
    );

    Ok(())
}
