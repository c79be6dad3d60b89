use std::time::Duration as StdDuration;

use console::style;

use tracksync::sync::{CycleReport, run_cycle};

use crate::RunOptions;
use crate::config::Config;
use crate::shutdown;

use super::shared::{build_client, build_sync_options};

pub(crate) async fn handle_run(
    opts: RunOptions,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = tracksync::connect_and_migrate(database_url).await?;
    let client = build_client(config)?;
    let options = build_sync_options(config, Some(&opts));

    if opts.once {
        // One cycle; a failure propagates as a non-zero exit for the
        // supervising scheduler.
        let report = run_cycle(&client, &db, &options).await?;
        print_summary(&report);
        return Ok(());
    }

    let interval_minutes = opts
        .interval_minutes
        .unwrap_or(config.sync.interval_minutes)
        .max(1);
    let interval = StdDuration::from_secs(interval_minutes * 60);
    tracing::info!(interval_minutes, "starting continuous sync");

    while !shutdown::is_shutdown_requested() {
        // A failed cycle is not retried here: cursors and idempotent
        // upserts make the next scheduled cycle a safe retry.
        match run_cycle(&client, &db, &options).await {
            Ok(report) => {
                tracing::info!(
                    visits = report.visits,
                    clicks = report.clicks,
                    conversions = report.conversions,
                    "cycle finished"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "sync cycle failed; retrying at next interval");
            }
        }

        if shutdown::sleep_interruptible(interval).await {
            break;
        }
    }

    tracing::info!("continuous sync stopped");
    Ok(())
}

fn print_summary(report: &CycleReport) {
    println!(
        "{} visits={} clicks={} conversions={}",
        style("Sync complete:").green().bold(),
        report.visits,
        report.clicks,
        report.conversions,
    );
    if let Some(retention) = &report.retention
        && retention.total() > 0
    {
        println!(
            "Retention cleanup removed {} rows ({} visits, {} clicks, {} conversions)",
            retention.total(),
            retention.visits_deleted,
            retention.clicks_deleted,
            retention.conversions_deleted,
        );
    }
}
