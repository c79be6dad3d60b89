use console::style;

use tracksync::sync::backfill;

use crate::config::Config;

use super::shared::{build_client, build_sync_options};

pub(crate) async fn handle_backfill(
    days: Option<u32>,
    chunk_days: Option<u32>,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let days = days.unwrap_or(config.backfill.days);
    let chunk_days = chunk_days.unwrap_or(config.backfill.chunk_days);

    let db = tracksync::connect_and_migrate(database_url).await?;
    let client = build_client(config)?;
    let options = build_sync_options(config, None);

    let report = backfill(&client, &db, &options, days, chunk_days).await;

    println!(
        "{} {} conversions across {} chunks ({} failed)",
        style("Backfill complete:").green().bold(),
        report.conversions,
        report.chunks_run + report.chunks_failed,
        report.chunks_failed,
    );

    if report.chunks_run == 0 && report.chunks_failed > 0 {
        return Err("all backfill chunks failed".into());
    }
    Ok(())
}
