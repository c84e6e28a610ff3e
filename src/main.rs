// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use clap::Parser;
use holder_snapshot::app::config::GlobalSettings;
use holder_snapshot::app::logging::setup_logging;
use holder_snapshot::domain::error::AppError;
use holder_snapshot::infrastructure::data::db::Database;
use holder_snapshot::services::snapshot::{Scheduler, build_recorder};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(author, version, about = "holder snapshot recorder")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Record a single snapshot and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Debug logging (overrides config/env)
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    let level = if cli.debug || settings.debug { "debug" } else { "info" };
    setup_logging(level, settings.log_json);

    let db = Database::new(&settings.database_url()).await?;
    let recorder = build_recorder(&settings, db)?;

    if cli.once {
        let report = recorder.record_snapshot().await?;
        tracing::info!(
            target: "snapshot",
            snapshot_id = report.snapshot_id,
            total_effective_usd_balance = report.total_effective_usd_balance,
            "Single snapshot recorded"
        );
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "snapshot", "Ctrl-C received; finishing current cycle");
            signal_token.cancel();
        }
    });

    let scheduler = Scheduler::new(
        recorder,
        settings.success_delay(),
        settings.failure_delay(),
        shutdown,
    );
    scheduler.run().await;
    Ok(())
}
