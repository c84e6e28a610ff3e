// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod classifier;
pub mod recorder;
pub mod scheduler;

pub use classifier::AddressClassifier;
pub use recorder::{CycleReport, SnapshotRecorder};
pub use scheduler::{DelayWindow, Scheduler, SnapshotCycle};

use crate::app::config::GlobalSettings;
use crate::common::error::AppError;
use crate::data::db::Database;
use crate::network::bridges::BridgeRegistry;
use crate::network::definitions::HttpDefinitionReader;
use crate::network::fetcher::Fetcher;
use crate::network::holders::HolderEnumerator;
use crate::network::price_feed::PriceFeed;

/// Wires the HTTP collaborators described by `settings` around `db`.
pub fn build_recorder(
    settings: &GlobalSettings,
    db: Database,
) -> Result<SnapshotRecorder<HttpDefinitionReader>, AppError> {
    let fetcher = Fetcher::new(settings.http_timeout(), settings.retry_policy())?;

    let bridges = BridgeRegistry::new(
        fetcher.clone(),
        settings.bridge_registry_url(),
        settings.source_network.clone(),
        settings.destination_network.clone(),
    );
    let prices = PriceFeed::new(
        fetcher.clone(),
        settings.price_oracle_url.clone(),
        settings.native_coin_id.clone(),
        settings.price_platform.clone(),
        settings.coingecko_api_key.as_deref(),
    )?;
    let holders = HolderEnumerator::new(fetcher.clone(), settings.explorer_url());
    let reader = HttpDefinitionReader::new(fetcher, settings.ledger_api_url()?);

    tracing::info!(
        target: "config",
        source = %settings.source_network,
        destination = %settings.destination_network,
        bridges = %settings.bridge_registry_url(),
        explorer = %settings.explorer_url(),
        multipliers = settings.multipliers.len(),
        "Snapshot pipeline configured"
    );

    Ok(SnapshotRecorder::new(
        db,
        bridges,
        prices,
        holders,
        AddressClassifier::new(reader),
        settings.multipliers.clone(),
    ))
}
