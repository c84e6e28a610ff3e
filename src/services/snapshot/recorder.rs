// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::data::db::{Database, SnapshotTx};
use crate::domain::model::{BalanceRow, EffectiveBalance, EligibleAsset, ExchangeRateRow};
use crate::network::bridges::BridgeRegistry;
use crate::network::definitions::DefinitionReader;
use crate::network::holders::HolderEnumerator;
use crate::network::price_feed::PriceFeed;
use crate::services::snapshot::classifier::AddressClassifier;
use crate::services::snapshot::scheduler::SnapshotCycle;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Summary of one committed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub snapshot_id: i64,
    pub assets: usize,
    pub exchange_rates: usize,
    pub balances: usize,
    pub excluded_programmatic: usize,
    pub total_effective_usd_balance: f64,
}

pub struct SnapshotRecorder<R> {
    db: Database,
    bridges: BridgeRegistry,
    prices: PriceFeed,
    holders: HolderEnumerator,
    classifier: AddressClassifier<R>,
    // Keys are lowercased home assets.
    multipliers: HashMap<String, f64>,
}

impl<R: DefinitionReader> SnapshotRecorder<R> {
    pub fn new(
        db: Database,
        bridges: BridgeRegistry,
        prices: PriceFeed,
        holders: HolderEnumerator,
        classifier: AddressClassifier<R>,
        multipliers: HashMap<String, f64>,
    ) -> Self {
        let multipliers = multipliers
            .into_iter()
            .map(|(asset, m)| (asset.to_lowercase(), m))
            .collect();
        Self {
            db,
            bridges,
            prices,
            holders,
            classifier,
            multipliers,
        }
    }

    pub fn classifier(&self) -> &AddressClassifier<R> {
        &self.classifier
    }

    pub fn multiplier(&self, home_asset: &str) -> f64 {
        self.multipliers
            .get(&home_asset.to_lowercase())
            .copied()
            .unwrap_or(1.0)
    }

    /// Runs one full cycle. Either every row of the snapshot is committed or none is.
    pub async fn record_snapshot(&self) -> Result<CycleReport, AppError> {
        tracing::info!(target: "snapshot", "Starting snapshot cycle");
        let started = Instant::now();

        let assets = self.bridges.list_eligible_assets().await?;
        let mut tx = self.db.begin().await?;

        match self.fill_snapshot(&mut tx, &assets).await {
            Ok(report) => {
                tx.commit().await?;
                tracing::info!(
                    target: "snapshot",
                    snapshot_id = report.snapshot_id,
                    assets = report.assets,
                    balances = report.balances,
                    excluded_programmatic = report.excluded_programmatic,
                    total_effective_usd_balance = report.total_effective_usd_balance,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Snapshot committed"
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(target: "snapshot", error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn fill_snapshot(
        &self,
        tx: &mut SnapshotTx,
        assets: &BTreeMap<String, EligibleAsset>,
    ) -> Result<CycleReport, AppError> {
        let snapshot_id = tx.insert_snapshot().await?;
        tracing::debug!(target: "snapshot", snapshot_id, assets = assets.len(), "Snapshot opened");

        let mut exchange_rates = Vec::with_capacity(assets.len());
        let mut balances = Vec::new();
        let mut excluded_programmatic = 0usize;
        let mut total_effective_usd_balance = 0.0f64;

        for (foreign_asset, asset) in assets {
            let multiplier = self.multiplier(&asset.home_asset);
            let price = self.prices.get_usd_price(&asset.home_asset).await?;
            exchange_rates.push(ExchangeRateRow {
                snapshot_id,
                home_asset: asset.home_asset.clone(),
                home_symbol: asset.home_symbol.clone(),
                exchange_rate: price,
            });

            let holders = self.holders.list_holders(foreign_asset).await?;
            for holder in holders {
                let address_type = self.classifier.classify(tx.conn(), &holder.address).await?;
                if address_type.is_programmatic() {
                    tracing::debug!(target: "snapshot", address = %holder.address, "Skipping autonomous agent");
                    excluded_programmatic += 1;
                    continue;
                }
                let eb = EffectiveBalance::compute(
                    holder.raw_balance,
                    asset.foreign_asset_decimals,
                    multiplier,
                    price,
                );
                total_effective_usd_balance += eb.effective_usd_balance;
                balances.push(BalanceRow {
                    snapshot_id,
                    address: holder.address,
                    home_asset: asset.home_asset.clone(),
                    home_symbol: asset.home_symbol.clone(),
                    balance: eb.balance,
                    effective_balance: eb.effective_balance,
                    effective_usd_balance: eb.effective_usd_balance,
                });
            }
        }

        if !exchange_rates.is_empty() {
            tx.insert_exchange_rates(&exchange_rates).await?;
        }
        if !balances.is_empty() {
            tx.insert_balances(&balances).await?;
        }
        tx.set_snapshot_total(snapshot_id, total_effective_usd_balance)
            .await?;

        Ok(CycleReport {
            snapshot_id,
            assets: assets.len(),
            exchange_rates: exchange_rates.len(),
            balances: balances.len(),
            excluded_programmatic,
            total_effective_usd_balance,
        })
    }
}

impl<R: DefinitionReader> SnapshotCycle for SnapshotRecorder<R> {
    async fn run_cycle(&self) -> Result<CycleReport, AppError> {
        self.record_snapshot().await
    }
}
