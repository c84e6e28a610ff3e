// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct SnapshotRecord {
    pub snapshot_id: i64,
    #[sqlx(rename = "total_effecive_usd_balance")]
    pub total_effective_usd_balance: Option<f64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
pub struct ExchangeRateRecord {
    pub snapshot_id: i64,
    pub home_asset: String,
    pub home_symbol: String,
    pub exchange_rate: f64,
}

#[derive(Debug, FromRow)]
pub struct BalanceRecord {
    pub snapshot_id: i64,
    pub address: String,
    pub home_asset: String,
    pub home_symbol: String,
    pub balance: f64,
    pub effective_balance: f64,
    pub effective_usd_balance: f64,
}
