// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One cross-chain mapping as published by the bridge registry.
///
/// Registry rows for unrelated networks are not always complete, so everything
/// beyond the identifying fields is optional on the wire.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BridgeMapping {
    pub home_network: String,
    pub foreign_network: String,
    pub home_asset: String,
    pub foreign_asset: String,
    #[serde(default)]
    pub home_asset_decimals: Option<u8>,
    #[serde(default)]
    pub foreign_asset_decimals: Option<u8>,
    #[serde(default)]
    pub home_symbol: Option<String>,
    #[serde(default)]
    pub foreign_symbol: Option<String>,
}

/// A bridged asset that takes part in the current snapshot cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleAsset {
    pub foreign_asset: String,
    pub home_asset: String,
    pub home_asset_decimals: Option<u8>,
    pub foreign_asset_decimals: u8,
    pub home_symbol: String,
    pub foreign_symbol: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HolderRecord {
    pub address: String,
    #[serde(rename = "balance")]
    pub raw_balance: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// Controlled by a private key.
    Key,
    /// Autonomous agent, governed by on-ledger code.
    Aa,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Key => "key",
            AddressType::Aa => "aa",
        }
    }

    pub fn is_programmatic(&self) -> bool {
        matches!(self, AddressType::Aa)
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(AddressType::Key),
            "aa" => Ok(AddressType::Aa),
            other => Err(format!("unknown address type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateRow {
    pub snapshot_id: i64,
    pub home_asset: String,
    pub home_symbol: String,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub snapshot_id: i64,
    pub address: String,
    pub home_asset: String,
    pub home_symbol: String,
    pub balance: f64,
    pub effective_balance: f64,
    pub effective_usd_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveBalance {
    pub balance: f64,
    pub effective_balance: f64,
    pub effective_usd_balance: f64,
}

impl EffectiveBalance {
    /// `balance = raw / 10^decimals`, then scaled by the asset multiplier and its USD price.
    pub fn compute(raw_balance: u64, decimals: u8, multiplier: f64, price: f64) -> Self {
        let balance = raw_balance as f64 / 10f64.powi(i32::from(decimals));
        let effective_balance = balance * multiplier;
        Self {
            balance,
            effective_balance,
            effective_usd_balance: effective_balance * price,
        }
    }
}
