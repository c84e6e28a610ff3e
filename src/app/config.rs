// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::retry::RetryPolicy;
use crate::domain::constants;
use crate::domain::error::AppError;
use crate::services::snapshot::scheduler::DelayWindow;
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub log_json: bool,
    #[serde(default = "default_false")]
    pub testnet: bool,
    pub database_url: Option<String>,

    // Bridge pair
    #[serde(default = "default_source_network")]
    pub source_network: String,
    #[serde(default = "default_destination_network")]
    pub destination_network: String,

    // Upstream services
    pub bridge_registry_url: Option<String>,
    pub explorer_url: Option<String>,
    #[serde(default = "default_price_oracle_url")]
    pub price_oracle_url: String,
    #[serde(default = "default_native_coin_id")]
    pub native_coin_id: String,
    #[serde(default = "default_price_platform")]
    pub price_platform: String,
    pub coingecko_api_key: Option<String>,
    pub ledger_api_url: Option<String>,

    /// home asset -> multiplier, for assets that generate double or triple TVL
    #[serde(default, deserialize_with = "deserialize_multipliers")]
    pub multipliers: HashMap<String, f64>,

    // HTTP
    #[serde(default = "default_fetch_max_retries")]
    pub fetch_max_retries: u32,
    #[serde(default = "default_fetch_retry_delay_secs")]
    pub fetch_retry_delay_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    // Scheduling (minutes)
    #[serde(default = "default_success_delay_min")]
    pub success_delay_min_minutes: u64,
    #[serde(default = "default_success_delay_max")]
    pub success_delay_max_minutes: u64,
    #[serde(default = "default_failure_delay_min")]
    pub failure_delay_min_minutes: u64,
    #[serde(default = "default_failure_delay_max")]
    pub failure_delay_max_minutes: u64,
}

// Defaults
fn default_false() -> bool {
    false
}
fn default_source_network() -> String {
    constants::DEFAULT_SOURCE_NETWORK.to_string()
}
fn default_destination_network() -> String {
    constants::DEFAULT_DESTINATION_NETWORK.to_string()
}
fn default_price_oracle_url() -> String {
    constants::COINGECKO_API.to_string()
}
fn default_native_coin_id() -> String {
    "kava".to_string()
}
fn default_price_platform() -> String {
    "kava".to_string()
}
fn default_fetch_max_retries() -> u32 {
    constants::FETCH_MAX_RETRIES
}
fn default_fetch_retry_delay_secs() -> u64 {
    constants::FETCH_RETRY_DELAY_SECS
}
fn default_http_timeout_secs() -> u64 {
    constants::HTTP_TIMEOUT_SECS
}
fn default_success_delay_min() -> u64 {
    constants::SUCCESS_DELAY_MIN_MINUTES
}
fn default_success_delay_max() -> u64 {
    constants::SUCCESS_DELAY_MAX_MINUTES
}
fn default_failure_delay_min() -> u64 {
    constants::FAILURE_DELAY_MIN_MINUTES
}
fn default_failure_delay_max() -> u64 {
    constants::FAILURE_DELAY_MAX_MINUTES
}

/// Accepts a table (config file) or a JSON object string (`MULTIPLIERS` env var).
fn deserialize_multipliers<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMultipliers {
        Map(HashMap<String, f64>),
        Json(String),
    }

    let map = match RawMultipliers::deserialize(deserializer)? {
        RawMultipliers::Map(map) => map,
        RawMultipliers::Json(raw) if raw.trim().is_empty() => HashMap::new(),
        RawMultipliers::Json(raw) => serde_json::from_str(&raw).map_err(|e| {
            serde::de::Error::custom(format!("multipliers must be a JSON object: {e}"))
        })?,
    };
    Ok(map
        .into_iter()
        .map(|(asset, multiplier)| (asset.trim().to_lowercase(), multiplier))
        .collect())
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let settings: GlobalSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("bridge_registry_url", self.bridge_registry_url()),
            ("explorer_url", self.explorer_url()),
            ("price_oracle_url", self.price_oracle_url.clone()),
        ] {
            parse_base_url(field, &value)?;
        }
        if let Some(ledger) = &self.ledger_api_url {
            parse_base_url("ledger_api_url", ledger)?;
        }
        if self.source_network.trim().is_empty() || self.destination_network.trim().is_empty() {
            return Err(AppError::Config(
                "source_network and destination_network must be set".into(),
            ));
        }
        if self.success_delay_min_minutes > self.success_delay_max_minutes {
            return Err(AppError::Config(format!(
                "success delay window is inverted: {} > {}",
                self.success_delay_min_minutes, self.success_delay_max_minutes
            )));
        }
        if self.failure_delay_min_minutes > self.failure_delay_max_minutes {
            return Err(AppError::Config(format!(
                "failure delay window is inverted: {} > {}",
                self.failure_delay_min_minutes, self.failure_delay_max_minutes
            )));
        }
        if let Some((asset, m)) = self
            .multipliers
            .iter()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(AppError::Config(format!(
                "multiplier for {asset} must be finite and non-negative, got {m}"
            )));
        }
        Ok(())
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "sqlite://snapshots.db".to_string())
    }

    pub fn bridge_registry_url(&self) -> String {
        self.bridge_registry_url.clone().unwrap_or_else(|| {
            if self.testnet {
                constants::BRIDGE_REGISTRY_TESTNET.to_string()
            } else {
                constants::BRIDGE_REGISTRY_MAINNET.to_string()
            }
        })
    }

    pub fn explorer_url(&self) -> String {
        self.explorer_url.clone().unwrap_or_else(|| {
            if self.testnet {
                constants::EXPLORER_TESTNET.to_string()
            } else {
                constants::EXPLORER_MAINNET.to_string()
            }
        })
    }

    pub fn ledger_api_url(&self) -> Result<String, AppError> {
        self.ledger_api_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Config("LEDGER_API_URL is missing".to_string()))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.fetch_max_retries,
            Duration::from_secs(self.fetch_retry_delay_secs),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn success_delay(&self) -> DelayWindow {
        DelayWindow::minutes(self.success_delay_min_minutes, self.success_delay_max_minutes)
    }

    pub fn failure_delay(&self) -> DelayWindow {
        DelayWindow::minutes(self.failure_delay_min_minutes, self.failure_delay_max_minutes)
    }
}

pub(crate) fn parse_base_url(field: &str, raw: &str) -> Result<Url, AppError> {
    Url::parse(raw.trim()).map_err(|e| AppError::Config(format!("{field} is not a valid URL: {e}")))
}
