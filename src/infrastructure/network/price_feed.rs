// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::domain::constants::is_native_coin;
use crate::network::fetcher::Fetcher;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
struct CoinResponse {
    #[serde(default)]
    market_data: Option<MarketData>,
}

#[derive(Deserialize, Debug, Default)]
struct MarketData {
    #[serde(default)]
    current_price: Option<CurrentPrice>,
}

#[derive(Deserialize, Debug, Default)]
struct CurrentPrice {
    #[serde(default)]
    usd: Option<f64>,
}

/// USD spot prices from a CoinGecko-style `coins` API.
#[derive(Clone)]
pub struct PriceFeed {
    fetcher: Fetcher,
    base_url: String,
    native_coin_id: String,
    platform: String,
    headers: HeaderMap,
}

impl PriceFeed {
    pub fn new(
        fetcher: Fetcher,
        base_url: impl Into<String>,
        native_coin_id: impl Into<String>,
        platform: impl Into<String>,
        api_key: Option<&str>,
    ) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| AppError::Config(format!("Invalid CoinGecko API key: {e}")))?;
            headers.insert("x-cg-pro-api-key", value);
        }
        Ok(Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            native_coin_id: native_coin_id.into(),
            platform: platform.into(),
            headers,
        })
    }

    pub fn price_url(&self, token_address: &str) -> String {
        if is_native_coin(token_address) {
            format!("{}/coins/{}", self.base_url, self.native_coin_id)
        } else {
            format!(
                "{}/coins/{}/contract/{}",
                self.base_url,
                self.platform,
                token_address.to_lowercase()
            )
        }
    }

    /// Current USD price, or 0 when the oracle has no usd quote for the token.
    pub async fn get_usd_price(&self, token_address: &str) -> Result<f64, AppError> {
        let url = self.price_url(token_address);
        let resp: CoinResponse = self
            .fetcher
            .fetch_json_with_headers(&url, &self.headers)
            .await?;
        let usd = resp
            .market_data
            .and_then(|m| m.current_price)
            .and_then(|p| p.usd)
            .filter(|p| p.is_finite() && *p > 0.0);
        match usd {
            Some(price) => Ok(price),
            None => {
                tracing::warn!(target: "snapshot", token = %token_address, "No USD price for token; using 0");
                Ok(0.0)
            }
        }
    }
}
