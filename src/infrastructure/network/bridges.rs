// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::model::{BridgeMapping, EligibleAsset};
use crate::network::fetcher::Fetcher;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize)]
struct BridgesResponse {
    data: Vec<BridgeMapping>,
}

/// Reads the bridge registry and keeps the assets bridged from `source_network`
/// into `destination_network`.
#[derive(Clone)]
pub struct BridgeRegistry {
    fetcher: Fetcher,
    base_url: String,
    source_network: String,
    destination_network: String,
}

impl BridgeRegistry {
    pub fn new(
        fetcher: Fetcher,
        base_url: impl Into<String>,
        source_network: impl Into<String>,
        destination_network: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            source_network: source_network.into(),
            destination_network: destination_network.into(),
        }
    }

    pub async fn list_bridges(&self) -> Result<Vec<BridgeMapping>, AppError> {
        let url = format!("{}/bridges", self.base_url);
        let resp: BridgesResponse = self.fetcher.fetch_json(&url).await?;
        Ok(resp.data)
    }

    /// Eligible assets keyed by foreign asset id.
    pub async fn list_eligible_assets(&self) -> Result<BTreeMap<String, EligibleAsset>, AppError> {
        let bridges = self.list_bridges().await?;
        Ok(filter_eligible(
            bridges,
            &self.source_network,
            &self.destination_network,
        ))
    }
}

/// A later mapping for the same foreign asset replaces the earlier one.
pub fn filter_eligible(
    bridges: Vec<BridgeMapping>,
    source_network: &str,
    destination_network: &str,
) -> BTreeMap<String, EligibleAsset> {
    let mut assets = BTreeMap::new();
    for bridge in bridges {
        if bridge.home_network != source_network || bridge.foreign_network != destination_network {
            continue;
        }
        let Some(foreign_asset_decimals) = bridge.foreign_asset_decimals else {
            tracing::warn!(
                target: "snapshot",
                foreign_asset = %bridge.foreign_asset,
                "Bridge has no foreign_asset_decimals; skipping"
            );
            continue;
        };
        let asset = EligibleAsset {
            foreign_asset: bridge.foreign_asset.clone(),
            home_symbol: bridge.home_symbol.unwrap_or_default(),
            foreign_symbol: bridge.foreign_symbol.unwrap_or_default(),
            home_asset: bridge.home_asset,
            home_asset_decimals: bridge.home_asset_decimals,
            foreign_asset_decimals,
        };
        if let Some(previous) = assets.insert(bridge.foreign_asset, asset) {
            tracing::warn!(
                target: "snapshot",
                foreign_asset = %previous.foreign_asset,
                replaced_home_asset = %previous.home_asset,
                "Duplicate bridge for foreign asset; keeping the later entry"
            );
        }
    }
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::retry::RetryPolicy;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mapping(home: &str, foreign: &str, home_asset: &str, foreign_asset: &str) -> BridgeMapping {
        BridgeMapping {
            home_network: home.into(),
            foreign_network: foreign.into(),
            home_asset: home_asset.into(),
            foreign_asset: foreign_asset.into(),
            home_asset_decimals: Some(18),
            foreign_asset_decimals: Some(9),
            home_symbol: Some("KAVA".into()),
            foreign_symbol: Some("X".into()),
        }
    }

    #[test]
    fn keeps_only_configured_network_pair() {
        let assets = filter_eligible(
            vec![
                mapping("Kava", "Obyte", "0x0", "A"),
                mapping("Ethereum", "Obyte", "0x1", "B"),
                mapping("Kava", "Ethereum", "0x2", "C"),
            ],
            "Kava",
            "Obyte",
        );
        assert_eq!(assets.len(), 1);
        let asset = &assets["A"];
        assert_eq!(asset.home_asset, "0x0");
        assert_eq!(asset.foreign_asset_decimals, 9);
        assert_eq!(asset.home_symbol, "KAVA");
    }

    #[test]
    fn duplicate_foreign_asset_last_wins() {
        let assets = filter_eligible(
            vec![
                mapping("Kava", "Obyte", "0xfirst", "A"),
                mapping("Kava", "Obyte", "0xsecond", "A"),
            ],
            "Kava",
            "Obyte",
        );
        assert_eq!(assets.len(), 1);
        assert_eq!(assets["A"].home_asset, "0xsecond");
    }

    #[test]
    fn skips_matching_bridge_without_decimals() {
        let mut broken = mapping("Kava", "Obyte", "0x0", "A");
        broken.foreign_asset_decimals = None;
        assert!(filter_eligible(vec![broken], "Kava", "Obyte").is_empty());
    }

    #[tokio::test]
    async fn fetches_bridge_list_from_registry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bridges"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": [
                    {
                        "home_network": "Kava", "foreign_network": "Obyte",
                        "home_asset": "0x0000000000000000000000000000000000000000",
                        "foreign_asset": "ASSETX",
                        "home_asset_decimals": 18, "foreign_asset_decimals": 9,
                        "home_symbol": "KAVA", "foreign_symbol": "X"
                    },
                    {
                        "home_network": "Polygon", "foreign_network": "Obyte",
                        "home_asset": "0xdead", "foreign_asset": "ASSETY",
                        "home_asset_decimals": null, "foreign_asset_decimals": null,
                        "home_symbol": null, "foreign_symbol": null
                    }
                ]
            })))
            .mount(&server)
            .await;

        let fetcher =
            Fetcher::new(Duration::from_secs(5), RetryPolicy::fixed(0, Duration::ZERO)).unwrap();
        let registry = BridgeRegistry::new(fetcher, format!("{}/api/", server.uri()), "Kava", "Obyte");
        let assets = registry.list_eligible_assets().await.expect("assets");
        assert_eq!(assets.keys().collect::<Vec<_>>(), vec!["ASSETX"]);
    }
}
