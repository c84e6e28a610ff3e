// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::model::HolderRecord;
use crate::network::fetcher::Fetcher;
use serde::Deserialize;
use url::form_urlencoded::byte_serialize;

#[derive(Deserialize, Debug)]
struct HoldersPage {
    end: bool,
    #[serde(default)]
    holders: Vec<HolderRecord>,
}

/// Walks the explorer's holder pages for an asset.
#[derive(Clone)]
pub struct HolderEnumerator {
    fetcher: Fetcher,
    base_url: String,
}

impl HolderEnumerator {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, asset: &str, offset: u64) -> String {
        let encoded: String = byte_serialize(asset.as_bytes()).collect();
        format!(
            "{}/asset/{}/next_page_holders?offset={}",
            self.base_url, encoded, offset
        )
    }

    /// All holders of `asset`, in explorer order. Any failed page fails the whole listing.
    ///
    /// The explorer picks its own page size, so the offset advances by the number of
    /// holders actually received.
    pub async fn list_holders(&self, asset: &str) -> Result<Vec<HolderRecord>, AppError> {
        let mut holders = Vec::new();
        let mut offset = 0u64;
        loop {
            let url = self.page_url(asset, offset);
            let page: HoldersPage = self.fetcher.fetch_json(&url).await?;
            if page.end {
                holders.extend(page.holders);
                break;
            }
            if page.holders.is_empty() {
                return Err(AppError::Decode {
                    url,
                    reason: "non-final holders page is empty".into(),
                });
            }
            offset += page.holders.len() as u64;
            holders.extend(page.holders);
        }
        tracing::debug!(target: "snapshot", %asset, count = holders.len(), "Holders enumerated");
        Ok(holders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::retry::RetryPolicy;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn enumerator(base: &str) -> HolderEnumerator {
        let fetcher =
            Fetcher::new(Duration::from_secs(5), RetryPolicy::fixed(0, Duration::ZERO)).unwrap();
        HolderEnumerator::new(fetcher, base)
    }

    #[test]
    fn asset_id_is_url_encoded() {
        let e = enumerator("https://explorer.obyte.org/api");
        assert_eq!(
            e.page_url("a+b/c=", 200),
            "https://explorer.obyte.org/api/asset/a%2Bb%2Fc%3D/next_page_holders?offset=200"
        );
    }

    #[tokio::test]
    async fn concatenates_pages_until_end_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/asset/X/next_page_holders"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "end": false,
                "holders": [{ "address": "A1", "balance": 10 }, { "address": "A2", "balance": 20 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/asset/X/next_page_holders"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "end": true,
                "holders": [{ "address": "A3", "balance": 30 }]
            })))
            .mount(&server)
            .await;

        let holders = enumerator(&server.uri()).list_holders("X").await.unwrap();
        let addresses: Vec<_> = holders.iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec!["A1", "A2", "A3"]);
        assert_eq!(holders[2].raw_balance, 30);
    }

    #[tokio::test]
    async fn failed_page_fails_enumeration() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/asset/X/next_page_holders"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "end": false,
                "holders": [{ "address": "A1", "balance": 10 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/asset/X/next_page_holders"))
            .and(query_param("offset", "1"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = enumerator(&server.uri()).list_holders("X").await.unwrap_err();
        assert!(matches!(err, AppError::ApiCall { status: 502, .. }));
    }

    /// Serves `total` holders in fixed pages of `page` starting at the requested offset.
    struct PagedExplorer {
        total: u64,
        page: u64,
    }

    impl wiremock::Respond for PagedExplorer {
        fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
            let offset: u64 = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);
            let upto = (offset + self.page).min(self.total);
            let holders: Vec<_> = (offset..upto)
                .map(|i| serde_json::json!({ "address": format!("H{i}"), "balance": 1 }))
                .collect();
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "end": upto >= self.total,
                "holders": holders
            }))
        }
    }

    #[tokio::test]
    async fn offset_follows_explorer_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/asset/X/next_page_holders"))
            .respond_with(PagedExplorer { total: 150, page: 100 })
            .expect(2)
            .mount(&server)
            .await;

        let holders = enumerator(&server.uri()).list_holders("X").await.unwrap();
        let unique: std::collections::HashSet<_> = holders.iter().map(|h| &h.address).collect();
        assert_eq!(holders.len(), 150);
        assert_eq!(unique.len(), 150);
    }

    #[tokio::test]
    async fn empty_non_final_page_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/asset/X/next_page_holders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "end": false,
                "holders": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = enumerator(&server.uri()).list_holders("X").await.unwrap_err();
        assert!(matches!(err, AppError::Decode { .. }));
    }
}
