// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::common::retry::{RetryPolicy, retry_fixed};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP GET with a bounded number of fixed-delay retries.
///
/// Transport failures and non-2xx statuses are retried; a body that arrives but
/// does not decode is reported immediately.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("holder-snapshot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Initialization(format!("HTTP client build failed: {e}")))?;
        Ok(Self { client, policy })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.fetch_with_headers(url, &HeaderMap::new()).await
    }

    pub async fn fetch_with_headers(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<String, AppError> {
        retry_fixed(move |_| self.get_once(url, headers), self.policy, url).await
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.fetch_json_with_headers(url, &HeaderMap::new()).await
    }

    pub async fn fetch_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<T, AppError> {
        let body = self.fetch_with_headers(url, headers).await?;
        serde_json::from_str(&body).map_err(|e| AppError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get_once(&self, url: &str, headers: &HeaderMap) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ApiCall {
                provider: provider_label(url),
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| AppError::Connection(format!("Reading body of {url} failed: {e}")))
    }
}

fn provider_label(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
