// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::constants::AUTONOMOUS_AGENT_MARKER;
use crate::network::fetcher::Fetcher;
use serde_json::Value;
use std::future::Future;

/// Source of on-ledger address definitions.
pub trait DefinitionReader {
    /// The address's definition, or `None` if the ledger has none for it.
    fn read_definition(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Value>, AppError>> + Send;
}

pub fn is_autonomous_agent(definition: Option<&Value>) -> bool {
    definition
        .and_then(Value::as_array)
        .and_then(|d| d.first())
        .and_then(Value::as_str)
        == Some(AUTONOMOUS_AGENT_MARKER)
}

/// Reads definitions from a ledger gateway exposing `GET {base}/definition/{address}`,
/// answering with the definition array or `null`.
#[derive(Clone)]
pub struct HttpDefinitionReader {
    fetcher: Fetcher,
    base_url: String,
}

impl HttpDefinitionReader {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl DefinitionReader for HttpDefinitionReader {
    async fn read_definition(&self, address: &str) -> Result<Option<Value>, AppError> {
        let url = format!("{}/definition/{}", self.base_url, address);
        let definition: Value = self.fetcher.fetch_json(&url).await?;
        Ok(match definition {
            Value::Null => None,
            other => Some(other),
        })
    }
}
