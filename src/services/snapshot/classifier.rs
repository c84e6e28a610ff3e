// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::data::db::{insert_address_type_if_absent, lookup_address_type};
use crate::domain::model::AddressType;
use crate::network::definitions::{DefinitionReader, is_autonomous_agent};
use dashmap::DashMap;
use sqlx::SqliteConnection;
use std::sync::atomic::{AtomicU64, Ordering};

/// Key-vs-agent classification: memory, then `address_types`, then the ledger.
///
/// An address never changes type, so entries are never invalidated.
pub struct AddressClassifier<R> {
    reader: R,
    cache: DashMap<String, AddressType>,
    ledger_lookups: AtomicU64,
}

impl<R: DefinitionReader> AddressClassifier<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cache: DashMap::new(),
            ledger_lookups: AtomicU64::new(0),
        }
    }

    pub async fn classify(
        &self,
        conn: &mut SqliteConnection,
        address: &str,
    ) -> Result<AddressType, AppError> {
        if let Some(cached) = self.cache.get(address) {
            return Ok(*cached);
        }

        if let Some(stored) = lookup_address_type(conn, address).await? {
            self.cache.insert(address.to_string(), stored);
            return Ok(stored);
        }

        self.ledger_lookups.fetch_add(1, Ordering::Relaxed);
        let definition = self
            .reader
            .read_definition(address)
            .await
            .map_err(|e| AppError::Classification {
                address: address.to_string(),
                reason: e.to_string(),
            })?;
        let address_type = if is_autonomous_agent(definition.as_ref()) {
            AddressType::Aa
        } else {
            AddressType::Key
        };
        tracing::debug!(target: "classifier", %address, kind = %address_type, "Classified from ledger");

        insert_address_type_if_absent(conn, address, address_type).await?;
        self.cache.insert(address.to_string(), address_type);
        Ok(address_type)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of definition reads issued against the ledger so far.
    pub fn ledger_lookups(&self) -> u64 {
        self.ledger_lookups.load(Ordering::Relaxed)
    }
}
