// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::constants::BULK_INSERT_CHUNK;
use crate::common::error::AppError;
use crate::data::schema::{BalanceRecord, ExchangeRateRecord, SnapshotRecord};
use crate::domain::model::{AddressType, BalanceRow, ExchangeRateRow};
use sqlx::{
    Pool, QueryBuilder, Row, Sqlite, SqliteConnection, Transaction,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowCounts {
    pub snapshots: i64,
    pub exchange_rates: i64,
    pub balances: i64,
}

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Initialization(format!("DB Connect failed: {}", e)))?
            .create_if_missing(true);

        // Every connection to an in-memory database is a separate database.
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Initialization(format!("DB Connect failed: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Initialization(format!("DB Migration failed: {}", e)))?;

        tracing::debug!(target: "db", url = %database_url, "Database ready");
        Ok(Self { pool })
    }

    /// Opens the transaction a snapshot cycle writes through.
    pub async fn begin(&self) -> Result<SnapshotTx, AppError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("BEGIN failed: {e}")))?;
        Ok(SnapshotTx { tx })
    }

    pub async fn latest_snapshot(&self) -> Result<Option<SnapshotRecord>, AppError> {
        let rec = sqlx::query_as::<_, SnapshotRecord>(
            "SELECT snapshot_id, total_effecive_usd_balance, created_at FROM snapshots ORDER BY snapshot_id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Snapshot load failed: {}", e)))?;
        Ok(rec)
    }

    pub async fn snapshot_count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM snapshots")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Snapshot count failed: {}", e)))?;
        Ok(count)
    }

    /// Row totals of the snapshot tables, across all snapshots.
    pub async fn row_counts(&self) -> Result<RowCounts, AppError> {
        let (snapshots, exchange_rates, balances) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT (SELECT COUNT(1) FROM snapshots), \
                    (SELECT COUNT(1) FROM exchange_rates), \
                    (SELECT COUNT(1) FROM balances)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Row count failed: {}", e)))?;
        Ok(RowCounts {
            snapshots,
            exchange_rates,
            balances,
        })
    }

    pub async fn exchange_rates_for_snapshot(
        &self,
        snapshot_id: i64,
    ) -> Result<Vec<ExchangeRateRecord>, AppError> {
        let recs = sqlx::query_as::<_, ExchangeRateRecord>(
            "SELECT snapshot_id, home_asset, home_symbol, exchange_rate FROM exchange_rates WHERE snapshot_id = ? ORDER BY rowid",
        )
        .bind(snapshot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Exchange rate load failed: {}", e)))?;
        Ok(recs)
    }

    pub async fn balances_for_snapshot(
        &self,
        snapshot_id: i64,
    ) -> Result<Vec<BalanceRecord>, AppError> {
        let recs = sqlx::query_as::<_, BalanceRecord>(
            r#"
            SELECT snapshot_id, address, home_asset, home_symbol, balance, effective_balance, effective_usd_balance
            FROM balances
            WHERE snapshot_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(snapshot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Balance load failed: {}", e)))?;
        Ok(recs)
    }

    pub async fn address_type(&self, address: &str) -> Result<Option<AddressType>, AppError> {
        let mut conn = self.pool.acquire().await?;
        lookup_address_type(&mut conn, address).await
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

/// Write handle for one snapshot cycle.
///
/// Dropping it without [`SnapshotTx::commit`] rolls every write back.
pub struct SnapshotTx {
    tx: Transaction<'static, Sqlite>,
}

impl SnapshotTx {
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn insert_snapshot(&mut self) -> Result<i64, AppError> {
        let row = sqlx::query("INSERT INTO snapshots (snapshot_id) VALUES (NULL) RETURNING snapshot_id")
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::Database(format!("Snapshot insert failed: {}", e)))?;
        let snapshot_id = row
            .and_then(|r| r.try_get::<Option<i64>, _>("snapshot_id").ok().flatten())
            .filter(|id| *id > 0)
            .ok_or(AppError::MissingSnapshotId)?;
        Ok(snapshot_id)
    }

    pub async fn insert_exchange_rates(&mut self, rows: &[ExchangeRateRow]) -> Result<(), AppError> {
        for chunk in rows.chunks(BULK_INSERT_CHUNK) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO exchange_rates (snapshot_id, home_asset, home_symbol, exchange_rate) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.snapshot_id)
                    .push_bind(row.home_asset.clone())
                    .push_bind(row.home_symbol.clone())
                    .push_bind(row.exchange_rate);
            });
            qb.build()
                .execute(&mut *self.tx)
                .await
                .map_err(|e| AppError::Database(format!("Exchange rate insert failed: {}", e)))?;
        }
        Ok(())
    }

    pub async fn insert_balances(&mut self, rows: &[BalanceRow]) -> Result<(), AppError> {
        for chunk in rows.chunks(BULK_INSERT_CHUNK) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO balances (snapshot_id, address, home_asset, home_symbol, balance, effective_balance, effective_usd_balance) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.snapshot_id)
                    .push_bind(row.address.clone())
                    .push_bind(row.home_asset.clone())
                    .push_bind(row.home_symbol.clone())
                    .push_bind(row.balance)
                    .push_bind(row.effective_balance)
                    .push_bind(row.effective_usd_balance);
            });
            qb.build()
                .execute(&mut *self.tx)
                .await
                .map_err(|e| AppError::Database(format!("Balance insert failed: {}", e)))?;
        }
        Ok(())
    }

    pub async fn set_snapshot_total(&mut self, snapshot_id: i64, total: f64) -> Result<(), AppError> {
        sqlx::query("UPDATE snapshots SET total_effecive_usd_balance = ? WHERE snapshot_id = ?")
            .bind(total)
            .bind(snapshot_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::Database(format!("Snapshot total update failed: {}", e)))?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("COMMIT failed: {e}")))
    }

    pub async fn rollback(self) -> Result<(), AppError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| AppError::Database(format!("ROLLBACK failed: {e}")))
    }
}

pub async fn lookup_address_type(
    conn: &mut SqliteConnection,
    address: &str,
) -> Result<Option<AddressType>, AppError> {
    let row = sqlx::query("SELECT type FROM address_types WHERE address = ?")
        .bind(address)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::Database(format!("Address type load failed: {}", e)))?;

    match row {
        Some(row) => {
            let raw: String = row.get("type");
            let parsed = raw.parse::<AddressType>().map_err(|reason| {
                AppError::Classification {
                    address: address.to_string(),
                    reason,
                }
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Records a classification unless the address already has one.
pub async fn insert_address_type_if_absent(
    conn: &mut SqliteConnection,
    address: &str,
    address_type: AddressType,
) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO address_types (address, type) VALUES (?, ?)")
        .bind(address)
        .bind(address_type.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::Database(format!("Address type insert failed: {}", e)))?;
    Ok(())
}
