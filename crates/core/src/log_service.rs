// SPDX-License-Identifier: Apache-2.0

//! Transaction log and historical-name resolution (spec.md §4.4).

use moneybox_primitives::Timestamp;
use moneybox_store::models::TransactionRow;
use moneybox_store::{SqliteStore, StoreError, moneybox, name_history, transaction};
use sqlx::{Sqlite, Transaction};

use crate::error::CoreError;

pub struct LogService {
    store: SqliteStore,
}

/// A transaction row enriched with the counterparty's name as it existed at
/// the time the row was written.
#[derive(Debug, Clone)]
pub struct EnrichedTransaction {
    pub row: TransactionRow,
    pub counterparty_moneybox_name: Option<String>,
}

impl LogService {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// All transactions for a box, each enriched with the counterparty's
    /// historical name (current name if the counterparty is the overflow
    /// box, per spec.md §4.4).
    pub async fn list_for_moneybox(&self, moneybox_id: i64) -> Result<Vec<EnrichedTransaction>, CoreError> {
        let mut tx = self.store.begin().await?;
        let rows = transaction::list_for_moneybox(&mut tx, moneybox_id).await?;
        let overflow_id = moneybox::overflow_id(&mut tx).await?;

        let mut enriched = Vec::with_capacity(rows.len());
        for row in rows {
            let counterparty_moneybox_name = match row.counterparty_moneybox_id {
                None => None,
                Some(cid) if cid == overflow_id => {
                    Some(moneybox::get(&mut tx, cid, false).await?.name)
                }
                Some(cid) => Some(historical_name(&mut tx, cid, row.created_at).await?),
            };
            enriched.push(EnrichedTransaction {
                row,
                counterparty_moneybox_name,
            });
        }

        tx.commit().await.map_err(StoreError::from)?;
        Ok(enriched)
    }

    /// The name a box had at timestamp `at` (spec.md §4.4 "Historical name").
    pub async fn historical_name(&self, moneybox_id: i64, at: Timestamp) -> Result<String, CoreError> {
        let mut tx = self.store.begin().await?;
        let name = historical_name(&mut tx, moneybox_id, at).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(name)
    }
}

/// Resolves to `NotFound` if the box never existed, `NameNotFound` if `at`
/// precedes its creation.
pub async fn historical_name(
    tx: &mut Transaction<'_, Sqlite>,
    moneybox_id: i64,
    at: Timestamp,
) -> Result<String, CoreError> {
    if let Some(row) = name_history::name_at(tx, moneybox_id, at).await? {
        return Ok(row.name);
    }

    if name_history::earliest(tx, moneybox_id).await?.is_some() {
        Err(CoreError::NameNotFound(format!(
            "moneybox {moneybox_id} had no name recorded at or before the requested time"
        )))
    } else {
        Err(CoreError::NotFound(format!("moneybox {moneybox_id}")))
    }
}
