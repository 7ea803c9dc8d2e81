// SPDX-License-Identifier: Apache-2.0

//! Name-history repository. Append-only; one row per box creation and per
//! successful rename (spec.md §3 `MoneyboxNameHistory`).

use moneybox_primitives::Timestamp;
use sqlx::{Sqlite, Transaction};

use crate::error::StoreError;
use crate::models::MoneyboxNameHistoryRow;

pub async fn append(
    tx: &mut Transaction<'_, Sqlite>,
    moneybox_id: i64,
    name: &str,
    created_at: Timestamp,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO moneybox_name_history (moneybox_id, name, created_at) VALUES (?, ?, ?)",
    )
    .bind(moneybox_id)
    .bind(name)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    Ok(())
}

/// The earliest history row for a box, used to distinguish "box never
/// existed" from "box existed but not yet at the requested timestamp".
pub async fn earliest(
    tx: &mut Transaction<'_, Sqlite>,
    moneybox_id: i64,
) -> Result<Option<MoneyboxNameHistoryRow>, StoreError> {
    let row = sqlx::query_as::<_, MoneyboxNameHistoryRow>(
        "SELECT * FROM moneybox_name_history WHERE moneybox_id = ? ORDER BY created_at ASC, id ASC LIMIT 1",
    )
    .bind(moneybox_id)
    .fetch_optional(&mut *tx)
    .await?;

    Ok(row)
}

/// The name-history row with the greatest `created_at <= at`.
pub async fn name_at(
    tx: &mut Transaction<'_, Sqlite>,
    moneybox_id: i64,
    at: Timestamp,
) -> Result<Option<MoneyboxNameHistoryRow>, StoreError> {
    let row = sqlx::query_as::<_, MoneyboxNameHistoryRow>(
        r#"
        SELECT * FROM moneybox_name_history
        WHERE moneybox_id = ? AND created_at <= ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(moneybox_id)
    .bind(at)
    .fetch_optional(&mut *tx)
    .await?;

    Ok(row)
}
