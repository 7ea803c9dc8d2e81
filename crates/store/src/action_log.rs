// SPDX-License-Identifier: Apache-2.0

//! Action-log repository (spec.md §3 `ActionLog`).

use moneybox_primitives::Timestamp;
use sqlx::{Sqlite, Transaction};

use crate::error::StoreError;
use crate::models::ActionLogRow;

pub async fn append(
    tx: &mut Transaction<'_, Sqlite>,
    action: &str,
    action_at: Timestamp,
    details: &serde_json::Value,
) -> Result<ActionLogRow, StoreError> {
    let details_text = details.to_string();

    let row = sqlx::query_as::<_, ActionLogRow>(
        "INSERT INTO action_logs (action, action_at, details) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(action)
    .bind(action_at)
    .bind(details_text)
    .fetch_one(&mut *tx)
    .await?;

    Ok(row)
}

/// The most recent row for a given action, used by the scheduler's
/// once-per-day idempotence check (spec.md §4.6 step 4).
pub async fn most_recent(
    tx: &mut Transaction<'_, Sqlite>,
    action: &str,
) -> Result<Option<ActionLogRow>, StoreError> {
    let row = sqlx::query_as::<_, ActionLogRow>(
        "SELECT * FROM action_logs WHERE action = ? ORDER BY action_at DESC, id DESC LIMIT 1",
    )
    .bind(action)
    .fetch_optional(&mut *tx)
    .await?;

    Ok(row)
}

/// How many rows exist for a given action; used by tests asserting the
/// scheduler's once-per-day idempotence (spec.md §8 "running the scheduler
/// twice on the same calendar day applies the distribution exactly once").
pub async fn count_for_action(tx: &mut Transaction<'_, Sqlite>, action: &str) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM action_logs WHERE action = ?")
        .bind(action)
        .fetch_one(&mut *tx)
        .await?;

    Ok(count)
}
