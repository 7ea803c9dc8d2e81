// SPDX-License-Identifier: Apache-2.0

//! Transaction-log repository. Append-only; rows are never updated after
//! insert (spec.md §3 `Transaction`).

use moneybox_primitives::Timestamp;
use sqlx::{Sqlite, Transaction as SqlxTransaction};

use crate::error::StoreError;
use crate::models::TransactionRow;

#[allow(clippy::too_many_arguments)]
pub async fn append(
    tx: &mut SqlxTransaction<'_, Sqlite>,
    moneybox_id: i64,
    amount: i64,
    balance: i64,
    counterparty_moneybox_id: Option<i64>,
    transaction_type: &str,
    transaction_trigger: &str,
    description: &str,
    created_at: Timestamp,
) -> Result<TransactionRow, StoreError> {
    let row = sqlx::query_as::<_, TransactionRow>(
        r#"
        INSERT INTO transactions
            (moneybox_id, amount, balance, counterparty_moneybox_id,
             transaction_type, transaction_trigger, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(moneybox_id)
    .bind(amount)
    .bind(balance)
    .bind(counterparty_moneybox_id)
    .bind(transaction_type)
    .bind(transaction_trigger)
    .bind(description)
    .bind(created_at)
    .fetch_one(&mut *tx)
    .await?;

    Ok(row)
}

pub async fn list_for_moneybox(
    tx: &mut SqlxTransaction<'_, Sqlite>,
    moneybox_id: i64,
) -> Result<Vec<TransactionRow>, StoreError> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        "SELECT * FROM transactions WHERE moneybox_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(moneybox_id)
    .fetch_all(&mut *tx)
    .await?;

    Ok(rows)
}

/// Sum of signed amounts for a box; used by the "balance equals sum of
/// transactions" invariant (spec.md §8, property 5) in tests.
pub async fn balance_from_ledger(
    tx: &mut SqlxTransaction<'_, Sqlite>,
    moneybox_id: i64,
) -> Result<i64, StoreError> {
    let total: Option<i64> =
        sqlx::query_scalar("SELECT SUM(amount) FROM transactions WHERE moneybox_id = ?")
            .bind(moneybox_id)
            .fetch_one(&mut *tx)
            .await?;

    Ok(total.unwrap_or(0))
}
