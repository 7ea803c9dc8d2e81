// SPDX-License-Identifier: Apache-2.0

//! Moneybox repository: typed CRUD over the `moneyboxes` table.

use moneybox_primitives::Timestamp;
use sqlx::{Sqlite, Transaction};

use crate::error::StoreError;
use crate::models::MoneyboxRow;

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    tx: &mut Transaction<'_, Sqlite>,
    name: &str,
    savings_amount: i64,
    savings_target: Option<i64>,
    priority: Option<i32>,
    description: &str,
    now: Timestamp,
) -> Result<MoneyboxRow, StoreError> {
    let result = sqlx::query_as::<_, MoneyboxRow>(
        r#"
        INSERT INTO moneyboxes
            (name, balance, savings_amount, savings_target, priority, description,
             is_active, created_at, modified_at)
        VALUES (?, 0, ?, ?, ?, ?, 1, ?, ?)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(savings_amount)
    .bind(savings_target)
    .bind(priority)
    .bind(description)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    result.map_err(|err| StoreError::from_unique_violation(err, Some(name), priority))
}

pub async fn get(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    only_active: bool,
) -> Result<MoneyboxRow, StoreError> {
    let query = if only_active {
        "SELECT * FROM moneyboxes WHERE id = ? AND is_active = 1"
    } else {
        "SELECT * FROM moneyboxes WHERE id = ?"
    };

    sqlx::query_as::<_, MoneyboxRow>(query)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("moneybox {id}")))
}

/// All active moneyboxes ascending by priority (overflow, priority 0, first).
pub async fn list_active(tx: &mut Transaction<'_, Sqlite>) -> Result<Vec<MoneyboxRow>, StoreError> {
    let rows = sqlx::query_as::<_, MoneyboxRow>(
        "SELECT * FROM moneyboxes WHERE is_active = 1 ORDER BY priority ASC",
    )
    .fetch_all(&mut *tx)
    .await?;

    Ok(rows)
}

/// Active, non-overflow moneyboxes ascending by priority. Raises
/// `InconsistentDatabase` if any has a null priority (spec.md §4.2
/// "Priority list").
pub async fn list_active_non_overflow(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<Vec<MoneyboxRow>, StoreError> {
    let rows = sqlx::query_as::<_, MoneyboxRow>(
        "SELECT * FROM moneyboxes WHERE is_active = 1 AND (priority IS NULL OR priority <> 0) ORDER BY priority ASC",
    )
    .fetch_all(&mut *tx)
    .await?;

    if rows.iter().any(|row| row.priority.is_none()) {
        return Err(StoreError::InconsistentDatabase(
            "active non-overflow moneybox with null priority".to_string(),
        ));
    }

    Ok(rows)
}

/// The id of the one active moneybox with `priority = 0`.
pub async fn overflow_id(tx: &mut Transaction<'_, Sqlite>) -> Result<i64, StoreError> {
    sqlx::query_scalar("SELECT id FROM moneyboxes WHERE priority = 0 AND is_active = 1")
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::InconsistentDatabase("no active overflow moneybox".to_string()))
}

pub async fn max_non_overflow_priority(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<i32, StoreError> {
    let max: Option<i32> = sqlx::query_scalar(
        "SELECT MAX(priority) FROM moneyboxes WHERE is_active = 1 AND priority <> 0",
    )
    .fetch_one(&mut *tx)
    .await?;

    Ok(max.unwrap_or(0))
}

pub async fn update_fields(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    name: Option<&str>,
    savings_amount: Option<i64>,
    savings_target: Option<Option<i64>>,
    description: Option<&str>,
    now: Timestamp,
) -> Result<MoneyboxRow, StoreError> {
    let current = get(tx, id, true).await?;

    let new_name = name.unwrap_or(&current.name);
    let new_savings_amount = savings_amount.unwrap_or(current.savings_amount);
    let new_savings_target = savings_target.unwrap_or(current.savings_target);
    let new_description = description.unwrap_or(&current.description);

    let result = sqlx::query_as::<_, MoneyboxRow>(
        r#"
        UPDATE moneyboxes
        SET name = ?, savings_amount = ?, savings_target = ?, description = ?, modified_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(new_name)
    .bind(new_savings_amount)
    .bind(new_savings_target)
    .bind(new_description)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await;

    result.map_err(|err| StoreError::from_unique_violation(err, Some(new_name), None))
}

pub async fn set_priority(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    priority: Option<i32>,
    now: Timestamp,
) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE moneyboxes SET priority = ?, modified_at = ? WHERE id = ?")
        .bind(priority)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await;

    result
        .map(|_| ())
        .map_err(|err| StoreError::from_unique_violation(err, None, priority))
}

pub async fn set_balance(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    new_balance: i64,
    now: Timestamp,
) -> Result<MoneyboxRow, StoreError> {
    let row = sqlx::query_as::<_, MoneyboxRow>(
        r#"
        UPDATE moneyboxes
        SET balance = ?, modified_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(new_balance)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    Ok(row)
}

pub async fn soft_delete(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    now: Timestamp,
) -> Result<(), StoreError> {
    sqlx::query(
        "UPDATE moneyboxes SET is_active = 0, priority = NULL, modified_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    Ok(())
}
