// SPDX-License-Identifier: Apache-2.0

//! User repository (spec.md §3 `User`). `ADMIN` rows cannot be soft-deleted;
//! that rule is enforced by the service layer, not here.

use sqlx::{Sqlite, Transaction};

use crate::error::StoreError;
use crate::models::UserRow;

pub async fn insert(
    tx: &mut Transaction<'_, Sqlite>,
    user_login: &str,
    password_hash: &str,
    role: &str,
) -> Result<UserRow, StoreError> {
    let result = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (user_login, password_hash, role, is_active) VALUES (?, ?, ?, 1) RETURNING *",
    )
    .bind(user_login)
    .bind(password_hash)
    .bind(role)
    .fetch_one(&mut *tx)
    .await;

    result.map_err(|err| {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.message().contains("idx_users_login_active") {
                return StoreError::NameConflict(user_login.to_string());
            }
        }
        StoreError::Database(err)
    })
}

pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<UserRow, StoreError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ? AND is_active = 1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
}

pub async fn soft_delete(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<(), StoreError> {
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    Ok(())
}
