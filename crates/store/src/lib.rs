// SPDX-License-Identifier: Apache-2.0

//! Transactional persistence for moneybox entities (spec.md §4.1 "Store &
//! transactions").
//!
//! `SqliteStore::begin` hands callers a `sqlx::Transaction`; the repository
//! functions in [`moneybox`], [`name_history`], [`transaction`],
//! [`action_log`], [`settings`] and [`user`] take `&mut Transaction`
//! explicitly and the caller commits or rolls back once it is done. This is
//! the idiomatic realization of the spec's abstract "`tx(f)` primitive" —
//! see DESIGN.md for why a generic callback combinator was not used.

pub mod action_log;
pub mod error;
pub mod models;
pub mod moneybox;
pub mod name_history;
pub mod settings;
pub mod transaction;
pub mod user;

pub use error::StoreError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

/// A pooled, migrated SQLite-backed store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` (e.g. `sqlite::memory:` or
    /// `sqlite:///var/lib/moneybox/moneybox.db`), creating the file if it
    /// does not exist.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run pending schema migrations. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Create the one-and-only settings row and the Overflow Moneybox if
    /// they don't already exist (spec.md §3 "Lifecycles": "Settings and
    /// overflow moneybox are created once at initial store provisioning").
    /// Safe to call on every startup.
    pub async fn provision_initial(&self, now: moneybox_primitives::Timestamp) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;

        let has_settings: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM app_settings WHERE is_active = 1)")
            .fetch_one(&mut *tx)
            .await?;
        if !has_settings {
            settings::provision_initial(&mut tx, 0, "COLLECT", "FIRST_OF_MONTH").await?;
        }

        let has_overflow: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM moneyboxes WHERE priority = 0 AND is_active = 1)")
                .fetch_one(&mut *tx)
                .await?;
        if !has_overflow {
            let overflow = moneybox::insert(&mut tx, "Overflow Moneybox", 0, None, Some(0), "", now).await?;
            name_history::append(&mut tx, overflow.id, "Overflow Moneybox", now).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Start a new transaction. The caller must `.commit()` or `.rollback()`
    /// it; dropping it without either rolls back (sqlx's default).
    pub async fn begin(&self) -> Result<Transaction<'_, Sqlite>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(tx)
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
