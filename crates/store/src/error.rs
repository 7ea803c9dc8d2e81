// SPDX-License-Identifier: Apache-2.0

//! Store-level errors. Mirrors the shape of `hop_service::types::HopError`:
//! one `thiserror` enum, one variant per failure mode the layer above needs
//! to branch on.

/// Failures surfaced by the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found: {0}")]
    NotFound(String),

    #[error("active name already in use: {0}")]
    NameConflict(String),

    #[error("active priority already in use: {0}")]
    PriorityConflict(i32),

    #[error("database invariant violated: {0}")]
    InconsistentDatabase(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Best-effort classification of a raw `sqlx::Error` coming out of an
    /// insert/update that could have hit one of the two partial-unique
    /// indexes. SQLite reports both as `UNIQUE constraint failed` with the
    /// index name embedded in the message, so we pattern-match on that
    /// rather than parsing a structured code.
    pub fn from_unique_violation(err: sqlx::Error, name: Option<&str>, priority: Option<i32>) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let message = db_err.message();
            if message.contains("idx_moneyboxes_name_active") {
                return StoreError::NameConflict(name.unwrap_or_default().to_string());
            }
            if message.contains("idx_moneyboxes_priority_active") {
                return StoreError::PriorityConflict(priority.unwrap_or_default());
            }
        }
        StoreError::Database(err)
    }
}
