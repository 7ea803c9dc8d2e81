// SPDX-License-Identifier: Apache-2.0

//! Core-layer errors (spec.md §7). One variant per taxonomy entry; lower
//! layer failures that don't need their own branch fall through to `Store`.

use moneybox_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("active name already in use: {0}")]
    NameConflict(String),

    #[error("active priority already in use: {0}")]
    PriorityConflict(i32),

    #[error("the overflow moneybox cannot be modified")]
    OverflowNotModifiable,

    #[error("the overflow moneybox cannot be deleted")]
    OverflowNotDeletable,

    #[error("moneybox {moneybox_id} has a non-zero balance of {balance}")]
    HasBalance { moneybox_id: i64, balance: i64 },

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("withdrawal would make the balance negative")]
    BalanceNegative,

    #[error("source and destination moneybox must differ")]
    TransferEqualMoneybox,

    #[error("no name recorded for that moneybox at the requested time: {0}")]
    NameNotFound(String),

    #[error("database invariant violated: {0}")]
    InconsistentDatabase(String),

    #[error(transparent)]
    Store(StoreError),
}

/// Lifts a store-layer error into the matching core taxonomy entry where one
/// exists; everything else (connection/migration failures) surfaces as an
/// opaque infrastructure error.
impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CoreError::NotFound(what),
            StoreError::NameConflict(name) => CoreError::NameConflict(name),
            StoreError::PriorityConflict(priority) => CoreError::PriorityConflict(priority),
            StoreError::InconsistentDatabase(detail) => CoreError::InconsistentDatabase(detail),
            other => CoreError::Store(other),
        }
    }
}

impl From<moneybox_primitives::ParseEnumError> for CoreError {
    fn from(err: moneybox_primitives::ParseEnumError) -> Self {
        CoreError::InconsistentDatabase(err.to_string())
    }
}
