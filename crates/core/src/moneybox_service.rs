// SPDX-License-Identifier: Apache-2.0

//! Moneybox CRUD, money movement and priority management (spec.md §4.2).
//!
//! The `*_in_tx` functions operate on a caller-supplied transaction and are
//! reused by the distribution engine, which needs every deposit/withdrawal
//! of a cycle plus the action-log row in one commit. The `MoneyboxService`
//! methods are the single-operation convenience wrappers that open and
//! commit their own transaction.

use std::collections::HashSet;

use moneybox_primitives::{OVERFLOW_PRIORITY, Timestamp, TransactionTrigger, TransactionType};
use moneybox_store::models::MoneyboxRow;
use moneybox_store::{SqliteStore, StoreError, moneybox, name_history, transaction};
use sqlx::{Sqlite, Transaction};

use crate::error::CoreError;

pub struct MoneyboxService {
    store: SqliteStore,
}

impl MoneyboxService {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        name: &str,
        savings_amount: i64,
        savings_target: Option<i64>,
        now: Timestamp,
    ) -> Result<MoneyboxRow, CoreError> {
        let trimmed = validate_name(name)?;
        validate_amount(savings_amount)?;
        validate_target(savings_target)?;

        let mut tx = self.store.begin().await?;
        let next_priority = moneybox::max_non_overflow_priority(&mut tx).await? + 1;
        let row = moneybox::insert(
            &mut tx,
            trimmed,
            savings_amount,
            savings_target,
            Some(next_priority),
            "",
            now,
        )
        .await?;
        name_history::append(&mut tx, row.id, trimmed, now).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        savings_amount: Option<i64>,
        savings_target: Option<Option<i64>>,
        description: Option<&str>,
        now: Timestamp,
    ) -> Result<MoneyboxRow, CoreError> {
        if let Some(amount) = savings_amount {
            validate_amount(amount)?;
        }
        if let Some(target) = savings_target {
            validate_target(target)?;
        }
        let trimmed_name = name.map(validate_name).transpose()?;

        let mut tx = self.store.begin().await?;
        let current = moneybox::get(&mut tx, id, true).await?;
        if current.priority == Some(OVERFLOW_PRIORITY) {
            return Err(CoreError::OverflowNotModifiable);
        }

        let row = moneybox::update_fields(
            &mut tx,
            id,
            trimmed_name,
            savings_amount,
            savings_target,
            description,
            now,
        )
        .await?;

        if let Some(new_name) = trimmed_name {
            if new_name != current.name {
                name_history::append(&mut tx, id, new_name, now).await?;
            }
        }

        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64, now: Timestamp) -> Result<(), CoreError> {
        let mut tx = self.store.begin().await?;
        let current = moneybox::get(&mut tx, id, true).await?;

        if current.priority == Some(OVERFLOW_PRIORITY) {
            return Err(CoreError::OverflowNotDeletable);
        }
        if current.balance != 0 {
            return Err(CoreError::HasBalance {
                moneybox_id: id,
                balance: current.balance,
            });
        }

        moneybox::soft_delete(&mut tx, id, now).await?;
        repack_priorities(&mut tx, now).await?;

        tx.commit().await.map_err(StoreError::from)?;
        Ok(())
    }

    pub async fn deposit(
        &self,
        id: i64,
        amount: i64,
        description: &str,
        transaction_type: TransactionType,
        trigger: TransactionTrigger,
        now: Timestamp,
    ) -> Result<MoneyboxRow, CoreError> {
        let mut tx = self.store.begin().await?;
        let row = deposit_in_tx(&mut tx, id, amount, description, transaction_type, trigger, now).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    pub async fn withdraw(
        &self,
        id: i64,
        amount: i64,
        description: &str,
        transaction_type: TransactionType,
        trigger: TransactionTrigger,
        now: Timestamp,
    ) -> Result<MoneyboxRow, CoreError> {
        let mut tx = self.store.begin().await?;
        let row = withdraw_in_tx(&mut tx, id, amount, description, transaction_type, trigger, now).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn transfer(
        &self,
        from_id: i64,
        to_id: i64,
        amount: i64,
        description: &str,
        transaction_type: TransactionType,
        trigger: TransactionTrigger,
        now: Timestamp,
    ) -> Result<(MoneyboxRow, MoneyboxRow), CoreError> {
        let mut tx = self.store.begin().await?;
        let result = transfer_in_tx(
            &mut tx,
            from_id,
            to_id,
            amount,
            description,
            transaction_type,
            trigger,
            now,
        )
        .await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(result)
    }

    /// All active moneyboxes ascending by priority, overflow first.
    pub async fn list_moneyboxes(&self) -> Result<Vec<MoneyboxRow>, CoreError> {
        let mut tx = self.store.begin().await?;
        let rows = moneybox::list_active(&mut tx).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(rows)
    }

    /// The active non-overflow boxes, ascending by priority.
    pub async fn priority_list(&self) -> Result<Vec<MoneyboxRow>, CoreError> {
        let mut tx = self.store.begin().await?;
        let rows = moneybox::list_active_non_overflow(&mut tx).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(rows)
    }

    pub async fn reorder_priorities(
        &self,
        changes: &[(i64, i32)],
        now: Timestamp,
    ) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for (id, _) in changes {
            if !seen.insert(*id) {
                return Err(CoreError::Validation(format!(
                    "duplicate moneybox id {id} in reorder request"
                )));
            }
        }

        let mut tx = self.store.begin().await?;
        let overflow_id = moneybox::overflow_id(&mut tx).await?;
        let active_non_overflow = moneybox::list_active_non_overflow(&mut tx).await?;
        let active_ids: HashSet<i64> = active_non_overflow.iter().map(|row| row.id).collect();

        for (id, new_priority) in changes {
            if *id == overflow_id {
                return Err(CoreError::OverflowNotModifiable);
            }
            if *new_priority == OVERFLOW_PRIORITY {
                return Err(CoreError::Validation(
                    "priority 0 is reserved for the overflow moneybox".to_string(),
                ));
            }
            if !active_ids.contains(id) {
                return Err(CoreError::Validation(format!(
                    "moneybox {id} is not an active non-overflow box"
                )));
            }
        }

        // Two-phase: clear every affected priority first so the partial-unique
        // index never sees a transient duplicate (spec.md §4.2 "Reorder
        // priorities").
        for (id, _) in changes {
            moneybox::set_priority(&mut tx, *id, None, now).await?;
        }
        for (id, new_priority) in changes {
            moneybox::set_priority(&mut tx, *id, Some(*new_priority), now).await?;
        }

        tx.commit().await.map_err(StoreError::from)?;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".to_string()));
    }
    Ok(trimmed)
}

fn validate_amount(amount: i64) -> Result<(), CoreError> {
    if amount < 0 {
        return Err(CoreError::Validation(
            "savings_amount must be >= 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_target(target: Option<i64>) -> Result<(), CoreError> {
    if let Some(value) = target {
        if value < 0 {
            return Err(CoreError::Validation(
                "savings_target must be >= 0".to_string(),
            ));
        }
    }
    Ok(())
}

/// Renumber the active non-overflow boxes to a dense `1..N` sequence,
/// preserving their relative priority order (spec.md §4.2 "Delete").
async fn repack_priorities(tx: &mut Transaction<'_, Sqlite>, now: Timestamp) -> Result<(), CoreError> {
    let rows = moneybox::list_active_non_overflow(tx).await?;
    for row in &rows {
        moneybox::set_priority(tx, row.id, None, now).await?;
    }
    for (index, row) in rows.iter().enumerate() {
        moneybox::set_priority(tx, row.id, Some(index as i32 + 1), now).await?;
    }
    Ok(())
}

pub async fn deposit_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    amount: i64,
    description: &str,
    transaction_type: TransactionType,
    trigger: TransactionTrigger,
    now: Timestamp,
) -> Result<MoneyboxRow, CoreError> {
    if amount <= 0 {
        return Err(CoreError::NonPositiveAmount);
    }

    let current = moneybox::get(tx, id, true).await?;
    let new_balance = current.balance + amount;
    let row = moneybox::set_balance(tx, id, new_balance, now).await?;
    transaction::append(
        tx,
        id,
        amount,
        new_balance,
        None,
        &transaction_type.to_string(),
        &trigger.to_string(),
        description,
        now,
    )
    .await?;

    Ok(row)
}

pub async fn withdraw_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    amount: i64,
    description: &str,
    transaction_type: TransactionType,
    trigger: TransactionTrigger,
    now: Timestamp,
) -> Result<MoneyboxRow, CoreError> {
    if amount <= 0 {
        return Err(CoreError::NonPositiveAmount);
    }

    let current = moneybox::get(tx, id, true).await?;
    let new_balance = current.balance - amount;
    if new_balance < 0 {
        return Err(CoreError::BalanceNegative);
    }

    let row = moneybox::set_balance(tx, id, new_balance, now).await?;
    transaction::append(
        tx,
        id,
        -amount,
        new_balance,
        None,
        &transaction_type.to_string(),
        &trigger.to_string(),
        description,
        now,
    )
    .await?;

    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn transfer_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    from_id: i64,
    to_id: i64,
    amount: i64,
    description: &str,
    transaction_type: TransactionType,
    trigger: TransactionTrigger,
    now: Timestamp,
) -> Result<(MoneyboxRow, MoneyboxRow), CoreError> {
    if from_id == to_id {
        return Err(CoreError::TransferEqualMoneybox);
    }
    if amount <= 0 {
        return Err(CoreError::NonPositiveAmount);
    }

    let from_current = moneybox::get(tx, from_id, true).await?;
    let from_new_balance = from_current.balance - amount;
    if from_new_balance < 0 {
        return Err(CoreError::BalanceNegative);
    }
    let from_row = moneybox::set_balance(tx, from_id, from_new_balance, now).await?;
    transaction::append(
        tx,
        from_id,
        -amount,
        from_new_balance,
        Some(to_id),
        &transaction_type.to_string(),
        &trigger.to_string(),
        description,
        now,
    )
    .await?;

    let to_current = moneybox::get(tx, to_id, true).await?;
    let to_new_balance = to_current.balance + amount;
    let to_row = moneybox::set_balance(tx, to_id, to_new_balance, now).await?;
    transaction::append(
        tx,
        to_id,
        amount,
        to_new_balance,
        Some(from_id),
        &transaction_type.to_string(),
        &trigger.to_string(),
        description,
        now,
    )
    .await?;

    Ok((from_row, to_row))
}
