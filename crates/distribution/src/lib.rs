// SPDX-License-Identifier: Apache-2.0

//! The automated-savings distribution engine (spec.md §4.3; C4): the four
//! strategies, the months-to-target predictor, and the single-transaction
//! commit path that applies a computed cycle and appends the
//! `APPLIED_AUTOMATED_SAVING` action-log row.

pub mod engine;
pub mod error;
pub mod predictor;

pub use engine::{CyclePlan, MoneyboxSnapshot, Movement, compute_cycle};
pub use error::{AutomatedSavingsError, DistributionError};
pub use predictor::months_to_targets;

use std::str::FromStr;

use moneybox_core::moneybox_service;
use moneybox_primitives::{ActionType, OverflowMode, Timestamp, TransactionTrigger, TransactionType};
use moneybox_store::models::{AppSettingsRow, MoneyboxRow};
use moneybox_store::{SqliteStore, StoreError, action_log};
use serde_json::json;

fn snapshot_of(row: &MoneyboxRow) -> MoneyboxSnapshot {
    MoneyboxSnapshot {
        id: row.id,
        priority: row.priority.unwrap_or_default(),
        savings_amount: row.savings_amount,
        savings_target: row.savings_target,
        balance: row.balance,
    }
}

/// Builds the engine-ready snapshot list from the live store state.
pub fn snapshots_from_rows(rows: &[MoneyboxRow]) -> Vec<MoneyboxSnapshot> {
    rows.iter().map(snapshot_of).collect()
}

/// Runs one distribution cycle against the live store: computes the plan
/// from the current moneybox rows and `settings`, applies every movement
/// and appends the cycle's action-log row, all inside one transaction
/// (spec.md §4.3 "Applying the plan").
pub async fn run_cycle(
    store: &SqliteStore,
    moneyboxes: &[MoneyboxRow],
    settings: &AppSettingsRow,
    now: Timestamp,
) -> Result<CyclePlan, DistributionError> {
    let mode = OverflowMode::from_str(&settings.overflow_moneybox_automated_savings_mode)?;
    let snapshots = snapshots_from_rows(moneyboxes);
    let plan = compute_cycle(&snapshots, settings.savings_amount, mode);

    apply_plan(store, &plan, mode, settings.savings_amount, now)
        .await
        .map_err(|source| {
            AutomatedSavingsError {
                phase: "apply".to_string(),
                snapshot: json!({
                    "mode": mode.to_string(),
                    "budget": settings.savings_amount,
                    "moneyboxes": moneyboxes.iter().map(|r| json!({
                        "id": r.id,
                        "priority": r.priority,
                        "balance": r.balance,
                    })).collect::<Vec<_>>(),
                }),
                source,
            }
            .into()
        })?;

    Ok(plan)
}

async fn apply_plan(
    store: &SqliteStore,
    plan: &CyclePlan,
    mode: OverflowMode,
    budget: i64,
    now: Timestamp,
) -> Result<(), moneybox_core::CoreError> {
    let mut tx = store.begin().await?;

    for movement in &plan.movements {
        if movement.amount > 0 {
            moneybox_service::deposit_in_tx(
                &mut tx,
                movement.moneybox_id,
                movement.amount,
                "automated savings distribution",
                TransactionType::Distribution,
                TransactionTrigger::Automatically,
                now,
            )
            .await?;
        } else if movement.amount < 0 {
            moneybox_service::withdraw_in_tx(
                &mut tx,
                movement.moneybox_id,
                -movement.amount,
                "automated savings distribution",
                TransactionType::Distribution,
                TransactionTrigger::Automatically,
                now,
            )
            .await?;
        }
    }

    let details = json!({
        "mode": mode.to_string(),
        "budget": budget,
        "effective_budget": plan.effective_budget,
        "movements": plan.movements.iter().map(|m| json!({
            "moneybox_id": m.moneybox_id,
            "amount": m.amount,
        })).collect::<Vec<_>>(),
    });
    action_log::append(&mut tx, &ActionType::AppliedAutomatedSaving.to_string(), now, &details).await?;

    tx.commit().await.map_err(StoreError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use moneybox_core::{MoneyboxService, SettingsService, SettingsUpdate};

    use super::*;

    #[tokio::test]
    async fn run_cycle_applies_collect_and_logs_once() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        let now = Utc::now();
        store.provision_initial(now).await.unwrap();

        let moneybox_service = MoneyboxService::new(store.clone());
        let settings_service = SettingsService::new(store.clone());
        moneybox_service
            .create("Car", 10, Some(30), now)
            .await
            .unwrap();
        settings_service
            .update(
                SettingsUpdate {
                    savings_amount: Some(10),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap();

        let moneyboxes = moneybox_service.list_moneyboxes().await.unwrap();
        let settings = settings_service.get().await.unwrap();

        let plan = run_cycle(&store, &moneyboxes, &settings, now).await.unwrap();
        assert!(!plan.movements.is_empty());

        let after = moneybox_service.list_moneyboxes().await.unwrap();
        let car = after.iter().find(|b| b.name == "Car").unwrap();
        assert_eq!(car.balance, 10);
    }
}
