// SPDX-License-Identifier: Apache-2.0

//! Full-stack scenarios spanning the store, core services and distribution
//! engine together, as opposed to the per-crate unit tests that exercise one
//! layer at a time (spec.md §8).

use chrono::{TimeZone, Utc};
use moneybox_core::{LogService, MoneyboxService, SettingsService, SettingsUpdate};
use moneybox_primitives::{OverflowMode, TransactionTrigger, TransactionType};
use moneybox_store::SqliteStore;

async fn provisioned_store() -> SqliteStore {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store.provision_initial(Utc::now()).await.unwrap();
    store
}

/// S1 → S3: a COLLECT cycle followed by a FILL cycle against the resulting
/// live balances, driven end to end through the real store.
#[tokio::test]
async fn collect_then_fill_cycle_matches_literal_scenario() {
    let store = provisioned_store().await;
    let moneybox_service = MoneyboxService::new(store.clone());
    let settings_service = SettingsService::new(store.clone());
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    let b1 = moneybox_service.create("Box1", 5, Some(5), now).await.unwrap();
    let b2 = moneybox_service.create("Box2", 10, Some(5), now).await.unwrap();
    let _b3 = moneybox_service.create("Box3", 15, None, now).await.unwrap();
    let b4 = moneybox_service.create("Box4", 20, Some(50), now).await.unwrap();
    let _b5 = moneybox_service.create("Box5", 0, Some(0), now).await.unwrap();
    let _b6 = moneybox_service.create("Box6", 25, Some(0), now).await.unwrap();

    settings_service
        .update(
            SettingsUpdate {
                is_automated_saving_active: Some(true),
                savings_amount: Some(150),
                overflow_mode: Some(OverflowMode::Collect),
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();

    let moneyboxes = moneybox_service.list_moneyboxes().await.unwrap();
    let settings = settings_service.get().await.unwrap();
    let plan = moneybox_distribution::run_cycle(&store, &moneyboxes, &settings, now)
        .await
        .unwrap();
    assert_eq!(plan.effective_budget, 150);

    let after_collect = moneybox_service.list_moneyboxes().await.unwrap();
    let overflow = after_collect.iter().find(|m| m.priority == Some(0)).unwrap();
    assert_eq!(overflow.balance, 105);
    let box1 = after_collect.iter().find(|m| m.id == b1.id).unwrap();
    assert_eq!(box1.balance, 5);
    let box4 = after_collect.iter().find(|m| m.id == b4.id).unwrap();
    assert_eq!(box4.balance, 20);

    settings_service
        .update(
            SettingsUpdate {
                overflow_mode: Some(OverflowMode::FillUpLimitedMoneyboxes),
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();
    let moneyboxes = moneybox_service.list_moneyboxes().await.unwrap();
    let settings = settings_service.get().await.unwrap();
    moneybox_distribution::run_cycle(&store, &moneyboxes, &settings, now)
        .await
        .unwrap();

    let after_fill = moneybox_service.list_moneyboxes().await.unwrap();
    let overflow = after_fill.iter().find(|m| m.priority == Some(0)).unwrap();
    assert_eq!(overflow.balance, 75);
    let box2 = after_fill.iter().find(|m| m.id == b2.id).unwrap();
    assert_eq!(box2.balance, 5);
    let box4 = after_fill.iter().find(|m| m.id == b4.id).unwrap();
    assert_eq!(box4.balance, 50);
}

/// S5 — historical rename. The counterparty name recorded on a transaction
/// row must be the name the other box had *at the time of the transfer*, not
/// its current name.
#[tokio::test]
async fn transfer_records_counterparty_name_as_of_transfer_time() {
    let store = provisioned_store().await;
    let moneybox_service = MoneyboxService::new(store.clone());
    let log_service = LogService::new(store.clone());

    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();

    let a = moneybox_service.create("A", 0, None, t0).await.unwrap();
    let b = moneybox_service.create("B", 0, None, t0).await.unwrap();
    moneybox_service
        .deposit(a.id, 10, "", TransactionType::Direct, TransactionTrigger::Manually, t0)
        .await
        .unwrap();

    moneybox_service
        .transfer(a.id, b.id, 10, "", TransactionType::Direct, TransactionTrigger::Manually, t1)
        .await
        .unwrap();

    moneybox_service
        .update(a.id, Some("A2"), None, None, None, t2)
        .await
        .unwrap();

    let b_transactions = log_service.list_for_moneybox(b.id).await.unwrap();
    let incoming = b_transactions
        .iter()
        .find(|entry| entry.row.counterparty_moneybox_id == Some(a.id))
        .unwrap();
    assert_eq!(incoming.counterparty_moneybox_name.as_deref(), Some("A"));

    let historical = log_service.historical_name(a.id, t1).await.unwrap();
    assert_eq!(historical, "A");
    let current = log_service.historical_name(a.id, t2).await.unwrap();
    assert_eq!(current, "A2");
}

/// S6 — priority reorder two-phase. The intermediate clear-then-set inside
/// the transaction must never surface a transient duplicate to callers, and
/// the final order must match exactly what was requested.
#[tokio::test]
async fn reorder_produces_requested_final_priorities_with_no_partial_state() {
    let store = provisioned_store().await;
    let moneybox_service = MoneyboxService::new(store.clone());
    let now = Utc::now();

    let a = moneybox_service.create("A", 0, None, now).await.unwrap();
    let b = moneybox_service.create("B", 0, None, now).await.unwrap();
    let c = moneybox_service.create("C", 0, None, now).await.unwrap();

    moneybox_service
        .reorder_priorities(&[(a.id, 3), (b.id, 1), (c.id, 2)], now)
        .await
        .unwrap();

    let ordered = moneybox_service.priority_list().await.unwrap();
    let ids: Vec<i64> = ordered.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![b.id, c.id, a.id]);
    let priorities: Vec<i32> = ordered.iter().map(|row| row.priority.unwrap()).collect();
    assert_eq!(priorities, vec![1, 2, 3]);
}

/// Boundary case: a box with a non-zero balance cannot be deleted, and an
/// attempt to do so leaves every other box untouched.
#[tokio::test]
async fn deleting_a_moneybox_with_a_balance_is_rejected() {
    let store = provisioned_store().await;
    let moneybox_service = MoneyboxService::new(store.clone());
    let now = Utc::now();

    let a = moneybox_service.create("A", 0, None, now).await.unwrap();
    moneybox_service
        .deposit(a.id, 5, "", TransactionType::Direct, TransactionTrigger::Manually, now)
        .await
        .unwrap();

    let err = moneybox_service.delete(a.id, now).await.unwrap_err();
    assert!(matches!(err, moneybox_core::CoreError::HasBalance { .. }));

    let still_present = moneybox_service.list_moneyboxes().await.unwrap();
    assert!(still_present.iter().any(|row| row.id == a.id));
}

/// Universal invariant (spec.md §8): the transaction log for a box always
/// nets out to its current balance.
#[tokio::test]
async fn transaction_log_nets_to_current_balance() {
    let store = provisioned_store().await;
    let moneybox_service = MoneyboxService::new(store.clone());
    let log_service = LogService::new(store.clone());
    let now = Utc::now();

    let a = moneybox_service.create("A", 0, None, now).await.unwrap();
    let b = moneybox_service.create("B", 0, None, now).await.unwrap();
    moneybox_service
        .deposit(a.id, 100, "", TransactionType::Direct, TransactionTrigger::Manually, now)
        .await
        .unwrap();
    moneybox_service
        .transfer(a.id, b.id, 30, "", TransactionType::Direct, TransactionTrigger::Manually, now)
        .await
        .unwrap();
    moneybox_service
        .withdraw(a.id, 10, "", TransactionType::Direct, TransactionTrigger::Manually, now)
        .await
        .unwrap();

    let entries = log_service.list_for_moneybox(a.id).await.unwrap();
    let net: i64 = entries.iter().map(|entry| entry.row.amount).sum();

    let final_state = moneybox_service.list_moneyboxes().await.unwrap();
    let a_after = final_state.iter().find(|row| row.id == a.id).unwrap();
    assert_eq!(net, a_after.balance);
}
