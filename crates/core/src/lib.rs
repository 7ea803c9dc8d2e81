// SPDX-License-Identifier: Apache-2.0

//! Moneybox, settings, log/history and user services, built on
//! [`moneybox_store`] (spec.md §4.2, §4.4, §4.5; C3, C5, C6, C8).

pub mod error;
pub mod log_service;
pub mod moneybox_service;
pub mod settings_service;
pub mod user_service;

pub use error::CoreError;
pub use log_service::LogService;
pub use moneybox_service::MoneyboxService;
pub use settings_service::{SettingsService, SettingsUpdate};
pub use user_service::UserService;

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use moneybox_primitives::{TransactionTrigger, TransactionType};
    use moneybox_store::SqliteStore;

    use super::*;

    async fn test_store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store.provision_initial(Utc::now()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn create_assigns_next_priority() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);
        let now = Utc::now();

        let a = service.create("Car", 100, None, now).await.unwrap();
        let b = service.create("Holiday", 50, Some(1_000), now).await.unwrap();

        assert_eq!(a.priority, Some(1));
        assert_eq!(b.priority, Some(2));
    }

    #[tokio::test]
    async fn create_rejects_whitespace_only_name() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);

        let err = service.create("   ", 0, None, Utc::now()).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn deposit_zero_is_rejected() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);
        let now = Utc::now();
        let box_ = service.create("Car", 100, None, now).await.unwrap();

        let err = service
            .deposit(
                box_.id,
                0,
                "",
                TransactionType::Direct,
                TransactionTrigger::Manually,
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NonPositiveAmount));
    }

    #[tokio::test]
    async fn withdraw_beyond_balance_rejected_with_no_state_change() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);
        let now = Utc::now();
        let box_ = service.create("Car", 100, None, now).await.unwrap();
        let deposited = service
            .deposit(
                box_.id,
                50,
                "initial",
                TransactionType::Direct,
                TransactionTrigger::Manually,
                now,
            )
            .await
            .unwrap();

        let err = service
            .withdraw(
                box_.id,
                51,
                "",
                TransactionType::Direct,
                TransactionTrigger::Manually,
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::BalanceNegative));

        let unchanged = service.list_moneyboxes().await.unwrap();
        let same = unchanged.iter().find(|row| row.id == box_.id).unwrap();
        assert_eq!(same.balance, deposited.balance);
    }

    #[tokio::test]
    async fn delete_overflow_is_rejected() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);

        let boxes = service.list_moneyboxes().await.unwrap();
        let overflow = boxes.iter().find(|row| row.priority == Some(0)).unwrap();

        let err = service.delete(overflow.id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, CoreError::OverflowNotDeletable));
    }

    #[tokio::test]
    async fn delete_repacks_remaining_priorities() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);
        let now = Utc::now();

        let a = service.create("A", 0, None, now).await.unwrap();
        let _b = service.create("B", 0, None, now).await.unwrap();
        let c = service.create("C", 0, None, now).await.unwrap();

        service.delete(a.id, now).await.unwrap();

        let remaining = service.priority_list().await.unwrap();
        let priorities: Vec<i32> = remaining.iter().map(|row| row.priority.unwrap()).collect();
        assert_eq!(priorities, vec![1, 2]);
        let c_after = remaining.iter().find(|row| row.id == c.id).unwrap();
        assert_eq!(c_after.priority, Some(2));
    }

    #[tokio::test]
    async fn transfer_round_trip_restores_balances() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);
        let now = Utc::now();
        let a = service.create("A", 0, None, now).await.unwrap();
        let b = service.create("B", 0, None, now).await.unwrap();
        service
            .deposit(a.id, 100, "", TransactionType::Direct, TransactionTrigger::Manually, now)
            .await
            .unwrap();

        service
            .transfer(
                a.id,
                b.id,
                40,
                "",
                TransactionType::Direct,
                TransactionTrigger::Manually,
                now,
            )
            .await
            .unwrap();
        service
            .transfer(
                b.id,
                a.id,
                40,
                "",
                TransactionType::Direct,
                TransactionTrigger::Manually,
                now,
            )
            .await
            .unwrap();

        let after = service.list_moneyboxes().await.unwrap();
        let a_after = after.iter().find(|row| row.id == a.id).unwrap();
        let b_after = after.iter().find(|row| row.id == b.id).unwrap();
        assert_eq!(a_after.balance, 100);
        assert_eq!(b_after.balance, 0);
    }

    #[tokio::test]
    async fn reorder_then_reorder_back_restores_original_list() {
        let store = test_store().await;
        let service = MoneyboxService::new(store);
        let now = Utc::now();
        let a = service.create("A", 0, None, now).await.unwrap();
        let b = service.create("B", 0, None, now).await.unwrap();
        let c = service.create("C", 0, None, now).await.unwrap();

        service
            .reorder_priorities(&[(a.id, 3), (b.id, 1), (c.id, 2)], now)
            .await
            .unwrap();
        service
            .reorder_priorities(&[(a.id, 1), (b.id, 2), (c.id, 3)], now)
            .await
            .unwrap();

        let final_list = service.priority_list().await.unwrap();
        let ids: Vec<i64> = final_list.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }
}
