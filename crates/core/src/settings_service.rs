// SPDX-License-Identifier: Apache-2.0

//! Single-row app settings with side-effect action-log entries (spec.md §4.5).

use moneybox_primitives::{ActionType, AutomatedSavingTriggerDay, OverflowMode, Timestamp};
use moneybox_store::models::AppSettingsRow;
use moneybox_store::{SqliteStore, StoreError, action_log, settings};
use serde_json::json;

use crate::error::CoreError;

pub struct SettingsService {
    store: SqliteStore,
}

/// A sparse set of fields to change; `None` leaves a field untouched,
/// `Some(None)` on `user_email_address` clears it.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub is_automated_saving_active: Option<bool>,
    pub savings_amount: Option<i64>,
    pub overflow_mode: Option<OverflowMode>,
    pub send_reports_via_email: Option<bool>,
    pub user_email_address: Option<Option<String>>,
    pub trigger_day: Option<AutomatedSavingTriggerDay>,
}

impl SettingsService {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> Result<AppSettingsRow, CoreError> {
        let mut tx = self.store.begin().await?;
        let row = settings::get_active(&mut tx).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }

    pub async fn update(&self, update: SettingsUpdate, now: Timestamp) -> Result<AppSettingsRow, CoreError> {
        if let Some(amount) = update.savings_amount {
            if amount < 0 {
                return Err(CoreError::Validation(
                    "savings_amount must be >= 0".to_string(),
                ));
            }
        }

        let mut tx = self.store.begin().await?;
        let before = settings::get_active(&mut tx).await?;

        let overflow_mode_str = update.overflow_mode.map(|mode| mode.to_string());
        let trigger_day_str = update.trigger_day.map(|day| day.to_string());

        let row = settings::update(
            &mut tx,
            update.is_automated_saving_active,
            update.savings_amount,
            overflow_mode_str.as_deref(),
            update.send_reports_via_email,
            update.user_email_address.as_ref().map(|v| v.as_deref()),
            trigger_day_str.as_deref(),
        )
        .await?;

        if let Some(new_active) = update.is_automated_saving_active {
            if new_active != before.is_automated_saving_active {
                let action = if new_active {
                    ActionType::ActivatedAutomatedSaving
                } else {
                    ActionType::DeactivatedAutomatedSaving
                };
                action_log::append(
                    &mut tx,
                    &action.to_string(),
                    now,
                    &json!({ "is_automated_saving_active": new_active }),
                )
                .await?;
            }
        }

        if let Some(new_amount) = update.savings_amount {
            if new_amount != before.savings_amount {
                action_log::append(
                    &mut tx,
                    &ActionType::ChangedAutomatedSavingsAmount.to_string(),
                    now,
                    &json!({
                        "previous_savings_amount": before.savings_amount,
                        "savings_amount": new_amount,
                    }),
                )
                .await?;
            }
        }

        tx.commit().await.map_err(StoreError::from)?;
        Ok(row)
    }
}
