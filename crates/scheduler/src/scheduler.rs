// SPDX-License-Identifier: Apache-2.0

//! The once-per-day wake loop (spec.md §4.6). A single cooperative task: no
//! two distribution cycles are ever in flight (spec.md §5).

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use moneybox_core::{MoneyboxService, SettingsService};
use moneybox_primitives::{ActionType, AutomatedSavingTriggerDay};
use moneybox_store::{SqliteStore, action_log};

use crate::error::SchedulerError;
use crate::mailer::Mailer;

pub struct Scheduler {
    store: SqliteStore,
    moneybox_service: MoneyboxService,
    settings_service: SettingsService,
    mailer: Arc<dyn Mailer>,
    wake_interval: Duration,
}

impl Scheduler {
    pub fn new(store: SqliteStore, mailer: Arc<dyn Mailer>, wake_interval: Duration) -> Self {
        Self {
            moneybox_service: MoneyboxService::new(store.clone()),
            settings_service: SettingsService::new(store.clone()),
            store,
            mailer,
            wake_interval,
        }
    }

    /// Sleeps until the next wake slot, forever. Each tick runs
    /// [`Scheduler::wake_once`]; a failed cycle is logged and the loop
    /// keeps running (spec.md §7: "the scheduler catches cycle-level errors
    /// to keep running").
    pub async fn run_forever(&self) -> ! {
        let mut interval = tokio::time::interval(self.wake_interval);
        loop {
            interval.tick().await;
            if let Err(err) = self.wake_once(Utc::now()).await {
                tracing::error!(target: "moneybox::scheduler", error = %err, "automated savings cycle failed");
            }
        }
    }

    /// One wake-up's worth of work, exposed directly so tests and a manual
    /// "run now" CLI command can drive it without waiting for a real tick.
    pub async fn wake_once(&self, now: DateTime<Utc>) -> Result<(), SchedulerError> {
        let settings = self.settings_service.get().await?;
        if !settings.is_automated_saving_active {
            return Ok(());
        }

        let trigger_day = AutomatedSavingTriggerDay::from_str(&settings.automated_saving_trigger_day)
            .map_err(|err| SchedulerError::Settings(err.into()))?;
        if !trigger_matches(trigger_day, now) {
            return Ok(());
        }

        if self.already_ran_today(now).await? {
            return Ok(());
        }

        let moneyboxes = self.moneybox_service.list_moneyboxes().await?;
        let plan = moneybox_distribution::run_cycle(&self.store, &moneyboxes, &settings, now).await?;

        if settings.send_reports_via_email {
            let details = serde_json::json!({
                "effective_budget": plan.effective_budget,
                "movement_count": plan.movements.len(),
            });
            self.mailer.send_distribution_report(&details).await?;
        }

        Ok(())
    }

    async fn already_ran_today(&self, now: DateTime<Utc>) -> Result<bool, SchedulerError> {
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|err| SchedulerError::Settings(err.into()))?;
        let most_recent = action_log::most_recent(&mut tx, &ActionType::AppliedAutomatedSaving.to_string())
            .await
            .map_err(|err| SchedulerError::Settings(err.into()))?;

        Ok(most_recent.is_some_and(|row| row.action_at.date_naive() == now.date_naive()))
    }
}

/// `FIRST_OF_MONTH` matches day 1; `MIDDLE_OF_MONTH` matches day 15;
/// `LAST_OF_MONTH` matches the last calendar day of the current month
/// (spec.md §4.6 step 3).
fn trigger_matches(trigger_day: AutomatedSavingTriggerDay, now: DateTime<Utc>) -> bool {
    match trigger_day {
        AutomatedSavingTriggerDay::FirstOfMonth => now.day() == 1,
        AutomatedSavingTriggerDay::MiddleOfMonth => now.day() == 15,
        AutomatedSavingTriggerDay::LastOfMonth => is_last_day_of_month(now),
    }
}

fn is_last_day_of_month(now: DateTime<Utc>) -> bool {
    let tomorrow = now.date_naive() + chrono::Duration::days(1);
    tomorrow.month() != now.date_naive().month()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use moneybox_core::SettingsUpdate;

    use super::*;

    async fn test_store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store.provision_initial(Utc::now()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn inactive_automated_saving_skips_cycle() {
        let store = test_store().await;
        let scheduler = Scheduler::new(store, Arc::new(crate::mailer::NullMailer), Duration::from_secs(1));
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        scheduler.wake_once(now).await.unwrap();
    }

    #[tokio::test]
    async fn running_twice_same_day_applies_once() {
        let store = test_store().await;
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

        let settings_service = SettingsService::new(store.clone());
        settings_service
            .update(
                SettingsUpdate {
                    is_automated_saving_active: Some(true),
                    savings_amount: Some(10),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap();

        let scheduler = Scheduler::new(store.clone(), Arc::new(crate::mailer::NullMailer), Duration::from_secs(1));
        scheduler.wake_once(now).await.unwrap();
        scheduler.wake_once(now).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let applied_count = moneybox_store::action_log::count_for_action(
            &mut tx,
            &ActionType::AppliedAutomatedSaving.to_string(),
        )
        .await
        .unwrap();
        assert_eq!(applied_count, 1);
    }
}
