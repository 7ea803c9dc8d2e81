// SPDX-License-Identifier: Apache-2.0

//! App-settings repository. Exactly one active row exists at any time
//! (spec.md §3 `AppSettings`); absence is an `InconsistentDatabase` error.

use sqlx::{Sqlite, Transaction};

use crate::error::StoreError;
use crate::models::AppSettingsRow;

pub async fn get_active(tx: &mut Transaction<'_, Sqlite>) -> Result<AppSettingsRow, StoreError> {
    sqlx::query_as::<_, AppSettingsRow>("SELECT * FROM app_settings WHERE is_active = 1")
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::InconsistentDatabase("no active app_settings row".to_string()))
}

pub async fn provision_initial(
    tx: &mut Transaction<'_, Sqlite>,
    savings_amount: i64,
    overflow_mode: &str,
    trigger_day: &str,
) -> Result<AppSettingsRow, StoreError> {
    let row = sqlx::query_as::<_, AppSettingsRow>(
        r#"
        INSERT INTO app_settings
            (is_automated_saving_active, savings_amount,
             overflow_moneybox_automated_savings_mode, send_reports_via_email,
             user_email_address, automated_saving_trigger_day, is_active)
        VALUES (0, ?, ?, 0, NULL, ?, 1)
        RETURNING *
        "#,
    )
    .bind(savings_amount)
    .bind(overflow_mode)
    .bind(trigger_day)
    .fetch_one(&mut *tx)
    .await?;

    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    tx: &mut Transaction<'_, Sqlite>,
    is_automated_saving_active: Option<bool>,
    savings_amount: Option<i64>,
    overflow_mode: Option<&str>,
    send_reports_via_email: Option<bool>,
    user_email_address: Option<Option<&str>>,
    trigger_day: Option<&str>,
) -> Result<AppSettingsRow, StoreError> {
    let current = get_active(tx).await?;

    let new_active = is_automated_saving_active.unwrap_or(current.is_automated_saving_active);
    let new_amount = savings_amount.unwrap_or(current.savings_amount);
    let new_mode = overflow_mode
        .map(str::to_string)
        .unwrap_or(current.overflow_moneybox_automated_savings_mode);
    let new_send_reports = send_reports_via_email.unwrap_or(current.send_reports_via_email);
    let new_email = user_email_address
        .map(|value| value.map(str::to_string))
        .unwrap_or(current.user_email_address);
    let new_trigger_day = trigger_day
        .map(str::to_string)
        .unwrap_or(current.automated_saving_trigger_day);

    let row = sqlx::query_as::<_, AppSettingsRow>(
        r#"
        UPDATE app_settings
        SET is_automated_saving_active = ?,
            savings_amount = ?,
            overflow_moneybox_automated_savings_mode = ?,
            send_reports_via_email = ?,
            user_email_address = ?,
            automated_saving_trigger_day = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(new_active)
    .bind(new_amount)
    .bind(new_mode)
    .bind(new_send_reports)
    .bind(new_email)
    .bind(new_trigger_day)
    .bind(current.id)
    .fetch_one(&mut *tx)
    .await?;

    Ok(row)
}
