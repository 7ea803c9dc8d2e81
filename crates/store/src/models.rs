// SPDX-License-Identifier: Apache-2.0

//! Row structs returned by the repository functions. One struct per table,
//! named the way `original_source/src/db/models.py`'s dataclasses are
//! named, translated into `sqlx::FromRow` structs.

use moneybox_primitives::Timestamp;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MoneyboxRow {
    pub id: i64,
    pub name: String,
    pub balance: i64,
    pub savings_amount: i64,
    pub savings_target: Option<i64>,
    pub priority: Option<i32>,
    pub description: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MoneyboxNameHistoryRow {
    pub id: i64,
    pub moneybox_id: i64,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub moneybox_id: i64,
    pub amount: i64,
    pub balance: i64,
    pub counterparty_moneybox_id: Option<i64>,
    pub transaction_type: String,
    pub transaction_trigger: String,
    pub description: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActionLogRow {
    pub id: i64,
    pub action: String,
    pub action_at: Timestamp,
    pub details: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppSettingsRow {
    pub id: i64,
    pub is_automated_saving_active: bool,
    pub savings_amount: i64,
    pub overflow_moneybox_automated_savings_mode: String,
    pub send_reports_via_email: bool,
    pub user_email_address: Option<String>,
    pub automated_saving_trigger_day: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub user_login: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}
