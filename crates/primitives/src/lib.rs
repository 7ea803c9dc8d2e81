// SPDX-License-Identifier: Apache-2.0

//! Shared enums and value types used across the moneybox workspace. Kept
//! dependency-light so every other crate — store, core, distribution,
//! scheduler — can depend on it without pulling in `sqlx` or `tokio`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp used for every `created_at`/`modified_at`/`action_at` field.
pub type Timestamp = DateTime<Utc>;

/// The priority reserved for the Overflow Moneybox. Exactly one active
/// moneybox carries it, and it can never be assigned to another box.
pub const OVERFLOW_PRIORITY: i32 = 0;

/// Whether a transaction was recorded directly against one moneybox or
/// produced by the distribution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Deposit/withdrawal/transfer made directly against the moneybox.
    Direct,
    /// Movement produced by a distribution cycle.
    Distribution,
}

/// Who (or what) triggered a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionTrigger {
    /// Caused by an explicit API call.
    Manually,
    /// Caused by the scheduler running the distribution engine.
    Automatically,
}

/// The kind of side effect recorded in the action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// `is_automated_saving_active` flipped from false to true.
    ActivatedAutomatedSaving,
    /// `is_automated_saving_active` flipped from true to false.
    DeactivatedAutomatedSaving,
    /// A distribution cycle completed successfully.
    AppliedAutomatedSaving,
    /// The global `savings_amount` budget changed.
    ChangedAutomatedSavingsAmount,
}

/// Governs how the Overflow Moneybox's residual and pre-existing balance
/// are handled during a distribution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverflowMode {
    /// Just collect the residual into the overflow moneybox.
    Collect,
    /// Pre-withdraw the overflow balance, add it to the budget, then COLLECT.
    AddToAutomatedSavingsAmount,
    /// After a COLLECT pass, fill target-bearing boxes from the overflow balance.
    FillUpLimitedMoneyboxes,
    /// After a COLLECT pass, split the overflow balance by `savings_amount` ratio.
    Ratio,
}

/// The calendar day in the month the scheduler runs a distribution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutomatedSavingTriggerDay {
    /// Day 1 of the month.
    FirstOfMonth,
    /// Day 15 of the month.
    MiddleOfMonth,
    /// The last calendar day of the month.
    LastOfMonth,
}

/// User role; `Admin` accounts cannot be soft-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "DIRECT"),
            Self::Distribution => write!(f, "DISTRIBUTION"),
        }
    }
}

impl std::fmt::Display for TransactionTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manually => write!(f, "MANUALLY"),
            Self::Automatically => write!(f, "AUTOMATICALLY"),
        }
    }
}

/// A raw database string did not match any variant of one of this crate's
/// enums.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {1} value: {0:?}")]
pub struct ParseEnumError(String, &'static str);

impl std::fmt::Display for OverflowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collect => write!(f, "COLLECT"),
            Self::AddToAutomatedSavingsAmount => write!(f, "ADD_TO_AUTOMATED_SAVINGS_AMOUNT"),
            Self::FillUpLimitedMoneyboxes => write!(f, "FILL_UP_LIMITED_MONEYBOXES"),
            Self::Ratio => write!(f, "RATIO"),
        }
    }
}

impl std::str::FromStr for OverflowMode {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "COLLECT" => Ok(Self::Collect),
            "ADD_TO_AUTOMATED_SAVINGS_AMOUNT" => Ok(Self::AddToAutomatedSavingsAmount),
            "FILL_UP_LIMITED_MONEYBOXES" => Ok(Self::FillUpLimitedMoneyboxes),
            "RATIO" => Ok(Self::Ratio),
            other => Err(ParseEnumError(other.to_string(), "overflow mode")),
        }
    }
}

impl std::fmt::Display for AutomatedSavingTriggerDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstOfMonth => write!(f, "FIRST_OF_MONTH"),
            Self::MiddleOfMonth => write!(f, "MIDDLE_OF_MONTH"),
            Self::LastOfMonth => write!(f, "LAST_OF_MONTH"),
        }
    }
}

impl std::str::FromStr for AutomatedSavingTriggerDay {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FIRST_OF_MONTH" => Ok(Self::FirstOfMonth),
            "MIDDLE_OF_MONTH" => Ok(Self::MiddleOfMonth),
            "LAST_OF_MONTH" => Ok(Self::LastOfMonth),
            other => Err(ParseEnumError(other.to_string(), "trigger day")),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActivatedAutomatedSaving => write!(f, "ACTIVATED_AUTOMATED_SAVING"),
            Self::DeactivatedAutomatedSaving => write!(f, "DEACTIVATED_AUTOMATED_SAVING"),
            Self::AppliedAutomatedSaving => write!(f, "APPLIED_AUTOMATED_SAVING"),
            Self::ChangedAutomatedSavingsAmount => write!(f, "CHANGED_AUTOMATED_SAVINGS_AMOUNT"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DIRECT" => Ok(Self::Direct),
            "DISTRIBUTION" => Ok(Self::Distribution),
            other => Err(ParseEnumError(other.to_string(), "transaction type")),
        }
    }
}

impl std::str::FromStr for TransactionTrigger {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "MANUALLY" => Ok(Self::Manually),
            "AUTOMATICALLY" => Ok(Self::Automatically),
            other => Err(ParseEnumError(other.to_string(), "transaction trigger")),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ParseEnumError(other.to_string(), "user role")),
        }
    }
}
