// SPDX-License-Identifier: Apache-2.0

//! Distribution-cycle errors (spec.md §7 `AutomatedSavingsError`).

use moneybox_core::CoreError;

/// Wraps any failure inside a distribution cycle with the phase it happened
/// in and a snapshot of the state the cycle started from, so the scheduler
/// can log enough to diagnose a rolled-back cycle without retrying it.
#[derive(Debug, thiserror::Error)]
#[error("automated savings cycle failed during {phase}: {source}")]
pub struct AutomatedSavingsError {
    pub phase: String,
    pub snapshot: serde_json::Value,
    #[source]
    pub source: CoreError,
}

#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    #[error(transparent)]
    AutomatedSavings(#[from] AutomatedSavingsError),

    #[error("unrecognized overflow mode or trigger day stored in settings: {0}")]
    InvalidSettings(#[from] moneybox_primitives::ParseEnumError),
}
