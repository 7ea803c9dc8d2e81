// SPDX-License-Identifier: Apache-2.0

//! Scheduler-layer errors. A cycle-level failure is caught by the wake loop
//! itself (spec.md §4.6: "Failures in step 5 propagate to a single wrapped
//! `AutomatedSavingsError` without retry inside the same day") so this enum
//! only needs to distinguish the failure's origin for logging.

use moneybox_distribution::DistributionError;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("reading app settings failed: {0}")]
    Settings(#[from] moneybox_core::CoreError),

    #[error(transparent)]
    Cycle(#[from] DistributionError),

    #[error("mailer failed to send the distribution report: {0}")]
    Mailer(String),
}
