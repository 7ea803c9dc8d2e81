// SPDX-License-Identifier: Apache-2.0

//! The SMTP-reporting collaborator's interface (spec.md §4.6 step 5; out of
//! scope per §1, specified only by this trait). [`NullMailer`] mirrors
//! `original_source/src/report_sender/sender.py` reporting an unready SMTP
//! configuration instead of failing the cycle.

use serde_json::Value;

use crate::error::SchedulerError;

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Send a report of one applied distribution cycle to the configured
    /// recipient. `details` is the same snapshot recorded in the
    /// `APPLIED_AUTOMATED_SAVING` action-log row.
    async fn send_distribution_report(&self, details: &Value) -> Result<(), SchedulerError>;
}

/// A mailer that never actually sends anything; used when no SMTP
/// configuration is present (`AppConfig`'s SMTP fields are all empty).
pub struct NullMailer;

#[async_trait::async_trait]
impl Mailer for NullMailer {
    async fn send_distribution_report(&self, _details: &Value) -> Result<(), SchedulerError> {
        tracing::info!(
            target: "moneybox::scheduler",
            "mailer not ready, skipping distribution report"
        );
        Ok(())
    }
}
