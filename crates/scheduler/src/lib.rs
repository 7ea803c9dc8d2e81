// SPDX-License-Identifier: Apache-2.0

//! The once-per-day automated-savings wake loop (spec.md §4.6; C7).

mod mailer;
mod scheduler;

pub mod error;

pub use error::SchedulerError;
pub use mailer::{Mailer, NullMailer};
pub use scheduler::Scheduler;
