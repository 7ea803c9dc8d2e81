// SPDX-License-Identifier: Apache-2.0

//! Command-line parameters for the moneybox composition root.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "moneybox-app", version, about = "Personal-savings moneybox allocation engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Database connection string (e.g. `sqlite:///var/lib/moneybox/moneybox.db`
    /// or `sqlite::memory:`).
    #[arg(long, env = "MONEYBOX_DATABASE_URL", default_value = "sqlite://moneybox.db")]
    pub database_url: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the scheduler loop. This is the default when no subcommand is given.
    Serve {
        /// Seconds between scheduler wake-ups (spec.md §4.6 step 1 leaves the
        /// granularity to the implementation).
        #[arg(long, default_value_t = 3600, env = "MONEYBOX_WAKE_INTERVAL_SECS")]
        wake_interval_secs: u64,
    },
    /// Run one distribution cycle immediately, bypassing the trigger-day and
    /// once-per-day checks. Useful for manual operation and smoke testing.
    RunNow,
    /// Print build and version information.
    Metadata,
}
