// SPDX-License-Identifier: Apache-2.0

//! Composition root: wires the store, core services, distribution engine and
//! scheduler into a runnable binary (spec.md §2 table, row `app`).

mod cli;
mod config;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use moneybox_core::MoneyboxService;
use moneybox_scheduler::{NullMailer, Scheduler};
use moneybox_store::SqliteStore;

use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env(cli.database_url.clone());

    let store = SqliteStore::connect(&config.database_url).await?;
    store.migrate().await?;
    store.provision_initial(Utc::now()).await?;

    match cli.command.unwrap_or(Command::Serve { wake_interval_secs: 3600 }) {
        Command::Metadata => print_metadata(&config),
        Command::RunNow => run_now(store).await?,
        Command::Serve { wake_interval_secs } => serve(store, &config, wake_interval_secs).await,
    }

    Ok(())
}

fn print_metadata(config: &AppConfig) {
    let metadata = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": option_env!("MONEYBOX_BUILD_DESCRIBE").unwrap_or("unknown"),
        "smtp_ready": config.smtp_ready(),
    });
    println!("{metadata}");
}

/// Runs one distribution cycle unconditionally, bypassing the trigger-day
/// and once-per-day gate that [`Scheduler::wake_once`] applies.
async fn run_now(store: SqliteStore) -> Result<(), Box<dyn std::error::Error>> {
    let settings_service = moneybox_core::SettingsService::new(store.clone());
    let moneybox_service = MoneyboxService::new(store.clone());

    let settings = settings_service.get().await?;
    let moneyboxes = moneybox_service.list_moneyboxes().await?;
    let now = Utc::now();

    let plan = moneybox_distribution::run_cycle(&store, &moneyboxes, &settings, now).await?;
    tracing::info!(
        target: "moneybox::app",
        effective_budget = plan.effective_budget,
        movements = plan.movements.len(),
        "ran distribution cycle on demand"
    );

    Ok(())
}

async fn serve(store: SqliteStore, config: &AppConfig, wake_interval_secs: u64) {
    if !config.smtp_ready() {
        tracing::info!(
            target: "moneybox::app",
            "SMTP configuration incomplete, distribution reports will not be sent"
        );
    }

    let scheduler = Scheduler::new(store, Arc::new(NullMailer), Duration::from_secs(wake_interval_secs));
    scheduler.run_forever().await;
}
