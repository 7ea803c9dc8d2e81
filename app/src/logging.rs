// SPDX-License-Identifier: Apache-2.0

//! `tracing-subscriber` wiring, controlled by `RUST_LOG`.

pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
