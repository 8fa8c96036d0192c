#![doc(test(attr(deny(warnings))))]

//! Jar Budget splits a balance across the six budgeting jars, keeps the
//! allocation in sync with the backend, and renders it as a ring chart.
//!
//! The heavy lifting lives in the workspace crates (`jar-core`,
//! `jar-domain`, `jar-config`); this crate wires them into a CLI.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod utils;

pub use errors::{CliError, JarError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Jar Budget tracing initialized.");
    });
}
