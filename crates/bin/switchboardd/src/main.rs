//! # switchboardd — switchboard demo daemon
//!
//! Composition root that wires virtual endpoints into a switchboard and
//! runs the configured script.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise structured logging
//! - Register devices, bind invoker slots, subscribe observers
//! - Run the scripted presses, publishes and unregistrations
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no dispatch logic belongs here.

mod config;
mod scenario;

use anyhow::Context;
use switchboard_domain::outcome::TriggerOutcome;
use tracing_subscriber::EnvFilter;

use config::Config;
use scenario::{StepOutcome, Wiring};

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let wiring = Wiring::build(&config).context("failed to wire switchboard")?;
    let outcomes = wiring.run(&config.script).context("scenario aborted")?;

    let unassigned = outcomes
        .iter()
        .filter(|o| **o == StepOutcome::Pressed(TriggerOutcome::NoCommandAssigned))
        .count();
    tracing::info!(
        steps = outcomes.len(),
        unassigned_presses = unassigned,
        pooled_commands = wiring.board().commands().len(),
        "scenario finished"
    );
    for device in &config.devices {
        if let Some(endpoint) = wiring.endpoint(&device.key) {
            tracing::info!(
                device = %device.key,
                on = endpoint.is_on(),
                events = endpoint.received_events(),
                "final device state"
            );
        }
    }
    Ok(())
}
