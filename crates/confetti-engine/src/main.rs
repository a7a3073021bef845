//! # Confetti
//!
//! Headless runner: loads `confetti.toml`, spawns one effect and drives it
//! at a fixed tick rate, logging frame metrics.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use confetti_engine::{runner, RunnerConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("confetti=info".parse()?))
        .init();

    info!("Confetti {}", env!("CARGO_PKG_VERSION"));

    let settings = RunnerConfig::load();
    let summary = runner::run(&settings)
        .with_context(|| format!("running effect '{}'", settings.effect))?;

    info!(
        "Done: {} ticks, {:.2}s simulated, {} quads drawn, {}",
        summary.ticks, summary.sim_time, summary.quads_drawn, summary.perf
    );
    Ok(())
}
