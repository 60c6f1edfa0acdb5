//! Process bootstrap for the scheduling-interference experiments.
//!
//! One-time setup (memory locking), scenario selection from the CLI, and
//! dispatch into the generic runner. Experiment results go to stdout;
//! diagnostics go through `log` to stderr.

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use rtmix::experiments::catalog::{DEFAULT_SCENARIO_ID, find_scenario};
use rtmix::experiments::runner::run_scenario;
use rtmix::harness::memlock::lock_process_memory;
use rtmix::workload::busy_compute;

#[derive(Parser)]
#[command(name = "rtmix")]
#[command(about = "Run fixed RT vs time-shared thread-mix scheduling experiments")]
struct Cli {
    /// Scenario identifier from the experiment catalog (0-4)
    scenario: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    // Per-thread scheduling diagnostics are the product here, so info-level
    // logging is on unless RUST_LOG says otherwise.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let scenario_id = match cli.scenario {
        Some(id) => id,
        None => {
            warn!("no scenario id supplied, defaulting to {DEFAULT_SCENARIO_ID}");
            DEFAULT_SCENARIO_ID
        }
    };

    info!("{} CPUs online", num_cpus::get());

    // Must happen exactly once, before any experiment thread exists;
    // denial is fatal.
    lock_process_memory().context("experiment timing requires locked memory")?;

    let Some(scenario) = find_scenario(scenario_id) else {
        println!("no matching scenario for id {scenario_id}");
        return Ok(());
    };

    let reports = run_scenario(scenario, busy_compute)?;
    info!(
        "scenario {scenario_id} completed, {} thread reports",
        reports.len()
    );

    Ok(())
}
