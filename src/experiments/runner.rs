//! Generic scenario runner.
//!
//! Execution contract: instantiate every thread handle first (no threads
//! running), then start all in specification order, then join all in the
//! same order. Join order is what makes the reporting deterministic; actual
//! start order and CPU residency are decided by the OS scheduler and are
//! exactly the variables under observation.

use log::{error, info};
use thiserror::Error;

use crate::experiments::catalog::Scenario;
use crate::harness::config::SchedulingConfig;
use crate::harness::timed_thread::{CompletionReport, ThreadError, TimedThread};

#[derive(Debug, Error)]
pub enum ExperimentError {
    /// A thread failed to start. A partial mix would invalidate the
    /// measurement, so the scenario is abandoned, not patched up.
    #[error("scenario {scenario_id} aborted during startup: {source}")]
    Aborted {
        scenario_id: u32,
        #[source]
        source: ThreadError,
    },
    /// At least one join failed after the sweep completed.
    #[error("scenario {scenario_id} finished with a failed join: {source}")]
    JoinFailed {
        scenario_id: u32,
        #[source]
        source: ThreadError,
    },
}

/// Runs one scenario end-to-end and returns the per-thread completion
/// reports in specification order.
///
/// A start failure aborts the whole scenario: threads already running are
/// joined (there is no cancellation, they run to completion) and the
/// startup error is returned. Join failures are logged per app and the
/// first one is returned after every handle has been swept.
pub fn run_scenario(
    scenario: &Scenario,
    workload: fn(),
) -> Result<Vec<CompletionReport>, ExperimentError> {
    println!("{}", scenario.description);
    info!(
        "scenario {}: {} threads to start",
        scenario.id,
        scenario.threads.len()
    );

    let mut handles: Vec<TimedThread> = scenario
        .threads
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let config = SchedulingConfig {
                kind: spec.kind,
                cpu_affinity: spec.pinned_cpu,
            };
            TimedThread::new(i as u32 + 1, config, workload)
        })
        .collect();

    for started in 0..handles.len() {
        if let Err(err) = handles[started].start() {
            error!("{err}");
            for handle in &mut handles[..started] {
                if let Err(join_err) = handle.join() {
                    error!("{join_err}");
                }
            }
            return Err(ExperimentError::Aborted {
                scenario_id: scenario.id,
                source: err,
            });
        }
    }

    let mut reports = Vec::with_capacity(handles.len());
    let mut first_failure: Option<ThreadError> = None;

    for handle in &mut handles {
        match handle.join() {
            Ok(report) => {
                println!(
                    "App #{} runtime: {:.6} seconds",
                    report.app_id,
                    report.elapsed_seconds()
                );
                info!("[app #{}] ends", report.app_id);
                reports.push(report);
            }
            Err(err) => {
                error!("{err}");
                first_failure.get_or_insert(err);
            }
        }
    }

    match first_failure {
        Some(source) => Err(ExperimentError::JoinFailed {
            scenario_id: scenario.id,
            source,
        }),
        None => Ok(reports),
    }
}
