//! Timed thread handle: binds one OS thread to one workload invocation under
//! a fixed scheduling configuration and reports elapsed wall-clock time.
//!
//! Real-time attributes (policy + priority) are applied inside the spawned
//! thread itself, before the workload runs, and the outcome is handed back
//! to `start()` over a one-shot channel. `start()` therefore returns only
//! once the attributes are known to be applied or refused, never with the
//! request still in flight. Requested RT parameters are requests, not
//! guarantees: the thread queries its *effective* policy, priority, and CPU
//! after setup and reports them, whatever the OS actually granted.

use std::{
    any::Any,
    io,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam::channel::bounded;
use log::{info, warn};
use thiserror::Error;
use thread_priority::{
    ScheduleParams, set_thread_schedule_policy, thread_native_id, thread_schedule_policy_param,
};

use crate::harness::config::{SchedulingConfig, ThreadKind, policy_label};

#[derive(Debug, Error)]
pub enum ThreadError {
    /// The OS refused to create the thread (resource limits, etc.).
    #[error("app #{app_id}: thread creation failed: {source}")]
    Spawn {
        app_id: u32,
        #[source]
        source: io::Error,
    },
    /// The thread exists but the OS rejected its scheduling attributes
    /// (typically EPERM for an RT policy without CAP_SYS_NICE).
    #[error("app #{app_id}: scheduling attributes rejected: {detail}")]
    SchedulingSetup { app_id: u32, detail: String },
    /// Joining the underlying thread failed (workload panic).
    #[error("app #{app_id}: thread join failed: {detail}")]
    Join { app_id: u32, detail: String },
    #[error("app #{app_id}: thread started twice")]
    AlreadyStarted { app_id: u32 },
    #[error("app #{app_id}: no started thread to join")]
    NotStarted { app_id: u32 },
}

/// Per-thread result of a completed experiment run.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub app_id: u32,
    pub elapsed: Duration,
}

impl CompletionReport {
    /// Elapsed wall-clock time in seconds, sub-second resolution.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// One logical "application" of an experiment: a scheduling configuration,
/// a workload to run exactly once, and the timestamps around its execution.
pub struct TimedThread {
    app_id: u32,
    config: SchedulingConfig,
    workload: Option<Box<dyn FnOnce() + Send + 'static>>,
    handle: Option<JoinHandle<()>>,
    started_at: Option<Instant>,
}

impl TimedThread {
    /// Fixes the configuration and the injected workload; spawns nothing.
    pub fn new(
        app_id: u32,
        config: SchedulingConfig,
        workload: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            app_id,
            config,
            workload: Some(Box::new(workload)),
            handle: None,
            started_at: None,
        }
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Spawns the OS thread and applies the scheduling configuration.
    ///
    /// The timer starts immediately before the spawn, so the reported
    /// elapsed time covers creation + attribute setup + workload, as seen
    /// from the caller. In the new thread, in order: pin to the configured
    /// CPU (if any), apply RT policy/priority (if real-time), report the
    /// effective scheduling parameters, run the workload.
    ///
    /// Fails if the OS cannot create the thread or refuses the requested
    /// attributes; in the latter case the thread exits without running the
    /// workload.
    pub fn start(&mut self) -> Result<(), ThreadError> {
        if self.handle.is_some() {
            return Err(ThreadError::AlreadyStarted {
                app_id: self.app_id,
            });
        }
        let workload = self
            .workload
            .take()
            .ok_or(ThreadError::AlreadyStarted {
                app_id: self.app_id,
            })?;

        let app_id = self.app_id;
        let config = self.config;
        // One-shot verdict channel: the spawned thread reports whether its
        // scheduling attributes were applied before touching the workload.
        let (setup_tx, setup_rx) = bounded::<Result<(), String>>(1);

        let mut builder = thread::Builder::new().name(format!("app-{app_id}"));
        if let Some(stack) = config.stack_size() {
            builder = builder.stack_size(stack);
        }

        self.started_at = Some(Instant::now());

        let handle = builder
            .spawn(move || {
                if let Some(cpu) = config.cpu_affinity {
                    pin_to_cpu(app_id, cpu);
                }

                if let ThreadKind::RealTime { policy, priority } = config.kind {
                    // Attributes are set on this thread explicitly, never
                    // inherited from the spawning thread.
                    let params = ScheduleParams {
                        sched_priority: i32::from(priority),
                    };
                    let applied = set_thread_schedule_policy(
                        thread_native_id(),
                        policy.as_os_policy(),
                        params,
                    )
                    .map_err(|e| format!("{} priority {priority}: {e:?}", policy.label()));

                    let refused = applied.is_err();
                    let _ = setup_tx.send(applied);
                    if refused {
                        return;
                    }
                } else {
                    let _ = setup_tx.send(Ok(()));
                }

                report_effective_schedule(app_id);
                workload();
            })
            .map_err(|source| ThreadError::Spawn { app_id, source })?;

        match setup_rx.recv() {
            Ok(Ok(())) => {
                self.handle = Some(handle);
                Ok(())
            }
            Ok(Err(detail)) => {
                // The thread has already bailed out; reap it before failing.
                let _ = handle.join();
                Err(ThreadError::SchedulingSetup { app_id, detail })
            }
            Err(_) => {
                let _ = handle.join();
                Err(ThreadError::SchedulingSetup {
                    app_id,
                    detail: "thread exited before applying attributes".into(),
                })
            }
        }
    }

    /// Blocks until the spawned thread completes, then computes the elapsed
    /// wall-clock duration. No cancellation: a running workload is always
    /// waited out.
    pub fn join(&mut self) -> Result<CompletionReport, ThreadError> {
        let handle = self.handle.take().ok_or(ThreadError::NotStarted {
            app_id: self.app_id,
        })?;

        handle.join().map_err(|payload| ThreadError::Join {
            app_id: self.app_id,
            detail: describe_panic(payload.as_ref()),
        })?;

        let started_at = self.started_at.ok_or(ThreadError::NotStarted {
            app_id: self.app_id,
        })?;

        Ok(CompletionReport {
            app_id: self.app_id,
            elapsed: started_at.elapsed(),
        })
    }
}

/// Pins the calling thread to one CPU. Failure leaves the thread floating;
/// the run continues either way, with the outcome in the log.
fn pin_to_cpu(app_id: u32, cpu_index: usize) {
    let cores = core_affinity::get_core_ids().unwrap_or_default();
    match cores.get(cpu_index) {
        Some(core) => {
            if core_affinity::set_for_current(*core) {
                info!("[app #{app_id}] pinned to CPU {cpu_index}");
            } else {
                warn!("[app #{app_id}] failed to pin to CPU {cpu_index}, running floating");
            }
        }
        None => {
            warn!(
                "[app #{app_id}] CPU {cpu_index} not present ({} online), running floating",
                cores.len()
            );
        }
    }
}

/// Logs the scheduling parameters the OS actually granted to the calling
/// thread, plus the CPU it is currently executing on.
fn report_effective_schedule(app_id: u32) {
    match thread_schedule_policy_param(thread_native_id()) {
        Ok((policy, params)) => {
            info!(
                "[app #{app_id}] running on CPU #{} with {} priority {}",
                current_cpu(),
                policy_label(policy),
                params.sched_priority
            );
        }
        Err(e) => {
            warn!("[app #{app_id}] failed to query effective scheduling parameters: {e:?}");
        }
    }
}

#[cfg(target_os = "linux")]
fn current_cpu() -> i32 {
    unsafe { libc::sched_getcpu() }
}

#[cfg(not(target_os = "linux"))]
fn current_cpu() -> i32 {
    -1
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "thread panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::config::{SchedulingConfig, ThreadKind};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn standard_config() -> SchedulingConfig {
        SchedulingConfig {
            kind: ThreadKind::Standard,
            cpu_affinity: None,
        }
    }

    #[test]
    fn workload_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut t = TimedThread::new(1, standard_config(), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        t.start().unwrap();
        let report = t.join().unwrap();

        assert_eq!(report.app_id, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn elapsed_is_non_negative_and_sub_second_capable() {
        let mut t = TimedThread::new(2, standard_config(), || {
            std::thread::sleep(Duration::from_millis(10));
        });

        t.start().unwrap();
        let report = t.join().unwrap();

        assert!(report.elapsed_seconds() >= 0.0);
        assert!(report.elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn join_without_start_is_an_error() {
        let mut t = TimedThread::new(7, standard_config(), || {});
        assert!(matches!(
            t.join(),
            Err(ThreadError::NotStarted { app_id: 7 })
        ));
    }

    #[test]
    fn double_join_is_an_error() {
        let mut t = TimedThread::new(4, standard_config(), || {});
        t.start().unwrap();
        t.join().unwrap();
        assert!(matches!(
            t.join(),
            Err(ThreadError::NotStarted { app_id: 4 })
        ));
    }

    #[test]
    fn double_start_is_an_error() {
        let mut t = TimedThread::new(5, standard_config(), || {});
        t.start().unwrap();
        assert!(matches!(
            t.start(),
            Err(ThreadError::AlreadyStarted { app_id: 5 })
        ));
        t.join().unwrap();
    }

    #[test]
    fn panicking_workload_surfaces_as_join_error() {
        let mut t = TimedThread::new(3, standard_config(), || panic!("boom"));
        t.start().unwrap();
        match t.join() {
            Err(ThreadError::Join { app_id: 3, detail }) => assert!(detail.contains("boom")),
            other => panic!("expected join error, got {other:?}"),
        }
    }

    #[test]
    fn pinned_standard_thread_still_completes() {
        // Pinning to CPU 0 is valid on any machine with at least one core;
        // the handle must complete whether or not the pin itself succeeds.
        let mut t = TimedThread::new(
            6,
            SchedulingConfig {
                kind: ThreadKind::Standard,
                cpu_affinity: Some(0),
            },
            || {},
        );
        t.start().unwrap();
        let report = t.join().unwrap();
        assert_eq!(report.app_id, 6);
    }
}
