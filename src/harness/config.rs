//! Scheduling configuration for experiment threads.
//!
//! A thread is either `RealTime` (explicit SCHED_FIFO/SCHED_RR policy and
//! priority, fixed 1 MiB stack) or `Standard` (whatever the OS gives a plain
//! spawn). Affinity is a per-configuration field: `Some(n)` pins the thread
//! to CPU n, `None` lets the scheduler place it freely.

use thread_priority::{RealtimeThreadSchedulePolicy, ThreadSchedulePolicy};

/// Stack reservation for real-time threads. Sized so the RT path never
/// grows its stack mid-run.
pub const RT_STACK_SIZE: usize = 1024 * 1024;

/// Real-time scheduling class requested for a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtPolicy {
    Fifo,
    RoundRobin,
}

impl RtPolicy {
    /// Maps to the OS-level policy used when applying thread attributes.
    pub fn as_os_policy(self) -> ThreadSchedulePolicy {
        match self {
            RtPolicy::Fifo => {
                ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo)
            }
            RtPolicy::RoundRobin => {
                ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::RoundRobin)
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RtPolicy::Fifo => "SCHED_FIFO",
            RtPolicy::RoundRobin => "SCHED_RR",
        }
    }
}

/// Human-readable name for an effective policy reported back by the OS.
/// The granted policy can differ from the requested one, so this covers the
/// whole policy space, not just the two classes the catalog requests.
pub fn policy_label(policy: ThreadSchedulePolicy) -> &'static str {
    match policy {
        ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo) => "SCHED_FIFO",
        ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::RoundRobin) => "SCHED_RR",
        ThreadSchedulePolicy::Realtime(_) => "realtime (other)",
        _ => "time-shared",
    }
}

/// Scheduling class of one experiment thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadKind {
    /// Explicit real-time attributes; priority is in the OS RT range (1-99).
    RealTime { policy: RtPolicy, priority: u8 },
    /// OS-default time-shared scheduling.
    Standard,
}

impl ThreadKind {
    pub fn is_real_time(self) -> bool {
        matches!(self, ThreadKind::RealTime { .. })
    }
}

/// Attributes governing how the OS dispatches one experiment thread,
/// fixed at thread construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingConfig {
    pub kind: ThreadKind,
    /// `Some(n)` pins the thread to CPU n; `None` leaves placement to the
    /// scheduler.
    pub cpu_affinity: Option<usize>,
}

impl SchedulingConfig {
    /// Explicit stack reservation, if any. Real-time threads always get the
    /// fixed RT stack; standard threads keep the OS default.
    pub fn stack_size(&self) -> Option<usize> {
        match self.kind {
            ThreadKind::RealTime { .. } => Some(RT_STACK_SIZE),
            ThreadKind::Standard => None,
        }
    }
}
