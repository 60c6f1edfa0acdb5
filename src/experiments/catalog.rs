//! Fixed experiment catalog.
//!
//! Each scenario is a declarative, ordered list of thread specifications;
//! one generic runner consumes the table, so adding a scenario means adding
//! a row, not a branch. Scenarios come in pinned/unpinned pairs (0/1 and
//! 2/4) with identical thread mixes, so the affinity effect can be compared
//! in isolation.

use crate::harness::config::{RtPolicy, ThreadKind};

/// Scenario used when the operator supplies no identifier.
pub const DEFAULT_SCENARIO_ID: u32 = 4;

/// The single CPU all "pinned" scenarios share. Everything contends for one
/// core, which is the point.
pub const EXPERIMENT_CPU: usize = 1;

/// RT priority used across the catalog; high enough to dominate any
/// time-shared thread on the same CPU.
const RT_PRIORITY: u8 = 80;

/// Specification of one thread within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadSpec {
    pub kind: ThreadKind,
    pub pinned_cpu: Option<usize>,
}

/// One immutable experiment scenario, selected by integer identifier.
/// Threads are numbered 1..N in listed order for reporting.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub id: u32,
    pub description: &'static str,
    pub threads: &'static [ThreadSpec],
}

const fn rt(policy: RtPolicy, pinned_cpu: Option<usize>) -> ThreadSpec {
    ThreadSpec {
        kind: ThreadKind::RealTime {
            policy,
            priority: RT_PRIORITY,
        },
        pinned_cpu,
    }
}

const fn standard(pinned_cpu: Option<usize>) -> ThreadSpec {
    ThreadSpec {
        kind: ThreadKind::Standard,
        pinned_cpu,
    }
}

pub const CATALOG: &[Scenario] = &[
    Scenario {
        id: 0,
        description: "Experiment 1: one RT app (FIFO/80) and two time-shared apps, all pinned to CPU 1",
        threads: &[
            rt(RtPolicy::Fifo, Some(EXPERIMENT_CPU)),
            standard(Some(EXPERIMENT_CPU)),
            standard(Some(EXPERIMENT_CPU)),
        ],
    },
    Scenario {
        id: 1,
        description: "Experiment 2: same mix as Experiment 1, free to run on any CPU",
        threads: &[rt(RtPolicy::Fifo, None), standard(None), standard(None)],
    },
    Scenario {
        id: 2,
        description: "Experiment 3: two RT apps (FIFO/80, equal priority) and one time-shared app, all pinned to CPU 1",
        threads: &[
            rt(RtPolicy::Fifo, Some(EXPERIMENT_CPU)),
            rt(RtPolicy::Fifo, Some(EXPERIMENT_CPU)),
            standard(Some(EXPERIMENT_CPU)),
        ],
    },
    Scenario {
        id: 3,
        description: "Experiment 4: two RT apps (RR/80, equal priority) and one time-shared app, all pinned to CPU 1",
        threads: &[
            rt(RtPolicy::RoundRobin, Some(EXPERIMENT_CPU)),
            rt(RtPolicy::RoundRobin, Some(EXPERIMENT_CPU)),
            standard(Some(EXPERIMENT_CPU)),
        ],
    },
    Scenario {
        id: 4,
        description: "Experiment 5: same mix as Experiment 3, free to run on any CPU",
        threads: &[
            rt(RtPolicy::Fifo, None),
            rt(RtPolicy::Fifo, None),
            standard(None),
        ],
    },
];

/// Looks up a scenario by identifier. An unknown identifier is not an
/// error; the caller reports "no matching scenario" and exits cleanly.
pub fn find_scenario(id: u32) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.id == id)
}
