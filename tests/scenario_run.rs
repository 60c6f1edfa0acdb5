//! End-to-end run of a standard-only thread mix through the public API.
//!
//! The catalog's own scenarios all contain real-time threads, which need
//! CAP_SYS_NICE to start; this mix exercises the full construct → start →
//! join → report cycle on the unprivileged path.

use rtmix::experiments::catalog::{Scenario, ThreadSpec, find_scenario};
use rtmix::experiments::runner::run_scenario;
use rtmix::harness::config::ThreadKind;
use rtmix::workload::busy_compute_rounds;

const SMOKE_MIX: &[ThreadSpec] = &[
    ThreadSpec {
        kind: ThreadKind::Standard,
        pinned_cpu: None,
    },
    ThreadSpec {
        kind: ThreadKind::Standard,
        pinned_cpu: None,
    },
    ThreadSpec {
        kind: ThreadKind::Standard,
        pinned_cpu: None,
    },
];

fn short_workload() {
    std::hint::black_box(busy_compute_rounds(100_000));
}

#[test]
fn standard_mix_reports_every_thread_in_order() {
    let scenario = Scenario {
        id: 100,
        description: "smoke: three time-shared apps, unpinned",
        threads: SMOKE_MIX,
    };

    let reports = run_scenario(&scenario, short_workload).expect("standard mix must run");

    assert_eq!(reports.len(), 3);
    let ids: Vec<u32> = reports.iter().map(|r| r.app_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    for report in &reports {
        assert!(report.elapsed_seconds() >= 0.0);
    }
}

#[test]
fn unknown_identifier_resolves_to_nothing() {
    assert!(find_scenario(99).is_none());
}
