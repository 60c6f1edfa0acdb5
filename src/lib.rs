//! Micro-benchmark harness for observing how real-time and time-shared
//! threads interfere under different scheduling policies, priorities, and
//! CPU-affinity configurations.
//!
//! A fixed catalog of experiment scenarios describes small thread mixes
//! (e.g. one SCHED_FIFO thread against two time-shared threads on the same
//! CPU). Each scenario thread runs one CPU-bound workload invocation; the
//! per-thread wall-clock completion time is the observable.

pub mod experiments;
pub mod harness;
pub mod workload;
