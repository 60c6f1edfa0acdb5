//! Thread-lifecycle harness: scheduling configuration, timed thread handles,
//! and process-wide memory locking.

pub mod config;
pub mod memlock;
pub mod timed_thread;
