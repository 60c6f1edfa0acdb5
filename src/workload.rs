//! CPU-bound filler workload.
//!
//! Every experiment thread runs exactly one invocation; only its completion
//! time matters. The mixer is deterministic wrapping-integer arithmetic so
//! runs are comparable across threads and scenarios, and `black_box` keeps
//! the loop from being folded away.

use std::hint::black_box;

/// Iteration count for the fixed experiment workload; long enough that
/// scheduler interference shows up in whole milliseconds.
const DEFAULT_ROUNDS: u64 = 400_000_000;

/// The workload invoked by every experiment thread.
pub fn busy_compute() {
    black_box(busy_compute_rounds(DEFAULT_ROUNDS));
}

/// Parameterized variant for tests and benches. Deterministic for a fixed
/// round count.
pub fn busy_compute_rounds(rounds: u64) -> u64 {
    let mut acc: u64 = 0x9e37_79b9_7f4a_7c15;
    for i in 0..rounds {
        acc = acc.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(i | 1);
        acc ^= acc >> 29;
    }
    black_box(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_fixed_rounds() {
        assert_eq!(busy_compute_rounds(10_000), busy_compute_rounds(10_000));
    }

    #[test]
    fn round_count_changes_the_result() {
        assert_ne!(busy_compute_rounds(10_000), busy_compute_rounds(10_001));
    }
}
