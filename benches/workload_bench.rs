/*
Measures the uncontended cost of the CPU-bound filler workload at several
round counts, so the per-thread runtimes printed by the scenarios can be
compared against an interference-free baseline on the same machine.
*/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use std::hint::black_box;

use rtmix::workload::busy_compute_rounds;

// Kept well below the fixed experiment round count; criterion repeats each
// sample many times.
const ROUND_COUNTS: &[u64] = &[1_000_000, 10_000_000];

fn bench_busy_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("busy_compute");
    group.sample_size(10);

    for &rounds in ROUND_COUNTS {
        group.bench_function(BenchmarkId::new("rounds", rounds), |b| {
            b.iter(|| black_box(busy_compute_rounds(black_box(rounds))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_busy_compute);
criterion_main!(benches);
