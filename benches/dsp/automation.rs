//! Benchmarks for breakpoint automation (the shredder envelope).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oasis_dsp::presets::shredder;

use crate::BLOCK_SIZES;

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");
    let curve = shredder::envelope().expect("valid envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Inside the exponential tail, the most expensive segment
        group.bench_with_input(BenchmarkId::new("shredder_tail", size), &size, |b, _| {
            b.iter(|| curve.render(black_box(&mut buffer), black_box(2.7), 48_000.0))
        });
    }

    group.finish();
}
