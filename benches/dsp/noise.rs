//! Benchmarks for noise buffer generation.
//!
//! Buffers are generated on the control thread at every `play`, so what
//! matters is the cost of a whole buffer, not a block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oasis_dsp::dsp::noise::{NoiseBuffer, NoiseColor, PinkFilter};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    group.sample_size(20);

    for seconds in [0.5f32, 2.0] {
        let label = format!("{seconds}s");
        group.bench_with_input(BenchmarkId::new("white", &label), &seconds, |b, &s| {
            b.iter(|| NoiseBuffer::generate(NoiseColor::White, black_box(48_000.0), s))
        });
        group.bench_with_input(BenchmarkId::new("pink", &label), &seconds, |b, &s| {
            b.iter(|| NoiseBuffer::generate(NoiseColor::Pink, black_box(48_000.0), s))
        });
    }

    // The recurrence alone, without the RNG
    let mut pink = PinkFilter::new();
    group.bench_function("pink_recurrence_4096", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for i in 0..4096 {
                let white = if i % 2 == 0 { 0.5 } else { -0.5 };
                acc += pink.next_sample(black_box(white));
            }
            acc
        })
    });

    group.finish();
}
