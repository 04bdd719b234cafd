//! Benchmarks for the mixer: what the device callback actually runs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oasis_dsp::{io::OfflineBackend, EngineConfig, SoundscapeEngine, SoundscapeKind};

use crate::BLOCK_SIZES;

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mixer");

    for &size in BLOCK_SIZES {
        // Ocean plus two overlapping shredders, stereo
        let backend = OfflineBackend::new(48_000.0);
        let renderer = backend.renderer();
        let mut engine = SoundscapeEngine::new(EngineConfig::default(), Box::new(backend))
            .expect("valid config");
        engine.play(SoundscapeKind::Ocean, 0.5).expect("play");
        engine.play_one_shot().expect("one-shot");
        engine.play_one_shot().expect("one-shot");

        group.bench_with_input(BenchmarkId::new("ocean_with_one_shots", size), &size, |b, &n| {
            b.iter(|| black_box(renderer.render(n)))
        });
    }

    group.finish();
}
