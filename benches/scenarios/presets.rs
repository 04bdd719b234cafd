//! Benchmarks for complete soundscape graphs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oasis_dsp::{
    graph::RenderCtx,
    presets::{BuildCtx, SoundscapeKind},
};

use crate::BLOCK_SIZES;

pub fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/presets");
    let ctx = RenderCtx::new(48_000.0);
    let build_ctx = BuildCtx::new(48_000.0, 2.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for kind in SoundscapeKind::ALL {
            let mut graph = kind.build(&build_ctx).expect("preset builds");
            graph.start_all().expect("preset starts");

            group.bench_with_input(BenchmarkId::new(kind.id(), size), &size, |b, _| {
                b.iter(|| graph.render_block(black_box(&mut buffer), black_box(&ctx)))
            });
        }
    }

    group.finish();
}
