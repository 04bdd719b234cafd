//! Benchmarks for the phase-accumulator oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oasis_dsp::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            ("sine", OscillatorWaveform::Sine),
            ("square", OscillatorWaveform::Square),
            ("sawtooth", OscillatorWaveform::Sawtooth),
            ("triangle", OscillatorWaveform::Triangle),
        ] {
            let mut osc = OscillatorBlock::new(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(180.0), black_box(48_000.0));
                })
            });
        }
    }

    group.finish();
}
