use oasis_dsp::dsp::noise::{NoiseBuffer, NoiseColor};
use rand::{rngs::StdRng, SeedableRng};
use rustfft::{num_complex::Complex, FftPlanner};

const SAMPLE_RATE: f32 = 48_000.0;
const SEGMENT: usize = 4096;
const OCTAVE_CENTERS: [f32; 7] = [125.0, 250.0, 500.0, 1_000.0, 2_000.0, 4_000.0, 8_000.0];

/// Welch estimate: Hann-windowed, 50% overlapped segments, power averaged.
fn power_spectrum(samples: &[f32]) -> Vec<f32> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(SEGMENT);
    let window: Vec<f32> = (0..SEGMENT)
        .map(|i| {
            let phase = std::f32::consts::TAU * i as f32 / (SEGMENT - 1) as f32;
            0.5 - 0.5 * phase.cos()
        })
        .collect();

    let mut power = vec![0.0f32; SEGMENT / 2];
    let mut segments = 0;
    let mut buffer = vec![Complex::new(0.0f32, 0.0); SEGMENT];
    let mut start = 0;
    while start + SEGMENT <= samples.len() {
        for (slot, (&s, &w)) in buffer
            .iter_mut()
            .zip(samples[start..start + SEGMENT].iter().zip(&window))
        {
            *slot = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buffer);
        for (p, bin) in power.iter_mut().zip(&buffer) {
            *p += bin.norm_sqr();
        }
        segments += 1;
        start += SEGMENT / 2;
    }

    for p in power.iter_mut() {
        *p /= segments as f32;
    }
    power
}

/// Mean power density per octave band, in dB.
fn octave_levels(power: &[f32]) -> Vec<f32> {
    let bin_hz = SAMPLE_RATE / SEGMENT as f32;
    OCTAVE_CENTERS
        .iter()
        .map(|&center| {
            let lo = (center / std::f32::consts::SQRT_2 / bin_hz).ceil() as usize;
            let hi = (center * std::f32::consts::SQRT_2 / bin_hz).floor() as usize;
            let band = &power[lo..=hi];
            let mean = band.iter().sum::<f32>() / band.len() as f32;
            10.0 * mean.log10()
        })
        .collect()
}

/// Least-squares slope of level against octave index, in dB per octave.
fn slope(levels: &[f32]) -> f32 {
    let n = levels.len() as f32;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = levels.iter().sum::<f32>() / n;
    let (num, den) = levels
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f32 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });
    num / den
}

fn measure(color: NoiseColor) -> f32 {
    let mut rng = StdRng::seed_from_u64(0x0a515);
    let buffer = NoiseBuffer::generate_with(&mut rng, color, SAMPLE_RATE, 6.0);
    slope(&octave_levels(&power_spectrum(buffer.samples())))
}

#[test]
fn pink_noise_falls_three_db_per_octave() {
    let slope = measure(NoiseColor::Pink);
    assert!(
        (-4.5..=-1.5).contains(&slope),
        "pink slope {slope:.2} dB/octave, expected about -3"
    );
}

#[test]
fn white_noise_is_flat() {
    let slope = measure(NoiseColor::White);
    assert!(slope.abs() <= 1.0, "white slope {slope:.2} dB/octave, expected 0");
}

#[test]
fn pink_is_darker_than_white() {
    assert!(measure(NoiseColor::Pink) < measure(NoiseColor::White) - 1.5);
}
