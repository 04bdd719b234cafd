use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Noise Colors
============

Noise is the raw material of every soundscape here: rain, surf, wind and
water are all broadband hiss pushed through filters. What differs between
"colors" of noise is how the energy is spread across the spectrum.

  white   Every sample is an independent uniform draw in [-1, 1].
          Equal power per Hz: flat spectrum, bright and hissy.

  pink    Equal power per OCTAVE: power density falls as 1/f, which is
          -3 dB per octave. Sounds deeper and softer than white noise, and
          is far closer to natural sounds like rainfall.


Paul Kellet's Pink Filter
-------------------------

Pink noise is made by filtering white noise. Kellet's "refined" method sums
a bank of one-pole lowpass filters with staggered poles, each fed by the
same white sample:

    b0 = 0.99886 * b0 + white * 0.0555179
    b1 = 0.99332 * b1 + white * 0.0750759
    b2 = 0.96900 * b2 + white * 0.1538520
    b3 = 0.86650 * b3 + white * 0.3104856
    b4 = 0.55000 * b4 + white * 0.5329522
    b5 = -0.7616 * b5 - white * 0.0168980
    pink = b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362
    b6 = white * 0.115926

Each pole covers a slice of the spectrum; together they approximate a
-3 dB/octave slope to within a fraction of a dB across the audio band.
`b6` is a one-sample delayed copy of the input, so it is added BEFORE it is
updated. The sum is scaled by 0.11 so pink is roughly as loud as white.

The filter state lives only as long as one buffer is being generated; every
buffer starts from silence.


Looping
-------

Buffers are short (2 seconds by default) and looped by the playing node.
The loop point is the buffer boundary. There is a tiny discontinuity there
which is inaudible under the filtering every preset applies.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Pink,
}

/// One independent uniform draw in [-1.0, 1.0].
#[inline]
pub fn white_sample<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(-1.0..=1.0)
}

/// Paul Kellet's pink noise filter (refined version).
#[derive(Debug, Default, Clone)]
pub struct PinkFilter {
    b0: f32,
    b1: f32,
    b2: f32,
    b3: f32,
    b4: f32,
    b5: f32,
    b6: f32,
}

impl PinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one white sample, get one pink sample back.
    #[inline]
    pub fn next_sample(&mut self, white: f32) -> f32 {
        self.b0 = 0.99886 * self.b0 + white * 0.0555179;
        self.b1 = 0.99332 * self.b1 + white * 0.0750759;
        self.b2 = 0.96900 * self.b2 + white * 0.1538520;
        self.b3 = 0.86650 * self.b3 + white * 0.3104856;
        self.b4 = 0.55000 * self.b4 + white * 0.5329522;
        self.b5 = -0.7616 * self.b5 - white * 0.0168980;

        let pink = self.b0
            + self.b1
            + self.b2
            + self.b3
            + self.b4
            + self.b5
            + self.b6
            + white * 0.5362;

        self.b6 = white * 0.115926;

        pink * 0.11
    }
}

/// A fixed block of generated noise. Immutable once created.
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    color: NoiseColor,
    sample_rate: f32,
    samples: Box<[f32]>,
}

impl NoiseBuffer {
    /// Generate a fresh buffer using the thread-local RNG.
    pub fn generate(color: NoiseColor, sample_rate: f32, duration_seconds: f32) -> Self {
        Self::generate_with(&mut rand::thread_rng(), color, sample_rate, duration_seconds)
    }

    /// Generate from a caller-supplied RNG (seeded RNGs make tests repeatable).
    pub fn generate_with<R: Rng + ?Sized>(
        rng: &mut R,
        color: NoiseColor,
        sample_rate: f32,
        duration_seconds: f32,
    ) -> Self {
        let len = ((sample_rate * duration_seconds).round() as usize).max(1);

        let samples: Box<[f32]> = match color {
            NoiseColor::White => (0..len).map(|_| white_sample(rng)).collect(),
            NoiseColor::Pink => {
                let mut pink = PinkFilter::new();
                (0..len)
                    .map(|_| pink.next_sample(white_sample(rng)).clamp(-1.0, 1.0))
                    .collect()
            }
        };

        Self {
            color,
            sample_rate,
            samples,
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate
    }
}
