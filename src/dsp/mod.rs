//! Low-level DSP primitives used by the graph nodes.
//!
//! These components are allocation-free at render time and independent of
//! any audio device, so the numeric recurrences (pink noise, filters,
//! envelopes) can be tested on plain buffers. Graph nodes layer lifecycle,
//! routing and modulation on top.

/// Breakpoint gain automation (step, linear and exponential ramps).
pub mod automation;
/// State-variable filter with low/high/band-pass responses.
pub mod filter;
/// Block-rate modulation helpers.
pub mod modulate;
/// White and pink noise generation.
pub mod noise;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;

pub use automation::{Automation, Breakpoint, RampKind};
pub use filter::FilterType;
pub use noise::{NoiseBuffer, NoiseColor};
pub use oscillator::OscillatorWaveform;
