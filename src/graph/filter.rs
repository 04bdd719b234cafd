use crate::{
    dsp::{
        filter::{FilterType, SVFilter, DEFAULT_Q},
        modulate::modulated_value,
    },
    graph::node::{GraphNode, Modulatable, Param, RenderCtx},
};

/*
State-Variable Filter Node
==========================

Every noise-based soundscape is white or pink noise with a filter carving
out the part of the spectrum that sounds like the thing being imitated.

Lowpass (LP): keeps the rumble, removes the hiss.
  - 800 Hz on pink noise: soft rain on a window
  - 500 Hz with a swept cutoff: surf rolling in and out

Highpass (HP): removes the rumble.
  - 200 Hz after a lowpass: only the "water" band of a stream remains

Bandpass (BP): keeps a band around the center.
  - 400 Hz, wide (Q 0.5), gently swept: wind in the trees

Cutoff/center frequency is the node's `Param::Frequency` input. Anything
connected there (usually an LFO through a depth Gain) is added to the base
frequency once per block; the result is clamped to [10 Hz, 20 kHz].

Example:
  let mut graph = Graph::new();
  let surf = graph.add(FilterNode::lowpass(500.0).with_q(0.5));
  let lfo = graph.add(OscNode::sine(0.15));
  let depth = graph.add(GainNode::new(400.0));
  graph.connect(lfo, Destination::Input(depth))?;
  graph.connect(depth, Destination::Param(surf, Param::Frequency))?;
*/

const MIN_FREQUENCY_HZ: f32 = 10.0;
const MAX_FREQUENCY_HZ: f32 = 20_000.0;

pub struct FilterNode {
    filter: SVFilter,
    base_frequency: f32,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, frequency_hz: f32, q: f32) -> Self {
        Self {
            filter: SVFilter::new(filter_type, frequency_hz, q),
            base_frequency: frequency_hz,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, DEFAULT_Q)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, DEFAULT_Q)
    }

    pub fn bandpass(center_hz: f32) -> Self {
        Self::new(FilterType::BandPass, center_hz, DEFAULT_Q)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    /// Base cutoff (or center) frequency before modulation.
    pub fn frequency(&self) -> f32 {
        self.base_frequency
    }

    /// Frequency the filter is currently running at.
    pub fn effective_frequency(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.filter.q
    }
}

impl Modulatable for FilterNode {
    fn base_param(&self, param: Param) -> Option<f32> {
        match param {
            Param::Frequency => Some(self.base_frequency),
            Param::Gain => None,
        }
    }

    fn apply_modulation(&mut self, param: Param, modulation: f32) {
        if param == Param::Frequency {
            self.filter.set_cutoff(modulated_value(
                self.base_frequency,
                modulation,
                MIN_FREQUENCY_HZ,
                MAX_FREQUENCY_HZ,
            ));
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulation_moves_effective_but_not_base_frequency() {
        let mut filter = FilterNode::lowpass(500.0).with_q(0.5);

        filter.apply_modulation(Param::Frequency, 400.0);
        assert_eq!(filter.frequency(), 500.0);
        assert_eq!(filter.effective_frequency(), 900.0);

        filter.apply_modulation(Param::Frequency, -400.0);
        assert_eq!(filter.effective_frequency(), 100.0);
    }

    #[test]
    fn modulation_is_clamped() {
        let mut filter = FilterNode::bandpass(400.0);
        filter.apply_modulation(Param::Frequency, -10_000.0);
        assert_eq!(filter.effective_frequency(), MIN_FREQUENCY_HZ);
    }

    #[test]
    fn gain_is_not_exposed() {
        let filter = FilterNode::highpass(200.0);
        assert_eq!(filter.base_param(Param::Gain), None);
        assert_eq!(filter.base_param(Param::Frequency), Some(200.0));
    }

    #[test]
    fn renders_finite_output() {
        let mut filter = FilterNode::lowpass(800.0);
        let mut buffer: Vec<f32> = (0..512).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        filter.render_block(&mut buffer, &RenderCtx::new(48_000.0));

        assert!(buffer.iter().all(|s| s.is_finite()));
        // Nyquist-rate square is almost entirely removed by an 800 Hz lowpass
        assert!(buffer[256..].iter().all(|s| s.abs() < 0.05));
    }
}
