use crate::{
    dsp::{
        modulate::modulated_value,
        oscillator::{OscillatorBlock, OscillatorWaveform},
    },
    graph::node::{
        GraphNode, LifecycleError, Modulatable, Param, RenderCtx, SourceClock, SourceState,
    },
};

/*
Oscillator Node
===============

A free-running oscillator at a fixed frequency. It serves two roles here:

Audible tone (singing bowl):
  Three sines at 180, 182 and 540 Hz. The 2 Hz gap between the first two
  makes their sum swell and fade twice a second (beating), which is the
  slow "wah" of a struck bowl; 540 Hz is the third harmonic.

LFO (ocean, forest):
  A sine well below hearing (0.1 to 0.15 Hz) routed through a Gain into a
  filter's frequency input. It is never heard directly.

Frequency is the node's `Param::Frequency` input (added to the base once per
block, clamped at zero). Like every source, an oscillator is silent until
started and cannot be restarted after it stops.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    base_frequency: f32,
    current_frequency: f32,
    clock: SourceClock,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            base_frequency: frequency,
            current_frequency: frequency,
            clock: SourceClock::new(),
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    /// Base frequency before modulation.
    pub fn frequency(&self) -> f32 {
        self.base_frequency
    }

    pub fn state(&self) -> SourceState {
        self.clock.state()
    }

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.clock.start()
    }

    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        self.clock.stop()
    }

    pub fn stop_after(&mut self, seconds: f64) {
        self.clock.stop_after(seconds);
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let audible = self.clock.advance(out.len(), ctx);
        self.osc
            .render(&mut out[..audible], self.current_frequency, ctx.sample_rate);
        out[audible..].fill(0.0);
    }
}

impl Modulatable for OscNode {
    fn base_param(&self, param: Param) -> Option<f32> {
        match param {
            Param::Frequency => Some(self.base_frequency),
            Param::Gain => None,
        }
    }

    fn apply_modulation(&mut self, param: Param, modulation: f32) {
        if param == Param::Frequency {
            self.current_frequency =
                modulated_value(self.base_frequency, modulation, 0.0, f32::MAX);
        }
    }
}
