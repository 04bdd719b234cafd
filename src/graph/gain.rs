use crate::{
    dsp::automation::Automation,
    graph::node::{GraphNode, Modulatable, Param, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Scalar multiplier, optionally driven by an [`Automation`] curve.
///
/// Used three ways: per-voice level (bowl partials at 0.2), LFO depth
/// (400 for ocean, 200 for forest) and the shredder's amplitude envelope.
pub struct GainNode {
    base_gain: f32,
    modulation: f32,
    automation: Option<Automation>,
    elapsed_frames: u64,
    curve_buffer: Vec<f32>,
}

impl GainNode {
    pub fn new(gain: f32) -> Self {
        Self {
            base_gain: gain,
            modulation: 0.0,
            automation: None,
            elapsed_frames: 0,
            curve_buffer: Vec::new(),
        }
    }

    /// A gain whose value follows `automation` from the first rendered frame.
    pub fn automated(automation: Automation) -> Self {
        Self {
            base_gain: automation.value_at(0.0),
            modulation: 0.0,
            automation: Some(automation),
            elapsed_frames: 0,
            curve_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Static gain (or the automation's starting value).
    pub fn gain(&self) -> f32 {
        self.base_gain
    }

    pub fn automation(&self) -> Option<&Automation> {
        self.automation.as_ref()
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match &self.automation {
            Some(curve) => {
                for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
                    let start = self.elapsed_frames as f64 / ctx.sample_rate as f64;
                    let values = &mut self.curve_buffer[..chunk.len()];
                    curve.render(values, start, ctx.sample_rate);

                    for (sample, gain) in chunk.iter_mut().zip(values.iter()) {
                        *sample *= gain + self.modulation;
                    }
                    self.elapsed_frames += chunk.len() as u64;
                }
            }
            None => {
                let gain = self.base_gain + self.modulation;
                for sample in out.iter_mut() {
                    *sample *= gain;
                }
                self.elapsed_frames += out.len() as u64;
            }
        }
    }
}

impl Modulatable for GainNode {
    fn base_param(&self, param: Param) -> Option<f32> {
        match param {
            Param::Gain => Some(self.base_gain),
            Param::Frequency => None,
        }
    }

    fn apply_modulation(&mut self, param: Param, modulation: f32) {
        if param == Param::Gain {
            self.modulation = modulation;
        }
    }
}
