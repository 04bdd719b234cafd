use crate::{
    dsp::noise::{NoiseBuffer, NoiseColor},
    graph::node::{GraphNode, LifecycleError, RenderCtx, SourceClock, SourceState},
};

/// Plays a pre-generated [`NoiseBuffer`], optionally looping it.
///
/// The buffer is owned exclusively by this node and never mutated.
pub struct NoiseSourceNode {
    buffer: NoiseBuffer,
    looping: bool,
    position: usize,
    clock: SourceClock,
}

impl NoiseSourceNode {
    pub fn new(buffer: NoiseBuffer, looping: bool) -> Self {
        Self {
            buffer,
            looping,
            position: 0,
            clock: SourceClock::new(),
        }
    }

    /// Generate a fresh buffer of `color` noise and wrap it in a looping node.
    pub fn looping(color: NoiseColor, sample_rate: f32, seconds: f32) -> Self {
        Self::new(NoiseBuffer::generate(color, sample_rate, seconds), true)
    }

    pub fn color(&self) -> NoiseColor {
        self.buffer.color()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn buffer(&self) -> &NoiseBuffer {
        &self.buffer
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

impl GraphNode for NoiseSourceNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let audible = self.clock.advance(out.len(), ctx);
        let samples = self.buffer.samples();
        let mut written = 0;

        while written < audible {
            if self.position >= samples.len() {
                if self.looping {
                    self.position = 0;
                } else {
                    self.clock.finish();
                    break;
                }
            }

            let run = (audible - written).min(samples.len() - self.position);
            out[written..written + run]
                .copy_from_slice(&samples[self.position..self.position + run]);
            self.position += run;
            written += run;
        }

        out[written..].fill(0.0);
    }
}
