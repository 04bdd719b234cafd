use thiserror::Error;

/// Context passed to graph nodes during rendering
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// A parameter input that another node's output can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    /// Filter cutoff/center or oscillator frequency, in Hz.
    Frequency,
    /// Gain multiplier.
    Gain,
}

impl Param {
    pub const COUNT: usize = 2;
    pub const ALL: [Param; Param::COUNT] = [Param::Frequency, Param::Gain];

    pub(crate) fn index(self) -> usize {
        match self {
            Param::Frequency => 0,
            Param::Gain => 1,
        }
    }
}

/// Trait for nodes that expose parameter inputs
pub trait Modulatable {
    /// The un-modulated value, or `None` if the node has no such input.
    fn base_param(&self, param: Param) -> Option<f32>;

    /// Set the effective value to `base + modulation` for the next block.
    fn apply_modulation(&mut self, param: Param, modulation: f32);
}

/// Core trait for audio processing graph nodes
///
/// Sources overwrite `out`; processors transform it in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}

/// Lifecycle of a scheduled source (noise buffer player or oscillator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Created, not yet started. Outputs silence.
    Idle,
    Playing,
    /// Stopped for good. Sources cannot be restarted.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("node is not a source")]
    NotStartable,
    #[error("source was already started")]
    AlreadyStarted,
    #[error("source was never started")]
    NotStarted,
}

/// Start/stop bookkeeping shared by every source node.
#[derive(Debug, Clone)]
pub struct SourceClock {
    state: SourceState,
    stop_after: Option<f64>,
    elapsed_frames: u64,
}

impl SourceClock {
    pub fn new() -> Self {
        Self {
            state: SourceState::Idle,
            stop_after: None,
            elapsed_frames: 0,
        }
    }

    pub fn state(&self) -> SourceState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SourceState::Playing
    }

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            SourceState::Idle => {
                self.state = SourceState::Playing;
                self.elapsed_frames = 0;
                Ok(())
            }
            SourceState::Playing | SourceState::Stopped => Err(LifecycleError::AlreadyStarted),
        }
    }

    /// Stopping twice is fine; stopping before starting is not.
    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            SourceState::Idle => Err(LifecycleError::NotStarted),
            SourceState::Playing | SourceState::Stopped => {
                self.state = SourceState::Stopped;
                Ok(())
            }
        }
    }

    /// End playback from the render path when a source runs out of material.
    /// Only a playing source moves to `Stopped`.
    pub fn finish(&mut self) {
        if self.state == SourceState::Playing {
            self.state = SourceState::Stopped;
        }
    }

    /// Stop automatically once `seconds` of audio have played.
    pub fn stop_after(&mut self, seconds: f64) {
        self.stop_after = Some(seconds.max(0.0));
    }

    /// Advance by one block and return how many leading frames are audible.
    pub fn advance(&mut self, frames: usize, ctx: &RenderCtx) -> usize {
        if self.state != SourceState::Playing {
            return 0;
        }

        let audible = match self.stop_after {
            Some(limit) => {
                let limit_frames = (limit * ctx.sample_rate as f64).round() as u64;
                let remaining = limit_frames.saturating_sub(self.elapsed_frames);
                (remaining.min(frames as u64)) as usize
            }
            None => frames,
        };

        self.elapsed_frames += audible as u64;
        if audible < frames {
            self.state = SourceState::Stopped;
        }
        audible
    }
}

impl Default for SourceClock {
    fn default() -> Self {
        Self::new()
    }
}
