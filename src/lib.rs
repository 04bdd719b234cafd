pub mod config;
pub mod dsp;
pub mod engine; // Playback controller, mixer and output sink
pub mod error;
pub mod graph; // Arena-backed signal node graph
pub mod io;
pub mod presets; // Soundscape recipes and the shredder one-shot

pub use config::EngineConfig;
pub use engine::{PlaybackState, SoundscapeEngine};
pub use error::{EngineError, GraphError};
pub use presets::SoundscapeKind;

pub const MAX_BLOCK_SIZE: usize = 2048;
