//! Real-world scenario benchmarks.
//!
//! Full preset graphs as the engine runs them, and the mixer with a session
//! and one-shots layered.

mod mixer;
mod presets;

pub use mixer::bench_mixer;
pub use presets::bench_presets;
