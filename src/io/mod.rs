//! Output backends.
//!
//! A [`Backend`] opens an output stream that pulls audio from the shared
//! [`Mixer`](crate::engine::mixer::Mixer). The engine opens it lazily, once.

use crate::{engine::mixer::SharedMixer, error::EngineError};

/// Real-time output through the default cpal device.
pub mod device;
/// Hardware-free output rendered on demand.
pub mod offline;

pub use device::CpalBackend;
pub use offline::{OfflineBackend, OfflineRenderer};

/// An open output. Dropping it closes the stream.
pub trait OutputStream {
    fn sample_rate(&self) -> f32;

    /// Make sure the stream is running (hosts may suspend idle streams).
    fn resume(&self) -> Result<(), EngineError>;
}

pub trait Backend {
    /// Open the output and start pulling audio from `mixer`.
    fn open(&mut self, mixer: SharedMixer) -> Result<Box<dyn OutputStream>, EngineError>;
}
