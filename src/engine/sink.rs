use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crate::{
    engine::mixer::SharedMixer,
    error::EngineError,
    io::{Backend, OutputStream},
};

/// Sink gain shared with the audio thread as the bits of an `f32`.
///
/// Writes never wait on the mixer lock, so a volume change can not make the
/// device callback miss a block.
#[derive(Debug, Clone)]
pub struct SinkGain(Arc<AtomicU32>);

impl SinkGain {
    pub fn new(gain: f32) -> Self {
        Self(Arc::new(AtomicU32::new(gain.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, gain: f32) {
        self.0.store(gain.to_bits(), Ordering::Relaxed);
    }
}

/// The single gain stage every session and one-shot plays through.
///
/// Holding the sink keeps the output stream open.
pub struct OutputSink {
    gain: SinkGain,
    stream: Box<dyn OutputStream>,
}

impl OutputSink {
    pub fn open(
        backend: &mut dyn Backend,
        mixer: SharedMixer,
        gain: SinkGain,
    ) -> Result<Self, EngineError> {
        let stream = backend.open(mixer)?;
        Ok(Self { gain, stream })
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain.set(gain);
    }

    pub fn gain(&self) -> f32 {
        self.gain.get()
    }

    pub fn sample_rate(&self) -> f32 {
        self.stream.sample_rate()
    }

    pub fn resume(&self) -> Result<(), EngineError> {
        self.stream.resume()
    }
}
