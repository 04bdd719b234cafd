use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use crate::{
    engine::mixer::{lock, CallbackRenderer, SharedMixer},
    error::EngineError,
    io::{Backend, OutputStream},
};

/// A backend with no device behind it.
///
/// Audio is produced only when the [`OfflineRenderer`] handle asks for it,
/// which makes engine behavior deterministic in tests and lets the same
/// graphs be bounced faster than real time.
///
/// ```
/// use oasis_dsp::{io::OfflineBackend, EngineConfig, SoundscapeEngine, SoundscapeKind};
///
/// let backend = OfflineBackend::new(48_000.0);
/// let renderer = backend.renderer();
/// let mut engine = SoundscapeEngine::new(EngineConfig::default(), Box::new(backend)).unwrap();
///
/// engine.play(SoundscapeKind::Rain, 0.5).unwrap();
/// let samples = renderer.render(4_800);
/// assert_eq!(samples.len(), 4_800 * 2);
/// ```
pub struct OfflineBackend {
    sample_rate: f32,
    channels: usize,
    failure: Option<String>,
    renderer: OfflineRenderer,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            channels: 2,
            failure: None,
            renderer: OfflineRenderer {
                callback: Arc::new(Mutex::new(None)),
                fail_resume: Arc::new(AtomicBool::new(false)),
                channels: 2,
            },
        }
    }

    /// A backend whose `open` always fails with [`EngineError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut backend = Self::new(48_000.0);
        backend.failure = Some(reason.into());
        backend
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels.max(1);
        self.renderer.channels = self.channels;
        self
    }

    /// Handle for pulling audio once the engine has opened this backend.
    pub fn renderer(&self) -> OfflineRenderer {
        self.renderer.clone()
    }
}

impl Backend for OfflineBackend {
    fn open(&mut self, mixer: SharedMixer) -> Result<Box<dyn OutputStream>, EngineError> {
        if let Some(reason) = &self.failure {
            return Err(EngineError::Unavailable(reason.clone()));
        }

        lock(&mixer).set_sample_rate(self.sample_rate);
        *self
            .renderer
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(CallbackRenderer::new(mixer));

        tracing::info!(
            sample_rate = self.sample_rate,
            channels = self.channels,
            "offline output opened"
        );

        Ok(Box::new(OfflineStream {
            sample_rate: self.sample_rate,
            fail_resume: Arc::clone(&self.renderer.fail_resume),
        }))
    }
}

struct OfflineStream {
    sample_rate: f32,
    fail_resume: Arc<AtomicBool>,
}

impl OutputStream for OfflineStream {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn resume(&self) -> Result<(), EngineError> {
        if self.fail_resume.load(Ordering::Relaxed) {
            return Err(EngineError::Unavailable("offline stream refused to resume".into()));
        }
        Ok(())
    }
}

/// Pulls audio from an engine opened on an [`OfflineBackend`].
///
/// Rendering goes through the same non-blocking path as a device callback.
#[derive(Clone)]
pub struct OfflineRenderer {
    callback: Arc<Mutex<Option<CallbackRenderer>>>,
    fail_resume: Arc<AtomicBool>,
    channels: usize,
}

impl OfflineRenderer {
    /// True once the engine has opened the backend.
    pub fn is_open(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Render `frames` interleaved frames. Silence if the output is not open.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        self.pull(frames, self.channels)
    }

    /// Render `frames` mono frames.
    pub fn render_mono(&self, frames: usize) -> Vec<f32> {
        self.pull(frames, 1)
    }

    fn pull(&self, frames: usize, channels: usize) -> Vec<f32> {
        let mut data = vec![0.0f32; frames * channels];
        let mut slot = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(callback) = slot.as_mut() {
            callback.fill(&mut data, channels);
        }
        data
    }

    /// Make every later `resume` fail, as a suspended host context would.
    pub fn set_resume_failure(&self, fail: bool) {
        self.fail_resume.store(fail, Ordering::Relaxed);
    }
}
