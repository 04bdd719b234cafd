//! The playback controller.

pub mod mixer;
pub mod session;
pub mod sink;

use std::{fmt, sync::Arc};

use crate::{
    config::EngineConfig,
    error::EngineError,
    graph::Graph,
    io::{Backend, CpalBackend},
    presets::{shredder, BuildCtx, SoundscapeKind},
};

use self::{
    mixer::{lock, Mixer, SharedMixer},
    session::PlaybackSession,
    sink::{OutputSink, SinkGain},
};

/*
Playback Controller
===================

  Idle ──play(kind)──→ Playing(kind) ──stop()──→ Idle
                         │    ↑
                         └────┘ play(other): old session out, new session in

At most one `PlaybackSession` exists. `play` builds and starts the new graph
first, then swaps it into the mixer in a single locked write, so old and new
loops never overlap. The old session is torn down after the lock is
released.

The output sink (device stream + atomic gain) is opened on the first
`play`, `play_one_shot` or `set_volume` and then kept for the engine's life.
If it cannot be opened or resumed, `play`/`play_one_shot` return
`Unavailable` and the state does not change.

One-shots (the shredder) live beside the session in the mixer. They stop
themselves; the controller reaps finished ones on its next call.

Status queries (`volume`, `sink_gain`, `active_node_count`, `one_shot_count`)
read values the controller keeps on its own side, so a UI polling them every
frame never contends with the audio thread for the mixer lock.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing(SoundscapeKind),
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => f.write_str("idle"),
            PlaybackState::Playing(kind) => write!(f, "playing {}", kind.id()),
        }
    }
}

/// Clamp a caller-supplied level into [0, 1]. NaN counts as silence.
fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

pub struct SoundscapeEngine {
    config: EngineConfig,
    backend: Box<dyn Backend>,
    mixer: SharedMixer,
    gain: SinkGain,
    sink: Option<OutputSink>,
    state: PlaybackState,
    volume: f32,
    active_nodes: usize,
    one_shots: usize,
    next_session: u64,
}

impl SoundscapeEngine {
    pub fn new(config: EngineConfig, backend: Box<dyn Backend>) -> Result<Self, EngineError> {
        config.validate()?;
        let volume = clamp_volume(config.initial_volume);
        let gain = SinkGain::new(volume);
        let mixer = Mixer::new(config.offline_sample_rate, gain.clone()).shared();

        Ok(Self {
            config,
            backend,
            mixer,
            gain,
            sink: None,
            state: PlaybackState::Idle,
            volume,
            active_nodes: 0,
            one_shots: 0,
            next_session: 1,
        })
    }

    /// Engine on the default cpal output device.
    pub fn with_default_output(config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(config, Box::new(CpalBackend::new()))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Last volume written by `play` or `set_volume`.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Gain the audio thread is currently applying.
    pub fn sink_gain(&self) -> f32 {
        self.sink.as_ref().map_or_else(|| self.gain.get(), OutputSink::gain)
    }

    pub fn is_output_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Sample rate of the open output, if any.
    pub fn sample_rate(&self) -> Option<f32> {
        self.sink.as_ref().map(OutputSink::sample_rate)
    }

    /// Nodes owned by the active session (0 when idle).
    pub fn active_node_count(&self) -> usize {
        self.active_nodes
    }

    /// One-shots in the mixer as of the last control call. Finished ones
    /// count until they are reaped.
    pub fn one_shot_count(&self) -> usize {
        self.one_shots
    }

    /// Inspect the active session while holding the mixer lock.
    ///
    /// Keep `f` short: the audio thread outputs silence while it runs.
    pub fn with_session<R>(&self, f: impl FnOnce(&PlaybackSession) -> R) -> Option<R> {
        lock(&self.mixer).session().map(f)
    }

    /// Replace whatever is playing with `kind` at `volume`.
    pub fn play(&mut self, kind: SoundscapeKind, volume: f32) -> Result<(), EngineError> {
        let sample_rate = self.prepare_output()?;
        self.reap_one_shots();

        let volume = clamp_volume(volume);
        let ctx = BuildCtx::new(sample_rate, self.config.noise_seconds);
        let mut graph = kind.build(&ctx)?;
        graph.start_all()?;

        let session = PlaybackSession::new(self.next_session, kind, graph);
        self.next_session += 1;
        let nodes = session.node_count();

        self.write_gain(volume);
        let previous = lock(&self.mixer).replace_session(Some(session));
        if let Some(old) = previous {
            let old_kind = old.kind();
            let report = old.close();
            tracing::info!(
                kind = old_kind.id(),
                released = report.released,
                failed = report.failed,
                "soundscape replaced"
            );
        }

        self.volume = volume;
        self.active_nodes = nodes;
        self.state = PlaybackState::Playing(kind);
        tracing::info!(kind = kind.id(), nodes, volume, "soundscape started");
        Ok(())
    }

    /// Tear down the active session. Does nothing when idle.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }

        let previous = lock(&self.mixer).replace_session(None);
        if let Some(session) = previous {
            let kind = session.kind();
            let report = session.close();
            tracing::info!(
                kind = kind.id(),
                stopped = report.stopped,
                failed = report.failed,
                released = report.released,
                "soundscape stopped"
            );
        }
        self.state = PlaybackState::Idle;
        self.active_nodes = 0;
        self.reap_one_shots();
    }

    /// Set the sink gain. Clamped to [0, 1]; applies immediately in any state.
    pub fn set_volume(&mut self, level: f32) {
        let volume = clamp_volume(level);
        self.volume = volume;

        if self.sink.is_none() {
            if let Err(err) = self.open_sink() {
                tracing::warn!(error = %err, "output unavailable; volume stored for later");
            }
        }
        self.write_gain(volume);
    }

    /// Caller-level toggle: stop if `kind` is already playing, otherwise play it.
    pub fn toggle(&mut self, kind: SoundscapeKind, volume: f32) -> Result<PlaybackState, EngineError> {
        if self.state == PlaybackState::Playing(kind) {
            self.stop();
        } else {
            self.play(kind, volume)?;
        }
        Ok(self.state)
    }

    /// Fire the shredder effect over whatever is playing.
    pub fn play_one_shot(&mut self) -> Result<(), EngineError> {
        let sample_rate = self.prepare_output()?;
        self.reap_one_shots();

        let ctx = BuildCtx::new(sample_rate, self.config.noise_seconds);
        let mut graph = shredder::build(&ctx)?;
        graph.start_all()?;

        let evicted = lock(&self.mixer).push_one_shot(graph, self.config.max_one_shots);
        match evicted {
            Some(mut oldest) => {
                oldest.stop_all();
                tracing::debug!("oldest one-shot evicted");
            }
            None => self.one_shots += 1,
        }
        tracing::debug!(duration = shredder::DURATION, "one-shot launched");
        Ok(())
    }

    /// Attach a ring buffer that receives every rendered mono sample.
    #[cfg(feature = "rtrb")]
    pub fn attach_tap(&mut self, capacity: usize) -> rtrb::Consumer<f32> {
        let (producer, consumer) = rtrb::RingBuffer::new(capacity);
        lock(&self.mixer).set_tap(Some(producer));
        consumer
    }

    /// Write the sink gain. Before the sink opens, the value waits in the
    /// shared handle the sink will adopt.
    fn write_gain(&self, volume: f32) {
        match &self.sink {
            Some(sink) => sink.set_gain(volume),
            None => self.gain.set(volume),
        }
    }

    fn open_sink(&mut self) -> Result<&OutputSink, EngineError> {
        if self.sink.is_none() {
            let sink = OutputSink::open(
                self.backend.as_mut(),
                Arc::clone(&self.mixer),
                self.gain.clone(),
            )?;
            self.sink = Some(sink);
        }
        self.sink
            .as_ref()
            .ok_or_else(|| EngineError::Unavailable("output sink was not opened".into()))
    }

    /// Open the sink if needed and make sure it is running.
    fn prepare_output(&mut self) -> Result<f32, EngineError> {
        let sink = self.open_sink()?;
        sink.resume()?;
        Ok(sink.sample_rate())
    }

    fn reap_one_shots(&mut self) {
        let finished = lock(&self.mixer).take_finished();
        if !finished.is_empty() {
            tracing::debug!(count = finished.len(), "reaping finished one-shots");
        }
        self.one_shots = self.one_shots.saturating_sub(finished.len());
        release(finished);
    }
}

fn release(graphs: Vec<Graph>) {
    for mut graph in graphs {
        graph.stop_all();
    }
}

impl Drop for SoundscapeEngine {
    fn drop(&mut self) {
        self.stop();
        let one_shots = lock(&self.mixer).take_all_one_shots();
        release(one_shots);
    }
}
