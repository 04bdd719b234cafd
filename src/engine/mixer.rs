use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError},
};

use crate::{
    engine::{session::PlaybackSession, sink::SinkGain},
    graph::{Graph, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Mixer
=====

The mixer is everything the audio thread needs to produce a block:

  session ──┐
  one-shot ─┼─→ Σ ──→ × sink gain ──→ clamp ±1 ──→ every output channel
  one-shot ─┘                                  └─→ visualisation tap

It is shared as `Arc<Mutex<Mixer>>`. The control thread locks it only to
swap a session in or out or to add or reap a one-shot. The sink gain is an
atomic read once per block, so volume changes and status queries never touch
the lock.

Backends pull audio through a `CallbackRenderer`, which uses `try_lock`. If
the control thread holds the lock at that instant, the callback repeats the
last block it rendered instead of waiting:

  callback ──try_lock──┬─ Ok ─────────→ render, remember the block
                       └─ WouldBlock ─→ replay the remembered block

Graphs are torn down on the control thread: a session or one-shot leaves
the mixer first and is stopped and dropped after the lock is released.
*/

pub type SharedMixer = Arc<Mutex<Mixer>>;

/// Lock the mixer, recovering the data if a previous holder panicked.
pub fn lock(mixer: &SharedMixer) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Mixer {
    gain: SinkGain,
    sample_rate: f32,
    session: Option<PlaybackSession>,
    one_shots: Vec<Graph>,
    block: Vec<f32>,
    scratch: Vec<f32>,
    #[cfg(feature = "rtrb")]
    tap: Option<rtrb::Producer<f32>>,
}

impl Mixer {
    pub fn new(sample_rate: f32, gain: SinkGain) -> Self {
        Self {
            gain,
            sample_rate,
            session: None,
            one_shots: Vec::new(),
            block: vec![0.0; MAX_BLOCK_SIZE],
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            #[cfg(feature = "rtrb")]
            tap: None,
        }
    }

    pub fn shared(self) -> SharedMixer {
        Arc::new(Mutex::new(self))
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Install `session` (or none) and hand back the previous one.
    pub(crate) fn replace_session(
        &mut self,
        session: Option<PlaybackSession>,
    ) -> Option<PlaybackSession> {
        mem::replace(&mut self.session, session)
    }

    /// Add a started one-shot graph. When `capacity` is reached the oldest
    /// one-shot is evicted and returned for teardown.
    pub(crate) fn push_one_shot(&mut self, graph: Graph, capacity: usize) -> Option<Graph> {
        let evicted = if self.one_shots.len() >= capacity.max(1) {
            Some(self.one_shots.remove(0))
        } else {
            None
        };
        self.one_shots.push(graph);
        evicted
    }

    /// Remove one-shots whose sources have all stopped.
    pub(crate) fn take_finished(&mut self) -> Vec<Graph> {
        let (finished, live): (Vec<Graph>, Vec<Graph>) = mem::take(&mut self.one_shots)
            .into_iter()
            .partition(|graph| !graph.is_playing());
        self.one_shots = live;
        finished
    }

    /// Remove every one-shot, finished or not.
    pub(crate) fn take_all_one_shots(&mut self) -> Vec<Graph> {
        mem::take(&mut self.one_shots)
    }

    #[cfg(feature = "rtrb")]
    pub fn set_tap(&mut self, tap: Option<rtrb::Producer<f32>>) {
        self.tap = tap;
    }

    /// Render mono samples into `out`, overwriting it.
    pub fn render_mono(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(chunk.len());
            chunk.copy_from_slice(&self.block[..chunk.len()]);
        }
    }

    /// Render into an interleaved buffer of `channels` channels.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            self.render_block(frames);

            let offset = frames_written * channels;
            for (i, &sample) in self.block[..frames].iter().enumerate() {
                let frame = offset + i * channels;
                data[frame..frame + channels].fill(sample);
            }
            frames_written += frames;
        }

        // Trailing partial frame, if the host ever hands us one
        data[total_frames * channels..].fill(0.0);
    }

    fn render_block(&mut self, frames: usize) {
        let ctx = RenderCtx::new(self.sample_rate);
        let gain = self.gain.get();
        let Mixer {
            session,
            one_shots,
            block,
            scratch,
            ..
        } = &mut *self;

        let block = &mut block[..frames];
        block.fill(0.0);

        let graphs = session
            .iter_mut()
            .map(PlaybackSession::graph_mut)
            .chain(one_shots.iter_mut());
        for graph in graphs {
            let scratch = &mut scratch[..frames];
            graph.render_block(scratch, &ctx);
            for (out, &sample) in block.iter_mut().zip(scratch.iter()) {
                *out += sample;
            }
        }

        for sample in block.iter_mut() {
            *sample = (*sample * gain).clamp(-1.0, 1.0);
        }

        #[cfg(feature = "rtrb")]
        if let Some(tap) = self.tap.as_mut() {
            for &sample in self.block[..frames].iter() {
                if tap.push(sample).is_err() {
                    break;
                }
            }
        }
    }
}

/// The audio-thread side of a [`SharedMixer`]. Never blocks.
pub struct CallbackRenderer {
    mixer: SharedMixer,
    last: Vec<f32>,
    last_channels: usize,
}

impl CallbackRenderer {
    pub fn new(mixer: SharedMixer) -> Self {
        Self {
            mixer,
            last: Vec::with_capacity(MAX_BLOCK_SIZE * 2),
            last_channels: 0,
        }
    }

    /// Fill an interleaved buffer from the mixer, or with the previous block
    /// if the mixer is locked elsewhere.
    pub fn fill(&mut self, data: &mut [f32], channels: usize) {
        match self.mixer.try_lock() {
            Ok(mut mixer) => mixer.render_interleaved(data, channels),
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().render_interleaved(data, channels)
            }
            Err(TryLockError::WouldBlock) => {
                self.replay(data, channels);
                return;
            }
        }

        self.last.clear();
        self.last.extend_from_slice(data);
        self.last_channels = channels;
    }

    fn replay(&self, data: &mut [f32], channels: usize) {
        if self.last.is_empty() || self.last_channels != channels {
            data.fill(0.0);
            return;
        }
        for (out, &sample) in data.iter_mut().zip(self.last.iter().cycle()) {
            *out = sample;
        }
    }
}
