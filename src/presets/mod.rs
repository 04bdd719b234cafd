//! Soundscape recipes.
//!
//! Each preset is a function from a [`BuildCtx`] to a freshly wired
//! [`Graph`] whose outputs end at [`Destination::Sink`](crate::graph::Destination).
//! Presets never start their sources; the engine does that once the graph
//! is installed.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::EngineError, graph::Graph, GraphError};

pub mod bowl;
pub mod forest;
pub mod noise;
pub mod ocean;
pub mod rain;
pub mod shredder;
pub mod stream;

/// Everything a preset needs to know about the output it will play into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildCtx {
    pub sample_rate: f32,
    /// Length of freshly generated noise buffers, in seconds.
    pub noise_seconds: f32,
}

impl BuildCtx {
    pub fn new(sample_rate: f32, noise_seconds: f32) -> Self {
        Self {
            sample_rate,
            noise_seconds,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundscapeKind {
    Rain,
    WhiteNoise,
    PinkNoise,
    Ocean,
    Forest,
    Stream,
    Bowl,
}

impl SoundscapeKind {
    pub const ALL: [SoundscapeKind; 7] = [
        SoundscapeKind::Ocean,
        SoundscapeKind::Forest,
        SoundscapeKind::Stream,
        SoundscapeKind::Rain,
        SoundscapeKind::Bowl,
        SoundscapeKind::WhiteNoise,
        SoundscapeKind::PinkNoise,
    ];

    /// Stable identifier used on the command line and in config files.
    pub fn id(self) -> &'static str {
        match self {
            SoundscapeKind::Rain => "rain",
            SoundscapeKind::WhiteNoise => "white-noise",
            SoundscapeKind::PinkNoise => "pink-noise",
            SoundscapeKind::Ocean => "ocean",
            SoundscapeKind::Forest => "forest",
            SoundscapeKind::Stream => "stream",
            SoundscapeKind::Bowl => "bowl",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SoundscapeKind::Rain => "Gentle Rain",
            SoundscapeKind::WhiteNoise => "Pure Focus",
            SoundscapeKind::PinkNoise => "Deep Rest",
            SoundscapeKind::Ocean => "Ocean Waves",
            SoundscapeKind::Forest => "Forest Wind",
            SoundscapeKind::Stream => "Mountain Stream",
            SoundscapeKind::Bowl => "Singing Bowl",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SoundscapeKind::Rain => "Soft rainfall to wash away anxiety.",
            SoundscapeKind::WhiteNoise => "Consistent white noise for deep work.",
            SoundscapeKind::PinkNoise => "Deeper, lower frequency noise.",
            SoundscapeKind::Ocean => "Rhythmic waves to calm your mind.",
            SoundscapeKind::Forest => "Gentle breeze rustling through trees.",
            SoundscapeKind::Stream => "Steady flowing water for focus.",
            SoundscapeKind::Bowl => "Deep resonance for meditation.",
        }
    }

    /// Build this soundscape's graph. Sources are left unstarted.
    pub fn build(self, ctx: &BuildCtx) -> Result<Graph, GraphError> {
        match self {
            SoundscapeKind::Rain => rain::build(ctx),
            SoundscapeKind::WhiteNoise => noise::build_white(ctx),
            SoundscapeKind::PinkNoise => noise::build_pink(ctx),
            SoundscapeKind::Ocean => ocean::build(ctx),
            SoundscapeKind::Forest => forest::build(ctx),
            SoundscapeKind::Stream => stream::build(ctx),
            SoundscapeKind::Bowl => bowl::build(ctx),
        }
    }
}

impl fmt::Display for SoundscapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for SoundscapeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        SoundscapeKind::ALL
            .into_iter()
            .find(|kind| kind.id() == needle)
            .ok_or_else(|| EngineError::UnknownSoundscape(s.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::graph::{Destination, Graph, NodeId};

    pub fn sink_feeds(graph: &Graph) -> Vec<NodeId> {
        graph
            .ids()
            .filter(|&id| graph.destination(id) == Some(Destination::Sink))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for kind in SoundscapeKind::ALL {
            assert_eq!(kind.id().parse::<SoundscapeKind>().ok(), Some(kind));
        }
        assert_eq!(
            "White_Noise".parse::<SoundscapeKind>().ok(),
            Some(SoundscapeKind::WhiteNoise)
        );
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = "thunderstorm".parse::<SoundscapeKind>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownSoundscape(ref id) if id == "thunderstorm"));
    }

    #[test]
    fn every_preset_builds_and_reaches_the_sink() {
        let ctx = BuildCtx::new(8_000.0, 0.25);
        for kind in SoundscapeKind::ALL {
            let graph = kind.build(&ctx).expect("preset builds");
            assert!(!graph.is_empty(), "{kind:?} has no nodes");
            assert!(
                !test_support::sink_feeds(&graph).is_empty(),
                "{kind:?} never reaches the sink"
            );
            assert!(!graph.is_playing(), "{kind:?} started its own sources");
        }
    }
}
