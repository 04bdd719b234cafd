//! Error types for the engine and the node graph.

use thiserror::Error;

use crate::graph::arena::NodeId;

/// Errors surfaced to callers of the playback controller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The audio output device/stream could not be acquired or resumed.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("unknown soundscape `{0}`")]
    UnknownSoundscape(String),

    /// A preset produced an invalid topology. Indicates a bug in the preset.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised while wiring or driving a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0:?} does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("node {0:?} already has a downstream connection")]
    AlreadyConnected(NodeId),

    #[error("node {0:?} cannot be connected to itself")]
    SelfConnection(NodeId),

    #[error("node {0:?} is a source and has no audio input")]
    SourceHasNoInput(NodeId),

    #[error("node {0:?} does not expose the requested parameter")]
    UnsupportedParam(NodeId),

    #[error("connecting node {0:?} would create a cycle")]
    Cycle(NodeId),

    #[error("node {0:?} is not a source or oscillator")]
    NotStartable(NodeId),

    #[error("node {0:?} was already started")]
    AlreadyStarted(NodeId),

    #[error("node {0:?} was never started")]
    NotStarted(NodeId),
}
