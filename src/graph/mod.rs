//! Composable building blocks for constructing soundscape graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a soundscape
//! needs: start/stop lifecycle, parameter inputs that other nodes can
//! drive, and block-based rendering. The `arena` module owns nodes and
//! their connections.

/// Node arena, connections, render order and teardown.
pub mod arena;
/// State-variable filter node with a modulatable frequency input.
pub mod filter;
/// Static or automated gain.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// Buffer player for pre-generated noise.
pub mod noise;
/// Audio-rate and LFO oscillators.
pub mod oscillator;

pub use arena::{Destination, Graph, Node, NodeId, Teardown};
pub use filter::FilterNode;
pub use gain::GainNode;
pub use node::{GraphNode, Modulatable, Param, RenderCtx, SourceState};
pub use noise::NoiseSourceNode;
pub use oscillator::OscNode;
