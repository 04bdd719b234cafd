use crate::{
    dsp::noise::NoiseColor,
    graph::{Destination, FilterNode, GainNode, Graph, NoiseSourceNode, OscNode, Param},
    presets::BuildCtx,
    GraphError,
};

pub const CENTER_HZ: f32 = 400.0;
pub const Q: f32 = 0.5;
pub const DRIFT_HZ: f32 = 0.1;
pub const DRIFT_DEPTH_HZ: f32 = 200.0;

/// Pink noise through a wide bandpass whose center drifts 200..600 Hz
/// every ten seconds. Slower and shallower than the ocean swell.
pub fn build(ctx: &BuildCtx) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    let source = graph.add(NoiseSourceNode::looping(
        NoiseColor::Pink,
        ctx.sample_rate,
        ctx.noise_seconds,
    ));
    let bandpass = graph.add(FilterNode::bandpass(CENTER_HZ).with_q(Q));
    let lfo = graph.add(OscNode::sine(DRIFT_HZ));
    let depth = graph.add(GainNode::new(DRIFT_DEPTH_HZ));

    graph.connect(source, Destination::Input(bandpass))?;
    graph.connect(bandpass, Destination::Sink)?;
    graph.connect(lfo, Destination::Input(depth))?;
    graph.connect(depth, Destination::Param(bandpass, Param::Frequency))?;
    Ok(graph)
}
