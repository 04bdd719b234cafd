use crate::{
    dsp::noise::NoiseColor,
    graph::{Destination, FilterNode, GainNode, Graph, NoiseSourceNode, OscNode, Param},
    presets::BuildCtx,
    GraphError,
};

pub const CUTOFF_HZ: f32 = 500.0;
pub const Q: f32 = 0.5;
/// One swell every ~6.7 s.
pub const SWELL_HZ: f32 = 0.15;
pub const SWELL_DEPTH_HZ: f32 = 400.0;

/*
  NoiseSource(pink) ──→ Lowpass(500 Hz, Q 0.5) ──→ SINK
                              ↑ frequency
  Sine(0.15 Hz) ──→ Gain(400) ┘

The cutoff rolls between 100 Hz and 900 Hz: dark and distant at the bottom
of the swell, bright as the wave breaks.
*/
pub fn build(ctx: &BuildCtx) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    let source = graph.add(NoiseSourceNode::looping(
        NoiseColor::Pink,
        ctx.sample_rate,
        ctx.noise_seconds,
    ));
    let lowpass = graph.add(FilterNode::lowpass(CUTOFF_HZ).with_q(Q));
    let lfo = graph.add(OscNode::sine(SWELL_HZ));
    let depth = graph.add(GainNode::new(SWELL_DEPTH_HZ));

    graph.connect(source, Destination::Input(lowpass))?;
    graph.connect(lowpass, Destination::Sink)?;
    graph.connect(lfo, Destination::Input(depth))?;
    graph.connect(depth, Destination::Param(lowpass, Param::Frequency))?;
    Ok(graph)
}
