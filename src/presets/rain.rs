use crate::{
    dsp::noise::NoiseColor,
    graph::{Destination, FilterNode, Graph, NoiseSourceNode},
    presets::BuildCtx,
    GraphError,
};

pub const CUTOFF_HZ: f32 = 800.0;

/// Pink noise through a static 800 Hz lowpass.
pub fn build(ctx: &BuildCtx) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    let source = graph.add(NoiseSourceNode::looping(
        NoiseColor::Pink,
        ctx.sample_rate,
        ctx.noise_seconds,
    ));
    let lowpass = graph.add(FilterNode::lowpass(CUTOFF_HZ));

    graph.connect(source, Destination::Input(lowpass))?;
    graph.connect(lowpass, Destination::Sink)?;
    Ok(graph)
}
