use crate::{
    dsp::noise::NoiseColor,
    graph::{Destination, Graph, NoiseSourceNode},
    presets::BuildCtx,
    GraphError,
};

/// Unfiltered white noise straight into the sink.
pub fn build_white(ctx: &BuildCtx) -> Result<Graph, GraphError> {
    build(NoiseColor::White, ctx)
}

/// Unfiltered pink noise straight into the sink.
pub fn build_pink(ctx: &BuildCtx) -> Result<Graph, GraphError> {
    build(NoiseColor::Pink, ctx)
}

fn build(color: NoiseColor, ctx: &BuildCtx) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    let source = graph.add(NoiseSourceNode::looping(
        color,
        ctx.sample_rate,
        ctx.noise_seconds,
    ));
    graph.connect(source, Destination::Sink)?;
    Ok(graph)
}
