use crate::{
    dsp::noise::NoiseColor,
    graph::{Destination, FilterNode, Graph, NoiseSourceNode},
    presets::BuildCtx,
    GraphError,
};

/// Lowpass cutoff. Half of rain's 800 Hz so the stream sits lower and
/// steadier; the highpass then trims the rumble below 200 Hz.
pub const LOWPASS_HZ: f32 = 400.0;
pub const HIGHPASS_HZ: f32 = 200.0;

/// Pink noise band-limited to roughly 200 to 400 Hz.
pub fn build(ctx: &BuildCtx) -> Result<Graph, GraphError> {
    build_with(ctx, LOWPASS_HZ)
}

/// Same chain with a custom lowpass cutoff.
pub fn build_with(ctx: &BuildCtx, lowpass_hz: f32) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    let source = graph.add(NoiseSourceNode::looping(
        NoiseColor::Pink,
        ctx.sample_rate,
        ctx.noise_seconds,
    ));
    let lowpass = graph.add(FilterNode::lowpass(lowpass_hz));
    let highpass = graph.add(FilterNode::highpass(HIGHPASS_HZ));

    graph.connect(source, Destination::Input(lowpass))?;
    graph.connect(lowpass, Destination::Input(highpass))?;
    graph.connect(highpass, Destination::Sink)?;
    Ok(graph)
}
