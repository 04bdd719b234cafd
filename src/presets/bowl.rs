use crate::{
    graph::{Destination, GainNode, Graph, OscNode},
    presets::BuildCtx,
    GraphError,
};

/// Fundamental, its 2 Hz beat partner, and the third harmonic.
pub const PARTIALS_HZ: [f32; 3] = [180.0, 182.0, 540.0];
pub const PARTIAL_GAIN: f32 = 0.2;

/// Three sine partials, each through its own gain, summed at the sink.
pub fn build(_ctx: &BuildCtx) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    for frequency in PARTIALS_HZ {
        let osc = graph.add(OscNode::sine(frequency));
        let level = graph.add(GainNode::new(PARTIAL_GAIN));
        graph.connect(osc, Destination::Input(level))?;
        graph.connect(level, Destination::Sink)?;
    }
    Ok(graph)
}
