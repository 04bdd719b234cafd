use crate::{
    dsp::{
        automation::Automation,
        noise::{NoiseBuffer, NoiseColor},
    },
    error::EngineError,
    graph::{Destination, GainNode, Graph, NoiseSourceNode},
    presets::BuildCtx,
};

/// Total length of the effect, in seconds.
pub const DURATION: f64 = 3.0;
pub const ATTACK: f64 = 0.1;
pub const PEAK: f32 = 0.8;
pub const SUSTAIN_END: f32 = 0.6;
/// Length of the exponential tail.
pub const RELEASE: f64 = 0.5;
pub const FLOOR: f32 = 0.01;

/*
Shredder
========

A burst of pink noise shaped like paper being fed through a shredder:

  gain
  0.8 ┤  ╭──────────────╮
  0.6 ┤ ╱                ──────╮
      │╱                        ╲
 0.01 ┼──────────────────────────╲___
      0  0.1              2.5    3.0  s

  0.0 s          immediate 0
  0.0 → 0.1 s    linear to 0.8
  0.1 → 2.5 s    linear to 0.6
  2.5 → 3.0 s    exponential to 0.01

The source is scheduled to stop at 3.0 s, so the graph finishes on its own
and the engine only has to drop it.
*/

/// The amplitude envelope on its own.
pub fn envelope() -> Result<Automation, EngineError> {
    Automation::new(0.0)
        .set_value_at(0.0, 0.0)?
        .linear_ramp_to(PEAK, ATTACK)?
        .linear_ramp_to(SUSTAIN_END, DURATION - RELEASE)?
        .exponential_ramp_to(FLOOR, DURATION)
}

/// Non-looping pink noise through the envelope gain into the sink.
pub fn build(ctx: &BuildCtx) -> Result<Graph, EngineError> {
    let mut graph = Graph::new();

    let buffer = NoiseBuffer::generate(NoiseColor::Pink, ctx.sample_rate, DURATION as f32);
    let mut source = NoiseSourceNode::new(buffer, false);
    source.stop_after(DURATION);

    let source = graph.add(source);
    let gain = graph.add(GainNode::automated(envelope()?));

    graph.connect(source, Destination::Input(gain))?;
    graph.connect(gain, Destination::Sink)?;
    Ok(graph)
}
