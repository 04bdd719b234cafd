use std::mem;

use crate::{
    dsp::modulate::block_average,
    error::GraphError,
    graph::{
        filter::FilterNode,
        gain::GainNode,
        node::{GraphNode, LifecycleError, Modulatable, Param, RenderCtx, SourceState},
        noise::NoiseSourceNode,
        oscillator::OscNode,
    },
    MAX_BLOCK_SIZE,
};

/*
Node Arena
==========

A soundscape is a handful of nodes wired into a small tree:

  NoiseSource ──→ Lowpass ──→ SINK
                     ↑ frequency
  Oscillator ──→ Gain ┘

The graph owns every node in a flat arena (`Vec`) and hands out `NodeId`s.
Each node has AT MOST ONE downstream connection, which is one of:

  Input(id)        the audio input of another node
  Param(id, p)     a parameter input (filter frequency, gain, ...)
  Sink             the engine's output sink

Because every edge points "down" and there is one edge per node, cycles are
found by walking the downstream chain from the target; the render order is
a topological sort recomputed whenever a connection is made.

Rendering a block:
  1. Clear every node's buffer (it accumulates that node's audio input).
  2. Visit nodes in topological order. Apply any summed parameter
     modulation, render in place, then hand the result downstream: add it
     into the next node's buffer, average it into a parameter input, or add
     it into the caller's output.

Teardown is structural: `stop_all` stops every source it can, logs and
skips those it cannot, and then releases the whole arena.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a node's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Input(NodeId),
    Param(NodeId, Param),
    Sink,
}

/// Every node variant the graph can hold.
pub enum Node {
    NoiseSource(NoiseSourceNode),
    Filter(FilterNode),
    Oscillator(OscNode),
    Gain(GainNode),
}

impl Node {
    /// Sources produce audio without an input and can be started/stopped.
    pub fn is_source(&self) -> bool {
        matches!(self, Node::NoiseSource(_) | Node::Oscillator(_))
    }

    /// `None` for filters and gains, which have no lifecycle.
    pub fn source_state(&self) -> Option<SourceState> {
        match self {
            Node::NoiseSource(node) => Some(node.state()),
            Node::Oscillator(node) => Some(node.state()),
            Node::Filter(_) | Node::Gain(_) => None,
        }
    }

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        match self {
            Node::NoiseSource(node) => node.start(),
            Node::Oscillator(node) => node.start(),
            Node::Filter(_) | Node::Gain(_) => Err(LifecycleError::NotStartable),
        }
    }

    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        match self {
            Node::NoiseSource(node) => node.stop(),
            Node::Oscillator(node) => node.stop(),
            Node::Filter(_) | Node::Gain(_) => Err(LifecycleError::NotStartable),
        }
    }

    pub fn as_noise_source(&self) -> Option<&NoiseSourceNode> {
        match self {
            Node::NoiseSource(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&FilterNode> {
        match self {
            Node::Filter(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_oscillator(&self) -> Option<&OscNode> {
        match self {
            Node::Oscillator(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_gain(&self) -> Option<&GainNode> {
        match self {
            Node::Gain(node) => Some(node),
            _ => None,
        }
    }

    fn modulatable_mut(&mut self) -> Option<&mut dyn Modulatable> {
        match self {
            Node::NoiseSource(_) => None,
            Node::Filter(node) => Some(node),
            Node::Oscillator(node) => Some(node),
            Node::Gain(node) => Some(node),
        }
    }

    fn exposes(&self, param: Param) -> bool {
        match self {
            Node::NoiseSource(_) => false,
            Node::Filter(node) => node.base_param(param).is_some(),
            Node::Oscillator(node) => node.base_param(param).is_some(),
            Node::Gain(node) => node.base_param(param).is_some(),
        }
    }
}

impl GraphNode for Node {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match self {
            Node::NoiseSource(node) => node.render_block(out, ctx),
            Node::Filter(node) => node.render_block(out, ctx),
            Node::Oscillator(node) => node.render_block(out, ctx),
            Node::Gain(node) => node.render_block(out, ctx),
        }
    }
}

impl From<NoiseSourceNode> for Node {
    fn from(node: NoiseSourceNode) -> Self {
        Node::NoiseSource(node)
    }
}

impl From<FilterNode> for Node {
    fn from(node: FilterNode) -> Self {
        Node::Filter(node)
    }
}

impl From<OscNode> for Node {
    fn from(node: OscNode) -> Self {
        Node::Oscillator(node)
    }
}

impl From<GainNode> for Node {
    fn from(node: GainNode) -> Self {
        Node::Gain(node)
    }
}

/// Outcome of [`Graph::stop_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Teardown {
    /// Sources that stopped (or were already stopped).
    pub stopped: usize,
    /// Sources whose stop failed; they were released anyway.
    pub failed: usize,
    /// Every node removed from the arena.
    pub released: usize,
}

struct Slot {
    node: Node,
    downstream: Option<Destination>,
    buffer: Vec<f32>,
    modulation: [f32; Param::COUNT],
    modulated: [bool; Param::COUNT],
}

#[derive(Default)]
pub struct Graph {
    slots: Vec<Slot>,
    order: Vec<usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let index = self.slots.len();
        self.slots.push(Slot {
            node: node.into(),
            downstream: None,
            buffer: vec![0.0; MAX_BLOCK_SIZE],
            modulation: [0.0; Param::COUNT],
            modulated: [false; Param::COUNT],
        });
        self.order.push(index);
        NodeId(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.slots.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).map(|slot| &slot.node)
    }

    pub fn destination(&self, id: NodeId) -> Option<Destination> {
        self.slots.get(id.0).and_then(|slot| slot.downstream)
    }

    /// Nodes whose output feeds `id`, through either its input or a parameter.
    pub fn upstream_of(&self, id: NodeId) -> Vec<NodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| match slot.downstream {
                Some(Destination::Input(target)) | Some(Destination::Param(target, _)) => {
                    target == id
                }
                _ => false,
            })
            .map(|(index, _)| NodeId(index))
            .collect()
    }

    pub fn connect(&mut self, from: NodeId, to: Destination) -> Result<(), GraphError> {
        let source = self.slots.get(from.0).ok_or(GraphError::UnknownNode(from))?;
        if source.downstream.is_some() {
            return Err(GraphError::AlreadyConnected(from));
        }

        match to {
            Destination::Sink => {}
            Destination::Input(target) => {
                let node = &self.slots.get(target.0).ok_or(GraphError::UnknownNode(target))?.node;
                if target == from {
                    return Err(GraphError::SelfConnection(from));
                }
                if node.is_source() {
                    return Err(GraphError::SourceHasNoInput(target));
                }
                self.check_acyclic(from, target)?;
            }
            Destination::Param(target, param) => {
                let node = &self.slots.get(target.0).ok_or(GraphError::UnknownNode(target))?.node;
                if target == from {
                    return Err(GraphError::SelfConnection(from));
                }
                if !node.exposes(param) {
                    return Err(GraphError::UnsupportedParam(target));
                }
                self.check_acyclic(from, target)?;
                self.slots[target.0].modulated[param.index()] = true;
            }
        }

        self.slots[from.0].downstream = Some(to);
        self.rebuild_order();
        Ok(())
    }

    fn check_acyclic(&self, from: NodeId, target: NodeId) -> Result<(), GraphError> {
        // Each node has one downstream edge, so the chain below `target` is a path
        let mut cursor = Some(target);
        let mut steps = 0;
        while let Some(id) = cursor {
            if id == from {
                return Err(GraphError::Cycle(from));
            }
            steps += 1;
            if steps > self.slots.len() {
                return Err(GraphError::Cycle(from));
            }
            cursor = match self.slots[id.0].downstream {
                Some(Destination::Input(next)) | Some(Destination::Param(next, _)) => Some(next),
                _ => None,
            };
        }
        Ok(())
    }

    fn rebuild_order(&mut self) {
        let mut pending = vec![0usize; self.slots.len()];
        for slot in &self.slots {
            if let Some(Destination::Input(t)) | Some(Destination::Param(t, _)) = slot.downstream {
                pending[t.0] += 1;
            }
        }

        let mut ready: Vec<usize> = (0..self.slots.len()).filter(|&i| pending[i] == 0).collect();
        ready.reverse();
        self.order.clear();

        while let Some(index) = ready.pop() {
            self.order.push(index);
            if let Some(Destination::Input(t)) | Some(Destination::Param(t, _)) =
                self.slots[index].downstream
            {
                pending[t.0] -= 1;
                if pending[t.0] == 0 {
                    ready.push(t.0);
                }
            }
        }

        debug_assert_eq!(self.order.len(), self.slots.len(), "graph contains a cycle");
    }

    /// Start a noise source or oscillator.
    pub fn start(&mut self, id: NodeId) -> Result<(), GraphError> {
        let slot = self.slots.get_mut(id.0).ok_or(GraphError::UnknownNode(id))?;
        slot.node.start().map_err(|err| match err {
            LifecycleError::NotStartable => GraphError::NotStartable(id),
            LifecycleError::AlreadyStarted => GraphError::AlreadyStarted(id),
            LifecycleError::NotStarted => GraphError::NotStarted(id),
        })
    }

    /// Start every source that has not been started yet. Returns how many started.
    pub fn start_all(&mut self) -> Result<usize, GraphError> {
        let idle: Vec<NodeId> = self
            .ids()
            .filter(|&id| self.slots[id.0].node.source_state() == Some(SourceState::Idle))
            .collect();
        for &id in &idle {
            self.start(id)?;
        }
        Ok(idle.len())
    }

    /// Stop a single source. Stopping an already stopped source is not an error.
    pub fn stop(&mut self, id: NodeId) -> Result<(), GraphError> {
        let slot = self.slots.get_mut(id.0).ok_or(GraphError::UnknownNode(id))?;
        slot.node.stop().map_err(|err| match err {
            LifecycleError::NotStartable => GraphError::NotStartable(id),
            LifecycleError::AlreadyStarted => GraphError::AlreadyStarted(id),
            LifecycleError::NotStarted => GraphError::NotStarted(id),
        })
    }

    /// Stop every source, then release every node.
    ///
    /// A source that fails to stop is logged and released with the rest.
    /// Calling this on an already emptied graph does nothing.
    pub fn stop_all(&mut self) -> Teardown {
        let mut report = Teardown::default();

        for index in 0..self.slots.len() {
            if !self.slots[index].node.is_source() {
                continue;
            }
            match self.stop(NodeId(index)) {
                Ok(()) => report.stopped += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(node = index, error = %err, "failed to stop node during teardown");
                }
            }
        }

        report.released = self.slots.len();
        self.slots.clear();
        self.order.clear();
        report
    }

    /// True while any source is still playing.
    pub fn is_playing(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.node.source_state() == Some(SourceState::Playing))
    }

    /// Mutable access for scheduling (e.g. [`NoiseSourceNode::stop_after`]).
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).map(|slot| &mut slot.node)
    }

    /// Render the sum of everything connected to the sink into `out`.
    pub fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk, ctx);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = out.len();
        out.fill(0.0);

        for slot in &mut self.slots {
            slot.buffer[..frames].fill(0.0);
        }

        for step in 0..self.order.len() {
            let index = self.order[step];
            let slot = &mut self.slots[index];

            for param in Param::ALL {
                let p = param.index();
                if slot.modulated[p] {
                    if let Some(node) = slot.node.modulatable_mut() {
                        node.apply_modulation(param, slot.modulation[p]);
                    }
                    slot.modulation[p] = 0.0;
                }
            }

            // Take the buffer so downstream slots can be borrowed mutably
            let mut buffer = mem::take(&mut slot.buffer);
            slot.node.render_block(&mut buffer[..frames], ctx);
            let downstream = slot.downstream;

            match downstream {
                Some(Destination::Input(target)) => {
                    let input = &mut self.slots[target.0].buffer[..frames];
                    for (dst, src) in input.iter_mut().zip(&buffer[..frames]) {
                        *dst += *src;
                    }
                }
                Some(Destination::Param(target, param)) => {
                    self.slots[target.0].modulation[param.index()] +=
                        block_average(&buffer[..frames]);
                }
                Some(Destination::Sink) => {
                    for (dst, src) in out.iter_mut().zip(&buffer[..frames]) {
                        *dst += *src;
                    }
                }
                None => {}
            }

            self.slots[index].buffer = buffer;
        }
    }
}
