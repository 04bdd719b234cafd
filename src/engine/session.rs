use crate::{
    graph::{Graph, Teardown},
    presets::SoundscapeKind,
};

/// The running graph of the one active soundscape.
///
/// A session owns every node it spawned. Dropping it tears the graph down,
/// so replacing or discarding a session can never leak running sources.
pub struct PlaybackSession {
    id: u64,
    kind: SoundscapeKind,
    graph: Graph,
}

impl PlaybackSession {
    pub(crate) fn new(id: u64, kind: SoundscapeKind, graph: Graph) -> Self {
        Self { id, kind, graph }
    }

    /// Monotonic per-engine counter; a restart of the same kind gets a new id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> SoundscapeKind {
        self.kind
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// Stop and release every node, reporting what happened.
    pub fn close(mut self) -> Teardown {
        self.graph.stop_all()
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if !self.graph.is_empty() {
            let report = self.graph.stop_all();
            tracing::debug!(
                session = self.id,
                kind = self.kind.id(),
                released = report.released,
                "session dropped without close"
            );
        }
    }
}
