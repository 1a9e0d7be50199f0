use std::sync::MutexGuard;
use std::time::Duration;

use crate::backend::{AudioBackend, BackendError, ContextState, OscillatorOptions, Target};
use crate::graph::{
    AudioGraph, ChannelNode, GraphError, Node, NodeId, NodeKind, OscNode, PanNode, SharedGraph,
    Target as GraphTarget,
};
use crate::io::OutputContext;

/// [`AudioBackend`] over an in-process [`AudioGraph`] played by an
/// [`OutputContext`].
///
/// Every call locks the shared graph for the duration of one edit, the same
/// lock the output callback takes per block.
pub struct GraphBackend<O> {
    graph: SharedGraph,
    output: O,
}

impl<O: OutputContext> GraphBackend<O> {
    pub fn new(output: O) -> Self {
        Self {
            graph: AudioGraph::shared(),
            output,
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Lock the graph for inspection.
    pub fn lock(&self) -> Result<MutexGuard<'_, AudioGraph>, BackendError> {
        self.graph.lock().map_err(|_| BackendError::Poisoned)
    }

    fn edit<T>(
        &self,
        f: impl FnOnce(&mut AudioGraph) -> Result<T, GraphError>,
    ) -> Result<T, BackendError> {
        let mut graph = self.lock()?;
        Ok(f(&mut graph)?)
    }
}

impl<O: OutputContext> AudioBackend for GraphBackend<O> {
    type Node = NodeId;

    fn context_state(&self) -> ContextState {
        self.output.state()
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        self.output.resume(&self.graph)
    }

    fn create_oscillator(&mut self, options: OscillatorOptions) -> Result<NodeId, BackendError> {
        let node = OscNode::new(options.waveform, options.frequency_hz)
            .with_volume_db(options.volume_db);
        self.edit(|graph| Ok(graph.add(node)))
    }

    fn create_panner(&mut self, pan: f32) -> Result<NodeId, BackendError> {
        self.edit(|graph| Ok(graph.add(PanNode::new(pan))))
    }

    fn create_channel(&mut self, volume_db: f32) -> Result<NodeId, BackendError> {
        self.edit(|graph| Ok(graph.add(ChannelNode::new(volume_db))))
    }

    fn connect(&mut self, from: NodeId, to: Target<NodeId>) -> Result<(), BackendError> {
        let to = match to {
            Target::Node(id) => GraphTarget::Node(id),
            Target::Destination => GraphTarget::Destination,
        };
        self.edit(|graph| graph.connect(from, to))
    }

    fn start(&mut self, oscillator: NodeId, duration: Option<Duration>) -> Result<(), BackendError> {
        self.edit(|graph| {
            graph.oscillator_mut(oscillator)?.start(duration);
            Ok(())
        })
    }

    fn stop(&mut self, oscillator: NodeId) -> Result<(), BackendError> {
        self.edit(|graph| {
            graph.oscillator_mut(oscillator)?.stop();
            Ok(())
        })
    }

    fn set_frequency(&mut self, oscillator: NodeId, hz: f32) -> Result<(), BackendError> {
        self.edit(|graph| {
            graph.oscillator_mut(oscillator)?.set_frequency(hz);
            Ok(())
        })
    }

    fn set_volume(&mut self, node: NodeId, db: f32) -> Result<(), BackendError> {
        self.edit(|graph| match graph.node_mut(node)? {
            Node::Oscillator(osc) => {
                osc.set_volume_db(db);
                Ok(())
            }
            Node::Channel(channel) => {
                channel.set_volume_db(db);
                Ok(())
            }
            other => Err(GraphError::WrongKind {
                id: node,
                expected: NodeKind::Channel,
                actual: other.kind(),
            }),
        })
    }

    fn dispose(&mut self, node: NodeId) -> Result<(), BackendError> {
        self.edit(|graph| graph.remove(node).map(drop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::OfflineOutput;

    #[test]
    fn builds_and_plays_a_chain() {
        let mut backend = GraphBackend::new(OfflineOutput::new(48_000.0));
        backend.resume().unwrap();

        let osc = backend
            .create_oscillator(OscillatorOptions::sine(300.0))
            .unwrap();
        let pan = backend.create_panner(1.0).unwrap();
        let channel = backend.create_channel(0.0).unwrap();
        backend.connect(osc, Target::Node(pan)).unwrap();
        backend.connect(pan, Target::Node(channel)).unwrap();
        backend.connect(channel, Target::Destination).unwrap();
        backend.start(osc, None).unwrap();

        let (left, right) = backend.output_mut().render(512).unwrap();
        assert!(left.iter().all(|&s| s == 0.0));
        assert!(right.iter().any(|&s| s.abs() > 0.5));
    }

    #[test]
    fn set_volume_rejects_panners() {
        let mut backend = GraphBackend::new(OfflineOutput::new(48_000.0));
        let pan = backend.create_panner(0.0).unwrap();
        let err = backend.set_volume(pan, -6.0).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Graph(GraphError::WrongKind {
                actual: NodeKind::Panner,
                ..
            })
        ));
    }

    #[test]
    fn disposed_nodes_are_gone() {
        let mut backend = GraphBackend::new(OfflineOutput::new(48_000.0));
        let osc = backend
            .create_oscillator(OscillatorOptions::sine(300.0))
            .unwrap();
        backend.dispose(osc).unwrap();
        assert!(backend.lock().unwrap().is_empty());
        assert!(matches!(
            backend.stop(osc),
            Err(BackendError::Graph(GraphError::UnknownNode(_)))
        ));
    }
}
