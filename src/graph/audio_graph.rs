use std::fmt;
use std::sync::{Arc, Mutex};

use crate::dsp::mix::sum_into;
use crate::graph::channel::ChannelNode;
use crate::graph::node::{GraphNode, RenderCtx, Stereo, StereoMut};
use crate::graph::oscillator::OscNode;
use crate::graph::panner::PanNode;
use crate::MAX_BLOCK_SIZE;

/*
Routing
=======

The graph is an arena of nodes joined by input edges. A node's input is the
sum of the outputs of every node connected to it; the destination bus sums
every node connected to the output.

    OscNode(200 Hz) ──▶ PanNode(-1) ──▶ ChannelNode(-20 dB) ──┐
                                                               ├──▶ destination
    OscNode(206 Hz) ──▶ PanNode(+1) ──▶ ChannelNode(-20 dB) ──┘

Rendering a block walks the nodes in dependency order (inputs first), so each
node reads finished blocks from upstream. The order is recomputed whenever
the topology changes, on the control side, which keeps the audio callback
free of allocation. Nodes that do not reach the destination are not rendered
at all.

Handles
-------

`NodeId` pairs a slot index with a generation. Removing a node bumps the
slot's generation, so a stale handle can never reach whatever node later
reuses the slot.
*/

/// Shared graph handle, locked by the control thread and the audio callback.
pub type SharedGraph = Arc<Mutex<AudioGraph>>;

/// Generational handle to a node in an [`AudioGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Where a connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    /// The graph's stereo output
    Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Oscillator,
    Panner,
    Channel,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Oscillator => "oscillator",
            NodeKind::Panner => "panner",
            NodeKind::Channel => "channel",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },

    #[error("node {0} is a source and cannot take inputs")]
    NotAnInput(NodeId),

    #[error("connecting {from} to {to} would create a cycle")]
    Cycle { from: NodeId, to: NodeId },
}

/// Every node type the graph can hold.
pub enum Node {
    Oscillator(OscNode),
    Panner(PanNode),
    Channel(ChannelNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Oscillator(_) => NodeKind::Oscillator,
            Node::Panner(_) => NodeKind::Panner,
            Node::Channel(_) => NodeKind::Channel,
        }
    }
}

impl GraphNode for Node {
    fn render_block(&mut self, input: Stereo<'_>, out: StereoMut<'_>, ctx: &RenderCtx) {
        match self {
            Node::Oscillator(n) => n.render_block(input, out, ctx),
            Node::Panner(n) => n.render_block(input, out, ctx),
            Node::Channel(n) => n.render_block(input, out, ctx),
        }
    }

    fn is_source(&self) -> bool {
        match self {
            Node::Oscillator(n) => n.is_source(),
            Node::Panner(n) => n.is_source(),
            Node::Channel(n) => n.is_source(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Node::Oscillator(n) => n.is_active(),
            Node::Panner(n) => n.is_active(),
            Node::Channel(n) => n.is_active(),
        }
    }
}

impl From<OscNode> for Node {
    fn from(node: OscNode) -> Self {
        Node::Oscillator(node)
    }
}

impl From<PanNode> for Node {
    fn from(node: PanNode) -> Self {
        Node::Panner(node)
    }
}

impl From<ChannelNode> for Node {
    fn from(node: ChannelNode) -> Self {
        Node::Channel(node)
    }
}

struct Entry {
    node: Node,
    inputs: Vec<NodeId>,
    left: Vec<f32>,
    right: Vec<f32>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

fn lookup(slots: &[Slot], id: NodeId) -> Option<&Entry> {
    slots
        .get(id.index as usize)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.entry.as_ref())
}

fn lookup_mut(slots: &mut [Slot], id: NodeId) -> Option<&mut Entry> {
    slots
        .get_mut(id.index as usize)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.entry.as_mut())
}

pub struct AudioGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    destination: Vec<NodeId>,
    /// Slot indices in render order (inputs before consumers)
    order: Vec<usize>,
    mix_left: Vec<f32>,
    mix_right: Vec<f32>,
    time: f64,
}

impl AudioGraph {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            destination: Vec::new(),
            order: Vec::new(),
            mix_left: vec![0.0; MAX_BLOCK_SIZE],
            mix_right: vec![0.0; MAX_BLOCK_SIZE],
            time: 0.0,
        }
    }

    /// Wrap a new graph for sharing with an output callback.
    pub fn shared() -> SharedGraph {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        lookup(&self.slots, id).is_some()
    }

    /// Seconds rendered so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let entry = Entry {
            node: node.into(),
            inputs: Vec::new(),
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
        };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Remove a node and every connection touching it.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation && slot.entry.is_some())
            .ok_or(GraphError::UnknownNode(id))?;

        let entry = slot.entry.take().ok_or(GraphError::UnknownNode(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        for slot in &mut self.slots {
            if let Some(other) = slot.entry.as_mut() {
                other.inputs.retain(|&input| input != id);
            }
        }
        self.destination.retain(|&out| out != id);

        self.rebuild_order();
        Ok(entry.node)
    }

    /// Route `from`'s output into `to`. Connecting twice is a no-op.
    pub fn connect(&mut self, from: NodeId, to: Target) -> Result<(), GraphError> {
        if !self.contains(from) {
            return Err(GraphError::UnknownNode(from));
        }

        match to {
            Target::Destination => {
                if !self.destination.contains(&from) {
                    self.destination.push(from);
                }
            }
            Target::Node(to) => {
                let target = lookup(&self.slots, to).ok_or(GraphError::UnknownNode(to))?;
                if target.node.is_source() {
                    return Err(GraphError::NotAnInput(to));
                }
                if from == to || self.depends_on(from, to) {
                    return Err(GraphError::Cycle { from, to });
                }
                let target = lookup_mut(&mut self.slots, to).ok_or(GraphError::UnknownNode(to))?;
                if !target.inputs.contains(&from) {
                    target.inputs.push(from);
                }
            }
        }

        self.rebuild_order();
        Ok(())
    }

    /// Inputs currently routed into `id`.
    pub fn inputs(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        lookup(&self.slots, id)
            .map(|entry| entry.inputs.as_slice())
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Nodes routed straight to the destination.
    pub fn destination_inputs(&self) -> &[NodeId] {
        &self.destination
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        lookup(&self.slots, id)
            .map(|entry| &entry.node)
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        lookup_mut(&mut self.slots, id)
            .map(|entry| &mut entry.node)
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn oscillator(&self, id: NodeId) -> Result<&OscNode, GraphError> {
        match self.node(id)? {
            Node::Oscillator(osc) => Ok(osc),
            other => Err(wrong_kind(id, NodeKind::Oscillator, other)),
        }
    }

    pub fn oscillator_mut(&mut self, id: NodeId) -> Result<&mut OscNode, GraphError> {
        match self.node_mut(id)? {
            Node::Oscillator(osc) => Ok(osc),
            other => Err(wrong_kind(id, NodeKind::Oscillator, other)),
        }
    }

    pub fn panner(&self, id: NodeId) -> Result<&PanNode, GraphError> {
        match self.node(id)? {
            Node::Panner(pan) => Ok(pan),
            other => Err(wrong_kind(id, NodeKind::Panner, other)),
        }
    }

    pub fn channel(&self, id: NodeId) -> Result<&ChannelNode, GraphError> {
        match self.node(id)? {
            Node::Channel(channel) => Ok(channel),
            other => Err(wrong_kind(id, NodeKind::Channel, other)),
        }
    }

    /// Render any number of frames, in chunks of at most `MAX_BLOCK_SIZE`.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], sample_rate: f32) {
        debug_assert_eq!(left.len(), right.len());

        for (l, r) in left
            .chunks_mut(MAX_BLOCK_SIZE)
            .zip(right.chunks_mut(MAX_BLOCK_SIZE))
        {
            self.render_block(l, r, sample_rate);
        }
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], sample_rate: f32) {
        let frames = left.len();
        let ctx = RenderCtx {
            sample_rate,
            time: self.time,
        };

        // Destructure to allow simultaneous borrows
        let Self {
            slots,
            order,
            destination,
            mix_left,
            mix_right,
            ..
        } = self;
        let mix_left = &mut mix_left[..frames];
        let mix_right = &mut mix_right[..frames];

        for &idx in order.iter() {
            mix_left.fill(0.0);
            mix_right.fill(0.0);

            if let Some(entry) = slots[idx].entry.as_ref() {
                for &input in &entry.inputs {
                    if let Some(upstream) = lookup(slots, input) {
                        sum_into(mix_left, &upstream.left[..frames]);
                        sum_into(mix_right, &upstream.right[..frames]);
                    }
                }
            }

            if let Some(entry) = slots[idx].entry.as_mut() {
                let Entry {
                    node,
                    left: out_left,
                    right: out_right,
                    ..
                } = entry;
                node.render_block(
                    Stereo {
                        left: &*mix_left,
                        right: &*mix_right,
                    },
                    StereoMut {
                        left: &mut out_left[..frames],
                        right: &mut out_right[..frames],
                    },
                    &ctx,
                );
            }
        }

        left.fill(0.0);
        right.fill(0.0);
        for &id in destination.iter() {
            if let Some(entry) = lookup(slots, id) {
                sum_into(left, &entry.left[..frames]);
                sum_into(right, &entry.right[..frames]);
            }
        }

        self.time += frames as f64 / sample_rate as f64;
    }

    /// True if `node` (transitively) feeds `upstream_of`.
    fn depends_on(&self, upstream_of: NodeId, node: NodeId) -> bool {
        let mut stack = vec![upstream_of];
        let mut seen = vec![false; self.slots.len()];

        while let Some(id) = stack.pop() {
            if id == node {
                return true;
            }
            let Some(entry) = lookup(&self.slots, id) else {
                continue;
            };
            if std::mem::replace(&mut seen[id.index as usize], true) {
                continue;
            }
            stack.extend(entry.inputs.iter().copied());
        }
        false
    }

    fn rebuild_order(&mut self) {
        let mut visited = vec![false; self.slots.len()];
        let mut order = Vec::with_capacity(self.slots.len());

        for &id in &self.destination {
            visit(&self.slots, id, &mut visited, &mut order);
        }
        self.order = order;
    }
}

/// Post-order walk so every input lands before its consumer.
fn visit(slots: &[Slot], id: NodeId, visited: &mut [bool], order: &mut Vec<usize>) {
    let idx = id.index as usize;
    let Some(entry) = lookup(slots, id) else {
        return;
    };
    if visited[idx] {
        return;
    }
    visited[idx] = true;

    for &input in &entry.inputs {
        visit(slots, input, visited, order);
    }
    order.push(idx);
}

fn wrong_kind(id: NodeId, expected: NodeKind, actual: &Node) -> GraphError {
    GraphError::WrongKind {
        id,
        expected,
        actual: actual.kind(),
    }
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn binaural_chain(graph: &mut AudioGraph, hz: f32, pan: f32, db: f32) -> (NodeId, NodeId) {
        let osc = graph.add(OscNode::sine(hz));
        let panner = graph.add(PanNode::new(pan));
        let channel = graph.add(ChannelNode::new(db));
        graph.connect(osc, Target::Node(panner)).unwrap();
        graph.connect(panner, Target::Node(channel)).unwrap();
        graph.connect(channel, Target::Destination).unwrap();
        (osc, channel)
    }

    fn peak(buf: &[f32]) -> f32 {
        buf.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }

    #[test]
    fn empty_graph_renders_silence() {
        let mut graph = AudioGraph::new();
        let mut left = vec![1.0; 256];
        let mut right = vec![1.0; 256];
        graph.render(&mut left, &mut right, SR);
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn chains_route_to_separate_ears() {
        let mut graph = AudioGraph::new();
        let (left_osc, _) = binaural_chain(&mut graph, 200.0, -1.0, 0.0);
        graph.oscillator_mut(left_osc).unwrap().start(None);

        let mut left = vec![0.0; 1024];
        let mut right = vec![0.0; 1024];
        graph.render(&mut left, &mut right, SR);

        assert!(peak(&left) > 0.9);
        assert_eq!(peak(&right), 0.0);
    }

    #[test]
    fn channel_volume_scales_destination() {
        let mut graph = AudioGraph::new();
        let (osc, _) = binaural_chain(&mut graph, 1_000.0, 1.0, -20.0);
        graph.oscillator_mut(osc).unwrap().start(None);

        let mut left = vec![0.0; 960];
        let mut right = vec![0.0; 960];
        graph.render(&mut left, &mut right, SR);

        assert!((peak(&right) - 0.1).abs() < 1e-3);
    }

    #[test]
    fn long_requests_render_in_chunks() {
        let mut graph = AudioGraph::new();
        let (osc, _) = binaural_chain(&mut graph, 200.0, -1.0, 0.0);
        graph.oscillator_mut(osc).unwrap().start(None);

        let frames = MAX_BLOCK_SIZE * 2 + 17;
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        graph.render(&mut left, &mut right, SR);

        assert!(peak(&left[MAX_BLOCK_SIZE * 2..]) > 0.0);
        assert!((graph.time() - frames as f64 / SR as f64).abs() < 1e-9);
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut graph = AudioGraph::new();
        let first = graph.add(OscNode::sine(200.0));
        graph.remove(first).unwrap();
        let second = graph.add(OscNode::sine(300.0));

        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert_eq!(graph.node(first).err(), Some(GraphError::UnknownNode(first)));
        assert!(graph.remove(first).is_err());
        assert_eq!(graph.oscillator(second).unwrap().frequency(), 300.0);
    }

    #[test]
    fn remove_drops_connections() {
        let mut graph = AudioGraph::new();
        let (osc, channel) = binaural_chain(&mut graph, 200.0, -1.0, 0.0);
        graph.remove(channel).unwrap();
        assert!(graph.destination_inputs().is_empty());
        graph.remove(osc).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn oscillators_cannot_take_inputs() {
        let mut graph = AudioGraph::new();
        let a = graph.add(OscNode::sine(200.0));
        let b = graph.add(OscNode::sine(300.0));
        assert_eq!(graph.connect(a, Target::Node(b)), Err(GraphError::NotAnInput(b)));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = AudioGraph::new();
        let a = graph.add(PanNode::new(0.0));
        let b = graph.add(ChannelNode::new(0.0));
        graph.connect(a, Target::Node(b)).unwrap();
        assert_eq!(
            graph.connect(b, Target::Node(a)),
            Err(GraphError::Cycle { from: b, to: a })
        );
        assert_eq!(
            graph.connect(a, Target::Node(a)),
            Err(GraphError::Cycle { from: a, to: a })
        );
    }

    #[test]
    fn wrong_kind_is_reported() {
        let mut graph = AudioGraph::new();
        let channel = graph.add(ChannelNode::new(0.0));
        assert_eq!(
            graph.oscillator_mut(channel).err(),
            Some(GraphError::WrongKind {
                id: channel,
                expected: NodeKind::Oscillator,
                actual: NodeKind::Channel,
            })
        );
    }

    #[test]
    fn duplicate_connections_are_ignored() {
        let mut graph = AudioGraph::new();
        let (osc, _) = binaural_chain(&mut graph, 200.0, -1.0, 0.0);
        assert!(graph.inputs(osc).unwrap().is_empty());

        let channel = graph.destination_inputs()[0];
        graph.connect(channel, Target::Destination).unwrap();
        assert_eq!(graph.destination_inputs().len(), 1);
    }
}
