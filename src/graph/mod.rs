//! Routable audio graph built from the DSP primitives.
//!
//! Graph nodes wrap the low-level DSP blocks with the things a session needs:
//! a start/stop transport for sources, mutable parameters, and block-based
//! stereo rendering. `AudioGraph` owns the nodes and the routing between them.

/// Node arena, routing and block rendering.
pub mod audio_graph;
/// Stereo level stage.
pub mod channel;
/// Core traits shared by all graph nodes.
pub mod node;
/// Tone sources with a transport.
pub mod oscillator;
/// Stereo placement.
pub mod panner;

pub use audio_graph::{AudioGraph, GraphError, Node, NodeId, NodeKind, SharedGraph, Target};
pub use channel::ChannelNode;
pub use node::{GraphNode, RenderCtx, Stereo, StereoMut};
pub use oscillator::OscNode;
pub use panner::PanNode;
