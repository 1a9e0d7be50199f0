//! Node-level audio API driven by the session controller.
//!
//! The controller only ever talks to an [`AudioBackend`]: it resumes the
//! output context, builds oscillator → panner → channel chains, starts and
//! retunes the oscillators, and disposes everything again. [`GraphBackend`]
//! implements the trait on top of the in-process [`AudioGraph`]; tests plug in
//! their own recording implementations.
//!
//! [`AudioGraph`]: crate::graph::AudioGraph

use std::fmt;
use std::time::Duration;

use crate::dsp::OscillatorWaveform;
use crate::graph::GraphError;

mod graph_backend;

pub use crate::graph::NodeId;
pub use graph_backend::GraphBackend;

/// Lifecycle of an output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created but not producing audio yet; must be resumed
    Suspended,
    Running,
    /// Failed or shut down; cannot be resumed
    Closed,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContextState::Suspended => "suspended",
            ContextState::Running => "running",
            ContextState::Closed => "closed",
        })
    }
}

/// Where a connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<N> {
    Node(N),
    /// The top-level output sink
    Destination,
}

/// Construction options for an oscillator node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorOptions {
    pub waveform: OscillatorWaveform,
    pub frequency_hz: f32,
    /// Oscillator-level gain; 0 dB is unity
    pub volume_db: f32,
}

impl OscillatorOptions {
    /// Unity-gain sine at `frequency_hz`.
    pub fn sine(frequency_hz: f32) -> Self {
        Self {
            waveform: OscillatorWaveform::Sine,
            frequency_hz,
            volume_db: 0.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("failed to fetch default output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("output context unavailable: {0}")]
    Unavailable(String),

    #[error("output context is closed")]
    Closed,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("audio graph lock poisoned")]
    Poisoned,

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Audio node API: an output context plus constructible, routable nodes.
///
/// Handles are opaque and never reused: once a node is disposed, a later
/// `create_*` call returns a handle that compares unequal to it.
pub trait AudioBackend {
    type Node: Copy + Eq + fmt::Debug;

    fn context_state(&self) -> ContextState;

    /// Bring the output context to `Running`, blocking until it is (or
    /// failing).
    fn resume(&mut self) -> Result<(), BackendError>;

    fn create_oscillator(&mut self, options: OscillatorOptions)
        -> Result<Self::Node, BackendError>;

    /// `pan` in [-1, +1]; -1 is fully left.
    fn create_panner(&mut self, pan: f32) -> Result<Self::Node, BackendError>;

    fn create_channel(&mut self, volume_db: f32) -> Result<Self::Node, BackendError>;

    fn connect(&mut self, from: Self::Node, to: Target<Self::Node>) -> Result<(), BackendError>;

    /// Start an oscillator; `None` plays until stopped.
    fn start(&mut self, oscillator: Self::Node, duration: Option<Duration>)
        -> Result<(), BackendError>;

    fn stop(&mut self, oscillator: Self::Node) -> Result<(), BackendError>;

    fn set_frequency(&mut self, oscillator: Self::Node, hz: f32) -> Result<(), BackendError>;

    /// Set the level of an oscillator or a channel.
    fn set_volume(&mut self, node: Self::Node, db: f32) -> Result<(), BackendError>;

    /// Release the node and every connection touching it.
    fn dispose(&mut self, node: Self::Node) -> Result<(), BackendError>;
}
