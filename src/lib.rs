pub mod analysis; // Peak detection on rendered audio
pub mod backend; // Node-level audio API the controller drives
pub mod band;
pub mod dsp;
pub mod graph; // Routable audio graph (oscillator → panner → channel)
pub mod io;
pub mod params;
pub mod session; // Playback lifecycle and parameter sync

pub use backend::{AudioBackend, BackendError, ContextState, GraphBackend, NodeId, Target};
pub use band::BrainwaveBand;
pub use params::{CarrierChoice, ParameterStore, SessionParameters};
pub use session::{AudioError, BinauralGenerator, ControllerConfig, SessionController};

pub const MAX_BLOCK_SIZE: usize = 2048;
