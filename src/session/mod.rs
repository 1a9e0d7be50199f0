// Purpose - session lifecycle: node ownership, start/stop, live parameter sync

mod controller;
mod generator;

pub use controller::{
    ControllerConfig, PlaybackSession, Route, SessionController, TEST_TONE_DB,
    TEST_TONE_DURATION, TEST_TONE_HZ,
};
pub use generator::BinauralGenerator;

use crate::backend::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio output context unavailable")]
    ContextUnavailable(#[source] BackendError),

    /// The backend refused to create a session node, connect it, or start
    /// an oscillator.
    #[error("audio nodes could not be created or started")]
    NodeAllocationFailed(#[source] BackendError),

    #[error("failed to start playback")]
    StartFailed(#[source] Box<AudioError>),
}

impl AudioError {
    pub(crate) fn start_failed(cause: AudioError) -> Self {
        AudioError::StartFailed(Box::new(cause))
    }

    /// The innermost audio error, looking through `StartFailed`.
    pub fn cause(&self) -> &AudioError {
        match self {
            AudioError::StartFailed(inner) => inner.cause(),
            other => other,
        }
    }

    /// The backend error at the bottom of the chain, if any.
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self.cause() {
            AudioError::ContextUnavailable(err) | AudioError::NodeAllocationFailed(err) => {
                Some(err)
            }
            AudioError::StartFailed(_) => None,
        }
    }
}
