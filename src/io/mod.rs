// Purpose - output contexts that pull audio out of the graph

mod cpal_output;
mod offline;

pub use cpal_output::CpalOutput;
pub use offline::OfflineOutput;

use crate::backend::{BackendError, ContextState};
use crate::dsp::mix::downmix;
use crate::graph::SharedGraph;

/// Something that renders a [`SharedGraph`] to a listener.
///
/// Contexts start suspended. `resume` attaches the graph and blocks until the
/// context is running or has failed.
pub trait OutputContext {
    fn state(&self) -> ContextState;

    fn sample_rate(&self) -> f32;

    fn resume(&mut self, graph: &SharedGraph) -> Result<(), BackendError>;
}

/// Interleave a stereo block into a device buffer of `channels` channels.
///
/// Mono devices get the downmix; channels past the second stay silent.
pub(crate) fn write_interleaved(
    data: &mut [f32],
    left: &[f32],
    right: &[f32],
    mono: &mut [f32],
    channels: usize,
) {
    debug_assert_eq!(data.len(), left.len() * channels);

    match channels {
        0 => {}
        1 => {
            downmix(left, right, mono);
            data.copy_from_slice(mono);
        }
        _ => {
            for (i, frame) in data.chunks_exact_mut(channels).enumerate() {
                frame[0] = left[i];
                frame[1] = right[i];
                frame[2..].fill(0.0);
            }
        }
    }
}
