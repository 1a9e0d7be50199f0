use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
#[cfg(feature = "rtrb")]
use std::sync::Mutex;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::backend::{BackendError, ContextState};
use crate::graph::SharedGraph;
use crate::io::{write_interleaved, OutputContext};
use crate::MAX_BLOCK_SIZE;

/// Default output device through cpal.
///
/// Nothing touches the device until the first `resume`; after that the
/// stream stays open for the life of the context. A stream error closes the
/// context.
pub struct CpalOutput {
    stream: Option<cpal::Stream>,
    state: ContextState,
    sample_rate: f32,
    channels: usize,
    failed: Arc<AtomicBool>,
    #[cfg(feature = "rtrb")]
    scope: ScopeTap,
}

/// Scope feed shared between the context and its stream callback.
///
/// The context keeps its own handle, so a stream that fails to build or play
/// does not take the producer down with it.
#[cfg(feature = "rtrb")]
#[derive(Clone, Default)]
struct ScopeTap(Arc<Mutex<Option<Producer<[f32; 2]>>>>);

#[cfg(feature = "rtrb")]
impl ScopeTap {
    fn new(producer: Producer<[f32; 2]>) -> Self {
        Self(Arc::new(Mutex::new(Some(producer))))
    }

    fn is_connected(&self) -> bool {
        self.0.lock().map(|p| p.is_some()).unwrap_or(false)
    }

    /// Push stereo frames, dropping what does not fit. Never blocks.
    fn push(&self, left: &[f32], right: &[f32]) {
        let Ok(mut guard) = self.0.try_lock() else {
            return;
        };
        if let Some(producer) = guard.as_mut() {
            for (&l, &r) in left.iter().zip(right.iter()) {
                if producer.push([l, r]).is_err() {
                    break;
                }
            }
        }
    }
}

impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            state: ContextState::Suspended,
            sample_rate: 0.0,
            channels: 0,
            failed: Arc::new(AtomicBool::new(false)),
            #[cfg(feature = "rtrb")]
            scope: ScopeTap::default(),
        }
    }

    /// Copy every rendered stereo frame into `producer` (dropping frames when
    /// it is full). Must be set before the first `resume`; it survives a
    /// failed `resume`.
    #[cfg(feature = "rtrb")]
    pub fn with_scope(mut self, producer: Producer<[f32; 2]>) -> Self {
        self.scope = ScopeTap::new(producer);
        self
    }

    #[cfg(feature = "rtrb")]
    pub fn has_scope(&self) -> bool {
        self.scope.is_connected()
    }

    /// Device channel count, 0 until resumed.
    pub fn channels(&self) -> usize {
        self.channels
    }

    fn open(&mut self, graph: &SharedGraph) -> Result<cpal::Stream, BackendError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(BackendError::NoDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        log::info!(
            "opening output device {:?}: {} Hz, {} channels",
            device.name().unwrap_or_default(),
            sample_rate,
            channels
        );

        let graph = Arc::clone(graph);
        let failed = Arc::clone(&self.failed);
        #[cfg(feature = "rtrb")]
        let scope = self.scope.clone();

        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let Ok(mut graph) = graph.lock() else {
                    data.fill(0.0);
                    return;
                };
                let total_frames = data.len() / channels.max(1);
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let l = &mut left[..frames];
                    let r = &mut right[..frames];
                    graph.render(l, r, sample_rate);

                    let out = &mut data[frames_written * channels..(frames_written + frames) * channels];
                    write_interleaved(out, l, r, &mut mono[..frames], channels);

                    #[cfg(feature = "rtrb")]
                    scope.push(l, r);

                    frames_written += frames;
                }
            },
            move |err| {
                log::error!("audio stream error: {err}");
                failed.store(true, Ordering::Release);
            },
            None,
        )?;

        stream.play()?;

        self.sample_rate = sample_rate;
        self.channels = channels;
        Ok(stream)
    }
}

impl OutputContext for CpalOutput {
    fn state(&self) -> ContextState {
        if self.failed.load(Ordering::Acquire) {
            ContextState::Closed
        } else {
            self.state
        }
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn resume(&mut self, graph: &SharedGraph) -> Result<(), BackendError> {
        match self.state() {
            ContextState::Running => return Ok(()),
            ContextState::Closed => return Err(BackendError::Closed),
            ContextState::Suspended => {}
        }

        let stream = self.open(graph)?;
        self.stream = Some(stream);
        self.state = ContextState::Running;
        log::info!("audio context running");
        Ok(())
    }
}

impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            // Pause before drop so the callback stops touching the graph.
            let _ = stream.pause();
        }
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn scope_survives_a_dropped_stream_handle() {
        let (producer, mut consumer) = RingBuffer::<[f32; 2]>::new(8);
        let output = CpalOutput::new().with_scope(producer);
        assert!(output.has_scope());

        // What a stream that failed to build leaves behind
        drop(output.scope.clone());

        assert!(output.has_scope());
        output.scope.push(&[0.5, 0.25], &[-0.5, -0.25]);
        assert_eq!(consumer.pop(), Ok([0.5, -0.5]));
        assert_eq!(consumer.pop(), Ok([0.25, -0.25]));
    }

    #[test]
    fn scope_drops_frames_when_full() {
        let (producer, mut consumer) = RingBuffer::<[f32; 2]>::new(2);
        let tap = ScopeTap::new(producer);
        tap.push(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(consumer.pop(), Ok([1.0, 1.0]));
        assert_eq!(consumer.pop(), Ok([2.0, 2.0]));
        assert!(consumer.pop().is_err());
    }

    #[test]
    fn no_scope_by_default() {
        let output = CpalOutput::new();
        assert!(!output.has_scope());
        output.scope.push(&[1.0], &[1.0]);
    }
}
