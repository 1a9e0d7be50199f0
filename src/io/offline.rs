use std::sync::Arc;

use crate::backend::{BackendError, ContextState};
use crate::graph::SharedGraph;
use crate::io::OutputContext;

/// Renders the graph on demand instead of through a device.
///
/// Used for tests, benches and anywhere audio has to be inspected rather
/// than heard.
pub struct OfflineOutput {
    sample_rate: f32,
    state: ContextState,
    graph: Option<SharedGraph>,
    refuse_resume: Option<String>,
}

impl OfflineOutput {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            state: ContextState::Suspended,
            graph: None,
            refuse_resume: None,
        }
    }

    /// A context whose `resume` always fails with `reason`.
    pub fn unavailable(sample_rate: f32, reason: impl Into<String>) -> Self {
        Self {
            refuse_resume: Some(reason.into()),
            ..Self::new(sample_rate)
        }
    }

    /// Shut the context down; later resumes fail.
    pub fn close(&mut self) {
        self.state = ContextState::Closed;
        self.graph = None;
    }

    /// Render `frames` frames. A context that is not running yields silence.
    pub fn render(&mut self, frames: usize) -> Result<(Vec<f32>, Vec<f32>), BackendError> {
        let mut left = vec![0.0f32; frames];
        let mut right = vec![0.0f32; frames];

        if self.state == ContextState::Running {
            if let Some(graph) = &self.graph {
                let mut graph = graph.lock().map_err(|_| BackendError::Poisoned)?;
                graph.render(&mut left, &mut right, self.sample_rate);
            }
        }

        Ok((left, right))
    }

    /// Render `seconds` of audio.
    pub fn render_seconds(&mut self, seconds: f32) -> Result<(Vec<f32>, Vec<f32>), BackendError> {
        let frames = (seconds * self.sample_rate).round().max(0.0) as usize;
        self.render(frames)
    }
}

impl OutputContext for OfflineOutput {
    fn state(&self) -> ContextState {
        self.state
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn resume(&mut self, graph: &SharedGraph) -> Result<(), BackendError> {
        match self.state {
            ContextState::Running => return Ok(()),
            ContextState::Closed => return Err(BackendError::Closed),
            ContextState::Suspended => {}
        }
        if let Some(reason) = &self.refuse_resume {
            return Err(BackendError::Unavailable(reason.clone()));
        }

        self.graph = Some(Arc::clone(graph));
        self.state = ContextState::Running;
        Ok(())
    }
}
