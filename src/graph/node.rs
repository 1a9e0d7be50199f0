/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Seconds rendered by the graph before this block
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            time: 0.0,
        }
    }
}

/// Read-only stereo block (the summed input of a node).
#[derive(Clone, Copy)]
pub struct Stereo<'a> {
    pub left: &'a [f32],
    pub right: &'a [f32],
}

/// Writable stereo block (a node's output).
pub struct StereoMut<'a> {
    pub left: &'a mut [f32],
    pub right: &'a mut [f32],
}

impl StereoMut<'_> {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn fill(&mut self, value: f32) {
        self.left.fill(value);
        self.right.fill(value);
    }
}

/// Core trait for audio processing graph nodes
///
/// Every node produces a stereo block. Mono sources write the same signal to
/// both sides and leave placement to a panner downstream.
pub trait GraphNode: Send {
    /// Render one block. `input` is the sum of every node routed into this
    /// one (silence for nodes without inputs).
    fn render_block(&mut self, input: Stereo<'_>, out: StereoMut<'_>, ctx: &RenderCtx);

    /// Sources generate sound and cannot have anything routed into them.
    fn is_source(&self) -> bool {
        false
    }

    /// Check if this node is still producing sound
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, input: Stereo<'_>, out: StereoMut<'_>, ctx: &RenderCtx) {
        (**self).render_block(input, out, ctx)
    }

    fn is_source(&self) -> bool {
        (**self).is_source()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
