use crate::dsp::mix::downmix;
use crate::dsp::pan::pan_mono;
use crate::graph::node::{GraphNode, RenderCtx, Stereo, StereoMut};
use crate::MAX_BLOCK_SIZE;

/// Places its (downmixed) input in the stereo field.
///
/// Pan −1 sends everything to the left ear, +1 to the right.
pub struct PanNode {
    pan: f32,
    mono: Vec<f32>,
}

impl PanNode {
    pub fn new(pan: f32) -> Self {
        let mut node = Self {
            pan: 0.0,
            mono: vec![0.0; MAX_BLOCK_SIZE],
        };
        node.set_pan(pan);
        node
    }

    pub fn left() -> Self {
        Self::new(-1.0)
    }

    pub fn right() -> Self {
        Self::new(1.0)
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: f32) {
        if pan.is_nan() {
            return;
        }
        self.pan = pan.clamp(-1.0, 1.0);
    }
}

impl GraphNode for PanNode {
    fn render_block(&mut self, input: Stereo<'_>, out: StereoMut<'_>, _ctx: &RenderCtx) {
        // Slice temp buffer to match output size (RT-safe, no allocation)
        let mono = &mut self.mono[..out.left.len()];
        downmix(input.left, input.right, mono);
        pan_mono(mono, self.pan, out.left, out.right);
    }
}
