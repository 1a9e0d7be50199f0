use crate::dsp::amplify::{apply_gain, db_to_gain};
use crate::graph::node::{GraphNode, RenderCtx, Stereo, StereoMut};

/// Stereo level stage in front of the destination.
///
/// In a binaural session this is the only place the listening volume is
/// applied.
pub struct ChannelNode {
    volume_db: f32,
    gain: f32,
}

impl ChannelNode {
    pub fn new(volume_db: f32) -> Self {
        let mut node = Self {
            volume_db: 0.0,
            gain: 1.0,
        };
        node.set_volume_db(volume_db);
        node
    }

    pub fn volume_db(&self) -> f32 {
        self.volume_db
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set the level. `-inf` mutes; NaN is ignored; values above 0 dB are
    /// capped so the channel never boosts.
    pub fn set_volume_db(&mut self, db: f32) {
        if db.is_nan() {
            return;
        }
        self.volume_db = db.min(0.0);
        self.gain = db_to_gain(self.volume_db);
    }
}

impl GraphNode for ChannelNode {
    fn render_block(&mut self, input: Stereo<'_>, out: StereoMut<'_>, _ctx: &RenderCtx) {
        out.left.copy_from_slice(input.left);
        out.right.copy_from_slice(input.right);
        apply_gain(out.left, self.gain);
        apply_gain(out.right, self.gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_gain_to_both_sides() {
        let mut node = ChannelNode::new(-20.0);
        let left_in = [1.0, -1.0];
        let right_in = [0.5, 0.0];
        let mut left = [0.0; 2];
        let mut right = [0.0; 2];
        node.render_block(
            Stereo {
                left: &left_in,
                right: &right_in,
            },
            StereoMut {
                left: &mut left,
                right: &mut right,
            },
            &RenderCtx::new(48_000.0),
        );
        assert!((left[0] - 0.1).abs() < 1e-6);
        assert!((left[1] + 0.1).abs() < 1e-6);
        assert!((right[0] - 0.05).abs() < 1e-6);
        assert_eq!(right[1], 0.0);
    }

    #[test]
    fn never_boosts_and_mutes_at_neg_inf() {
        let mut node = ChannelNode::new(12.0);
        assert_eq!(node.volume_db(), 0.0);
        assert_eq!(node.gain(), 1.0);
        node.set_volume_db(f32::NEG_INFINITY);
        assert_eq!(node.gain(), 0.0);
    }
}
