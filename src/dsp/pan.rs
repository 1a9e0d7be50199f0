//! Stereo panning primitive.

/*
Equal-Power Panning
===================

A pan position p in [-1, +1] places a mono signal between the two ears:

    x     = (p + 1) / 2          // 0.0 = hard left, 1.0 = hard right
    left  = cos(x · π/2)
    right = sin(x · π/2)

left² + right² = 1 for every position, so the perceived loudness stays the
same as the source moves. At the centre both sides sit at ~0.707 (-3 dB).

Binaural playback uses the two extremes only:

    p = -1  →  left 1.0, right 0.0
    p = +1  →  left 0.0, right 1.0

Each ear must hear exactly one tone for the beat to form in the brain rather
than in the air, so the extremes are snapped to exact 0/1 gains instead of
trusting cos(π/2) to round to zero.
*/

use std::f32::consts::FRAC_PI_2;

/// Left/right gains for a pan position. Out-of-range positions are clamped.
#[inline]
pub fn equal_power_gains(pan: f32) -> (f32, f32) {
    let pan = if pan.is_nan() { 0.0 } else { pan.clamp(-1.0, 1.0) };
    if pan == -1.0 {
        return (1.0, 0.0);
    }
    if pan == 1.0 {
        return (0.0, 1.0);
    }
    let x = (pan + 1.0) * 0.5;
    ((x * FRAC_PI_2).cos(), (x * FRAC_PI_2).sin())
}

/// Pan a mono signal into a stereo pair.
#[inline]
pub fn pan_mono(input: &[f32], pan: f32, left: &mut [f32], right: &mut [f32]) {
    debug_assert_eq!(input.len(), left.len());
    debug_assert_eq!(input.len(), right.len());

    let (gain_l, gain_r) = equal_power_gains(pan);
    for ((&s, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = s * gain_l;
        *r = s * gain_r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_left_and_right_are_exact() {
        assert_eq!(equal_power_gains(-1.0), (1.0, 0.0));
        assert_eq!(equal_power_gains(1.0), (0.0, 1.0));
        assert_eq!(equal_power_gains(-7.0), (1.0, 0.0));
        assert_eq!(equal_power_gains(3.0), (0.0, 1.0));
    }

    #[test]
    fn centre_is_equal_power() {
        let (l, r) = equal_power_gains(0.0);
        assert!((l - r).abs() < 1e-6);
        assert!((l * l + r * r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn power_is_constant_across_positions() {
        for i in 0..=20 {
            let pan = -1.0 + i as f32 * 0.1;
            let (l, r) = equal_power_gains(pan);
            assert!((l * l + r * r - 1.0).abs() < 1e-5, "pan {pan}");
        }
    }

    #[test]
    fn pan_mono_splits_signal() {
        let input = [0.5, -0.25];
        let mut left = [0.0; 2];
        let mut right = [0.0; 2];
        pan_mono(&input, 1.0, &mut left, &mut right);
        assert_eq!(left, [0.0, 0.0]);
        assert_eq!(right, [0.5, -0.25]);
    }
}
