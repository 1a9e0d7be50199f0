//! Gain and decibel conversion primitives.

/*
Decibels
========

Levels in the session are expressed in decibels because hearing is
logarithmic. The conversion to a linear multiplier is

    gain = 10 ^ (dB / 20)

Reference points:
    0 dB   = ×1.0   (unity, oscillators run here)
   -6 dB   ≈ ×0.5
  -20 dB   = ×0.1   (default session volume)
  -40 dB   = ×0.01  (quietest slider position)

Negative infinity maps to exactly 0.0 so a channel can be muted without a
special case in the render loop.
*/

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    if db == f32::NEG_INFINITY {
        return 0.0;
    }
    10.0_f32.powf(db / 20.0)
}

/// Convert a linear gain factor to decibels. Zero maps to negative infinity.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        return f32::NEG_INFINITY;
    }
    20.0 * gain.log10()
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}
