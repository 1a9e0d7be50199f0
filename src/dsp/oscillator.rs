//! Phase-accumulating oscillator primitive.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/*
Phase Accumulation
==================

The oscillator keeps a phase in [0, 1) and advances it by
`frequency / sample_rate` every sample. The waveform is a function of the
phase only:

    sine:      sin(2π · phase)
    triangle:  4 · |phase - 0.5| - 1, shifted so it starts rising from 0

The phase is carried across blocks and across frequency changes, so
retuning a running oscillator changes only the slope of the phase and the
waveform never jumps. A fresh oscillator starts again from phase 0.

Precision
---------

Phase is kept in f64. The binaural beat is the difference between two
phases, and f32 increments (~1e-7 relative error at 48 kHz) let two ears
drift apart over an hour of playback.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorWaveform {
    #[default]
    Sine,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f64,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Fill `out` with the waveform at `frequency` Hz, continuing from the
    /// previous block's phase.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency as f64 / sample_rate as f64;

        for sample in out.iter_mut() {
            let phase = self.phase as f32;
            *sample = match self.waveform {
                OscillatorWaveform::Sine => (TAU * phase).sin(),
                OscillatorWaveform::Triangle => triangle(phase),
            };

            self.phase += increment;
            self.phase -= self.phase.floor();
        }
    }
}

/// Triangle starting at 0 and rising, same phase alignment as the sine.
#[inline]
fn triangle(phase: f32) -> f32 {
    let shifted = (phase + 0.25).fract();
    1.0 - 4.0 * (shifted - 0.5).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = OscillatorBlock::sine();

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, frequency, sample_rate);

        let sample_index = 12;
        let expected = (TAU * frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn phase_continues_across_blocks() {
        let mut whole = OscillatorBlock::sine();
        let mut split = OscillatorBlock::sine();

        let mut a = vec![0.0f32; 256];
        whole.render(&mut a, 200.0, 48_000.0);

        let mut b = vec![0.0f32; 256];
        let (first, second) = b.split_at_mut(100);
        split.render(first, 200.0, 48_000.0);
        split.render(second, 200.0, 48_000.0);

        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn retune_does_not_jump() {
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 64];
        osc.render(&mut buffer, 200.0, 48_000.0);
        let last = buffer[63];

        let mut next = [0.0f32; 1];
        osc.render(&mut next, 210.0, 48_000.0);
        // One sample at ~200 Hz moves the sine by at most 2π·210/48000.
        assert!((next[0] - last).abs() < 0.03);
    }

    #[test]
    fn triangle_shape() {
        assert!((triangle(0.0) - 0.0).abs() < 1e-6);
        assert!((triangle(0.25) - 1.0).abs() < 1e-6);
        assert!((triangle(0.5) - 0.0).abs() < 1e-6);
        assert!((triangle(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn output_stays_in_unit_range() {
        for mut osc in [OscillatorBlock::sine(), OscillatorBlock::triangle()] {
            let mut buffer = vec![0.0f32; 2048];
            osc.render(&mut buffer, 1234.5, 44_100.0);
            assert!(buffer.iter().all(|s| s.abs() <= 1.0));
        }
    }
}
