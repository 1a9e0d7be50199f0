//! Low-level DSP primitives used by the graph nodes.
//!
//! These components are allocation-free and realtime-safe, so they can run
//! inside the audio callback. They stay focused on the signal math; routing
//! and parameter ownership live in `graph`.

/// Decibel conversion and constant gain.
pub mod amplify;
/// Summing and downmixing.
pub mod mix;
/// Sine and triangle oscillators.
pub mod oscillator;
/// Equal-power stereo panning.
pub mod pan;

pub use oscillator::{OscillatorBlock, OscillatorWaveform};
