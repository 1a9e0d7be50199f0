//! Benchmarks for low-level DSP primitives.

mod amplify;
mod mix;
mod oscillator;
mod pan;

pub use amplify::bench_amplify;
pub use mix::bench_mix;
pub use oscillator::bench_oscillator;
pub use pan::bench_pan;
