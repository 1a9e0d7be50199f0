//! Real-world scenario benchmarks.
//!
//! Complete session graphs rendered block by block, the way the output
//! callback drives them.

mod session;

pub use session::bench_session;
