//! Benchmarks for low-level DSP primitives.

mod delay;
mod distortion;
mod filter;
mod mix;

pub use delay::bench_delay;
pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use mix::bench_mix;
