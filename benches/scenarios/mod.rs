//! Real-world scenario benchmarks.
//!
//! The full EQ → distortion → delay chain at typical host block sizes, and
//! decoding a busy telemetry stream.

mod chain;
mod telemetry;

pub use chain::bench_chain;
pub use telemetry::bench_telemetry;
