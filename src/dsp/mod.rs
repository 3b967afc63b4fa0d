//! Low-level DSP primitives used by the effect stages.
//!
//! These components are allocation-free once constructed and realtime-safe.
//! They stay focused on the signal-processing math so the stages in
//! `effects` can layer parameter handling and per-channel bookkeeping on top.

/// Circular buffer used by the feedback delay.
pub mod delay;
/// Waveshaping curves, drive and autogain.
pub mod distortion;
/// Bilinear biquad design and per-channel filter memory.
pub mod filter;
/// Decibel conversion.
pub mod gain;
/// Dry/wet blending and gain-ramped transfers.
pub mod mix;
