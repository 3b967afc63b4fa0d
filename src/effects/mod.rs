//! Effect stages built on the `dsp` primitives, and the chain that runs them.
//!
//! Each stage implements [`EffectStage`]: parameters are pushed in with
//! `configure`, state is sized in `prepare`, and `process` works in place on
//! an [`AudioBlock`](crate::AudioBlock) without allocating.

pub mod chain;
pub mod delay;
pub mod distortion;
pub mod equalizer;
pub mod stage;

pub use chain::EffectsChain;
pub use delay::Delay;
pub use distortion::Distortion;
pub use equalizer::Equalizer;
pub use stage::{EffectStage, ProcessSpec};
