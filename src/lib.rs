pub mod block; // Channel-major audio block views
pub mod config;
pub mod dsp;
pub mod effects; // EQ, distortion, delay stages and the chain that drives them
pub mod error;
pub mod mapping; // Telemetry → parameter mapping at control rate
pub mod params;
pub mod telemetry; // Byte-stream decoding and hand-off

pub use block::AudioBlock;
pub use config::EngineConfig;
pub use effects::{EffectStage, EffectsChain, ProcessSpec};
pub use error::{ConfigError, LinkError, PrepareError};
pub use params::{ParamId, ParameterStore};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Capacity of the delay ring, in seconds of audio.
pub const MAX_DELAY_SECONDS: f32 = 2.0;
