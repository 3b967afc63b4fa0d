use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while preparing a stage for streaming. The stream must not start
/// when any stage reports one of these.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    #[error("block size must be between 1 and {max}, got {got}")]
    InvalidBlockSize { got: usize, max: usize },

    #[error("channel count must be at least 1")]
    NoChannels,

    #[error("failed to allocate {samples} samples of delay memory")]
    RingAllocation {
        samples: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Failures reported by a telemetry byte source.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("telemetry link disconnected")]
    Disconnected,

    #[error("telemetry link I/O error")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serde")]
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
