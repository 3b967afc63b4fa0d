//! Engine configuration
//!
//! Loaded from YAML when the `serde` feature is on. Every field has a
//! default, so a partial file (or none at all) is valid:
//!
//! ```yaml
//! control_interval_ms: 50
//! batch_size: 50
//! axis_codes:
//!   x: "XG"
//!   y: "YB"
//! mappings:
//!   x: EqCutoff
//!   y: Drive
//! parameters:
//!   DelayTimeMs: 350
//!   Mix: 0.8
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mapping::{MappableParam, MappingTable};
use crate::params::{ParamId, ParameterStore};
use crate::telemetry::{Axis, AxisCodes, LinkOptions};

/// Initial axis → parameter assignments.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisMappings {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub x: Option<MappableParam>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub y: Option<MappableParam>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Mapping runtime tick period.
    pub control_interval_ms: u64,
    /// Most readings averaged per tick.
    pub batch_size: usize,
    /// Telemetry channel capacity (messages).
    pub channel_capacity: usize,
    /// Longest single wait for link bytes; bounds shutdown latency.
    pub read_timeout_ms: u64,
    /// How long to wait for the link thread on shutdown.
    pub shutdown_timeout_ms: u64,
    pub axis_codes: AxisCodes,
    pub mappings: AxisMappings,
    /// Starting values, clamped into range when applied.
    pub parameters: BTreeMap<ParamId, f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            control_interval_ms: 50,
            batch_size: 50,
            channel_capacity: 1024,
            read_timeout_ms: 5,
            shutdown_timeout_ms: 500,
            axis_codes: AxisCodes::default(),
            mappings: AxisMappings::default(),
            parameters: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn control_interval(&self) -> Duration {
        Duration::from_millis(self.control_interval_ms.max(1))
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            axis_codes: self.axis_codes.clone(),
            read_timeout: Duration::from_millis(self.read_timeout_ms.max(1)),
            shutdown_timeout: Duration::from_millis(self.shutdown_timeout_ms),
        }
    }

    pub fn apply_mappings(&self, table: &MappingTable) {
        for (axis, param) in [(Axis::X, self.mappings.x), (Axis::Y, self.mappings.y)] {
            match param {
                Some(param) => table.assign(axis, param),
                None => table.clear(axis),
            }
        }
    }

    pub fn apply_parameters(&self, store: &ParameterStore) {
        for (&id, &value) in &self.parameters {
            let stored = store.set(id, value);
            if stored != value {
                log::warn!("config: {:?} = {} out of range, using {}", id, value, stored);
            }
        }
    }
}

#[cfg(feature = "serde")]
mod yaml {
    use std::path::Path;

    use super::EngineConfig;
    use crate::error::ConfigError;

    impl EngineConfig {
        pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
            serde_yaml::from_str(contents)
        }

        /// Load configuration from a YAML file
        ///
        /// If the file doesn't exist, returns the defaults.
        pub fn load(path: &Path) -> Result<Self, ConfigError> {
            log::info!("config: loading from {:?}", path);

            if !path.exists() {
                log::info!("config: file doesn't exist, using defaults");
                return Ok(Self::default());
            }

            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let config = Self::from_yaml_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            log::info!(
                "config: control interval {} ms, batch {}, mappings x={:?} y={:?}, {} parameter override(s)",
                config.control_interval_ms,
                config.batch_size,
                config.mappings.x,
                config.mappings.y,
                config.parameters.len()
            );
            Ok(config)
        }
    }
}
