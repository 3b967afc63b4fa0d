//! Telemetry → parameter mapping.
//!
//! [`MappingTable`] records which parameter each sensor axis drives;
//! [`MappingRuntime`] turns batches of readings into parameter writes, and
//! [`ControlTimer`] runs it at control rate, far below the audio block rate.

pub mod runtime;
pub mod table;

pub use runtime::{normalize, target_value, ControlTimer, MappingRuntime, MappingUpdate};
pub use table::{MappableParam, MappingTable};
