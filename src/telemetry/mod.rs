//! Sensor telemetry: byte-stream decoding, the reader thread, and the
//! newest-first hand-off to the mapping runtime.
//!
//! ```text
//!   ByteSource ──► LinkReader thread ──► TelemetryDecoder ──► TelemetrySender
//!                                                                  │ rtrb
//!                                      MappingRuntime ◄── TelemetryReceiver
//! ```

pub mod channel;
pub mod decoder;
pub mod link;
pub mod message;

pub use channel::{channel, TelemetryReceiver, TelemetrySender};
pub use decoder::{AxisCodes, TelemetryDecoder};
pub use link::{ByteSource, ChannelSource, LinkOptions, LinkReader, LinkStatus};
pub use message::{Axis, Message, MessageSource, Sign};
