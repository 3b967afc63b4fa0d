//! Byte-at-a-time decoder for the sensor's text protocol.
//!
//! A reading is an axis marker, an optional sign, decimal digits and a
//! carriage return:
//!
//! ```text
//!   G+042\r     X axis, +42
//!   B-7\r       Y axis, -7
//!   G\r         X axis, 0
//! ```
//!
//! There is no checksum. Anything that doesn't fit the grammar is skipped
//! rather than reported, and a terminator only produces a message when an
//! axis marker has been seen since the previous terminator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::message::{Axis, Message, Sign};

pub const PLUS: u8 = b'+';
pub const MINUS: u8 = b'-';
pub const TERMINATOR: u8 = b'\r';

/// Bytes accepted as axis markers. Each string lists every byte that opens a
/// reading for that axis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisCodes {
    pub x: String,
    pub y: String,
}

impl AxisCodes {
    pub fn axis_for(&self, byte: u8) -> Option<Axis> {
        if self.x.as_bytes().contains(&byte) {
            Some(Axis::X)
        } else if self.y.as_bytes().contains(&byte) {
            Some(Axis::Y)
        } else {
            None
        }
    }
}

impl Default for AxisCodes {
    /// The plain letters plus the device's wire codes (`G` = X, `B` = Y).
    fn default() -> Self {
        Self {
            x: "XG".to_string(),
            y: "YB".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Collecting { axis: Axis, sign: Sign, magnitude: u32 },
}

pub struct TelemetryDecoder {
    codes: AxisCodes,
    state: State,
}

impl TelemetryDecoder {
    pub fn new() -> Self {
        Self::with_codes(AxisCodes::default())
    }

    pub fn with_codes(codes: AxisCodes) -> Self {
        Self {
            codes,
            state: State::Idle,
        }
    }

    pub fn codes(&self) -> &AxisCodes {
        &self.codes
    }

    /// True while a reading is open (axis seen, terminator not yet).
    pub fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting { .. })
    }

    /// Drop any partial reading.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    /// Feed one byte; returns a message when it completes one.
    pub fn push_byte(&mut self, byte: u8) -> Option<Message> {
        if let Some(axis) = self.codes.axis_for(byte) {
            self.state = State::Collecting {
                axis,
                sign: Sign::Positive,
                magnitude: 0,
            };
            return None;
        }

        let State::Collecting { axis, sign, magnitude } = &mut self.state else {
            return None;
        };

        match byte {
            PLUS => *sign = Sign::Positive,
            MINUS => *sign = Sign::Negative,
            b'0'..=b'9' => {
                let digit = u32::from(byte - b'0');
                *magnitude = magnitude.saturating_mul(10).saturating_add(digit);
            }
            TERMINATOR => {
                let message = Message::new(*axis, *sign, *magnitude);
                self.state = State::Idle;
                return Some(message);
            }
            _ => {}
        }
        None
    }

    /// Decode a chunk, yielding every message it completes. Partial readings
    /// carry over to the next chunk.
    pub fn decode<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = Message> + 'a {
        bytes.iter().filter_map(move |&byte| self.push_byte(byte))
    }
}

impl Default for TelemetryDecoder {
    fn default() -> Self {
        Self::new()
    }
}
