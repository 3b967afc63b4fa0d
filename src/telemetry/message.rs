#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sensor axis a reading belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

/// One decoded sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub axis: Axis,
    pub sign: Sign,
    pub magnitude: u32,
}

impl Message {
    pub fn new(axis: Axis, sign: Sign, magnitude: u32) -> Self {
        Self { axis, sign, magnitude }
    }

    /// Magnitude with the sign applied.
    pub fn signed_value(&self) -> f64 {
        match self.sign {
            Sign::Positive => self.magnitude as f64,
            Sign::Negative => -(self.magnitude as f64),
        }
    }
}

/// Anything that can hand out the most recently received message.
pub trait MessageSource {
    fn pop_latest(&mut self) -> Option<Message>;
}
