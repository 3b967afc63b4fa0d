//! Distortion / Waveshaping
//!
//! Distortion adds harmonics by reshaping the waveform. Each curve here is an
//! odd, monotonic, bounded transfer function, so the output can never run
//! away no matter how hard the input is driven.
//!
//! # Anger
//!
//! Every curve takes an `anger` value in `[0, 1]` that bends the knee of the
//! curve: at 0 the transition into saturation is gentle, at 1 it is abrupt.
//! Internally anger is mapped to a shape constant `a` which stays strictly
//! positive over the whole anger range.
//!
//! | algorithm    | transfer function            | a                |
//! | ------------ | ---------------------------- | ---------------- |
//! | InverseAbs   | x / (a + abs(x))             | 1 - 0.9·anger    |
//! | ArcTan       | (2/π)·atan((π/a)·x)          | 3 - 2.5·anger    |
//! | Erf          | erf(x·√π / a)                | 3 - 2.5·anger    |
//! | InverseSqrt  | x / sqrt(1/a + x²)           | 0.5 + 4.5·anger  |
//!
//! All four saturate towards ±1.
//!
//! # Autogain
//!
//! Driving a saturator harder makes it louder. The compensation
//!
//!   gain = db_to_gain(-drive / 5) · (1 - 0.7·anger)
//!
//! pulls the level back down as drive and anger rise.

use std::f32::consts::{FRAC_2_PI, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::gain::db_to_gain;

/// √π, used by the erf curve.
const SQRT_PI: f32 = 1.772_453_9;

/// Waveshaping curve family.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    InverseAbs,
    ArcTan,
    Erf,
    InverseSqrt,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::InverseAbs,
        Algorithm::ArcTan,
        Algorithm::Erf,
        Algorithm::InverseSqrt,
    ];

    /// Map a choice index; out-of-range indices clamp to the last curve.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Shape constant `a` for the given anger.
    #[inline]
    pub fn shape_constant(self, anger: f32) -> f32 {
        match self {
            Algorithm::InverseAbs => 1.0 - 0.9 * anger,
            Algorithm::ArcTan | Algorithm::Erf => 3.0 - 2.5 * anger,
            Algorithm::InverseSqrt => 0.5 + 4.5 * anger,
        }
    }

    /// Apply the transfer function to one sample.
    #[inline]
    pub fn shape(self, x: f32, anger: f32) -> f32 {
        let a = self.shape_constant(anger);
        match self {
            Algorithm::InverseAbs => inverse_abs(x, a),
            Algorithm::ArcTan => arctan(x, a),
            Algorithm::Erf => erf(x, a),
            Algorithm::InverseSqrt => inverse_sqrt(x, a),
        }
    }
}

#[inline]
pub fn inverse_abs(x: f32, a: f32) -> f32 {
    x / (a + x.abs())
}

#[inline]
pub fn arctan(x: f32, a: f32) -> f32 {
    FRAC_2_PI * ((PI / a) * x).atan()
}

#[inline]
pub fn erf(x: f32, a: f32) -> f32 {
    libm::erff(x * SQRT_PI / a)
}

#[inline]
pub fn inverse_sqrt(x: f32, a: f32) -> f32 {
    // Large |x| would overflow x², but the curve has already saturated there
    if x.abs() > 1.0e18 {
        return x.signum();
    }
    x / (1.0 / a + x * x).sqrt()
}

/// Pre-shaper gain for a drive value in `[0, 100]`.
#[inline]
pub fn drive_gain(drive: f32) -> f32 {
    drive / 10.0 + 1.0
}

/// Level compensation applied after shaping.
#[inline]
pub fn autogain(drive: f32, anger: f32) -> f32 {
    db_to_gain(drive / -5.0) * (1.0 - 0.7 * anger)
}

/// Drive, shape and compensate a buffer in place.
pub fn shape_buffer(buffer: &mut [f32], algorithm: Algorithm, drive: f32, anger: f32, output_gain: f32) {
    let pre = drive_gain(drive);
    let post = autogain(drive, anger) * output_gain;

    for sample in buffer.iter_mut() {
        *sample = algorithm.shape(*sample * pre, anger) * post;
    }
}
