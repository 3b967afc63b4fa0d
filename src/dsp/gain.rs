//! Decibel conversions.

/*
Audio engineers measure level changes in decibels (dB) because hearing is
logarithmic: we perceive loudness ratios, not differences.

    dB = 20 × log₁₀(amplitude_ratio)

    ×1.0   =   0 dB  (unity)
    ×0.5   ≈  -6 dB
    ×0.1   = -20 dB
    ×2.0   ≈  +6 dB
*/

/// Anything at or below this level is treated as silence.
pub const MINUS_INFINITY_DB: f32 = -100.0;

/// Convert decibels to a linear gain factor. Levels at or below
/// [`MINUS_INFINITY_DB`] map to exactly zero.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    if db <= MINUS_INFINITY_DB {
        0.0
    } else {
        10.0_f32.powf(db * 0.05)
    }
}
