//! Dry/wet blending and gain-ramped buffer transfers.

/*
Dry/Wet and Ramps
=================

  dry           The signal before an effect touched it.
  wet           The signal after the effect.
  mix           0.0 = all dry, 1.0 = all wet. Weights always sum to 1.0, so
                blending never boosts the level.

    output = wet × mix + dry × (1 - mix)

Gain Ramps
----------

Jumping a gain from one block to the next produces a step in the waveform,
heard as a click. A ramp spreads the change across the block instead:

    gain[i] = start + (end - start) × i / len

The delay line uses ramped copies both when it records the input and when it
feeds its own output back into the ring.
*/

/// Blend dry and wet samples using linear crossfade (single sample version).
///
/// output = (dry × (1-mix)) + (wet × mix)
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    wet * mix + dry * (1.0 - mix)
}

/// Apply dry/wet mixing to a buffer.
///
/// Modifies `wet` in-place, using `dry` as the unprocessed reference.
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());

    if mix >= 1.0 {
        return; // 100% wet, nothing to do
    }

    for (wet_sample, &dry_sample) in wet.iter_mut().zip(dry.iter()) {
        *wet_sample = blend_dry_wet(dry_sample, *wet_sample, mix);
    }
}

/// Gain applied to sample `index` of a `len`-sample ramp from `start` to `end`.
#[inline]
fn ramp_gain(start: f32, end: f32, index: usize, len: usize) -> f32 {
    if len == 0 {
        return end;
    }
    start + (end - start) * (index as f32 / len as f32)
}

/// Overwrite `dst` with `src`, scaled by a gain ramping from `start` to `end`.
///
/// `offset` and `total` place this copy inside a longer ramp, so a transfer
/// split in two (ring wrap-around) still sees one continuous ramp.
#[inline]
pub fn copy_with_ramp(dst: &mut [f32], src: &[f32], start: f32, end: f32, offset: usize, total: usize) {
    debug_assert_eq!(dst.len(), src.len());

    for (i, (d, &s)) in dst.iter_mut().zip(src.iter()).enumerate() {
        *d = s * ramp_gain(start, end, offset + i, total);
    }
}

/// Add `src` into `dst`, scaled by a gain ramping from `start` to `end`.
///
/// See [`copy_with_ramp`] for `offset` and `total`.
#[inline]
pub fn add_with_ramp(dst: &mut [f32], src: &[f32], start: f32, end: f32, offset: usize, total: usize) {
    debug_assert_eq!(dst.len(), src.len());

    for (i, (d, &s)) in dst.iter_mut().zip(src.iter()).enumerate() {
        *d += s * ramp_gain(start, end, offset + i, total);
    }
}
