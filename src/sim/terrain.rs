//! Terrain profile
//!
//! The ground is a fixed sum of sinusoids. Heights are in screen space: y grows
//! downward, so a smaller value is higher ground.

use crate::consts::GROUND_Y;

/// (amplitude, wavelength, phase offset) for each undulation layer
const WAVES: [(f32, f32, f32); 3] = [(90.0, 260.0, 300.0), (48.0, 110.0, 800.0), (24.0, 55.0, -1200.0)];

/// Step used by [`slope`]
const SLOPE_STEP: f32 = 1.0;

/// Ground height at track coordinate `x`
#[inline]
pub fn height(x: f32) -> f32 {
    WAVES
        .iter()
        .fold(GROUND_Y, |y, &(amp, wavelength, phase)| y + amp * ((x + phase) / wavelength).sin())
}

/// Local slope (dy/dx) at `x`, symmetric finite difference.
///
/// Only used to tilt vehicle visuals; physics never reads it.
#[inline]
pub fn slope(x: f32) -> f32 {
    (height(x + SLOPE_STEP) - height(x - SLOPE_STEP)) / (2.0 * SLOPE_STEP)
}

/// Maximum distance the terrain can stray from [`GROUND_Y`]
pub fn max_amplitude() -> f32 {
    WAVES.iter().map(|&(amp, _, _)| amp).sum()
}
