// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tone curves — gamma and S-curve shaping as 256-entry lookup tables.

use crate::raster::Raster;

/// Largest S-curve strength accepted by profile validation.
///
/// Above 2.0 the upper half starts below the end of the lower half and the
/// curve is no longer monotonic.
pub const MAX_CURVE_STRENGTH: f32 = 2.0;

/// A per-level lookup table for 8-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneLut([u8; 256]);

impl ToneLut {
    pub fn identity() -> Self {
        Self(std::array::from_fn(|i| i as u8))
    }

    /// `round(255 * (v / 255) ^ gamma)`. Gamma below 1 lifts midtones.
    pub fn gamma(gamma: f32) -> Self {
        let g = gamma as f64;
        Self::from_fn(|t| t.powf(g))
    }

    /// Contrast S-curve: `strength·t²` below the midpoint and
    /// `1 − strength·(1−t)²` from it upward, clamped to `[0, 1]`.
    ///
    /// Strength 2.0 is the continuous quadratic S; smaller strengths leave a
    /// step at the midpoint.
    pub fn s_curve(strength: f32) -> Self {
        let k = strength as f64;
        Self::from_fn(|t| {
            if t < 0.5 {
                k * t * t
            } else {
                1.0 - k * (1.0 - t) * (1.0 - t)
            }
        })
    }

    /// Build a table from a map on normalised `[0, 1]` levels.
    fn from_fn(f: impl Fn(f64) -> f64) -> Self {
        Self(std::array::from_fn(|i| {
            let t = i as f64 / 255.0;
            (255.0 * f(t).clamp(0.0, 1.0)).round() as u8
        }))
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &ToneLut) -> Self {
        Self(self.0.map(|v| next.0[v as usize]))
    }

    pub fn table(&self) -> &[u8; 256] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Non-decreasing over all levels.
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Maps 0 to 0 and 255 to 255.
    pub fn preserves_endpoints(&self) -> bool {
        self.0[0] == 0 && self.0[255] == 255
    }

    /// Apply to every sample of a raster.
    pub fn apply(&self, raster: Raster) -> Raster {
        if self.is_identity() {
            return raster;
        }
        raster.map_samples(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn gamma_one_is_identity() {
        let lut = ToneLut::gamma(1.0);
        for i in 0..=255u8 {
            assert_eq!(lut.table()[i as usize], i);
        }
        assert!(lut.is_identity());
    }

    #[test]
    fn gamma_below_one_brightens_midtones() {
        let lut = ToneLut::gamma(0.75);
        assert!(lut.table()[128] > 128);
        assert!(lut.preserves_endpoints());
        assert!(lut.is_monotonic());
    }

    #[test]
    fn s_curve_is_monotonic_with_fixed_endpoints() {
        for strength in [0.0, 0.5, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.8, MAX_CURVE_STRENGTH] {
            let lut = ToneLut::s_curve(strength);
            assert!(lut.is_monotonic(), "strength {strength}");
            assert!(lut.preserves_endpoints(), "strength {strength}");
        }
    }

    #[test]
    fn s_curve_levels() {
        let lut = ToneLut::s_curve(1.5);
        // 1.5 * (64/255)^2 * 255 = 24.1
        assert_eq!(lut.table()[64], 24);
        assert_eq!(lut.table()[127], 95);
        assert_eq!(lut.table()[191], 255 - 24);

        let unit = ToneLut::s_curve(1.0);
        assert_eq!(unit.table()[64], 16);
        assert_eq!(unit.table()[128], 192);
        assert_eq!(unit.table()[191], 239);
    }

    #[test]
    fn strength_two_is_the_continuous_quadratic() {
        let lut = ToneLut::s_curve(2.0);
        assert_eq!(lut.table()[64], 32);
        assert_eq!(lut.table()[191], 255 - 32);
        assert!(lut.table()[127].abs_diff(lut.table()[128]) <= 2);
    }

    #[test]
    fn steeper_than_two_is_not_monotonic() {
        assert!(!ToneLut::s_curve(2.5).is_monotonic());
    }

    #[test]
    fn stronger_curves_lift_shadows_and_pull_highlights() {
        let soft = ToneLut::s_curve(1.1);
        let hard = ToneLut::s_curve(1.8);
        assert!(hard.table()[60] > soft.table()[60]);
        assert!(hard.table()[200] < soft.table()[200]);
    }

    #[test]
    fn composition_applies_in_order() {
        let invert = ToneLut(std::array::from_fn(|i| 255 - i as u8));
        let halve = ToneLut(std::array::from_fn(|i| (i / 2) as u8));
        let lut = invert.then(&halve);
        assert_eq!(lut.table()[0], 127);
        assert_eq!(lut.table()[255], 0);
    }

    #[test]
    fn apply_maps_raster_samples() {
        let gray = GrayImage::from_pixel(2, 2, Luma([64]));
        let out = ToneLut::s_curve(1.0).apply(Raster::Gray(gray));
        assert!(out.as_raw().iter().all(|&v| v == 16));
    }
}
