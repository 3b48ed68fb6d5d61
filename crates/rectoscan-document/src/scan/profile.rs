// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing profiles — the parameter bundle behind every named profile, and
// the static table the identifiers resolve to.

use std::borrow::Cow;

use rectoscan_core::error::ScanError;
use rectoscan_core::profiles::{ColorProfile, GrayProfile};
use serde::{Deserialize, Serialize};

use super::binarize::Silhouette;
use crate::tone::{
    ChannelStatistic, EQUAL_WEIGHTS, Equalization, GrayTarget, LUMA_WEIGHTS, MAX_CURVE_STRENGTH,
    PERCEPTUAL_WEIGHTS, TileGrid, ToneLut, WhiteBalance,
};

/// Every numeric parameter a profile chain uses.
///
/// Factors of 1.0 and `None` stages are skipped. Built-in profiles are
/// `'static` and never mutated; custom ones can be deserialized and must pass
/// [`ProcessingProfile::validate`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingProfile {
    pub name: Cow<'static, str>,
    pub white_balance: Option<WhiteBalance>,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub equalization: Option<Equalization>,
    pub gamma: f32,
    /// Second contrast pass after gamma.
    pub post_contrast: f32,
    pub curve_strength: Option<f32>,
    pub blur_sigma: Option<f32>,
    /// Replaces the whole tone chain with binarization.
    pub silhouette: Option<Silhouette>,
}

impl Default for ProcessingProfile {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("custom"),
            white_balance: None,
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            equalization: None,
            gamma: 1.0,
            post_contrast: 1.0,
            curve_strength: None,
            blur_sigma: None,
            silhouette: None,
        }
    }
}

impl ProcessingProfile {
    /// Reject parameters that would make a stage meaningless or produce a
    /// non-monotonic tone map.
    pub fn validate(&self) -> Result<(), ScanError> {
        let invalid = |what: String| Err(ScanError::InvalidProfile(format!("{}: {what}", self.name)));

        for (field, value) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("post_contrast", self.post_contrast),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{field} must be a finite non-negative factor, got {value}"));
            }
        }

        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return invalid(format!("gamma must be positive, got {}", self.gamma));
        }

        if let Some(wb) = &self.white_balance {
            let (lo, hi) = wb.factor_range;
            if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
                return invalid(format!("white balance factor range ({lo}, {hi}) is empty"));
            }
        }

        if let Some(eq) = &self.equalization {
            if !eq.clip_limit.is_finite() || eq.clip_limit <= 0.0 {
                return invalid(format!("clip limit must be positive, got {}", eq.clip_limit));
            }
            if eq.tiles.rows == 0 || eq.tiles.cols == 0 {
                return invalid("tile grid needs at least one tile per axis".to_string());
            }
        }

        if let Some(strength) = self.curve_strength {
            if !(0.0..=MAX_CURVE_STRENGTH).contains(&strength) {
                return invalid(format!(
                    "curve strength {strength} outside 0..={MAX_CURVE_STRENGTH}"
                ));
            }
            let lut = ToneLut::s_curve(strength);
            if !lut.is_monotonic() || !lut.preserves_endpoints() {
                return invalid(format!("curve strength {strength} is not monotonic"));
            }
        }

        if let Some(sigma) = self.blur_sigma.filter(|s| !s.is_finite() || *s < 0.0) {
            return invalid(format!("blur sigma must be non-negative, got {sigma}"));
        }

        if let Some(s) = &self.silhouette {
            let bias_ok = s.bias.is_finite() && s.bias > 0.0;
            let blur_ok = s.blur_sigma.is_finite() && s.blur_sigma >= 0.0;
            if !(bias_ok && blur_ok) {
                return invalid(format!(
                    "silhouette bias {} / blur {} out of range",
                    s.bias, s.blur_sigma
                ));
            }
        }

        Ok(())
    }
}

/// Maps a profile identifier to its static parameter bundle.
pub trait ProfileParams {
    fn params(self) -> &'static ProcessingProfile;
}

impl ProfileParams for ColorProfile {
    fn params(self) -> &'static ProcessingProfile {
        match self {
            ColorProfile::Original => &COLOR_ORIGINAL,
            ColorProfile::Classic => &COLOR_CLASSIC,
            ColorProfile::Adjusted => &COLOR_ADJUSTED,
            ColorProfile::Enhanced => &COLOR_ENHANCED,
        }
    }
}

impl ProfileParams for GrayProfile {
    fn params(self) -> &'static ProcessingProfile {
        match self {
            GrayProfile::Minimal => &GRAY_MINIMAL,
            GrayProfile::Classic => &GRAY_CLASSIC,
            GrayProfile::Standard => &GRAY_STANDARD,
            GrayProfile::Enhanced => &GRAY_ENHANCED,
            GrayProfile::High => &GRAY_HIGH,
            GrayProfile::Extreme => &GRAY_EXTREME,
            GrayProfile::Silhouette => &GRAY_SILHOUETTE,
        }
    }
}

// -- Colour profiles ----------------------------------------------------------

static COLOR_ORIGINAL: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("original"),
    white_balance: None,
    brightness: 1.05,
    contrast: 1.1,
    saturation: 1.0,
    equalization: None,
    gamma: 1.0,
    post_contrast: 1.0,
    curve_strength: None,
    blur_sigma: None,
    silhouette: None,
};

static COLOR_CLASSIC: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("classic"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::Mean,
        target: GrayTarget::Weighted(EQUAL_WEIGHTS),
        factor_range: (0.5, 2.0),
    }),
    brightness: 1.0,
    contrast: 1.2,
    saturation: 1.1,
    equalization: None,
    gamma: 1.0,
    post_contrast: 1.0,
    curve_strength: None,
    blur_sigma: None,
    silhouette: None,
};

static COLOR_ADJUSTED: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("adjusted"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::TrimmedMean,
        target: GrayTarget::Weighted(LUMA_WEIGHTS),
        factor_range: (0.8, 1.5),
    }),
    brightness: 1.0,
    contrast: 1.0,
    saturation: 1.05,
    equalization: Some(Equalization {
        clip_limit: 1.5,
        tiles: TileGrid::square(8),
    }),
    gamma: 1.0,
    post_contrast: 1.0,
    curve_strength: Some(1.1),
    blur_sigma: None,
    silhouette: None,
};

static COLOR_ENHANCED: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("enhanced"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::TrimmedMean,
        target: GrayTarget::Weighted(PERCEPTUAL_WEIGHTS),
        factor_range: (0.85, 1.5),
    }),
    brightness: 1.02,
    contrast: 1.1,
    saturation: 1.1,
    equalization: Some(Equalization {
        clip_limit: 2.5,
        tiles: TileGrid::square(6),
    }),
    gamma: 0.95,
    post_contrast: 1.0,
    curve_strength: Some(1.4),
    blur_sigma: None,
    silhouette: None,
};

// -- Grayscale profiles -------------------------------------------------------

static GRAY_MINIMAL: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("minimal"),
    white_balance: None,
    brightness: 1.0,
    contrast: 1.0,
    saturation: 1.0,
    equalization: Some(Equalization {
        clip_limit: 1.2,
        tiles: TileGrid::square(8),
    }),
    gamma: 1.0,
    post_contrast: 1.0,
    curve_strength: None,
    blur_sigma: Some(0.6),
    silhouette: None,
};

static GRAY_CLASSIC: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("classic"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::Mean,
        target: GrayTarget::BrightestScaled(1.1),
        factor_range: (0.8, 2.5),
    }),
    brightness: 1.3,
    contrast: 1.6,
    saturation: 1.0,
    equalization: None,
    gamma: 0.75,
    post_contrast: 1.8,
    curve_strength: Some(2.0),
    blur_sigma: None,
    silhouette: None,
};

static GRAY_STANDARD: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("standard"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::Mean,
        target: GrayTarget::Weighted(LUMA_WEIGHTS),
        factor_range: (0.8, 2.5),
    }),
    brightness: 1.1,
    contrast: 1.2,
    saturation: 1.0,
    equalization: Some(Equalization {
        clip_limit: 2.0,
        tiles: TileGrid::square(8),
    }),
    gamma: 0.85,
    post_contrast: 1.0,
    curve_strength: Some(1.1),
    blur_sigma: None,
    silhouette: None,
};

static GRAY_ENHANCED: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("enhanced"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::Mean,
        target: GrayTarget::Weighted(PERCEPTUAL_WEIGHTS),
        factor_range: (0.8, 2.5),
    }),
    brightness: 1.15,
    contrast: 1.3,
    saturation: 1.0,
    equalization: Some(Equalization {
        clip_limit: 2.5,
        tiles: TileGrid::square(8),
    }),
    gamma: 0.8,
    post_contrast: 1.1,
    curve_strength: Some(1.3),
    blur_sigma: None,
    silhouette: None,
};

static GRAY_HIGH: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("high"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::Mean,
        target: GrayTarget::Weighted(LUMA_WEIGHTS),
        factor_range: (0.8, 2.5),
    }),
    brightness: 1.2,
    contrast: 1.4,
    saturation: 1.0,
    equalization: Some(Equalization {
        clip_limit: 3.0,
        tiles: TileGrid::square(6),
    }),
    gamma: 0.75,
    post_contrast: 1.2,
    curve_strength: Some(1.5),
    blur_sigma: None,
    silhouette: None,
};

static GRAY_EXTREME: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("extreme"),
    white_balance: Some(WhiteBalance {
        statistic: ChannelStatistic::Mean,
        target: GrayTarget::Weighted(PERCEPTUAL_WEIGHTS),
        factor_range: (0.8, 2.5),
    }),
    brightness: 1.25,
    contrast: 1.5,
    saturation: 1.0,
    equalization: Some(Equalization {
        clip_limit: 4.0,
        tiles: TileGrid::square(6),
    }),
    gamma: 0.7,
    post_contrast: 1.3,
    curve_strength: Some(1.8),
    blur_sigma: None,
    silhouette: None,
};

static GRAY_SILHOUETTE: ProcessingProfile = ProcessingProfile {
    name: Cow::Borrowed("silhouette"),
    white_balance: None,
    brightness: 1.0,
    contrast: 1.0,
    saturation: 1.0,
    equalization: None,
    gamma: 1.0,
    post_contrast: 1.0,
    curve_strength: None,
    blur_sigma: None,
    silhouette: Some(Silhouette {
        bias: 1.15,
        blur_sigma: 0.8,
        close_radius: 1,
    }),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_profile_validates() {
        for p in ColorProfile::ALL {
            p.params().validate().unwrap();
            assert_eq!(p.params().name, p.name());
        }
        for p in GrayProfile::ALL {
            p.params().validate().unwrap();
            assert_eq!(p.params().name, p.name());
        }
    }

    #[test]
    fn only_silhouette_binarizes() {
        for p in GrayProfile::ALL {
            assert_eq!(
                p.params().silhouette.is_some(),
                p == GrayProfile::Silhouette,
                "{p}"
            );
        }
        assert!(ColorProfile::ALL.iter().all(|p| p.params().silhouette.is_none()));
    }

    #[test]
    fn grayscale_strength_increases_through_the_ladder() {
        let ladder = [
            GrayProfile::Standard,
            GrayProfile::Enhanced,
            GrayProfile::High,
            GrayProfile::Extreme,
        ];
        for pair in ladder.windows(2) {
            let (a, b) = (pair[0].params(), pair[1].params());
            assert!(a.curve_strength < b.curve_strength);
            assert!(a.gamma > b.gamma);
        }
    }

    #[test]
    fn original_is_light_touch() {
        let p = ColorProfile::Original.params();
        assert!(p.white_balance.is_none() && p.equalization.is_none());
        assert!(p.curve_strength.is_none());
    }

    #[test]
    fn rejects_bad_parameters() {
        let bad_gamma = ProcessingProfile {
            gamma: 0.0,
            ..ProcessingProfile::default()
        };
        assert!(matches!(bad_gamma.validate(), Err(ScanError::InvalidProfile(_))));

        let bad_curve = ProcessingProfile {
            curve_strength: Some(5.0),
            ..ProcessingProfile::default()
        };
        assert!(bad_curve.validate().is_err());

        // Past 2.0 the midpoint step runs backwards.
        let steep_curve = ProcessingProfile {
            curve_strength: Some(2.5),
            ..ProcessingProfile::default()
        };
        assert!(steep_curve.validate().is_err());

        let bad_range = ProcessingProfile {
            white_balance: Some(WhiteBalance {
                statistic: ChannelStatistic::Mean,
                target: GrayTarget::Weighted(LUMA_WEIGHTS),
                factor_range: (2.0, 1.0),
            }),
            ..ProcessingProfile::default()
        };
        assert!(bad_range.validate().is_err());

        let bad_tiles = ProcessingProfile {
            equalization: Some(Equalization {
                clip_limit: 2.0,
                tiles: TileGrid { rows: 0, cols: 4 },
            }),
            ..ProcessingProfile::default()
        };
        assert!(bad_tiles.validate().is_err());

        let bad_contrast = ProcessingProfile {
            contrast: f32::NAN,
            ..ProcessingProfile::default()
        };
        assert!(bad_contrast.validate().is_err());
    }

    #[test]
    fn custom_profile_from_json() {
        let profile: ProcessingProfile = serde_json::from_str(
            r#"{
                "name": "receipt",
                "contrast": 1.3,
                "gamma": 0.9,
                "curve_strength": 1.2,
                "equalization": {"clip_limit": 2.0, "tiles": {"rows": 4, "cols": 4}}
            }"#,
        )
        .unwrap();
        assert_eq!(profile.name, "receipt");
        assert_eq!(profile.brightness, 1.0);
        assert_eq!(profile.equalization.map(|e| e.tiles), Some(TileGrid::square(4)));
        profile.validate().unwrap();
    }
}
