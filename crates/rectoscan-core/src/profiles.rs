// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Profile identifiers. The parameter bundles they select live next to the
// pipeline in `rectoscan-document`; this module only owns the fixed name set
// and its resolution rules.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::error::ScanError;
use crate::types::ColorMode;

/// Named colour profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorProfile {
    /// Light brighten/contrast only.
    Original,
    /// The first-generation colour path: equal-weight white balance, mild
    /// contrast and saturation boost.
    Classic,
    /// White balance, local contrast, and a moderate tone curve.
    #[default]
    Adjusted,
    /// White balance, stronger equalization, and an aggressive tone curve.
    Enhanced,
}

impl ColorProfile {
    pub const ALL: [ColorProfile; 4] = [
        ColorProfile::Original,
        ColorProfile::Classic,
        ColorProfile::Adjusted,
        ColorProfile::Enhanced,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorProfile::Original => "original",
            ColorProfile::Classic => "classic",
            ColorProfile::Adjusted => "adjusted",
            ColorProfile::Enhanced => "enhanced",
        }
    }

    /// Strict lookup by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, ScanError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ScanError::UnknownProfile {
                mode: ColorMode::Color,
                name: name.to_string(),
            })
    }

    /// Total lookup: unknown names fall back to `default`.
    pub fn resolve(name: &str, default: ColorProfile) -> Self {
        Self::from_name(name).unwrap_or_else(|err| {
            warn!(%err, fallback = default.name(), "Falling back to default colour profile");
            default
        })
    }
}

impl std::fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorProfile {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Named grayscale profiles, ordered roughly by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrayProfile {
    /// Light local contrast and a soft blur.
    Minimal,
    /// The first-generation grayscale path: whitening balance, brightness,
    /// two contrast passes, gamma, and the full-strength quadratic S-curve.
    Classic,
    #[default]
    Standard,
    Enhanced,
    High,
    Extreme,
    /// Two-level Otsu binarization.
    Silhouette,
}

impl GrayProfile {
    pub const ALL: [GrayProfile; 7] = [
        GrayProfile::Minimal,
        GrayProfile::Classic,
        GrayProfile::Standard,
        GrayProfile::Enhanced,
        GrayProfile::High,
        GrayProfile::Extreme,
        GrayProfile::Silhouette,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GrayProfile::Minimal => "minimal",
            GrayProfile::Classic => "classic",
            GrayProfile::Standard => "standard",
            GrayProfile::Enhanced => "enhanced",
            GrayProfile::High => "high",
            GrayProfile::Extreme => "extreme",
            GrayProfile::Silhouette => "silhouette",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ScanError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ScanError::UnknownProfile {
                mode: ColorMode::Grayscale,
                name: name.to_string(),
            })
    }

    pub fn resolve(name: &str, default: GrayProfile) -> Self {
        Self::from_name(name).unwrap_or_else(|err| {
            warn!(%err, fallback = default.name(), "Falling back to default grayscale profile");
            default
        })
    }
}

impl std::fmt::Display for GrayProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GrayProfile {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
