// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::profiles::{ColorProfile, GrayProfile};

/// Channel layout of grayscale-mode output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrayOutput {
    /// Gray replicated into three channels, so both modes share one layout.
    #[default]
    Rgb,
    /// Single luma channel.
    Luma,
}

/// Caller-supplied settings for a `ScanPipeline`.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Profile substituted for unrecognised colour profile names.
    pub default_color_profile: ColorProfile,
    /// Profile substituted for unrecognised grayscale profile names.
    pub default_grayscale_profile: GrayProfile,
    /// Channel layout of grayscale results.
    pub grayscale_output: GrayOutput,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_color_profile: ColorProfile::Adjusted,
            default_grayscale_profile: GrayProfile::Standard,
            grayscale_output: GrayOutput::Rgb,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let cfg = PipelineConfig::from_json(
            r#"{"default_color_profile":"original","grayscale_output":"luma"}"#,
        )
        .unwrap();
        assert_eq!(cfg.default_color_profile, ColorProfile::Original);
        assert_eq!(cfg.default_grayscale_profile, GrayProfile::Standard);
        assert_eq!(cfg.grayscale_output, GrayOutput::Luma);
    }

    #[test]
    fn malformed_document_is_config_error() {
        let err = PipelineConfig::from_json("{\"grayscale_output\": 3}").unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}
