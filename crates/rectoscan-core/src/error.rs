// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rectoscan.

use thiserror::Error;

use crate::types::ColorMode;

/// Top-level error type for all Rectoscan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Geometry errors --
    #[error("degenerate quadrilateral: destination would be {width}x{height} pixels")]
    DegenerateQuadrilateral { width: u32, height: u32 },

    #[error("perspective transform is singular (corners are collinear)")]
    SingularTransform,

    // -- Profile / configuration errors --
    #[error("unknown {mode} profile: {name:?}")]
    UnknownProfile { mode: ColorMode, name: String },

    #[error("invalid processing profile: {0}")]
    InvalidProfile(String),

    #[error("configuration could not be parsed: {0}")]
    Config(#[from] serde_json::Error),

    // -- Caller-supplied data --
    #[error("unsupported rotation angle: {0} degrees (expected 90 or -90)")]
    UnsupportedRotation(i32),

    #[error("image processing failed: {0}")]
    ImageError(String),
}

impl ScanError {
    /// Whether the error comes from the corner geometry (fatal to the call).
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            ScanError::DegenerateQuadrilateral { .. } | ScanError::SingularTransform
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
