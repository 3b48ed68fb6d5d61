// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — processing profiles, silhouette binarization, and the
// orchestrator that ties rectification to tone mapping.
//
// The free functions below run a default-configured `ScanPipeline`.

pub mod binarize;
pub mod pipeline;
pub mod profile;

pub use binarize::{Silhouette, otsu_threshold, silhouette};
pub use pipeline::ScanPipeline;
pub use profile::{ProcessingProfile, ProfileParams};

use rectoscan_core::error::ScanError;
use rectoscan_core::types::{ColorMode, Point2D, Rotation};

use crate::raster::Raster;

/// Flatten the region bounded by `corners` into a rectangle.
pub fn rectify(source: &Raster, corners: [Point2D; 4]) -> Result<Raster, ScanError> {
    ScanPipeline::new().rectify(source, corners)
}

/// Apply a named colour profile (default `adjusted`).
pub fn apply_color_profile(raster: Raster, name: &str) -> Raster {
    ScanPipeline::new().apply_color_profile(raster, name)
}

/// Apply a named grayscale profile (default `standard`).
pub fn apply_grayscale_profile(raster: Raster, name: &str) -> Raster {
    ScanPipeline::new().apply_grayscale_profile(raster, name)
}

pub fn rotate90(raster: Raster, rotation: Rotation) -> Raster {
    ScanPipeline::rotate90(raster, rotation)
}

/// Rectify and tone-map in one call.
pub fn process(
    source: &Raster,
    corners: [Point2D; 4],
    mode: ColorMode,
    profile_name: &str,
) -> Result<Raster, ScanError> {
    ScanPipeline::new().process(source, corners, mode, profile_name)
}
