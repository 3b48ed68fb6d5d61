// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rectoscan-document — Document rectification and tone mapping.
//
// Provides corner ordering and homography solving (geometry), perspective
// warping and pixel enhancement (raster), L*a*b* conversion (color), white
// balance, local contrast and tone curves (tone), and the profile-driven scan
// pipeline with silhouette binarization (scan).

pub mod color;
pub mod geometry;
pub mod raster;
pub mod scan;
pub mod tone;

// Re-export the primary entry points so callers can use
// `rectoscan_document::ScanPipeline` etc.
pub use geometry::{Homography, Quadrilateral, order_corners};
pub use raster::{ImageProcessor, Raster, warp_perspective};
pub use scan::{
    ProcessingProfile, ProfileParams, ScanPipeline, apply_color_profile, apply_grayscale_profile,
    process, rectify, rotate90,
};
