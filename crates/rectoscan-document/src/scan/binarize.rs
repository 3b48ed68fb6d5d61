// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Silhouette binarization — global Otsu threshold on blurred lightness, biased
// upward, followed by a small morphological closing.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::color::lightness;
use crate::raster::Raster;

/// Binarization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Silhouette {
    /// Multiplier on the Otsu threshold. Above 1.0 keeps more light detail
    /// as foreground.
    pub bias: f32,
    /// Pre-threshold blur; 0 disables it.
    pub blur_sigma: f32,
    /// L∞ radius of the closing element; 0 disables it.
    pub close_radius: u8,
}

/// Two-level image: `v >= biased threshold` is white, everything else black.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height(), bias = params.bias))]
pub fn silhouette(raster: &Raster, params: &Silhouette) -> GrayImage {
    let mut plane = lightness(raster);
    if params.blur_sigma > 0.0 && plane.width() > 0 && plane.height() > 0 {
        plane = gaussian_blur_f32(&plane, params.blur_sigma);
    }

    let threshold = otsu_threshold(&plane);
    let biased = threshold as f32 * params.bias;
    debug!(threshold, biased, "Otsu threshold computed");

    let binary = threshold_plane(&plane, biased);
    if params.close_radius == 0 {
        binary
    } else {
        close(&binary, Norm::LInf, params.close_radius)
    }
}

/// Compute the Otsu threshold of a gray plane.
///
/// Picks the split that maximises between-class variance (equivalently,
/// minimises the weighted intra-class variance) and returns the lowest
/// intensity of the upper class, so `v >= threshold` selects it. A plane with
/// a single level has no split; the result is that level plus one
/// (saturating), placing every pixel below it. Empty planes give 128.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_lower = 0.0f64;
    let mut weight_lower = 0u64;
    let mut best: Option<(f64, usize)> = None;

    for (t, &count) in histogram.iter().enumerate() {
        weight_lower += count;
        if weight_lower == 0 {
            continue;
        }
        let weight_upper = total_pixels - weight_lower;
        if weight_upper == 0 {
            break;
        }

        sum_lower += t as f64 * count as f64;
        let mean_lower = sum_lower / weight_lower as f64;
        let mean_upper = (sum_total - sum_lower) / weight_upper as f64;
        let between = weight_lower as f64 * weight_upper as f64 * (mean_lower - mean_upper).powi(2);

        if best.is_none_or(|(max, _)| between > max) {
            best = Some((between, t));
        }
    }

    match best {
        Some((_, t)) => (t + 1).min(255) as u8,
        None => {
            // Single populated level.
            let level = histogram.iter().rposition(|&c| c > 0).unwrap_or(0);
            (level + 1).min(255) as u8
        }
    }
}

fn threshold_plane(plane: &GrayImage, threshold: f32) -> GrayImage {
    GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
        let v = plane.get_pixel(x, y).0[0];
        Luma([if v as f32 >= threshold { 255 } else { 0 }])
    })
}
