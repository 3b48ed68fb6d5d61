// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective warp — inverse-mapped bilinear resampling with a constant
// black border.

use image::{GrayImage, RgbImage};
use tracing::{debug, instrument};

use rectoscan_core::Point2D;

use super::Raster;
use crate::geometry::Homography;

/// Resample `source` into the homography's destination rectangle.
///
/// Every destination pixel `(x, y)` is mapped back through the inverse
/// transform and sampled bilinearly. Taps that land outside the source
/// contribute black, so pixels mapping fully outside the source are 0. Taps
/// on the last source row and column are sampled like any other.
#[instrument(skip_all, fields(width = homography.width(), height = homography.height()))]
pub fn warp_perspective(source: &Raster, homography: &Homography) -> Raster {
    let (out_w, out_h) = (homography.width(), homography.height());
    let channels = source.channels() as usize;
    let samples = warp_samples(
        source.as_raw(),
        source.width() as usize,
        source.height() as usize,
        channels,
        homography,
        out_w as usize,
        out_h as usize,
    );
    debug!(channels, "Warp complete");

    // The buffer length is exact by construction, so `from_raw` cannot fail.
    match source {
        Raster::Gray(_) => GrayImage::from_raw(out_w, out_h, samples)
            .map(Raster::Gray)
            .unwrap_or_else(|| Raster::Gray(GrayImage::new(out_w, out_h))),
        Raster::Rgb(_) => RgbImage::from_raw(out_w, out_h, samples)
            .map(Raster::Rgb)
            .unwrap_or_else(|| Raster::Rgb(RgbImage::new(out_w, out_h))),
    }
}

fn warp_samples(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    channels: usize,
    homography: &Homography,
    out_w: usize,
    out_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; out_w * out_h * channels];
    let mut acc = [0.0f64; 3];

    for y in 0..out_h {
        for x in 0..out_w {
            let p = homography.map_inverse(Point2D::new(x as f64, y as f64));
            if !p.x.is_finite() || !p.y.is_finite() {
                continue;
            }

            let x0 = p.x.floor();
            let y0 = p.y.floor();
            // Entirely outside: no tap can touch the source.
            if x0 < -1.0 || y0 < -1.0 || x0 >= src_w as f64 || y0 >= src_h as f64 {
                continue;
            }
            let fx = p.x - x0;
            let fy = p.y - y0;
            let (x0, y0) = (x0 as isize, y0 as isize);

            acc[..channels].fill(0.0);
            let taps = [
                (x0, y0, (1.0 - fx) * (1.0 - fy)),
                (x0 + 1, y0, fx * (1.0 - fy)),
                (x0, y0 + 1, (1.0 - fx) * fy),
                (x0 + 1, y0 + 1, fx * fy),
            ];
            for (tx, ty, weight) in taps {
                if weight == 0.0
                    || tx < 0
                    || ty < 0
                    || tx as usize >= src_w
                    || ty as usize >= src_h
                {
                    continue;
                }
                let base = (ty as usize * src_w + tx as usize) * channels;
                for c in 0..channels {
                    acc[c] += weight * src[base + c] as f64;
                }
            }

            let base = (y * out_w + x) * channels;
            for c in 0..channels {
                out[base + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}
