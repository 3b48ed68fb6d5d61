// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local contrast — contrast-limited adaptive histogram equalization (CLAHE)
// on the lightness channel.

use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::color::{to_display, to_perceptual};
use crate::raster::Raster;

/// Number of tiles along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
}

impl TileGrid {
    pub const fn square(n: u32) -> Self {
        Self { rows: n, cols: n }
    }
}

/// Equalization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equalization {
    /// Bin ceiling as a multiple of the uniform bin height
    /// (`tile pixels / 256`).
    pub clip_limit: f32,
    pub tiles: TileGrid,
}

/// Equalize local contrast. Colour rasters are equalized on L* only, so hue
/// and saturation are preserved; gray rasters are equalized directly.
#[instrument(skip_all, fields(clip_limit = params.clip_limit, rows = params.tiles.rows, cols = params.tiles.cols))]
pub fn equalize(raster: Raster, params: &Equalization) -> Raster {
    match raster {
        Raster::Gray(gray) => Raster::Gray(equalize_plane(&gray, params)),
        Raster::Rgb(rgb) => {
            let mut lab = to_perceptual(&rgb);
            let lightness = equalize_plane(&lab.lightness_plane(), params);
            lab.set_lightness_plane(&lightness);
            Raster::Rgb(to_display(&lab))
        }
    }
}

/// CLAHE on a single 8-bit plane.
///
/// Each tile gets a 256-bin histogram whose bins are clipped at
/// `clip_limit * tile_pixels / 256` (at least 1); the clipped excess is spread
/// evenly over all bins before the CDF becomes that tile's lookup table.
/// Pixels blend the tables of the four nearest tile centres bilinearly.
pub fn equalize_plane(plane: &GrayImage, params: &Equalization) -> GrayImage {
    let (w, h) = (plane.width() as usize, plane.height() as usize);
    if w == 0 || h == 0 {
        return plane.clone();
    }

    // A grid finer than the image collapses to one tile per pixel row/column.
    let cols = (params.tiles.cols.max(1) as usize).min(w);
    let rows = (params.tiles.rows.max(1) as usize).min(h);
    let tile_w = w / cols;
    let tile_h = h / rows;
    let src = plane.as_raw();

    let mut luts = vec![[0u8; 256]; rows * cols];
    for ty in 0..rows {
        for tx in 0..cols {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            // The last row/column absorbs the remainder.
            let x1 = if tx == cols - 1 { w } else { x0 + tile_w };
            let y1 = if ty == rows - 1 { h } else { y0 + tile_h };

            let mut hist = [0u32; 256];
            for row in y0..y1 {
                for &v in &src[row * w + x0..row * w + x1] {
                    hist[v as usize] += 1;
                }
            }
            let pixels = ((x1 - x0) * (y1 - y0)) as u32;
            clip_histogram(&mut hist, params.clip_limit, pixels);
            luts[ty * cols + tx] = cdf_table(&hist, pixels);
        }
    }
    debug!(tiles = luts.len(), tile_w, tile_h, "Tile tables built");

    let mut out = vec![0u8; w * h];
    let col_blend = axis_blend(w, cols);
    let row_blend = axis_blend(h, rows);

    for (y, &(ty0, ty1, ay)) in row_blend.iter().enumerate() {
        for (x, &(tx0, tx1, ax)) in col_blend.iter().enumerate() {
            let v = src[y * w + x] as usize;
            let v00 = luts[ty0 * cols + tx0][v] as f32;
            let v10 = luts[ty0 * cols + tx1][v] as f32;
            let v01 = luts[ty1 * cols + tx0][v] as f32;
            let v11 = luts[ty1 * cols + tx1][v] as f32;

            let top = v00 * (1.0 - ax) + v10 * ax;
            let bottom = v01 * (1.0 - ax) + v11 * ax;
            let value = top * (1.0 - ay) + bottom * ay;
            out[y * w + x] = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage::from_raw(plane.width(), plane.height(), out).unwrap_or_else(|| plane.clone())
}

/// For each pixel along an axis of `len` pixels split into `tiles` tiles, the
/// two tiles whose centres bracket it and the weight of the second.
///
/// Centres come from the actual tile bounds, so the last tile's centre
/// accounts for the remainder it absorbs. Pixels before the first centre or
/// past the last use that tile alone.
fn axis_blend(len: usize, tiles: usize) -> Vec<(usize, usize, f32)> {
    let size = len / tiles;
    let centres: Vec<f32> = (0..tiles)
        .map(|t| {
            let start = t * size;
            let end = if t == tiles - 1 { len } else { start + size };
            (start + end) as f32 / 2.0
        })
        .collect();
    let last = tiles - 1;

    (0..len)
        .map(|i| {
            let p = i as f32 + 0.5;
            if p <= centres[0] {
                return (0, 0, 0.0);
            }
            if p >= centres[last] {
                return (last, last, 0.0);
            }
            let t = centres.partition_point(|&c| c <= p) - 1;
            (t, t + 1, (p - centres[t]) / (centres[t + 1] - centres[t]))
        })
        .collect()
}

/// Clip bins at the limit and redistribute the excess. Returns the number of
/// clipped counts.
pub(crate) fn clip_histogram(hist: &mut [u32; 256], clip_limit: f32, pixels: u32) -> u32 {
    let limit = ((clip_limit * pixels as f32 / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    if excess == 0 {
        return 0;
    }

    let per_bin = excess / 256;
    let residual = (excess % 256) as usize;
    for bin in hist.iter_mut() {
        *bin += per_bin;
    }
    // Spread what's left at an even stride across the range.
    if residual > 0 {
        let step = (256 / residual).max(1);
        for i in (0..256).step_by(step).take(residual) {
            hist[i] += 1;
        }
    }
    excess
}

/// Cumulative histogram scaled to `0..=255`.
fn cdf_table(hist: &[u32; 256], pixels: u32) -> [u8; 256] {
    let scale = 255.0 / pixels.max(1) as f32;
    let mut table = [0u8; 256];
    let mut sum = 0u32;
    for (entry, &count) in table.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    table
}
