// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gray-world white balance — estimate a per-channel cast from channel means
// and scale each channel toward a common gray target.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::raster::Raster;

/// Samples at or below this level are ignored by the trimmed mean.
pub const TRIM_LOW: u8 = 30;
/// Samples at or above this level are ignored by the trimmed mean.
pub const TRIM_HIGH: u8 = 225;

/// Luma weights (ITU-R BT.601).
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
/// Green-leaning weights that keep paper tones slightly warm.
pub const PERCEPTUAL_WEIGHTS: [f32; 3] = [0.3, 0.5, 0.2];
/// Plain average of the three channels.
pub const EQUAL_WEIGHTS: [f32; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

/// How a channel mean is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatistic {
    /// Mean over samples strictly inside `(TRIM_LOW, TRIM_HIGH)`, so dark
    /// ink and blown highlights don't skew the estimate. Used for colour.
    TrimmedMean,
    /// Plain mean over every sample. Used to prepare grayscale output.
    Mean,
}

/// The gray level every channel is pulled toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrayTarget {
    /// Weighted sum of the channel means.
    Weighted([f32; 3]),
    /// Brightest channel mean times a factor; whitens the paper.
    BrightestScaled(f32),
}

/// White-balance parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiteBalance {
    pub statistic: ChannelStatistic,
    pub target: GrayTarget,
    /// Inclusive `(min, max)` clamp for each correction factor.
    pub factor_range: (f32, f32),
}

/// Per-channel means of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStatistics {
    pub means: [f64; 3],
}

impl ChannelStatistics {
    pub fn compute(image: &RgbImage, statistic: ChannelStatistic) -> Self {
        let mut sums = [0u64; 3];
        let mut counts = [0u64; 3];
        let mut trimmed_sums = [0u64; 3];
        let mut trimmed_counts = [0u64; 3];

        for px in image.pixels() {
            for (c, &v) in px.0.iter().enumerate() {
                sums[c] += v as u64;
                counts[c] += 1;
                if v > TRIM_LOW && v < TRIM_HIGH {
                    trimmed_sums[c] += v as u64;
                    trimmed_counts[c] += 1;
                }
            }
        }

        let means = std::array::from_fn(|c| {
            let (sum, count) = match statistic {
                ChannelStatistic::TrimmedMean if trimmed_counts[c] > 0 => {
                    (trimmed_sums[c], trimmed_counts[c])
                }
                _ => (sums[c], counts[c]),
            };
            if count == 0 {
                0.0
            } else {
                sum as f64 / count as f64
            }
        });
        Self { means }
    }

    /// The gray level the channels are corrected toward.
    pub fn target(&self, target: GrayTarget) -> f64 {
        match target {
            GrayTarget::Weighted(w) => self
                .means
                .iter()
                .zip(w)
                .map(|(m, w)| m * w as f64)
                .sum(),
            GrayTarget::BrightestScaled(k) => {
                self.means.iter().copied().fold(0.0, f64::max) * k as f64
            }
        }
    }

    /// Correction factor per channel: `target / mean`, 1.0 for an empty
    /// channel, clamped to `range`.
    pub fn factors(&self, target: GrayTarget, range: (f32, f32)) -> [f64; 3] {
        let gray = self.target(target);
        let (lo, hi) = (range.0 as f64, range.1 as f64);
        self.means.map(|mean| {
            let factor = if mean > 0.0 { gray / mean } else { 1.0 };
            factor.clamp(lo, hi)
        })
    }
}

/// Scale each channel toward the gray target. Gray rasters have no cast and
/// pass through unchanged.
#[instrument(skip_all, fields(statistic = ?params.statistic))]
pub fn white_balance(raster: Raster, params: &WhiteBalance) -> Raster {
    let rgb = match raster {
        Raster::Rgb(rgb) => rgb,
        gray => return gray,
    };

    let stats = ChannelStatistics::compute(&rgb, params.statistic);
    let factors = stats.factors(params.target, params.factor_range);
    debug!(means = ?stats.means, ?factors, "White balance factors");

    let tables = factors.map(scale_table);
    Raster::Rgb(rgb).map_channels(&[&tables[0], &tables[1], &tables[2]])
}

fn scale_table(factor: f64) -> [u8; 256] {
    std::array::from_fn(|v| (v as f64 * factor).round().clamp(0.0, 255.0) as u8)
}
