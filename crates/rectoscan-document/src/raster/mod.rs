// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — the 8-bit pixel buffer that flows between pipeline stages,
// per-pixel enhancement, quarter-turn rotation, and perspective warping.

pub mod processor;
pub mod warp;

pub use processor::ImageProcessor;
pub use warp::warp_perspective;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage};
use rectoscan_core::error::ScanError;

/// An owned 8-bit image with one (gray) or three (RGB) channels.
///
/// Stages consume a `Raster` and hand back a new one; nothing holds a
/// reference to a buffer once it has been passed on.
#[derive(Debug, Clone, PartialEq)]
pub enum Raster {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl Raster {
    // -- Construction ---------------------------------------------------------

    /// Build a raster from a row-major sample buffer.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        samples: Vec<u8>,
    ) -> Result<Self, ScanError> {
        let expected = width as usize * height as usize * channels as usize;
        if samples.len() != expected {
            return Err(ScanError::ImageError(format!(
                "buffer holds {} samples, {}x{}x{} needs {}",
                samples.len(),
                width,
                height,
                channels,
                expected
            )));
        }
        let raster = match channels {
            1 => GrayImage::from_raw(width, height, samples).map(Raster::Gray),
            3 => RgbImage::from_raw(width, height, samples).map(Raster::Rgb),
            other => {
                return Err(ScanError::ImageError(format!(
                    "unsupported channel count {other} (expected 1 or 3)"
                )));
            }
        };
        raster.ok_or_else(|| ScanError::ImageError("sample buffer rejected".into()))
    }

    /// Take over a decoded image. Luma images stay single-channel; everything
    /// else is converted to 8-bit RGB (alpha is dropped).
    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Raster::Gray(gray),
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) => {
                Raster::Gray(image.to_luma8())
            }
            DynamicImage::ImageRgb8(rgb) => Raster::Rgb(rgb),
            other => Raster::Rgb(other.to_rgb8()),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        match self {
            Raster::Gray(img) => img.width(),
            Raster::Rgb(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Raster::Gray(img) => img.height(),
            Raster::Rgb(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Samples per pixel (1 or 3).
    pub fn channels(&self) -> u8 {
        match self {
            Raster::Gray(_) => 1,
            Raster::Rgb(_) => 3,
        }
    }

    /// Row-major interleaved samples.
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Raster::Gray(img) => img.as_raw(),
            Raster::Rgb(img) => img.as_raw(),
        }
    }

    // -- Conversion -----------------------------------------------------------

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Raster::Gray(img) => DynamicImage::ImageLuma8(img),
            Raster::Rgb(img) => DynamicImage::ImageRgb8(img),
        }
    }

    /// Three-channel view; gray samples are replicated.
    pub fn into_rgb(self) -> RgbImage {
        match self {
            Raster::Rgb(img) => img,
            Raster::Gray(gray) => expand_gray(&gray),
        }
    }

    /// Run every sample through a 256-entry table.
    pub fn map_samples(self, table: &[u8; 256]) -> Self {
        self.map_channels(&[table, table, table])
    }

    /// Run each channel through its own table. Gray rasters use the first.
    pub fn map_channels(self, tables: &[&[u8; 256]; 3]) -> Self {
        match self {
            Raster::Gray(mut img) => {
                for v in img.iter_mut() {
                    *v = tables[0][*v as usize];
                }
                Raster::Gray(img)
            }
            Raster::Rgb(mut img) => {
                for px in img.pixels_mut() {
                    for (c, v) in px.0.iter_mut().enumerate() {
                        *v = tables[c][*v as usize];
                    }
                }
                Raster::Rgb(img)
            }
        }
    }
}

impl From<GrayImage> for Raster {
    fn from(img: GrayImage) -> Self {
        Raster::Gray(img)
    }
}

impl From<RgbImage> for Raster {
    fn from(img: RgbImage) -> Self {
        Raster::Rgb(img)
    }
}

/// Replicate a gray plane into three identical channels.
pub fn expand_gray(gray: &GrayImage) -> RgbImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let Luma([v]) = *gray.get_pixel(x, y);
        image::Rgb([v, v, v])
    })
}
