// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — brightness, contrast, saturation, grayscale, blur and
// quarter-turn rotation on a `Raster`. The enhancement factors blend each
// sample with a degenerate image (black, mean gray, or the pixel's own luma).

use image::{GrayImage, ImageBuffer, Luma, Rgb, imageops};
use imageproc::filter::gaussian_blur_f32;
use rectoscan_core::types::Rotation;
use tracing::{debug, instrument};

use super::{Raster, expand_gray};
use crate::tone::{Equalization, ToneLut, WhiteBalance, equalize, white_balance};

/// Chainable enhancement pipeline over a single raster.
///
/// Each method consumes `self` and returns the transformed processor:
///
/// ```ignore
/// let out = ImageProcessor::from_raster(raster)
///     .adjust_brightness(1.1)
///     .adjust_contrast(1.2)
///     .grayscale()
///     .into_raster();
/// ```
pub struct ImageProcessor {
    raster: Raster,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    pub fn from_raster(raster: Raster) -> Self {
        Self { raster }
    }

    /// Wrap a decoded image; see [`Raster::from_dynamic`].
    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        Self::from_raster(Raster::from_dynamic(image))
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn as_raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }

    // -- Transformations (consume self, return new Self) -----------------------

    pub fn white_balance(self, params: &WhiteBalance) -> Self {
        Self::from_raster(white_balance(self.raster, params))
    }

    /// Scale toward black: `v * factor`. 1.0 is a no-op.
    pub fn adjust_brightness(self, factor: f32) -> Self {
        if factor == 1.0 {
            return self;
        }
        debug!(factor, "Adjusting brightness");
        let table = blend_table(0.0, factor);
        Self::from_raster(self.raster.map_samples(&table))
    }

    /// Scale away from the mean luma: `mean + factor * (v - mean)`.
    /// Values above 1.0 increase contrast; 1.0 is a no-op.
    pub fn adjust_contrast(self, factor: f32) -> Self {
        if factor == 1.0 {
            return self;
        }
        let mean = mean_luma(&self.raster);
        debug!(factor, mean, "Adjusting contrast");
        let table = blend_table(mean, factor);
        Self::from_raster(self.raster.map_samples(&table))
    }

    /// Scale chroma away from each pixel's luma. 0.0 desaturates fully;
    /// gray rasters are unchanged.
    pub fn adjust_saturation(self, factor: f32) -> Self {
        if factor == 1.0 {
            return self;
        }
        let mut rgb = match self.raster {
            Raster::Rgb(rgb) => rgb,
            gray => return Self::from_raster(gray),
        };
        debug!(factor, "Adjusting saturation");
        for px in rgb.pixels_mut() {
            let Rgb([r, g, b]) = *px;
            let luma = luma_601(r, g, b) as f32;
            *px = Rgb([r, g, b].map(|v| blend(luma, v, factor)));
        }
        Self::from_raster(Raster::Rgb(rgb))
    }

    pub fn grayscale(self) -> Self {
        Self::from_raster(Raster::Gray(to_gray(&self.raster)))
    }

    /// Replicate a gray raster into three channels.
    pub fn expand_gray(self) -> Self {
        match self.raster {
            Raster::Gray(gray) => Self::from_raster(Raster::Rgb(expand_gray(&gray))),
            rgb => Self::from_raster(rgb),
        }
    }

    pub fn equalize(self, params: &Equalization) -> Self {
        Self::from_raster(equalize(self.raster, params))
    }

    pub fn apply_lut(self, lut: &ToneLut) -> Self {
        Self::from_raster(lut.apply(self.raster))
    }

    pub fn gaussian_blur(self, sigma: f32) -> Self {
        Self::from_raster(gaussian_blur(self.raster, sigma))
    }

    pub fn rotate90(self, rotation: Rotation) -> Self {
        Self::from_raster(rotate90(self.raster, rotation))
    }
}

// -- Free functions ---------------------------------------------------------

/// ITU-R BT.601 luma of one pixel, rounded.
#[inline]
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Single-channel luma plane of any raster.
pub fn to_gray(raster: &Raster) -> GrayImage {
    match raster {
        Raster::Gray(gray) => gray.clone(),
        Raster::Rgb(rgb) => ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
            let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            Luma([luma_601(r, g, b)])
        }),
    }
}

/// Gaussian blur with standard deviation `sigma`. Non-positive or non-finite
/// sigma leaves the raster untouched.
pub fn gaussian_blur(raster: Raster, sigma: f32) -> Raster {
    if !(sigma.is_finite() && sigma > 0.0) {
        return raster;
    }
    debug!(sigma, "Gaussian blur");
    match raster {
        Raster::Gray(gray) => Raster::Gray(gaussian_blur_f32(&gray, sigma)),
        Raster::Rgb(rgb) => Raster::Rgb(gaussian_blur_f32(&rgb, sigma)),
    }
}

/// Lossless quarter turn. Width and height swap.
#[instrument(skip(raster), fields(degrees = rotation.degrees()))]
pub fn rotate90(raster: Raster, rotation: Rotation) -> Raster {
    debug!(width = raster.width(), height = raster.height(), "Rotating");
    match (raster, rotation) {
        (Raster::Gray(img), Rotation::Clockwise) => Raster::Gray(imageops::rotate90(&img)),
        (Raster::Gray(img), Rotation::Counterclockwise) => Raster::Gray(imageops::rotate270(&img)),
        (Raster::Rgb(img), Rotation::Clockwise) => Raster::Rgb(imageops::rotate90(&img)),
        (Raster::Rgb(img), Rotation::Counterclockwise) => Raster::Rgb(imageops::rotate270(&img)),
    }
}

/// Mean luma, rounded to the nearest level.
fn mean_luma(raster: &Raster) -> f32 {
    let (sum, count) = match raster {
        Raster::Gray(gray) => (
            gray.as_raw().iter().map(|&v| v as u64).sum::<u64>(),
            gray.as_raw().len() as u64,
        ),
        Raster::Rgb(rgb) => (
            rgb.pixels()
                .map(|Rgb([r, g, b])| luma_601(*r, *g, *b) as u64)
                .sum::<u64>(),
            rgb.width() as u64 * rgb.height() as u64,
        ),
    };
    if count == 0 {
        return 0.0;
    }
    (sum as f64 / count as f64).round() as f32
}

#[inline]
fn blend(base: f32, v: u8, factor: f32) -> u8 {
    (base + factor * (v as f32 - base)).round().clamp(0.0, 255.0) as u8
}

fn blend_table(base: f32, factor: f32) -> [u8; 256] {
    std::array::from_fn(|v| blend(base, v as u8, factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn two_level_gray() -> Raster {
        Raster::Gray(GrayImage::from_fn(4, 4, |x, _| {
            Luma([if x < 2 { 100 } else { 200 }])
        }))
    }

    #[test]
    fn brightness_scales_toward_black() {
        let out = ImageProcessor::from_raster(two_level_gray())
            .adjust_brightness(1.5)
            .into_raster();
        assert_eq!(&out.as_raw()[..4], &[150, 150, 255, 255]);
    }

    #[test]
    fn contrast_pivots_on_mean_luma() {
        // Mean is 150.
        let out = ImageProcessor::from_raster(two_level_gray())
            .adjust_contrast(2.0)
            .into_raster();
        assert_eq!(&out.as_raw()[..4], &[50, 50, 250, 250]);
    }

    #[test]
    fn contrast_leaves_uniform_image_alone() {
        let rgb = RgbImage::from_pixel(5, 5, Rgb([90, 90, 90]));
        let out = ImageProcessor::from_raster(Raster::Rgb(rgb.clone()))
            .adjust_contrast(1.8)
            .into_raster();
        assert_eq!(out, Raster::Rgb(rgb));
    }

    #[test]
    fn zero_saturation_gives_neutral_pixels() {
        let rgb = RgbImage::from_pixel(2, 2, Rgb([200, 40, 90]));
        let out = ImageProcessor::from_raster(Raster::Rgb(rgb))
            .adjust_saturation(0.0)
            .into_raster();
        let expected = luma_601(200, 40, 90);
        assert!(out.as_raw().iter().all(|&v| v == expected));
    }

    #[test]
    fn saturation_ignores_gray() {
        let gray = two_level_gray();
        let out = ImageProcessor::from_raster(gray.clone())
            .adjust_saturation(1.5)
            .into_raster();
        assert_eq!(out, gray);
    }

    #[test]
    fn grayscale_uses_bt601_weights() {
        assert_eq!(luma_601(255, 0, 0), 76);
        assert_eq!(luma_601(0, 255, 0), 150);
        assert_eq!(luma_601(0, 0, 255), 29);
        let out = ImageProcessor::from_raster(Raster::Rgb(RgbImage::from_pixel(
            1,
            1,
            Rgb([255, 255, 255]),
        )))
        .grayscale()
        .into_raster();
        assert_eq!(out, Raster::Gray(GrayImage::from_pixel(1, 1, Luma([255]))));
    }

    #[test]
    fn rotation_swaps_dimensions_and_moves_corners() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(0, 0, Luma([255]));

        let Raster::Gray(cw) = rotate90(Raster::Gray(img.clone()), Rotation::Clockwise) else {
            panic!("expected gray");
        };
        assert_eq!(cw.dimensions(), (2, 3));
        assert_eq!(cw.get_pixel(1, 0).0[0], 255);

        let Raster::Gray(ccw) = rotate90(Raster::Gray(img), Rotation::Counterclockwise) else {
            panic!("expected gray");
        };
        assert_eq!(ccw.dimensions(), (2, 3));
        assert_eq!(ccw.get_pixel(0, 2).0[0], 255);
    }

    #[test]
    fn opposite_rotations_cancel() {
        let rgb = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 7]));
        let out = ImageProcessor::from_raster(Raster::Rgb(rgb.clone()))
            .rotate90(Rotation::Clockwise)
            .rotate90(Rotation::Counterclockwise)
            .into_raster();
        assert_eq!(out, Raster::Rgb(rgb));
    }

    #[test]
    fn blur_keeps_uniform_images_uniform() {
        let gray = GrayImage::from_pixel(9, 9, Luma([120]));
        let out = gaussian_blur(Raster::Gray(gray), 0.8);
        assert!(out.as_raw().iter().all(|&v| v.abs_diff(120) <= 1));
    }

    #[test]
    fn zero_sigma_is_a_no_op() {
        let gray = two_level_gray();
        assert_eq!(gaussian_blur(gray.clone(), 0.0), gray);
    }

    #[test]
    fn expand_gray_gives_three_channels() {
        let out = ImageProcessor::from_raster(two_level_gray())
            .expand_gray()
            .into_raster();
        assert_eq!(out.channels(), 3);
        assert_eq!(&out.as_raw()[..3], &[100, 100, 100]);
    }
}
