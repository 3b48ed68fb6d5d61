// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline — rectify a photographed page from its four corners, then run
// the colour or grayscale profile chain over the flattened image.

use rectoscan_core::config::{GrayOutput, PipelineConfig};
use rectoscan_core::error::ScanError;
use rectoscan_core::profiles::{ColorProfile, GrayProfile};
use rectoscan_core::types::{ColorMode, Point2D, Rotation};
use tracing::{debug, info, instrument};

use super::binarize::silhouette;
use super::profile::{ProcessingProfile, ProfileParams};
use crate::geometry::{Homography, order_corners};
use crate::raster::processor::{self, to_gray};
use crate::raster::{ImageProcessor, Raster, warp_perspective};
use crate::tone::ToneLut;

/// Rectification plus profile-driven tone mapping.
///
/// The pipeline holds only its configuration; every call is a pure transform
/// of the buffers it is given, so one instance can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct ScanPipeline {
    config: PipelineConfig,
}

impl ScanPipeline {
    // -- Construction ---------------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -- Geometry -------------------------------------------------------------

    /// Order the corners, solve the homography, and warp the source onto the
    /// destination rectangle.
    ///
    /// Fails with a geometry error when the corners span no area in either
    /// direction or are collinear.
    #[instrument(skip_all, fields(src_w = source.width(), src_h = source.height()))]
    pub fn rectify(&self, source: &Raster, corners: [Point2D; 4]) -> Result<Raster, ScanError> {
        let quad = order_corners(corners);
        let homography = Homography::solve(&quad)?;
        info!(
            width = homography.width(),
            height = homography.height(),
            "Rectifying document"
        );
        Ok(warp_perspective(source, &homography))
    }

    // -- Profiles -------------------------------------------------------------

    /// Run a named colour profile. Unknown names fall back to the configured
    /// default.
    #[instrument(skip(self, raster), fields(width = raster.width(), height = raster.height()))]
    pub fn apply_color_profile(&self, raster: Raster, name: &str) -> Raster {
        let profile = ColorProfile::resolve(name, self.config.default_color_profile);
        info!(profile = profile.name(), "Applying colour profile");
        self.run_chain(raster, profile.params(), ColorMode::Color)
    }

    /// Run a named grayscale profile. `silhouette` binarizes instead of tone
    /// mapping. Unknown names fall back to the configured default.
    #[instrument(skip(self, raster), fields(width = raster.width(), height = raster.height()))]
    pub fn apply_grayscale_profile(&self, raster: Raster, name: &str) -> Raster {
        let profile = GrayProfile::resolve(name, self.config.default_grayscale_profile);
        info!(profile = profile.name(), "Applying grayscale profile");
        self.run_chain(raster, profile.params(), ColorMode::Grayscale)
    }

    /// Run a caller-defined profile after validating it.
    #[instrument(skip(self, raster, profile, mode), fields(profile = %profile.name, %mode))]
    pub fn apply_profile(
        &self,
        raster: Raster,
        profile: &ProcessingProfile,
        mode: ColorMode,
    ) -> Result<Raster, ScanError> {
        profile.validate()?;
        Ok(self.run_chain(raster, profile, mode))
    }

    /// Quarter turn in either direction.
    pub fn rotate90(raster: Raster, rotation: Rotation) -> Raster {
        processor::rotate90(raster, rotation)
    }

    // -- End to end -----------------------------------------------------------

    /// Rectify, then apply the named profile for `mode`.
    #[instrument(skip(self, source, corners, mode, profile_name), fields(%mode, profile = profile_name))]
    pub fn process(
        &self,
        source: &Raster,
        corners: [Point2D; 4],
        mode: ColorMode,
        profile_name: &str,
    ) -> Result<Raster, ScanError> {
        let rectified = self.rectify(source, corners)?;
        let out = match mode {
            ColorMode::Color => self.apply_color_profile(rectified, profile_name),
            ColorMode::Grayscale => self.apply_grayscale_profile(rectified, profile_name),
        };
        info!(
            width = out.width(),
            height = out.height(),
            channels = out.channels(),
            "Scan processed"
        );
        Ok(out)
    }

    // -- Chain ----------------------------------------------------------------

    fn run_chain(&self, raster: Raster, profile: &ProcessingProfile, mode: ColorMode) -> Raster {
        if let Some(params) = &profile.silhouette {
            let binary = silhouette(&raster, params);
            return self.gray_output(Raster::Gray(binary));
        }

        let mut p = ImageProcessor::from_raster(raster);
        if let Some(wb) = &profile.white_balance {
            p = p.white_balance(wb);
        }
        p = p
            .adjust_brightness(profile.brightness)
            .adjust_contrast(profile.contrast);
        p = match mode {
            ColorMode::Color => p.adjust_saturation(profile.saturation),
            ColorMode::Grayscale => p.grayscale(),
        };
        if let Some(eq) = &profile.equalization {
            p = p.equalize(eq);
        }
        if profile.gamma != 1.0 {
            p = p.apply_lut(&ToneLut::gamma(profile.gamma));
        }
        p = p.adjust_contrast(profile.post_contrast);
        if let Some(strength) = profile.curve_strength {
            p = p.apply_lut(&ToneLut::s_curve(strength));
        }
        if let Some(sigma) = profile.blur_sigma {
            p = p.gaussian_blur(sigma);
        }
        debug!(profile = %profile.name, "Profile chain complete");

        match mode {
            ColorMode::Color => p.into_raster(),
            ColorMode::Grayscale => self.gray_output(p.into_raster()),
        }
    }

    fn gray_output(&self, raster: Raster) -> Raster {
        match self.config.grayscale_output {
            GrayOutput::Rgb => Raster::Rgb(raster.into_rgb()),
            GrayOutput::Luma => Raster::Gray(to_gray(&raster)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn page(width: u32, height: u32) -> Raster {
        Raster::Rgb(RgbImage::from_fn(width, height, |x, y| {
            if (x / 10 + y / 10) % 5 == 0 {
                Rgb([40, 35, 50])
            } else {
                Rgb([
                    (180 + x % 50) as u8,
                    (170 + y % 60) as u8,
                    (150 + (x + y) % 40) as u8,
                ])
            }
        }))
    }

    fn full_frame(width: u32, height: u32) -> [Point2D; 4] {
        let (w, h) = (width as f64, height as f64);
        // Deliberately out of canonical order.
        [
            Point2D::new(w, h),
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, h),
            Point2D::new(w, 0.0),
        ]
    }

    #[test]
    fn original_profile_end_to_end() {
        let source = page(400, 300);
        let pipeline = ScanPipeline::new();
        let out = pipeline
            .process(&source, full_frame(400, 300), ColorMode::Color, "original")
            .unwrap();
        assert_eq!(out.dimensions(), (400, 300));
        assert_eq!(out.channels(), 3);

        // Only brightness and contrast touch the rectified pixels.
        let expected = ImageProcessor::from_raster(source)
            .adjust_brightness(1.05)
            .adjust_contrast(1.1)
            .into_raster();
        for (a, b) in out.as_raw().iter().zip(expected.as_raw()) {
            assert!(a.abs_diff(*b) <= 4, "{a} vs {b}");
        }
    }

    #[test]
    fn last_pixel_corners_truncate_to_edge_lengths() {
        // Corners on the last pixel centres span 399 x 299 pixels of edge.
        let corners = [
            Point2D::new(0.0, 0.0),
            Point2D::new(399.0, 0.0),
            Point2D::new(399.0, 299.0),
            Point2D::new(0.0, 299.0),
        ];
        let out = ScanPipeline::new()
            .process(&page(400, 300), corners, ColorMode::Color, "original")
            .unwrap();
        assert_eq!(out.dimensions(), (399, 299));
        assert_eq!(out.channels(), 3);
    }

    #[test]
    fn all_black_silhouette_is_uniform() {
        let black = Raster::Rgb(RgbImage::new(100, 100));
        let out = ScanPipeline::new()
            .process(&black, full_frame(100, 100), ColorMode::Grayscale, "silhouette")
            .unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        let first = out.as_raw()[0];
        assert!(out.as_raw().iter().all(|&v| v == first));
    }

    #[test]
    fn unknown_colour_profile_matches_default() {
        let pipeline = ScanPipeline::new();
        let img = page(48, 32);
        let fallback = pipeline.apply_color_profile(img.clone(), "vivid");
        let default = pipeline.apply_color_profile(img, "adjusted");
        assert_eq!(fallback, default);
    }

    #[test]
    fn configured_default_is_used_for_fallback() {
        let config = PipelineConfig {
            default_grayscale_profile: GrayProfile::Minimal,
            ..PipelineConfig::default()
        };
        let pipeline = ScanPipeline::with_config(config);
        let img = page(40, 30);
        assert_eq!(
            pipeline.apply_grayscale_profile(img.clone(), "unheard-of"),
            pipeline.apply_grayscale_profile(img, "minimal")
        );
    }

    #[test]
    fn degenerate_corners_are_rejected() {
        let p = Point2D::new(12.0, 12.0);
        let err = ScanPipeline::new()
            .process(&page(20, 20), [p; 4], ColorMode::Color, "original")
            .unwrap_err();
        assert!(matches!(err, ScanError::DegenerateQuadrilateral { .. }));
        assert!(err.is_geometry());
    }

    #[test]
    fn colour_profiles_keep_three_channels() {
        let pipeline = ScanPipeline::new();
        for profile in ColorProfile::ALL {
            let out = pipeline.apply_color_profile(page(32, 24), profile.name());
            assert_eq!((out.dimensions(), out.channels()), ((32, 24), 3), "{profile}");
        }
    }

    #[test]
    fn grayscale_profiles_emit_neutral_rgb_by_default() {
        let pipeline = ScanPipeline::new();
        for profile in GrayProfile::ALL {
            let Raster::Rgb(out) = pipeline.apply_grayscale_profile(page(32, 24), profile.name())
            else {
                panic!("{profile}: expected rgb output");
            };
            assert!(out.pixels().all(|Rgb([r, g, b])| r == g && g == b), "{profile}");
        }
    }

    #[test]
    fn luma_output_keeps_one_channel() {
        let config = PipelineConfig {
            grayscale_output: GrayOutput::Luma,
            ..PipelineConfig::default()
        };
        let out = ScanPipeline::with_config(config).apply_grayscale_profile(page(16, 16), "high");
        assert_eq!(out.channels(), 1);
    }

    #[test]
    fn custom_profiles_are_validated() {
        let pipeline = ScanPipeline::new();
        let bad = ProcessingProfile {
            gamma: -1.0,
            ..ProcessingProfile::default()
        };
        assert!(matches!(
            pipeline.apply_profile(page(8, 8), &bad, ColorMode::Color),
            Err(ScanError::InvalidProfile(_))
        ));

        let neutral = ProcessingProfile::default();
        let img = page(8, 8);
        assert_eq!(
            pipeline.apply_profile(img.clone(), &neutral, ColorMode::Color).unwrap(),
            img
        );
    }

    #[test]
    fn rotation_after_processing() {
        let out = ScanPipeline::rotate90(page(30, 20), Rotation::Counterclockwise);
        assert_eq!(out.dimensions(), (20, 30));
    }
}
