// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sRGB <-> CIE L*a*b* (D65) conversion on whole images.

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use palette::white_point::D65;
use palette::{FromColor, Lab, LinSrgb, Srgb};
use std::sync::OnceLock;

use crate::raster::Raster;

type LabD65 = Lab<D65, f32>;

/// A planar L*a*b* image. `l` is in `0..=100`; `a` and `b` are unbounded
/// but stay roughly within `-128..128` for sRGB input.
#[derive(Debug, Clone, PartialEq)]
pub struct LabImage {
    width: u32,
    height: u32,
    pub l: Vec<f32>,
    pub a: Vec<f32>,
    pub b: Vec<f32>,
}

impl LabImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Lightness quantised to `0..=255`.
    pub fn lightness_plane(&self) -> GrayImage {
        let data = self
            .l
            .iter()
            .map(|&l| (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8)
            .collect();
        GrayImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }

    /// Replace lightness with a `0..=255` plane of matching size.
    pub fn set_lightness_plane(&mut self, plane: &GrayImage) {
        debug_assert_eq!(plane.dimensions(), (self.width, self.height));
        for (l, &v) in self.l.iter_mut().zip(plane.as_raw()) {
            *l = v as f32 * 100.0 / 255.0;
        }
    }
}

/// Convert display RGB to L*a*b*.
pub fn to_perceptual(image: &RgbImage) -> LabImage {
    let n = (image.width() * image.height()) as usize;
    let mut lab = LabImage {
        width: image.width(),
        height: image.height(),
        l: Vec::with_capacity(n),
        a: Vec::with_capacity(n),
        b: Vec::with_capacity(n),
    };

    for Rgb(px) in image.pixels() {
        let c = perceptual(*px);
        lab.l.push(c.l);
        lab.a.push(c.a);
        lab.b.push(c.b);
    }
    lab
}

/// Convert L*a*b* back to display RGB, rounding to nearest and clamping to
/// `0..=255`.
pub fn to_display(lab: &LabImage) -> RgbImage {
    let mut out = RgbImage::new(lab.width, lab.height);
    for (i, px) in out.pixels_mut().enumerate() {
        let c = LabD65::new(lab.l[i], lab.a[i], lab.b[i]);
        // `from_color` clamps out-of-gamut results.
        let rgb: Srgb<u8> = Srgb::<f32>::from_color(c).into_format();
        *px = Rgb([rgb.red, rgb.green, rgb.blue]);
    }
    out
}

/// Lightness of any raster as a `0..=255` plane.
pub fn lightness(raster: &Raster) -> GrayImage {
    match raster {
        Raster::Rgb(rgb) => to_perceptual(rgb).lightness_plane(),
        // Neutral pixels have a = b = 0, so L only depends on the gray level.
        Raster::Gray(gray) => {
            let table = gray_lightness_table();
            ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
                Luma([table[gray.get_pixel(x, y).0[0] as usize]])
            })
        }
    }
}

#[inline]
fn perceptual([r, g, b]: [u8; 3]) -> LabD65 {
    let linear: LinSrgb = Srgb::new(r, g, b).into_format::<f32>().into_linear();
    LabD65::from_color(linear)
}

fn gray_lightness_table() -> &'static [u8; 256] {
    static TABLE: OnceLock<[u8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        std::array::from_fn(|i| {
            let l = perceptual([i as u8; 3]).l;
            (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8
        })
    })
}
