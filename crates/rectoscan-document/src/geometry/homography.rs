// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Projective transform solving — the rectifying homography from four ordered
// corners onto the destination rectangle.

use imageproc::geometric_transformations::Projection;
use rectoscan_core::Point2D;
use rectoscan_core::error::ScanError;
use tracing::{debug, instrument};

use super::corners::Quadrilateral;

/// Quads enclosing less than this fraction of their destination rectangle
/// are rejected as slivers.
const MIN_AREA_RATIO: f64 = 1e-3;

/// A 3x3 projective transform from a source quadrilateral onto the
/// axis-aligned rectangle `(0,0)..(width,height)`.
#[derive(Debug, Clone, Copy)]
pub struct Homography {
    projection: Projection,
    inverse: Projection,
    width: u32,
    height: u32,
}

impl Homography {
    /// Solve the transform that rectifies `quad`.
    ///
    /// Fails with `DegenerateQuadrilateral` when the destination would be
    /// zero pixels wide or tall, or the quad encloses almost no area, and
    /// with `SingularTransform` when the corners do not define a projective
    /// mapping (three collinear points).
    #[instrument(skip_all)]
    pub fn solve(quad: &Quadrilateral) -> Result<Self, ScanError> {
        let (width, height) = quad.destination_size();
        if width == 0 || height == 0 {
            return Err(ScanError::DegenerateQuadrilateral { width, height });
        }

        let area = quad.area();
        if area < MIN_AREA_RATIO * width as f64 * height as f64 {
            debug!(area, width, height, "Quadrilateral is a sliver");
            return Err(ScanError::DegenerateQuadrilateral { width, height });
        }

        let (w, h) = (width as f32, height as f32);
        let dest: [(f32, f32); 4] = [
            (0.0, 0.0),
            (w, 0.0),
            (w, h),
            (0.0, h),
        ];
        let src = quad.corners().map(|p| (p.x as f32, p.y as f32));

        let projection =
            Projection::from_control_points(src, dest).ok_or(ScanError::SingularTransform)?;
        debug!(width, height, area, "Homography solved");

        Ok(Self {
            projection,
            inverse: projection.invert(),
            width,
            height,
        })
    }

    /// The forward transform, source to destination.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Destination width in pixels (>= 1).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Destination height in pixels (>= 1).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Map a source point into the destination rectangle.
    pub fn map(&self, p: Point2D) -> Point2D {
        apply(&self.projection, p.x, p.y)
    }

    /// Map a destination point back into the source image.
    pub fn map_inverse(&self, p: Point2D) -> Point2D {
        apply(&self.inverse, p.x, p.y)
    }
}

#[inline]
fn apply(projection: &Projection, x: f64, y: f64) -> Point2D {
    let (u, v) = *projection * (x as f32, y as f32);
    Point2D::new(u as f64, v as f64)
}
