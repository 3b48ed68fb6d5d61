// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry — corner ordering and the rectifying projective transform.

pub mod corners;
pub mod homography;

pub use corners::{Quadrilateral, order_corners};
pub use homography::Homography;
