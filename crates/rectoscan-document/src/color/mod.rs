// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour space — display RGB <-> perceptual L*a*b*, so contrast work can touch
// lightness without shifting hue.

pub mod lab;

pub use lab::{LabImage, lightness, to_display, to_perceptual};
