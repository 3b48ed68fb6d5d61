// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rectoscan pipeline.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ScanError;

/// A point in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Processing mode selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Full-colour output.
    #[default]
    Color,
    /// Grayscale / scan-like output.
    Grayscale,
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorMode::Color => f.write_str("color"),
            ColorMode::Grayscale => f.write_str("grayscale"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ScanError;

    /// Anything other than `"grayscale"` selects colour.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("grayscale") {
            ColorMode::Grayscale
        } else {
            ColorMode::Color
        })
    }
}

/// Direction of a quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Clockwise,
    Counterclockwise,
}

impl Rotation {
    /// Map a signed angle onto a rotation. Only `90` and `-90` are accepted.
    pub fn from_degrees(degrees: i32) -> Result<Self, ScanError> {
        match degrees {
            90 => Ok(Rotation::Clockwise),
            -90 => Ok(Rotation::Counterclockwise),
            other => Err(ScanError::UnsupportedRotation(other)),
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::Clockwise => 90,
            Rotation::Counterclockwise => -90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn mode_parsing_defaults_to_color() {
        assert_eq!("grayscale".parse::<ColorMode>().ok(), Some(ColorMode::Grayscale));
        assert_eq!("color".parse::<ColorMode>().ok(), Some(ColorMode::Color));
        assert_eq!("anything".parse::<ColorMode>().ok(), Some(ColorMode::Color));
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(90).ok(), Some(Rotation::Clockwise));
        assert_eq!(
            Rotation::from_degrees(-90).ok(),
            Some(Rotation::Counterclockwise)
        );
        assert!(matches!(
            Rotation::from_degrees(180),
            Err(ScanError::UnsupportedRotation(180))
        ));
        assert_eq!(Rotation::Counterclockwise.degrees(), -90);
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&ColorMode::Grayscale).unwrap();
        assert_eq!(json, "\"grayscale\"");
    }
}
