// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering — turns four user-picked points into a canonical
// top-left / top-right / bottom-right / bottom-left quadrilateral.

use rectoscan_core::Point2D;
use tracing::{debug, warn};

/// Four corners in canonical order: top-left, top-right, bottom-right,
/// bottom-left.
///
/// The only way to obtain one is [`order_corners`], so the order is fixed by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    corners: [Point2D; 4],
}

impl Quadrilateral {
    pub fn top_left(&self) -> Point2D {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point2D {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point2D {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point2D {
        self.corners[3]
    }

    /// All four corners, canonical order.
    pub fn corners(&self) -> [Point2D; 4] {
        self.corners
    }

    /// Size of the rectified output: the longer of each pair of opposite
    /// edges, truncated to whole pixels.
    pub fn destination_size(&self) -> (u32, u32) {
        let [tl, tr, br, bl] = self.corners;
        let width = truncate(tl.distance(&tr)).max(truncate(bl.distance(&br)));
        let height = truncate(tl.distance(&bl)).max(truncate(tr.distance(&br)));
        (width, height)
    }

    /// Area via the shoelace formula (corners taken in stored order).
    pub fn area(&self) -> f64 {
        let n = self.corners.len();
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice.abs() / 2.0
    }
}

/// Order four points into a [`Quadrilateral`].
///
/// Points strictly above the mean y are the top pair, the rest the bottom
/// pair; each pair is sorted by x. When the split does not give two and two
/// (e.g. three points above the mean) the input order is used unchanged.
pub fn order_corners(points: [Point2D; 4]) -> Quadrilateral {
    let center_y = points.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let (mut top, mut bottom): (Vec<Point2D>, Vec<Point2D>) =
        points.iter().partition(|p| p.y < center_y);

    if top.len() != 2 || bottom.len() != 2 {
        warn!(
            top = top.len(),
            bottom = bottom.len(),
            "Corner split is not two-and-two; keeping input order"
        );
        return Quadrilateral { corners: points };
    }

    top.sort_by(|a, b| a.x.total_cmp(&b.x));
    bottom.sort_by(|a, b| a.x.total_cmp(&b.x));

    let corners = [top[0], top[1], bottom[1], bottom[0]];
    debug!(?corners, "Corners ordered");
    Quadrilateral { corners }
}

fn truncate(length: f64) -> u32 {
    // `as` saturates: NaN -> 0, huge -> u32::MAX.
    length as u32
}
