// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tone operations — white balance, local contrast equalization, and
// lookup-table tone curves.

pub mod curves;
pub mod equalize;
pub mod white_balance;

pub use curves::{MAX_CURVE_STRENGTH, ToneLut};
pub use equalize::{Equalization, TileGrid, equalize, equalize_plane};
pub use white_balance::{
    ChannelStatistic, ChannelStatistics, EQUAL_WEIGHTS, GrayTarget, LUMA_WEIGHTS,
    PERCEPTUAL_WEIGHTS, WhiteBalance, white_balance,
};
