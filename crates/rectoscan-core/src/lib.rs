// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectoscan — Core types, profile identifiers, configuration, and error
// definitions shared by the pipeline crates.

pub mod config;
pub mod error;
pub mod profiles;
pub mod types;

pub use config::{GrayOutput, PipelineConfig};
pub use error::{Result, ScanError};
pub use profiles::{ColorProfile, GrayProfile};
pub use types::*;
