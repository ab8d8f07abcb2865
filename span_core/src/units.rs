//! # Unit Types
//!
//! Type-safe wrappers for the units that appear in the reference dataset.
//! These are plain f64 newtypes so JSON stays clean (just numbers).
//!
//! ## Metric Units
//!
//! The dataset follows UK practice:
//! - Spans and heights: meters (m)
//! - Section dimensions and spacings: millimeters (mm)
//! - Area loads: kilonewtons per square meter (kN/m²)
//!
//! ## Example
//!
//! ```rust
//! use span_core::units::{Meters, Millimeters};
//!
//! let span = Meters(3.28);
//! let span_mm: Millimeters = span.into();
//! assert!((span_mm.0 - 3280.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}m", self.0)
    }
}

impl fmt::Display for Millimeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}mm", self.0)
    }
}

// ============================================================================
// Area Load Units
// ============================================================================

/// Area load in kilonewtons per square meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilonewtonsPerSqM(pub f64);

impl fmt::Display for KilonewtonsPerSqM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kN/m²", self.0)
    }
}
