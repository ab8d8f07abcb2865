//! Timber Section Sizes
//!
//! Section keys in the dataset are written `breadth x depth` in millimeters,
//! e.g. `"47x150"` for a 47mm wide, 150mm deep joist. Keys are kept as
//! strings for lookup; [`SectionSize`] parses them so enumerated sizes can be
//! ordered numerically rather than lexically.
//!
//! ## Ordering
//!
//! Lexical order puts `"38x140"` before `"38x63"`. Sizes are ordered by
//! breadth, then depth:
//!
//! ```rust
//! use span_core::sections::sort_size_keys;
//!
//! let mut keys = vec!["38x140".to_string(), "38x63".to_string(), "38x89".to_string()];
//! sort_size_keys(&mut keys);
//! assert_eq!(keys, ["38x63", "38x89", "38x140"]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{SpanError, SpanResult};
use crate::units::Millimeters;

/// A rectangular timber cross-section, in whole millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionSize {
    /// Breadth (thickness) in mm
    pub breadth_mm: u32,
    /// Depth in mm
    pub depth_mm: u32,
}

impl SectionSize {
    pub fn new(breadth_mm: u32, depth_mm: u32) -> Self {
        Self { breadth_mm, depth_mm }
    }

    /// Parse from common string representations ("47x150", "47 x 150mm", "47×150")
    pub fn from_str_flexible(s: &str) -> SpanResult<Self> {
        let cleaned = s.trim().to_lowercase().replace('×', "x");
        let cleaned = cleaned.strip_suffix("mm").unwrap_or(&cleaned);

        let (breadth, depth) = cleaned.split_once('x').ok_or_else(|| {
            SpanError::invalid_input("size", s, "Expected format: 'BREADTHxDEPTH' (e.g., '47x150')")
        })?;

        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| SpanError::invalid_input("size", s, "Dimensions must be positive whole millimeters"))
        };

        Ok(Self {
            breadth_mm: parse(breadth)?,
            depth_mm: parse(depth)?,
        })
    }

    /// Canonical dataset key (e.g., "47x150")
    pub fn key(&self) -> String {
        format!("{}x{}", self.breadth_mm, self.depth_mm)
    }

    pub fn breadth(&self) -> Millimeters {
        Millimeters(self.breadth_mm as f64)
    }

    pub fn depth(&self) -> Millimeters {
        Millimeters(self.depth_mm as f64)
    }

    /// Cross-sectional area in mm²
    pub fn area_mm2(&self) -> u64 {
        self.breadth_mm as u64 * self.depth_mm as u64
    }
}

impl FromStr for SectionSize {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_flexible(s)
    }
}

impl fmt::Display for SectionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}mm", self.breadth_mm, self.depth_mm)
    }
}

/// Compare two size keys: parseable keys by section, then the rest lexically.
pub fn compare_size_keys(a: &str, b: &str) -> Ordering {
    match (SectionSize::from_str_flexible(a), SectionSize::from_str_flexible(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Sort size keys in place using [`compare_size_keys`].
pub fn sort_size_keys(keys: &mut [String]) {
    keys.sort_by(|a, b| compare_size_keys(a, b));
}
