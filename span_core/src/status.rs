//! # Capacity Status
//!
//! Qualitative rating of a resolved capacity. The rating depends only on the
//! numeric value and the quantity it measures, never on grade, size or
//! subtype.
//!
//! | Status    | Span (m)        | Height (m)      |
//! |-----------|-----------------|-----------------|
//! | excellent | ≥ 4.5           | ≥ 3.5           |
//! | good      | 3.5 to < 4.5    | 2.8 to < 3.5    |
//! | adequate  | 2.5 to < 3.5    | 2.2 to < 2.8    |
//! | limited   | < 2.5           | < 2.2           |
//!
//! ## Example
//!
//! ```rust
//! use span_core::elements::QuantityKind;
//! use span_core::status::CapacityStatus;
//!
//! assert_eq!(CapacityStatus::classify(QuantityKind::Span, 3.28), CapacityStatus::Adequate);
//! assert_eq!(CapacityStatus::classify(QuantityKind::Height, 3.0), CapacityStatus::Good);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elements::QuantityKind;

/// Qualitative capacity rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityStatus {
    Limited,
    Adequate,
    Good,
    Excellent,
}

/// Lower bounds (inclusive) for each rating above `Limited`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusThresholds {
    pub excellent: f64,
    pub good: f64,
    pub adequate: f64,
}

impl StatusThresholds {
    pub const SPAN: StatusThresholds = StatusThresholds {
        excellent: 4.5,
        good: 3.5,
        adequate: 2.5,
    };

    pub const HEIGHT: StatusThresholds = StatusThresholds {
        excellent: 3.5,
        good: 2.8,
        adequate: 2.2,
    };

    pub fn for_quantity(quantity: QuantityKind) -> Self {
        match quantity {
            QuantityKind::Span => Self::SPAN,
            QuantityKind::Height => Self::HEIGHT,
        }
    }

    pub fn classify(&self, value: f64) -> CapacityStatus {
        if value >= self.excellent {
            CapacityStatus::Excellent
        } else if value >= self.good {
            CapacityStatus::Good
        } else if value >= self.adequate {
            CapacityStatus::Adequate
        } else {
            CapacityStatus::Limited
        }
    }
}

impl CapacityStatus {
    /// Classify a capacity value (meters) using the thresholds for its quantity
    pub fn classify(quantity: QuantityKind, value: f64) -> Self {
        StatusThresholds::for_quantity(quantity).classify(value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityStatus::Excellent => "excellent",
            CapacityStatus::Good => "good",
            CapacityStatus::Adequate => "adequate",
            CapacityStatus::Limited => "limited",
        }
    }

    /// Advisory text shown with a result (e.g., "Good span capability")
    pub fn summary(&self, quantity: QuantityKind) -> String {
        let noun = quantity.noun();
        match self {
            CapacityStatus::Excellent => format!("Excellent {} capability", noun),
            CapacityStatus::Good => format!("Good {} capability", noun),
            CapacityStatus::Adequate => format!("Adequate {} capability", noun),
            CapacityStatus::Limited => format!("Limited {} - consider larger timber", noun),
        }
    }
}

impl fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
