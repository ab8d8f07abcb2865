//! Shipped reference dataset, compiled into the crate.
//!
//! Parsed and validated once, on first use, then shared for the life of the
//! process.

use once_cell::sync::Lazy;

use crate::dataset::ReferenceDataset;
use crate::errors::SpanResult;

/// Raw JSON of the shipped dataset
pub const DEFAULT_DATASET_JSON: &str = include_str!("../data/span-tables.json");

static DEFAULT_DATASET: Lazy<SpanResult<ReferenceDataset>> =
    Lazy::new(|| ReferenceDataset::from_json_str(DEFAULT_DATASET_JSON));

pub fn default_dataset() -> SpanResult<&'static ReferenceDataset> {
    DEFAULT_DATASET.as_ref().map_err(Clone::clone)
}
