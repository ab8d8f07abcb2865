//! # span_core - Timber Span Lookup Engine
//!
//! `span_core` resolves the maximum span (or, for stud walls, the maximum
//! height) of a timber member from a reference dataset of span tables. All
//! inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Lookups are pure reads over a dataset fixed at load time
//! - **Shape-driven**: Each element type declares its key-path; one engine walks them all
//! - **Misses are normal**: An unresolved selection is `None`, never an error
//! - **Validated once**: Table shapes are checked when a dataset is loaded
//!
//! ## Quick Start
//!
//! ```rust
//! use span_core::{default_dataset, resolve, Selection};
//!
//! let dataset = default_dataset().unwrap();
//! let selection = Selection::new("stud_walls")
//!     .grade("C16")
//!     .size("38x89")
//!     .subtype("partition_wall")
//!     .spacing("600mm");
//!
//! let result = resolve(dataset, &selection).unwrap();
//! println!("{}: {} ({})", result.quantity.label(), result.capacity, result.status);
//! ```
//!
//! ## Modules
//!
//! - [`elements`] - Element types and their lookup shapes
//! - [`dataset`] - Reference dataset model and shape validation
//! - [`resolve`] - The resolution engine
//! - [`status`] - Capacity status thresholds
//! - [`enumerate`] - Valid choices per dimension
//! - [`audit`] - Grade ordering audit
//! - [`embedded`] - The shipped dataset
//! - [`file_io`] - Loading datasets from disk
//! - [`settings`] - User configuration
//! - [`sections`] - Section size keys
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod audit;
pub mod dataset;
pub mod elements;
pub mod embedded;
pub mod enumerate;
pub mod errors;
pub mod file_io;
pub mod resolve;
pub mod sections;
pub mod settings;
pub mod status;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use dataset::{ReferenceDataset, ValidationReport};
pub use elements::{Dimension, ElementType, QuantityKind, Shape};
pub use embedded::default_dataset;
pub use errors::{SpanError, SpanResult};
pub use file_io::{load_dataset, DatasetSource};
pub use resolve::{resolve, resolve_keys, try_resolve, LookupMiss, ResolvedResult, Selection};
pub use settings::{OutputFormat, Settings};
pub use status::CapacityStatus;
