//! # Resolution Engine
//!
//! Resolves a [`Selection`] to the tabulated capacity for that combination.
//!
//! The engine reads the element's [`Shape`] and descends the capacity table
//! one dimension at a time. It has no per-element branches: a floor joist
//! lookup and a stud wall lookup differ only in the key-path the shape lists.
//!
//! Any miss (unknown element, incomplete selection, absent key, or a table
//! that doesn't match its shape) is a normal outcome. [`resolve`] folds every
//! miss into `None`; [`try_resolve`] returns the [`LookupMiss`] for callers
//! and tests that need to know why.
//!
//! ## Example
//!
//! ```rust
//! use span_core::resolve::{resolve, Selection};
//! use span_core::status::CapacityStatus;
//!
//! let dataset = span_core::embedded::default_dataset().unwrap();
//! let selection = Selection::new("floor_joists")
//!     .grade("C16")
//!     .size("47x150")
//!     .spacing("400mm");
//!
//! let result = resolve(dataset, &selection).unwrap();
//! assert_eq!(result.capacity.0, 3.28);
//! assert_eq!(result.status, CapacityStatus::Adequate);
//!
//! // Incomplete selections are simply unresolved
//! assert!(resolve(dataset, &Selection::new("floor_joists").grade("C16")).is_none());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dataset::{CapacityNode, Confidence, DesignCriteria, Leaf, LoadingAssumptions, ReferenceDataset};
use crate::elements::{Dimension, ElementType, QuantityKind, Shape, SubtypeKind};
use crate::status::CapacityStatus;
use crate::units::Meters;

/// Caller-supplied lookup key.
///
/// Every dimension is optional so a partly filled form can be resolved as
/// it is; empty or whitespace-only values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Spacing token, with or without a trailing "mm"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    /// Wall type or stringer type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl Selection {
    pub fn new(element_type: impl Into<String>) -> Self {
        Selection {
            element_type: element_type.into(),
            ..Default::default()
        }
    }

    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn spacing(mut self, spacing: impl Into<String>) -> Self {
        self.spacing = Some(spacing.into());
        self
    }

    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Normalized key for a dimension, or `None` when not supplied
    pub fn key_for(&self, dimension: Dimension) -> Option<String> {
        let raw = match dimension {
            Dimension::Grade => self.grade.as_deref(),
            Dimension::Size => self.size.as_deref(),
            Dimension::Subtype(_) => self.subtype.as_deref(),
            Dimension::Spacing => self.spacing.as_deref(),
        }?;

        let key = match dimension {
            Dimension::Spacing => normalize_spacing(raw),
            _ => raw.trim().to_string(),
        };
        (!key.is_empty()).then_some(key)
    }
}

/// Reduce a spacing token to its dataset key: `"400mm"` → `"400"`.
pub fn normalize_spacing(token: &str) -> String {
    let trimmed = token.trim();
    let without_unit = if trimmed.len() >= 2 && trimmed.is_char_boundary(trimmed.len() - 2)
        && trimmed[trimmed.len() - 2..].eq_ignore_ascii_case("mm")
    {
        &trimmed[..trimmed.len() - 2]
    } else {
        trimmed
    };
    without_unit.trim().to_string()
}

/// Why a selection did not resolve.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupMiss {
    #[error("unknown element type '{key}'")]
    UnknownElementType { key: String },

    #[error("no {element} table in the dataset")]
    ElementNotInDataset { element: ElementType },

    #[error("selection has no {missing}")]
    Incomplete { missing: Dimension },

    /// A subtype was supplied for an element without one
    #[error("{field} '{key}' does not apply to this element")]
    UnexpectedDimension { field: &'static str, key: String },

    #[error("no entry for {dimension} '{key}'")]
    NotFound { dimension: Dimension, key: String },

    /// The table doesn't follow the element shape. Datasets that pass
    /// validation never produce this.
    #[error("traversal fault at {dimension}: {reason}")]
    TraversalFault { dimension: Dimension, reason: String },
}

impl LookupMiss {
    /// True for programmer or data errors, false for ordinary misses
    pub fn is_fault(&self) -> bool {
        matches!(self, LookupMiss::TraversalFault { .. })
    }
}

/// A resolved capacity with its classification and context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedResult {
    pub element_type: ElementType,
    pub quantity: QuantityKind,
    /// Tabulated span or height, exactly as in the dataset
    pub capacity: Meters,
    pub status: CapacityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub confidence: Confidence,
    pub source_agreement: Vec<String>,

    /// Element description, copied from the element definition
    pub description: String,
    /// Loading for the element, or for the selected subtype only
    pub loading: LoadingAssumptions,
    pub design_criteria: DesignCriteria,

    pub grade: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl ResolvedResult {
    /// Two or more sources agree on the value
    pub fn is_corroborated(&self) -> bool {
        self.source_agreement.len() >= 2
    }

    /// Status text, e.g. "Adequate span capability"
    pub fn summary(&self) -> String {
        self.status.summary(self.quantity)
    }
}

/// Resolve a selection, folding every miss into `None`.
///
/// Ordinary misses are logged at debug level, faults at warn level.
pub fn resolve(dataset: &ReferenceDataset, selection: &Selection) -> Option<ResolvedResult> {
    match try_resolve(dataset, selection) {
        Ok(result) => Some(result),
        Err(miss) if miss.is_fault() => {
            warn!(element = %selection.element_type, %miss, "lookup fault");
            None
        }
        Err(miss) => {
            debug!(element = %selection.element_type, %miss, "no result");
            None
        }
    }
}

/// Positional form of [`resolve`]. The spacing token is ignored for elements
/// without a spacing dimension.
pub fn resolve_keys(
    dataset: &ReferenceDataset,
    element_type: &str,
    size: &str,
    spacing_token: &str,
    grade: &str,
    subtype: Option<&str>,
) -> Option<ResolvedResult> {
    let selection = Selection {
        element_type: element_type.to_string(),
        grade: Some(grade.to_string()),
        size: Some(size.to_string()),
        spacing: Some(spacing_token.to_string()),
        subtype: subtype.map(str::to_string),
    };
    resolve(dataset, &selection)
}

/// Resolve a selection, reporting why it missed.
pub fn try_resolve(dataset: &ReferenceDataset, selection: &Selection) -> Result<ResolvedResult, LookupMiss> {
    let element = ElementType::from_key(&selection.element_type).ok_or_else(|| LookupMiss::UnknownElementType {
        key: selection.element_type.trim().to_string(),
    })?;
    let definition = dataset
        .element(element)
        .ok_or(LookupMiss::ElementNotInDataset { element })?;
    let shape = element.shape();

    reject_unused(shape, selection)?;

    let keys = shape
        .dimensions
        .iter()
        .map(|dimension| {
            selection
                .key_for(*dimension)
                .ok_or(LookupMiss::Incomplete { missing: *dimension })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let leaf = descend(&definition.capacities, shape, &keys)?;
    if leaf.capacity.quantity() != shape.quantity {
        return Err(LookupMiss::TraversalFault {
            dimension: shape.dimensions[shape.depth() - 1],
            reason: format!("leaf holds a {}, expected a {}", leaf.capacity.quantity().noun(), shape.quantity.noun()),
        });
    }

    let subtype = key_at(shape, &keys, |d| matches!(d, Dimension::Subtype(_)));
    let loading = definition
        .loading
        .for_subtype(subtype.as_deref())
        .cloned()
        .ok_or_else(|| LookupMiss::TraversalFault {
            dimension: shape.subtype_kind().map(Dimension::Subtype).unwrap_or(Dimension::Grade),
            reason: "no loading assumptions for this selection".to_string(),
        })?;

    let capacity = leaf.capacity.value();
    Ok(ResolvedResult {
        element_type: element,
        quantity: shape.quantity,
        capacity,
        status: CapacityStatus::classify(leaf.capacity.quantity(), capacity.0),
        notes: leaf.notes.clone(),
        confidence: leaf.confidence,
        source_agreement: leaf.source_agreement.clone(),
        description: definition.description.clone(),
        loading,
        design_criteria: definition.design_criteria.clone(),
        grade: key_at(shape, &keys, |d| *d == Dimension::Grade).unwrap_or_default(),
        size: key_at(shape, &keys, |d| *d == Dimension::Size).unwrap_or_default(),
        spacing: key_at(shape, &keys, |d| *d == Dimension::Spacing),
        subtype,
    })
}

/// A subtype on a subtype-less element is a mismatch. A spacing on a
/// spacing-less element (stringers) is ignored.
fn reject_unused(shape: Shape, selection: &Selection) -> Result<(), LookupMiss> {
    if shape.subtype_kind().is_none() {
        if let Some(key) = selection.key_for(Dimension::Subtype(SubtypeKind::WallType)) {
            return Err(LookupMiss::UnexpectedDimension { field: "subtype", key });
        }
    }
    if !shape.requires(Dimension::Spacing) {
        if let Some(key) = selection.key_for(Dimension::Spacing) {
            debug!(element = %selection.element_type, spacing = %key, "spacing does not apply, ignored");
        }
    }
    Ok(())
}

fn descend<'d>(
    table: &'d BTreeMap<String, CapacityNode>,
    shape: Shape,
    keys: &[String],
) -> Result<&'d Leaf, LookupMiss> {
    let last = shape.depth() - 1;
    let mut level = table;

    for (index, (dimension, key)) in shape.dimensions.iter().zip(keys).enumerate() {
        let node = level.get(key).ok_or_else(|| LookupMiss::NotFound {
            dimension: *dimension,
            key: key.clone(),
        })?;

        match (node, index == last) {
            (CapacityNode::Leaf(leaf), true) => return Ok(leaf),
            (CapacityNode::Branch(children), false) => level = children,
            (CapacityNode::Leaf(_), false) => {
                return Err(LookupMiss::TraversalFault {
                    dimension: *dimension,
                    reason: "reached a leaf before the end of the key-path".to_string(),
                })
            }
            (CapacityNode::Branch(_), true) => {
                return Err(LookupMiss::TraversalFault {
                    dimension: *dimension,
                    reason: "expected a leaf, found a nested table".to_string(),
                })
            }
        }
    }

    Err(LookupMiss::TraversalFault {
        dimension: Dimension::Grade,
        reason: "empty key-path".to_string(),
    })
}

fn key_at(shape: Shape, keys: &[String], wanted: impl Fn(&Dimension) -> bool) -> Option<String> {
    shape
        .dimensions
        .iter()
        .position(wanted)
        .and_then(|index| keys.get(index).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::default_dataset;
    use pretty_assertions::assert_eq;

    fn dataset() -> &'static ReferenceDataset {
        default_dataset().expect("embedded dataset loads")
    }

    fn miss(selection: &Selection) -> LookupMiss {
        try_resolve(dataset(), selection).expect_err("selection should not resolve")
    }

    #[test]
    fn test_normalize_spacing() {
        assert_eq!(normalize_spacing("400mm"), "400");
        assert_eq!(normalize_spacing(" 450 MM "), "450");
        assert_eq!(normalize_spacing("600"), "600");
        assert_eq!(normalize_spacing("mm"), "");
        assert_eq!(normalize_spacing(""), "");
    }

    #[test]
    fn test_scenario_a_floor_joists() {
        let selection = Selection::new("floor_joists").grade("C16").size("47x150").spacing("400");
        let result = try_resolve(dataset(), &selection).unwrap();

        assert_eq!(result.element_type, ElementType::FloorJoists);
        assert_eq!(result.quantity, QuantityKind::Span);
        assert_eq!(result.capacity, Meters(3.28));
        assert_eq!(result.status, CapacityStatus::Adequate);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.is_corroborated());
        assert_eq!(result.loading.total_load.0, 1.75);
        assert_eq!(result.design_criteria.deflection_limit, "span/333");
        assert_eq!(result.spacing.as_deref(), Some("400"));
        assert_eq!(result.subtype, None);
        assert_eq!(result.summary(), "Adequate span capability");
    }

    #[test]
    fn test_spacing_suffix_is_stripped() {
        let plain = Selection::new("floor_joists").grade("C24").size("47x200").spacing("450");
        let suffixed = plain.clone().spacing("450mm");
        assert_eq!(
            try_resolve(dataset(), &plain).unwrap(),
            try_resolve(dataset(), &suffixed).unwrap()
        );
    }

    #[test]
    fn test_scenario_b_partition_wall() {
        let selection = Selection::new("stud_walls")
            .grade("C16")
            .size("38x89")
            .subtype("partition_wall")
            .spacing("600");
        let result = try_resolve(dataset(), &selection).unwrap();

        assert_eq!(result.quantity, QuantityKind::Height);
        assert_eq!(result.capacity, Meters(2.8));
        // 2.8 is "adequate" as a span but "good" as a height
        assert_eq!(result.status, CapacityStatus::Good);
        assert_eq!(result.loading.dead_load.0, 0.5);
        assert_eq!(result.loading.total_load.0, 0.5);
        assert_eq!(result.loading.wind_load, None);
        assert_eq!(result.subtype.as_deref(), Some("partition_wall"));
        assert_eq!(result.design_criteria.deflection_limit, "height/200");
    }

    #[test]
    fn test_wall_loading_is_scoped_to_subtype() {
        let external = Selection::new("stud_walls")
            .grade("C16")
            .size("38x140")
            .subtype("external_wall")
            .spacing("400");
        let result = try_resolve(dataset(), &external).unwrap();
        assert_eq!(result.loading.total_load.0, 4.5);
        assert!(result.loading.wind_load.is_some());
    }

    #[test]
    fn test_scenario_c_stringers_without_spacing() {
        let selection = Selection::new("stair_stringers")
            .grade("C24")
            .size("47x225")
            .subtype("domestic_cut");
        let result = try_resolve(dataset(), &selection).unwrap();

        assert_eq!(result.quantity, QuantityKind::Span);
        assert_eq!(result.capacity, Meters(3.0));
        assert_eq!(result.status, CapacityStatus::Adequate);
        assert_eq!(result.spacing, None);
        assert_eq!(result.loading.concentrated_load, Some(1.3));

        let positional = resolve_keys(dataset(), "stair_stringers", "47x225", "", "C24", Some("domestic_cut"));
        assert_eq!(positional, Some(result));
    }

    #[test]
    fn test_scenario_d_grade_missing_for_size() {
        // C24 stud wall data stops at 38x140
        let walls = Selection::new("stud_walls")
            .grade("C24")
            .size("38x184")
            .subtype("partition_wall")
            .spacing("400");
        assert_eq!(
            miss(&walls),
            LookupMiss::NotFound { dimension: Dimension::Size, key: "38x184".to_string() }
        );
        assert!(resolve(dataset(), &walls).is_none());

        let stringers = Selection::new("stair_stringers").grade("C24").size("50x200").subtype("domestic_cut");
        assert!(resolve(dataset(), &stringers).is_none());

        let floors = Selection::new("floor_joists").grade("C40").size("47x150").spacing("400");
        assert_eq!(
            miss(&floors),
            LookupMiss::NotFound { dimension: Dimension::Grade, key: "C40".to_string() }
        );
    }

    #[test]
    fn test_absent_subtype_and_spacing_keys() {
        let walls = Selection::new("stud_walls")
            .grade("C16")
            .size("38x63")
            .subtype("external_wall")
            .spacing("400");
        assert_eq!(
            miss(&walls),
            LookupMiss::NotFound {
                dimension: Dimension::Subtype(SubtypeKind::WallType),
                key: "external_wall".to_string()
            }
        );

        // Wall tables have no 450 spacing even though it's a global option
        let walls = Selection::new("stud_walls")
            .grade("C16")
            .size("38x89")
            .subtype("partition_wall")
            .spacing("450");
        assert!(matches!(miss(&walls), LookupMiss::NotFound { dimension: Dimension::Spacing, .. }));
    }

    #[test]
    fn test_unknown_element_type() {
        let selection = Selection::new("purlins").grade("C16").size("47x150").spacing("400");
        assert_eq!(miss(&selection), LookupMiss::UnknownElementType { key: "purlins".to_string() });
        assert!(resolve(dataset(), &selection).is_none());
    }

    #[test]
    fn test_incomplete_selection() {
        let selection = Selection::new("floor_joists").grade("C16").spacing("400");
        assert_eq!(miss(&selection), LookupMiss::Incomplete { missing: Dimension::Size });

        let blank_grade = Selection::new("floor_joists").grade("  ").size("47x150").spacing("400");
        assert_eq!(miss(&blank_grade), LookupMiss::Incomplete { missing: Dimension::Grade });

        let walls = Selection::new("stud_walls").grade("C16").size("38x89").spacing("400");
        assert_eq!(
            miss(&walls),
            LookupMiss::Incomplete { missing: Dimension::Subtype(SubtypeKind::WallType) }
        );

        assert!(!miss(&selection).is_fault());
    }

    #[test]
    fn test_shape_mismatch() {
        let floors = Selection::new("floor_joists")
            .grade("C16")
            .size("47x150")
            .spacing("400")
            .subtype("partition_wall");
        assert_eq!(
            miss(&floors),
            LookupMiss::UnexpectedDimension { field: "subtype", key: "partition_wall".to_string() }
        );

        assert!(resolve(dataset(), &floors).is_none());
    }

    #[test]
    fn test_spacing_is_ignored_for_stringers() {
        let without = Selection::new("stair_stringers").grade("C24").size("47x225").subtype("domestic_cut");
        let with = without.clone().spacing("400mm");

        let result = try_resolve(dataset(), &with).unwrap();
        assert_eq!(result.capacity, Meters(3.0));
        assert_eq!(result.spacing, None);
        assert_eq!(result, try_resolve(dataset(), &without).unwrap());

        let positional = resolve_keys(dataset(), "stair_stringers", "47x225", "400mm", "C24", Some("domestic_cut"));
        assert_eq!(positional, Some(result));
    }

    #[test]
    fn test_every_leaf_resolves_exactly() {
        let dataset = dataset();
        let mut checked = 0;

        for (element, definition) in dataset.known_elements() {
            let shape = element.shape();
            for (grade, node) in &definition.capacities {
                node.for_each_leaf(&mut |path, leaf| {
                    let mut selection = Selection::new(element.key()).grade(grade.as_str());
                    for (dimension, key) in shape.dimensions[1..].iter().zip(path) {
                        selection = match dimension {
                            Dimension::Size => selection.size(*key),
                            Dimension::Subtype(_) => selection.subtype(*key),
                            Dimension::Spacing => selection.spacing(*key),
                            Dimension::Grade => unreachable!("grade is the first dimension"),
                        };
                    }

                    let result = try_resolve(dataset, &selection).unwrap();
                    assert_eq!(result.capacity, leaf.capacity.value());
                    assert_eq!(result.status, CapacityStatus::classify(shape.quantity, leaf.capacity.value().0));
                    assert_eq!(result.notes, leaf.notes);
                    checked += 1;
                });
            }
        }

        assert!(checked > 150, "only {} leaves checked", checked);
    }

    #[test]
    fn test_malformed_table_is_a_fault_not_a_panic() {
        // Built without validation so the bad shape reaches the engine
        let json = crate::embedded::DEFAULT_DATASET_JSON;
        let mut dataset: ReferenceDataset = serde_json::from_str(json).unwrap();
        let floors = dataset.structural_elements.get_mut("floor_joists").unwrap();
        let leaf: Leaf = serde_json::from_str(r#"{"max_span": 3.0, "confidence": "low"}"#).unwrap();
        floors.capacities.insert(
            "C16".to_string(),
            CapacityNode::Branch(BTreeMap::from([("47x150".to_string(), CapacityNode::Leaf(leaf))])),
        );

        let selection = Selection::new("floor_joists").grade("C16").size("47x150").spacing("400");
        let miss = try_resolve(&dataset, &selection).unwrap_err();
        assert!(miss.is_fault());
        assert!(matches!(miss, LookupMiss::TraversalFault { dimension: Dimension::Size, .. }));
        assert!(resolve(&dataset, &selection).is_none());
    }

    #[test]
    fn test_result_serialization() {
        let selection = Selection::new("floor_joists").grade("C16").size("47x100").spacing("600");
        let result = resolve(dataset(), &selection).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["element_type"], "floor_joists");
        assert_eq!(json["status"], "limited");
        assert_eq!(json["capacity"], 1.82);
        assert!(json.get("subtype").is_none());
    }
}
