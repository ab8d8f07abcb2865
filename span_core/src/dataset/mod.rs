//! # Reference Dataset
//!
//! Typed model of the span-table document. The document is keyed by element
//! type, and each element carries a capacity table whose nesting depends on
//! the element's [`Shape`](crate::elements::Shape):
//!
//! ```text
//! structural_elements
//! ├── floor_joists.spans      grade → size → spacing → leaf
//! ├── stud_walls.heights      grade → size → wall type → spacing → leaf
//! └── stair_stringers.spans   grade → size → stringer type → leaf
//! ```
//!
//! The nesting is modelled as a recursive [`CapacityNode`]; its depth is
//! checked once against the element shape when a dataset is loaded (see
//! [`ReferenceDataset::validate`]). After that the dataset is treated as
//! immutable and shared by reference.
//!
//! ## Example
//!
//! ```rust
//! use span_core::dataset::ReferenceDataset;
//! use span_core::elements::ElementType;
//!
//! let dataset = span_core::embedded::default_dataset().unwrap();
//! let floors = dataset.element(ElementType::FloorJoists).unwrap();
//! assert!(floors.capacities.contains_key("C16"));
//! # let _: &ReferenceDataset = dataset;
//! ```

mod validate;

pub use validate::ValidationReport;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::elements::{ElementType, QuantityKind};
use crate::errors::{SpanError, SpanResult};
use crate::units::{KilonewtonsPerSqM, Meters};

/// Root of the reference document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataset {
    pub meta: DatasetMeta,

    /// Element definitions keyed by element-type identifier
    ///
    /// Keys that don't name a known [`ElementType`] are kept but never
    /// reachable through a lookup.
    pub structural_elements: BTreeMap<String, ElementDefinition>,

    pub timber_specifications: TimberSpecifications,

    /// Ordered advisory notes shown with every result
    #[serde(default)]
    pub usage_notes: Vec<String>,
}

impl ReferenceDataset {
    /// Parse a JSON document and validate its shape invariants.
    ///
    /// Non-fatal findings are logged as warnings. Use
    /// [`ReferenceDataset::validate`] to inspect them.
    pub fn from_json_str(json: &str) -> SpanResult<Self> {
        let dataset: ReferenceDataset = serde_json::from_str(json)
            .map_err(|e| SpanError::serialization(format!("Invalid reference dataset: {}", e)))?;

        let report = dataset.validate()?;
        for warning in &report.warnings {
            warn!(%warning, "reference dataset");
        }

        Ok(dataset)
    }

    /// Definition for a known element type, if the dataset has one
    pub fn element(&self, element: ElementType) -> Option<&ElementDefinition> {
        self.structural_elements.get(element.key())
    }

    /// Known element types present in the dataset, in [`ElementType::ALL`] order
    pub fn known_elements(&self) -> impl Iterator<Item = (ElementType, &ElementDefinition)> {
        ElementType::ALL
            .into_iter()
            .filter_map(move |element| self.element(element).map(|def| (element, def)))
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.meta.sources
    }

    pub fn usage_notes(&self) -> &[String] {
        &self.usage_notes
    }

    pub fn disclaimer(&self) -> &str {
        &self.meta.disclaimer
    }
}

/// Version, provenance and verification details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub title: String,
    pub version: String,
    pub created_date: DateTime<Utc>,
    pub data_status: String,
    pub disclaimer: String,
    #[serde(default)]
    pub sources: Vec<DataSource>,
    pub validation_status: ValidationStatus,
}

/// A publication or practice the values were compiled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Summary of how the dataset was checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStatus {
    pub cross_referenced: bool,
    pub engineer_reviewed: bool,
    pub last_verified: DateTime<Utc>,
    pub confidence_level: String,
}

/// Static definition of one element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub description: String,
    pub loading: Loading,
    pub design_criteria: DesignCriteria,

    /// Capacity table keyed by grade. Stored as `heights` for wall elements.
    #[serde(rename = "spans", alias = "heights")]
    pub capacities: BTreeMap<String, CapacityNode>,
}

/// Loading assumptions, either for the whole element or per subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loading {
    Uniform(LoadingAssumptions),
    PerSubtype(BTreeMap<String, LoadingAssumptions>),
}

impl Loading {
    /// Loading that applies to a selection.
    ///
    /// Uniform loading applies to every selection. Per-subtype loading needs
    /// the subtype and returns only that subtype's entry.
    pub fn for_subtype(&self, subtype: Option<&str>) -> Option<&LoadingAssumptions> {
        match self {
            Loading::Uniform(loading) => Some(loading),
            Loading::PerSubtype(by_subtype) => subtype.and_then(|key| by_subtype.get(key)),
        }
    }
}

/// Design loads the tabulated capacities were derived for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingAssumptions {
    pub dead_load: KilonewtonsPerSqM,
    pub imposed_load: KilonewtonsPerSqM,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_load: Option<KilonewtonsPerSqM>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_load: Option<KilonewtonsPerSqM>,
    /// Point load in kN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentrated_load: Option<f64>,
    pub total_load: KilonewtonsPerSqM,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Serviceability and support conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCriteria {
    pub deflection_limit: String,
    pub end_conditions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing_length: Option<String>,
    pub service_class: String,
    /// Element-specific criteria (buckling check, maximum pitch, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// One level of a capacity table, or a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapacityNode {
    Leaf(Leaf),
    Branch(BTreeMap<String, CapacityNode>),
}

impl CapacityNode {
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            CapacityNode::Leaf(leaf) => Some(leaf),
            CapacityNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&BTreeMap<String, CapacityNode>> {
        match self {
            CapacityNode::Branch(children) => Some(children),
            CapacityNode::Leaf(_) => None,
        }
    }

    /// Call `f` with the key-path below this node and each leaf, in key order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&[&'a str], &'a Leaf)) {
        let mut path = Vec::new();
        self.walk(&mut path, f);
    }

    fn walk<'a>(&'a self, path: &mut Vec<&'a str>, f: &mut impl FnMut(&[&'a str], &'a Leaf)) {
        match self {
            CapacityNode::Leaf(leaf) => f(path, leaf),
            CapacityNode::Branch(children) => {
                for (key, child) in children {
                    path.push(key);
                    child.walk(path, f);
                    path.pop();
                }
            }
        }
    }
}

/// A single tabulated capacity and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    #[serde(flatten)]
    pub capacity: Capacity,
    pub confidence: Confidence,
    /// Identifiers of the sources that agree on this value
    #[serde(default)]
    pub source_agreement: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Tabulated capacity, tagged by the quantity it measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Capacity {
    #[serde(rename = "max_span")]
    Span(Meters),
    #[serde(rename = "max_height")]
    Height(Meters),
}

impl Capacity {
    pub fn quantity(&self) -> QuantityKind {
        match self {
            Capacity::Span(_) => QuantityKind::Span,
            Capacity::Height(_) => QuantityKind::Height,
        }
    }

    pub fn value(&self) -> Meters {
        match self {
            Capacity::Span(m) | Capacity::Height(m) => *m,
        }
    }
}

/// Confidence in a tabulated value. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(s)
    }
}

/// Global dimension lists and grade properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimberSpecifications {
    pub grades_available: Vec<String>,
    /// Canonical spacing keys in mm, without unit suffix
    pub spacing_options: Vec<String>,
    /// Sizes grouped by breadth (e.g., "47mm_width")
    #[serde(default)]
    pub sizes_available: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub strength_properties: BTreeMap<String, StrengthClass>,
}

/// Strength class properties per BS EN 338.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthClass {
    /// Characteristic bending strength (N/mm²)
    pub fm_k: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leaf_parses_span_and_height() {
        let span: Leaf = serde_json::from_str(
            r#"{"max_span": 3.28, "confidence": "high", "source_agreement": ["trada_typical"], "notes": "n"}"#,
        )
        .unwrap();
        assert_eq!(span.capacity, Capacity::Span(Meters(3.28)));
        assert_eq!(span.confidence, Confidence::High);

        let height: Leaf = serde_json::from_str(r#"{"max_height": 3, "confidence": "medium"}"#).unwrap();
        assert_eq!(height.capacity.quantity(), QuantityKind::Height);
        assert_eq!(height.capacity.value(), Meters(3.0));
        assert!(height.source_agreement.is_empty());
        assert!(height.notes.is_none());
    }

    #[test]
    fn test_capacity_node_distinguishes_leaves_and_branches() {
        let node: CapacityNode = serde_json::from_str(
            r#"{"400": {"max_span": 2.15, "confidence": "high"}, "600": {"max_span": 1.82, "confidence": "low"}}"#,
        )
        .unwrap();
        let branch = node.as_branch().unwrap();
        assert_eq!(branch.len(), 2);
        assert!(branch["400"].as_leaf().is_some());
        assert!(node.as_leaf().is_none());
    }

    #[test]
    fn test_for_each_leaf_reports_paths() {
        let node: CapacityNode = serde_json::from_str(
            r#"{"47x100": {"400": {"max_span": 2.15, "confidence": "high"}},
                "47x150": {"400": {"max_span": 3.28, "confidence": "high"}}}"#,
        )
        .unwrap();
        let mut seen = Vec::new();
        node.for_each_leaf(&mut |path, leaf| seen.push((path.join("/"), leaf.capacity.value().0)));
        assert_eq!(seen, vec![("47x100/400".to_string(), 2.15), ("47x150/400".to_string(), 3.28)]);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert_eq!(serde_json::to_string(&Confidence::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_loading_variants() {
        let uniform: Loading = serde_json::from_str(
            r#"{"dead_load": 0.25, "imposed_load": 1.5, "total_load": 1.75, "unit": "kN/m²"}"#,
        )
        .unwrap();
        assert!(matches!(uniform, Loading::Uniform(_)));
        assert!(uniform.for_subtype(None).is_some());
        assert!(uniform.for_subtype(Some("anything")).is_some());

        let per: Loading = serde_json::from_str(
            r#"{"partition_wall": {"dead_load": 0.5, "imposed_load": 0.0, "total_load": 0.5, "unit": "kN/m²"},
                "external_wall": {"dead_load": 1.2, "imposed_load": 2.5, "wind_load": 0.8, "total_load": 4.5, "unit": "kN/m²"}}"#,
        )
        .unwrap();
        assert!(per.for_subtype(None).is_none());
        assert_eq!(per.for_subtype(Some("external_wall")).unwrap().wind_load, Some(KilonewtonsPerSqM(0.8)));
        assert!(per.for_subtype(Some("load_bearing_wall")).is_none());
    }

    #[test]
    fn test_design_criteria_keeps_extra_fields() {
        let criteria: DesignCriteria = serde_json::from_str(
            r#"{"deflection_limit": "span/200", "end_conditions": "simply_supported",
                "service_class": "1 (dry conditions)", "slope": "maximum 42° pitch per Part K"}"#,
        )
        .unwrap();
        assert!(criteria.bearing_length.is_none());
        assert_eq!(criteria.extra.get("slope").map(String::as_str), Some("maximum 42° pitch per Part K"));
    }
}
