//! Load-time shape validation.
//!
//! Lookups assume every capacity table has exactly the depth its element
//! shape declares. That is checked once here, so lookups never have to.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{CapacityNode, ElementDefinition, Leaf, Loading, ReferenceDataset, TimberSpecifications};
use crate::elements::{Dimension, ElementType, Shape};
use crate::errors::{SpanError, SpanResult};

/// Non-fatal findings from [`ReferenceDataset::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl ReferenceDataset {
    /// Check the shape invariants of every known element.
    ///
    /// Fails with [`SpanError::MalformedDataset`] when a capacity table is
    /// deeper or shallower than its element shape, has an empty level, holds
    /// a leaf of the wrong quantity, or uses subtypes its loading doesn't
    /// describe. Unknown element keys, grade and spacing keys missing from
    /// the global lists, and subtype sets that vary between sizes are
    /// reported as warnings.
    pub fn validate(&self) -> SpanResult<ValidationReport> {
        let mut warnings = BTreeSet::new();

        for (key, definition) in &self.structural_elements {
            match ElementType::from_key(key) {
                Some(element) => {
                    let check = ShapeCheck::run(key, element.shape(), definition, &self.timber_specifications)?;
                    warnings.extend(check.warnings);
                }
                None => {
                    warnings.insert(format!("unknown element type '{}' is ignored by lookups", key));
                }
            }
        }

        Ok(ValidationReport {
            warnings: warnings.into_iter().collect(),
        })
    }
}

struct ShapeCheck<'a> {
    element: &'a str,
    shape: Shape,
    specs: &'a TimberSpecifications,
    /// Subtype keys found under each grade/size path
    subtype_sets: Vec<(String, BTreeSet<&'a str>)>,
    warnings: BTreeSet<String>,
}

impl<'a> ShapeCheck<'a> {
    fn run(
        element: &'a str,
        shape: Shape,
        definition: &'a ElementDefinition,
        specs: &'a TimberSpecifications,
    ) -> SpanResult<Self> {
        let mut check = ShapeCheck {
            element,
            shape,
            specs,
            subtype_sets: Vec::new(),
            warnings: BTreeSet::new(),
        };

        let mut path = Vec::new();
        check.level(&definition.capacities, 0, &mut path)?;
        check.loading(&definition.loading)?;
        check.subtype_consistency();

        Ok(check)
    }

    fn malformed(&self, path: &[&str], reason: impl Into<String>) -> SpanError {
        SpanError::malformed(self.element, path.join("/"), reason)
    }

    fn level(
        &mut self,
        map: &'a BTreeMap<String, CapacityNode>,
        index: usize,
        path: &mut Vec<&'a str>,
    ) -> SpanResult<()> {
        let dimension = self.shape.dimensions[index];
        if map.is_empty() {
            return Err(self.malformed(path, format!("empty {} level", dimension)));
        }

        match dimension {
            Dimension::Grade => {
                for grade in map.keys() {
                    if !self.specs.grades_available.contains(grade) {
                        self.warnings.insert(format!(
                            "{}: grade '{}' is not in grades_available",
                            self.element, grade
                        ));
                    }
                }
            }
            Dimension::Spacing => {
                for spacing in map.keys() {
                    if !self.specs.spacing_options.contains(spacing) {
                        self.warnings.insert(format!(
                            "{}: spacing '{}' is not in spacing_options",
                            self.element, spacing
                        ));
                    }
                }
            }
            Dimension::Subtype(_) => {
                self.subtype_sets
                    .push((path.join("/"), map.keys().map(String::as_str).collect()));
            }
            Dimension::Size => {}
        }

        let is_last = index + 1 == self.shape.depth();
        for (key, node) in map {
            path.push(key);
            match (node, is_last) {
                (CapacityNode::Leaf(leaf), true) => self.leaf(leaf, path)?,
                (CapacityNode::Branch(children), false) => self.level(children, index + 1, path)?,
                (CapacityNode::Leaf(_), false) => {
                    let expected = self.shape.dimensions[index + 1];
                    return Err(self.malformed(path, format!("expected a {} level, found a leaf", expected)));
                }
                (CapacityNode::Branch(_), true) => {
                    return Err(self.malformed(path, "expected a leaf, found a nested table"));
                }
            }
            path.pop();
        }

        Ok(())
    }

    fn leaf(&self, leaf: &Leaf, path: &[&str]) -> SpanResult<()> {
        let quantity = leaf.capacity.quantity();
        if quantity != self.shape.quantity {
            return Err(self.malformed(
                path,
                format!("leaf holds a {} but the element tabulates {}", quantity.noun(), self.shape.quantity.noun()),
            ));
        }

        let value = leaf.capacity.value().0;
        if !value.is_finite() || value <= 0.0 {
            return Err(self.malformed(path, format!("capacity must be a positive number, found {}", value)));
        }

        Ok(())
    }

    fn loading(&self, loading: &Loading) -> SpanResult<()> {
        match (loading, self.shape.subtype_kind()) {
            (Loading::PerSubtype(_), None) => Err(self.malformed(
                &["loading"],
                "per-subtype loading on an element without a subtype dimension",
            )),
            (Loading::PerSubtype(by_subtype), Some(_)) => {
                let used: BTreeSet<&str> = self.subtype_sets.iter().flat_map(|(_, set)| set.iter().copied()).collect();
                match used.into_iter().find(|subtype| !by_subtype.contains_key(*subtype)) {
                    Some(missing) => Err(self.malformed(
                        &["loading"],
                        format!("no loading assumptions for subtype '{}'", missing),
                    )),
                    None => Ok(()),
                }
            }
            (Loading::Uniform(_), _) => Ok(()),
        }
    }

    fn subtype_consistency(&mut self) {
        let Some((first_path, first)) = self.subtype_sets.first() else {
            return;
        };
        for (path, set) in &self.subtype_sets[1..] {
            if set != first {
                self.warnings.insert(format!(
                    "{}: subtypes under '{}' differ from '{}'",
                    self.element, path, first_path
                ));
            }
        }
    }
}
