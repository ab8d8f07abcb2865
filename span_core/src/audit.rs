//! # Grade Ordering Audit
//!
//! Stronger grades should never tabulate a shorter span or height than a
//! weaker grade for the same size and conditions. This audit walks every
//! key-path shared by two or more grades (in `grades_available` order) and
//! reports each inversion.
//!
//! The audit is advisory. Lookups never consult it and an inverted table
//! still resolves.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::ReferenceDataset;
use crate::elements::ElementType;
use crate::units::Meters;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOrderingIssue {
    pub element: ElementType,
    pub size: String,
    /// Remaining key-path below the size, joined with "/" (empty for none)
    pub path: String,
    pub lower_grade: String,
    pub lower_value: Meters,
    pub higher_grade: String,
    pub higher_value: Meters,
}

impl std::fmt::Display for GradeOrderingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.element.key(), self.size)?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        write!(
            f,
            ": {} {} exceeds {} {}",
            self.lower_grade, self.lower_value, self.higher_grade, self.higher_value
        )
    }
}

pub fn audit_grade_ordering(dataset: &ReferenceDataset) -> Vec<GradeOrderingIssue> {
    let grades = &dataset.timber_specifications.grades_available;
    let mut issues = Vec::new();

    for (element, definition) in dataset.known_elements() {
        // key-path → values in grade order
        let mut by_path: BTreeMap<Vec<&str>, Vec<(&str, Meters)>> = BTreeMap::new();
        for grade in grades {
            let Some(node) = definition.capacities.get(grade) else {
                continue;
            };
            node.for_each_leaf(&mut |path, leaf| {
                by_path
                    .entry(path.to_vec())
                    .or_default()
                    .push((grade.as_str(), leaf.capacity.value()));
            });
        }

        for (path, values) in &by_path {
            let Some((size, rest)) = path.split_first() else {
                continue;
            };
            for pair in values.windows(2) {
                let (lower_grade, lower_value) = pair[0];
                let (higher_grade, higher_value) = pair[1];
                if higher_value.0 < lower_value.0 {
                    issues.push(GradeOrderingIssue {
                        element,
                        size: size.to_string(),
                        path: rest.join("/"),
                        lower_grade: lower_grade.to_string(),
                        lower_value,
                        higher_grade: higher_grade.to_string(),
                        higher_value,
                    });
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Capacity, CapacityNode};
    use crate::embedded::default_dataset;
    use pretty_assertions::assert_eq;

    fn set_capacity(dataset: &mut ReferenceDataset, element: &str, path: &[&str], capacity: Capacity) {
        let definition = dataset.structural_elements.get_mut(element).unwrap();
        let (grade, rest) = path.split_first().unwrap();
        let mut node = definition.capacities.get_mut(*grade).unwrap();
        for key in rest {
            node = match node {
                CapacityNode::Branch(children) => children.get_mut(*key).unwrap(),
                CapacityNode::Leaf(_) => panic!("path too deep"),
            };
        }
        match node {
            CapacityNode::Leaf(leaf) => leaf.capacity = capacity,
            CapacityNode::Branch(_) => panic!("path too shallow"),
        }
    }

    #[test]
    fn test_shipped_dataset_is_ordered() {
        assert!(audit_grade_ordering(default_dataset().unwrap()).is_empty());
    }

    #[test]
    fn test_reports_inversion() {
        let mut dataset = default_dataset().unwrap().clone();
        set_capacity(
            &mut dataset,
            "floor_joists",
            &["C24", "47x150", "400"],
            Capacity::Span(Meters(3.0)),
        );

        let issues = audit_grade_ordering(&dataset);
        assert_eq!(
            issues,
            vec![GradeOrderingIssue {
                element: ElementType::FloorJoists,
                size: "47x150".to_string(),
                path: "400".to_string(),
                lower_grade: "C16".to_string(),
                lower_value: Meters(3.28),
                higher_grade: "C24".to_string(),
                higher_value: Meters(3.0),
            }]
        );
        assert_eq!(issues[0].to_string(), "floor_joists 47x150/400: C16 3.28m exceeds C24 3.00m");
    }

    #[test]
    fn test_compares_only_grades_sharing_a_path() {
        // 38x184 studs exist for C16 only, so nothing to compare
        let mut dataset = default_dataset().unwrap().clone();
        set_capacity(
            &mut dataset,
            "stud_walls",
            &["C16", "38x184", "partition_wall", "400"],
            Capacity::Height(Meters(9.0)),
        );
        assert!(audit_grade_ordering(&dataset).is_empty());

        set_capacity(
            &mut dataset,
            "stud_walls",
            &["C16", "38x140", "partition_wall", "400"],
            Capacity::Height(Meters(9.0)),
        );
        let issues = audit_grade_ordering(&dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "partition_wall/400");
    }
}
