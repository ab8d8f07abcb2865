//! # Dimension Enumerators
//!
//! Valid choices for each selection dimension, for populating pickers.
//! Sizes and subtypes are read from the capacity tables so nothing is
//! offered that can't resolve for at least one grade. Grades and spacings
//! come from the dataset's global lists.
//!
//! All lists are deterministic: sizes in section order, subtypes sorted.

use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::{CapacityNode, ReferenceDataset};
use crate::elements::{Dimension, ElementType};
use crate::sections::sort_size_keys;

/// Known element types present in the dataset
pub fn element_types(dataset: &ReferenceDataset) -> Vec<ElementType> {
    dataset.known_elements().map(|(element, _)| element).collect()
}

/// Every size that appears under any grade, smallest section first.
pub fn sizes(dataset: &ReferenceDataset, element: ElementType) -> Vec<String> {
    let mut keys = keys_for(dataset, element, Dimension::Size);
    sort_size_keys(&mut keys);
    keys
}

pub fn spacings(dataset: &ReferenceDataset) -> Vec<String> {
    dataset.timber_specifications.spacing_options.clone()
}

/// Spacings with their unit, e.g. "400mm"
pub fn spacing_labels(dataset: &ReferenceDataset) -> Vec<String> {
    dataset
        .timber_specifications
        .spacing_options
        .iter()
        .map(|spacing| format!("{}mm", spacing))
        .collect()
}

pub fn grades(dataset: &ReferenceDataset) -> Vec<String> {
    dataset.timber_specifications.grades_available.clone()
}

pub fn grade_description<'d>(dataset: &'d ReferenceDataset, grade: &str) -> Option<&'d str> {
    dataset
        .timber_specifications
        .strength_properties
        .get(grade.trim())
        .map(|class| class.description.as_str())
}

/// Wall or stringer types for the element, sorted.
///
/// The union over every grade/size entry is returned. Some entries carry
/// fewer subtypes than others (38x63 studs have no external wall rating),
/// so any single entry could hide a valid choice.
pub fn subtypes(dataset: &ReferenceDataset, element: ElementType) -> Vec<String> {
    match element.shape().subtype_kind() {
        Some(kind) => keys_for(dataset, element, Dimension::Subtype(kind)),
        None => Vec::new(),
    }
}

/// Number of tabulated combinations for the element
pub fn combination_count(dataset: &ReferenceDataset, element: ElementType) -> usize {
    let Some(definition) = dataset.element(element) else {
        return 0;
    };

    let mut count = 0;
    for node in definition.capacities.values() {
        node.for_each_leaf(&mut |_, _| count += 1);
    }
    count
}

/// Distinct keys at the level of `dimension`, in key order
fn keys_for(dataset: &ReferenceDataset, element: ElementType, dimension: Dimension) -> Vec<String> {
    let Some(definition) = dataset.element(element) else {
        return Vec::new();
    };
    let Some(depth) = element.shape().dimensions.iter().position(|d| *d == dimension) else {
        return Vec::new();
    };

    let mut keys = BTreeSet::new();
    collect_keys(&definition.capacities, depth, &mut keys);
    keys.into_iter().collect()
}

fn collect_keys(level: &BTreeMap<String, CapacityNode>, depth: usize, keys: &mut BTreeSet<String>) {
    if depth == 0 {
        keys.extend(level.keys().cloned());
        return;
    }
    for node in level.values() {
        if let Some(children) = node.as_branch() {
            collect_keys(children, depth - 1, keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::default_dataset;
    use crate::resolve::{normalize_spacing, resolve, Selection};
    use pretty_assertions::assert_eq;

    fn dataset() -> &'static ReferenceDataset {
        default_dataset().expect("embedded dataset loads")
    }

    #[test]
    fn test_element_types() {
        assert_eq!(element_types(dataset()), ElementType::ALL.to_vec());
    }

    #[test]
    fn test_sizes_are_union_in_section_order() {
        assert_eq!(
            sizes(dataset(), ElementType::StudWalls),
            vec!["38x63", "38x89", "38x140", "38x184"]
        );
        assert_eq!(
            sizes(dataset(), ElementType::StairStringers),
            vec!["47x200", "47x225", "50x200", "50x225", "50x250"]
        );
        assert_eq!(
            sizes(dataset(), ElementType::CeilingJoists),
            vec!["47x100", "47x150", "63x150"]
        );
    }

    #[test]
    fn test_no_ghost_sizes() {
        let dataset = dataset();
        for element in element_types(dataset) {
            let definition = dataset.element(element).unwrap();
            for size in sizes(dataset, element) {
                let graded = definition
                    .capacities
                    .values()
                    .filter_map(CapacityNode::as_branch)
                    .any(|by_size| by_size.contains_key(&size));
                assert!(graded, "{} {} has no grade with data", element, size);
            }
        }

        // sizes_available lists 75mm sections that have no table entries
        assert!(!sizes(dataset, ElementType::FloorJoists).contains(&"75x150".to_string()));
    }

    #[test]
    fn test_spacings_and_labels() {
        assert_eq!(spacings(dataset()), vec!["400", "450", "600"]);
        let labels = spacing_labels(dataset());
        assert_eq!(labels, vec!["400mm", "450mm", "600mm"]);
        let normalized: Vec<String> = labels.iter().map(|label| normalize_spacing(label)).collect();
        assert_eq!(normalized, spacings(dataset()));
    }

    #[test]
    fn test_grades() {
        assert_eq!(grades(dataset()), vec!["C16", "C24", "C30"]);
        assert_eq!(grade_description(dataset(), "C24"), Some("Higher grade, typically imported"));
        assert_eq!(grade_description(dataset(), "C40"), None);
    }

    #[test]
    fn test_subtypes() {
        assert_eq!(
            subtypes(dataset(), ElementType::StudWalls),
            vec!["external_wall", "load_bearing_wall", "partition_wall"]
        );
        assert_eq!(
            subtypes(dataset(), ElementType::StairStringers),
            vec!["commercial_cut", "commercial_uncut", "domestic_cut", "domestic_uncut"]
        );
        assert!(subtypes(dataset(), ElementType::FloorJoists).is_empty());
    }

    #[test]
    fn test_every_enumerated_subtype_resolves_somewhere() {
        let dataset = dataset();
        for subtype in subtypes(dataset, ElementType::StudWalls) {
            let selection = Selection::new("stud_walls")
                .grade("C16")
                .size("38x140")
                .subtype(subtype.as_str())
                .spacing("400");
            assert!(resolve(dataset, &selection).is_some(), "{}", subtype);
        }
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(combination_count(dataset(), ElementType::FloorJoists), 72);
        assert_eq!(combination_count(dataset(), ElementType::StudWalls), 38);
        assert_eq!(combination_count(dataset(), ElementType::StairStringers), 36);
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let dataset = dataset();
        for element in ElementType::ALL {
            assert_eq!(sizes(dataset, element), sizes(dataset, element));
            assert_eq!(subtypes(dataset, element), subtypes(dataset, element));
        }
    }
}
