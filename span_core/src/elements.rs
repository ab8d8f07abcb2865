//! # Structural Elements
//!
//! Element types and the lookup shape each one uses.
//!
//! Every element type has a fixed key-path through its capacity table. The
//! resolution engine walks that path generically, so adding an element with
//! a new shape is one variant here plus data.
//!
//! | Element          | Key-path                              | Quantity |
//! |------------------|---------------------------------------|----------|
//! | Floor joists     | grade / size / spacing                | Span     |
//! | Ceiling joists   | grade / size / spacing                | Span     |
//! | Roof rafters     | grade / size / spacing                | Span     |
//! | Stud walls       | grade / size / wall type / spacing    | Height   |
//! | Stair stringers  | grade / size / stringer type          | Span     |
//!
//! ## Example
//!
//! ```rust
//! use span_core::elements::{Dimension, ElementType, QuantityKind};
//!
//! let walls = ElementType::from_key("stud_walls").unwrap();
//! let shape = walls.shape();
//! assert_eq!(shape.quantity, QuantityKind::Height);
//! assert!(shape.requires(Dimension::Spacing));
//! assert!(shape.subtype_kind().is_some());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of structural timber member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    FloorJoists,
    CeilingJoists,
    RoofRafters,
    StudWalls,
    StairStringers,
}

impl ElementType {
    /// All element types in display order
    pub const ALL: [ElementType; 5] = [
        ElementType::FloorJoists,
        ElementType::CeilingJoists,
        ElementType::RoofRafters,
        ElementType::StudWalls,
        ElementType::StairStringers,
    ];

    /// Dataset key (e.g., "floor_joists")
    pub fn key(&self) -> &'static str {
        match self {
            ElementType::FloorJoists => "floor_joists",
            ElementType::CeilingJoists => "ceiling_joists",
            ElementType::RoofRafters => "roof_rafters",
            ElementType::StudWalls => "stud_walls",
            ElementType::StairStringers => "stair_stringers",
        }
    }

    /// Look up an element type by its dataset key. Unknown keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|e| e.key() == key)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementType::FloorJoists => "Floor Joists",
            ElementType::CeilingJoists => "Ceiling Joists",
            ElementType::RoofRafters => "Roof Rafters",
            ElementType::StudWalls => "Stud Walls",
            ElementType::StairStringers => "Stair Stringers",
        }
    }

    /// The lookup shape for this element type
    pub fn shape(&self) -> Shape {
        match self {
            ElementType::FloorJoists | ElementType::CeilingJoists | ElementType::RoofRafters => Shape {
                dimensions: &PLAIN_GRID,
                quantity: QuantityKind::Span,
            },
            ElementType::StudWalls => Shape {
                dimensions: &WALL_GRID,
                quantity: QuantityKind::Height,
            },
            ElementType::StairStringers => Shape {
                dimensions: &STRINGER_GRID,
                quantity: QuantityKind::Span,
            },
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

static PLAIN_GRID: [Dimension; 3] = [Dimension::Grade, Dimension::Size, Dimension::Spacing];

static WALL_GRID: [Dimension; 4] = [
    Dimension::Grade,
    Dimension::Size,
    Dimension::Subtype(SubtypeKind::WallType),
    Dimension::Spacing,
];

static STRINGER_GRID: [Dimension; 3] = [
    Dimension::Grade,
    Dimension::Size,
    Dimension::Subtype(SubtypeKind::StringerType),
];

/// Secondary classification used by some element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeKind {
    WallType,
    StringerType,
}

impl SubtypeKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SubtypeKind::WallType => "Wall Type",
            SubtypeKind::StringerType => "Stringer Type",
        }
    }
}

/// One level of a capacity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Grade,
    Size,
    Subtype(SubtypeKind),
    Spacing,
}

impl Dimension {
    /// Field name used in diagnostics (e.g., "grade", "wall_type")
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Grade => "grade",
            Dimension::Size => "size",
            Dimension::Subtype(SubtypeKind::WallType) => "wall_type",
            Dimension::Subtype(SubtypeKind::StringerType) => "stringer_type",
            Dimension::Spacing => "spacing",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The physical quantity a capacity table stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    /// Maximum clear span between supports
    Span,
    /// Maximum wall height
    Height,
}

impl QuantityKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuantityKind::Span => "Maximum Span",
            QuantityKind::Height => "Maximum Height",
        }
    }

    /// Lower-case noun used in status text ("span", "height")
    pub fn noun(&self) -> &'static str {
        match self {
            QuantityKind::Span => "span",
            QuantityKind::Height => "height",
        }
    }
}

/// Ordered key-path of an element's capacity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Dimensions in traversal order; always starts with [`Dimension::Grade`]
    pub dimensions: &'static [Dimension],
    /// What the leaves of this table measure
    pub quantity: QuantityKind,
}

impl Shape {
    /// Whether this shape includes the given dimension, matching any subtype kind
    /// when asked about a subtype.
    pub fn requires(&self, dimension: Dimension) -> bool {
        self.dimensions.iter().any(|d| match (d, dimension) {
            (Dimension::Subtype(_), Dimension::Subtype(_)) => true,
            (a, b) => *a == b,
        })
    }

    /// The subtype dimension of this shape, if any
    pub fn subtype_kind(&self) -> Option<SubtypeKind> {
        self.dimensions.iter().find_map(|d| match d {
            Dimension::Subtype(kind) => Some(*kind),
            _ => None,
        })
    }

    /// Number of dimensions in the key-path
    pub fn depth(&self) -> usize {
        self.dimensions.len()
    }
}

/// Presentation details for a subtype key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtypeInfo {
    pub key: String,
    pub display_name: String,
    pub description: Option<&'static str>,
    /// Regulatory notes shown alongside the selection
    pub advisories: Vec<&'static str>,
}

/// Describe a subtype key. Unknown keys get a title-cased name and no notes.
pub fn subtype_info(key: &str) -> SubtypeInfo {
    let (display_name, description, advisories): (Option<&str>, Option<&'static str>, Vec<&'static str>) = match key {
        "partition_wall" => (
            Some("Partition Wall"),
            Some("Non-structural internal wall - self-weight only"),
            vec!["No Building Regulations approval typically required"],
        ),
        "load_bearing_wall" => (
            Some("Load-Bearing Wall"),
            Some("Supports floor/roof loads - requires Building Regs approval"),
            vec!["Building Regulations approval required for structural alterations"],
        ),
        "external_wall" => (
            Some("External Wall"),
            Some("External wall with wind loading and insulation"),
            vec!["Must comply with Part L thermal requirements and wind loading"],
        ),
        "domestic_cut" => (
            Some("Domestic Cut Stringer"),
            Some("Cut stringers with notches for treads - reduced effective section"),
            vec![PART_K_DOMESTIC, CUT_STRINGER],
        ),
        "domestic_uncut" => (
            Some("Domestic Uncut Stringer"),
            Some("Uncut stringers for closed riser construction - full section"),
            vec![PART_K_DOMESTIC, UNCUT_STRINGER],
        ),
        "commercial_cut" => (
            Some("Commercial Cut Stringer"),
            Some("Cut stringers under commercial loading (offices, shops)"),
            vec![COMMERCIAL_LOADING, CUT_STRINGER],
        ),
        "commercial_uncut" => (
            Some("Commercial Uncut Stringer"),
            Some("Uncut stringers for commercial applications - maximum strength"),
            vec![COMMERCIAL_LOADING, UNCUT_STRINGER],
        ),
        _ => (None, None, Vec::new()),
    };

    SubtypeInfo {
        key: key.to_string(),
        display_name: display_name.map(str::to_string).unwrap_or_else(|| title_case(key)),
        description,
        advisories,
    }
}

const PART_K_DOMESTIC: &str = "Domestic stairs - Building Regulations Part K compliance";
const COMMERCIAL_LOADING: &str = "Commercial stairs - Higher loading requirements";
const CUT_STRINGER: &str = "Cut stringers assume 75mm effective depth reduction for tread notches";
const UNCUT_STRINGER: &str = "Uncut stringers provide maximum strength - suitable for closed riser stairs";

/// "load_bearing_wall" -> "Load Bearing Wall"
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
