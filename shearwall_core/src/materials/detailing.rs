//! Shear wall sheathing and nailing attributes.
//!
//! Every attribute is a closed enum so a typo in a project file or a
//! capacity table fails at parse time instead of silently matching nothing.
//! A user preference for an attribute is a [`Constraint`]: either
//! `Unconstrained` or `Exactly(value)`.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Wood structural panel thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelThickness {
    #[serde(rename = "3/8")]
    In3_8,
    #[serde(rename = "7/16")]
    In7_16,
    #[serde(rename = "15/32")]
    In15_32,
    #[serde(rename = "19/32")]
    In19_32,
    #[serde(rename = "23/32")]
    In23_32,
}

impl PanelThickness {
    /// All panel thicknesses, thinnest first
    pub const ALL: [PanelThickness; 5] = [
        PanelThickness::In3_8,
        PanelThickness::In7_16,
        PanelThickness::In15_32,
        PanelThickness::In19_32,
        PanelThickness::In23_32,
    ];

    /// Fractional-inch code as written in capacity tables
    pub fn code(&self) -> &'static str {
        match self {
            PanelThickness::In3_8 => "3/8",
            PanelThickness::In7_16 => "7/16",
            PanelThickness::In15_32 => "15/32",
            PanelThickness::In19_32 => "19/32",
            PanelThickness::In23_32 => "23/32",
        }
    }

    /// Parse from a table cell, accepting a trailing inch mark
    pub fn parse(s: &str) -> CalcResult<Self> {
        let cleaned = s.trim().trim_end_matches('"').trim_end_matches("in").trim();
        Self::ALL
            .into_iter()
            .find(|t| t.code() == cleaned)
            .ok_or_else(|| CalcError::invalid_input("panel_thickness", s, "Unknown panel thickness"))
    }
}

impl std::fmt::Display for PanelThickness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\"", self.code())
    }
}

/// Common nail pennyweight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NailSize {
    #[serde(rename = "6d")]
    D6,
    #[serde(rename = "8d")]
    D8,
    #[serde(rename = "10d")]
    D10,
}

impl NailSize {
    /// All nail sizes, smallest first
    pub const ALL: [NailSize; 3] = [NailSize::D6, NailSize::D8, NailSize::D10];

    /// Pennyweight code as written in capacity tables
    pub fn code(&self) -> &'static str {
        match self {
            NailSize::D6 => "6d",
            NailSize::D8 => "8d",
            NailSize::D10 => "10d",
        }
    }

    /// Parse from a table cell (case-insensitive)
    pub fn parse(s: &str) -> CalcResult<Self> {
        let cleaned = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|n| n.code() == cleaned)
            .ok_or_else(|| CalcError::invalid_input("nail_size", s, "Unknown nail size"))
    }
}

impl std::fmt::Display for NailSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Panel edge nail spacing in inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NailSpacing(pub u8);

impl NailSpacing {
    /// Parse from a table cell such as `4` or `4"`
    pub fn parse(s: &str) -> CalcResult<Self> {
        let cleaned = s.trim().trim_end_matches('"');
        match cleaned.parse::<u8>() {
            Ok(spacing) if spacing > 0 => Ok(NailSpacing(spacing)),
            _ => Err(CalcError::invalid_input(
                "nail_spacing",
                s,
                "Nail spacing must be a positive whole number of inches",
            )),
        }
    }
}

impl std::fmt::Display for NailSpacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\" o.c.", self.0)
    }
}

/// A user preference on one detailing attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint<T> {
    /// Any value is acceptable
    Unconstrained,
    /// Only this exact value is acceptable
    Exactly(T),
}

impl<T> Default for Constraint<T> {
    fn default() -> Self {
        Constraint::Unconstrained
    }
}

impl<T: PartialEq> Constraint<T> {
    /// True if `value` satisfies this constraint
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Constraint::Unconstrained => true,
            Constraint::Exactly(wanted) => wanted == value,
        }
    }

    /// True if this constraint restricts anything
    pub fn is_constrained(&self) -> bool {
        matches!(self, Constraint::Exactly(_))
    }
}

/// Preferred wall detailing: a conjunction over the constrained attributes.
///
/// ## JSON Example
///
/// ```json
/// {
///   "panel_thickness": { "exactly": "15/32" },
///   "nail_size": "unconstrained",
///   "nail_spacing": { "exactly": 4 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailingFilter {
    pub panel_thickness: Constraint<PanelThickness>,
    pub nail_size: Constraint<NailSize>,
    pub nail_spacing: Constraint<NailSpacing>,
}

impl DetailingFilter {
    /// Filter that admits every assembly
    pub fn any() -> Self {
        Self::default()
    }

    /// Builder: require a panel thickness
    pub fn with_panel_thickness(mut self, thickness: PanelThickness) -> Self {
        self.panel_thickness = Constraint::Exactly(thickness);
        self
    }

    /// Builder: require a nail size
    pub fn with_nail_size(mut self, size: NailSize) -> Self {
        self.nail_size = Constraint::Exactly(size);
        self
    }

    /// Builder: require an edge nail spacing
    pub fn with_nail_spacing(mut self, spacing: NailSpacing) -> Self {
        self.nail_spacing = Constraint::Exactly(spacing);
        self
    }

    /// True when no attribute is constrained
    pub fn is_unconstrained(&self) -> bool {
        !(self.panel_thickness.is_constrained()
            || self.nail_size.is_constrained()
            || self.nail_spacing.is_constrained())
    }

    /// True if an assembly with these attributes satisfies every constraint
    pub fn admits(&self, thickness: &PanelThickness, size: &NailSize, spacing: &NailSpacing) -> bool {
        self.panel_thickness.admits(thickness)
            && self.nail_size.admits(size)
            && self.nail_spacing.admits(spacing)
    }
}
