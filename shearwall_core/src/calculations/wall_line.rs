//! # Wall Line Input
//!
//! Everything the design pipeline needs to know about one shear wall line:
//! tributary geometry, load share, wall material, per-story detailing
//! inputs and the optional user overrides.
//!
//! Per-story arrays are ordered top-down like the building geometry: index
//! 0 is the top story.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "direction": "X",
//!   "name": "Line-A",
//!   "wall_length_ft": 20.0,
//!   "tributary_width_ft": 30.0,
//!   "tributary_length_ft": 60.0,
//!   "total_area_ft2": 1800.0,
//!   "walls_per_line": 2,
//!   "allowable_drift_ratio": 0.02,
//!   "load_ratio": 0.5,
//!   "lineal_loads_klf": [0.3, 0.6],
//!   "material": {
//!     "initial_moisture_content": 19.0,
//!     "final_moisture_content": 12.0,
//!     "e_psi": 1600000.0,
//!     "detailing": { "nail_size": { "exactly": "8d" } }
//!   },
//!   "take_up_in": [0.05, 0.05],
//!   "chord_area_in2": [16.5, 16.5],
//!   "overrides": {
//!     "drift_ratio": { "enabled": true, "value": 0.015 }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::DetailingFilter;

/// Plan direction a wall line resists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    X,
    Z,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::X => write!(f, "X"),
            Direction::Z => write!(f, "Z"),
        }
    }
}

/// A user override gated by an explicit flag.
///
/// The value is kept even while disabled so a project file can toggle an
/// override without losing the number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Override {
    pub enabled: bool,
    pub value: f64,
}

impl Override {
    pub fn enabled(value: f64) -> Self {
        Override { enabled: true, value }
    }

    /// The value when enabled
    pub fn get(&self) -> Option<f64> {
        self.enabled.then_some(self.value)
    }
}

/// User overrides on drift limit and demand/capacity targets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignOverrides {
    /// Drift ratio replacing the wall line's allowable drift ratio
    pub drift_ratio: Override,
    /// Multiplier on shear wall capacity during selection, in (0, 1]
    pub wall_dc_ratio: Override,
    /// Multiplier on tie-down capacity during selection, in (0, 1]
    pub tie_down_dc_ratio: Override,
}

/// Wall framing and sheathing properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallMaterial {
    /// Moisture content at installation (%)
    pub initial_moisture_content: f64,
    /// Equilibrium moisture content in service (%)
    pub final_moisture_content: f64,
    /// Chord modulus of elasticity (psi)
    pub e_psi: f64,
    /// Preferred sheathing and nailing
    #[serde(default)]
    pub detailing: DetailingFilter,
}

/// One shear wall line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLine {
    pub direction: Direction,
    pub name: String,

    /// Nominal (starting) wall length per wall (ft)
    pub wall_length_ft: f64,

    pub tributary_width_ft: f64,
    pub tributary_length_ft: f64,
    pub total_area_ft2: f64,

    /// Number of walls sharing the line's load
    pub walls_per_line: u32,

    /// Code allowable story drift ratio (e.g. 0.02)
    pub allowable_drift_ratio: f64,

    /// Share of the story force carried by this line
    pub load_ratio: f64,

    /// Gravity lineal load per story (klf), reported only
    #[serde(default)]
    pub lineal_loads_klf: Vec<f64>,

    pub material: WallMaterial,

    /// Hold-down take-up deflection per story (in)
    pub take_up_in: Vec<f64>,

    /// Boundary chord area per story (in²)
    pub chord_area_in2: Vec<f64>,

    #[serde(default)]
    pub overrides: DesignOverrides,

    /// Story forces (kips) replacing the ELF distribution for this line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_forces_kips: Option<Vec<f64>>,
}

impl WallLine {
    /// Display label, e.g. `X/Line-A`
    pub fn label(&self) -> String {
        format!("{}/{}", self.direction, self.name)
    }

    /// Validate against a building with `story_count` stories
    pub fn validate(&self, story_count: usize) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::missing_field("wall_lines[].name"));
        }
        if !(self.wall_length_ft > 1.0) {
            return Err(CalcError::invalid_input(
                field(self, "wall_length_ft"),
                self.wall_length_ft.to_string(),
                "Wall length must exceed 1 ft",
            ));
        }
        if self.walls_per_line == 0 {
            return Err(CalcError::invalid_input(
                field(self, "walls_per_line"),
                "0",
                "A wall line needs at least one wall",
            ));
        }
        if !(self.load_ratio > 0.0) {
            return Err(CalcError::invalid_input(
                field(self, "load_ratio"),
                self.load_ratio.to_string(),
                "Load ratio must be positive",
            ));
        }
        if !(self.allowable_drift_ratio > 0.0) {
            return Err(CalcError::invalid_input(
                field(self, "allowable_drift_ratio"),
                self.allowable_drift_ratio.to_string(),
                "Allowable drift ratio must be positive",
            ));
        }
        if !(self.material.e_psi > 0.0) {
            return Err(CalcError::invalid_input(
                field(self, "material.e_psi"),
                self.material.e_psi.to_string(),
                "Modulus of elasticity must be positive",
            ));
        }

        check_len(self, "take_up_in", self.take_up_in.len(), story_count)?;
        check_len(self, "chord_area_in2", self.chord_area_in2.len(), story_count)?;
        if !self.lineal_loads_klf.is_empty() {
            check_len(self, "lineal_loads_klf", self.lineal_loads_klf.len(), story_count)?;
        }
        if let Some(forces) = &self.story_forces_kips {
            check_len(self, "story_forces_kips", forces.len(), story_count)?;
            if forces.iter().any(|f| !(*f >= 0.0)) {
                return Err(CalcError::invalid_input(
                    field(self, "story_forces_kips"),
                    format!("{:?}", forces),
                    "Story forces cannot be negative",
                ));
            }
        }
        if let Some(area) = self.chord_area_in2.iter().find(|a| !(**a > 0.0)) {
            return Err(CalcError::invalid_input(
                field(self, "chord_area_in2"),
                area.to_string(),
                "Chord area must be positive",
            ));
        }
        if let Some(take_up) = self.take_up_in.iter().find(|t| !(**t >= 0.0)) {
            return Err(CalcError::invalid_input(
                field(self, "take_up_in"),
                take_up.to_string(),
                "Take-up deflection cannot be negative",
            ));
        }

        if let Some(ratio) = self.overrides.drift_ratio.get() {
            if !(ratio > 0.0) {
                return Err(CalcError::invalid_input(
                    field(self, "overrides.drift_ratio"),
                    ratio.to_string(),
                    "Drift ratio must be positive",
                ));
            }
        }
        for (name, ovr) in [
            ("overrides.wall_dc_ratio", self.overrides.wall_dc_ratio),
            ("overrides.tie_down_dc_ratio", self.overrides.tie_down_dc_ratio),
        ] {
            if let Some(ratio) = ovr.get() {
                if !(ratio > 0.0 && ratio <= 1.0) {
                    return Err(CalcError::invalid_input(
                        field(self, name),
                        ratio.to_string(),
                        "D/C ratio multiplier must be in (0, 1]",
                    ));
                }
            }
        }

        Ok(())
    }
}

fn field(line: &WallLine, name: &str) -> String {
    format!("{}.{}", line.label(), name)
}

fn check_len(line: &WallLine, name: &str, len: usize, story_count: usize) -> CalcResult<()> {
    if len != story_count {
        return Err(CalcError::invalid_input(
            field(line, name),
            format!("{} values", len),
            format!("Expected one value per story ({})", story_count),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_line(stories: usize) -> WallLine {
        WallLine {
            direction: Direction::X,
            name: "Line-A".to_string(),
            wall_length_ft: 20.0,
            tributary_width_ft: 30.0,
            tributary_length_ft: 60.0,
            total_area_ft2: 1800.0,
            walls_per_line: 2,
            allowable_drift_ratio: 0.02,
            load_ratio: 0.5,
            lineal_loads_klf: vec![0.3; stories],
            material: WallMaterial {
                initial_moisture_content: 19.0,
                final_moisture_content: 12.0,
                e_psi: 1_600_000.0,
                detailing: DetailingFilter::any(),
            },
            take_up_in: vec![0.05; stories],
            chord_area_in2: vec![16.5; stories],
            overrides: DesignOverrides::default(),
            story_forces_kips: None,
        }
    }

    #[test]
    fn test_valid_line() {
        assert!(sample_line(3).validate(3).is_ok());
    }

    #[test]
    fn test_array_length_mismatch() {
        let line = sample_line(2);
        let err = line.validate(3).unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "X/Line-A.take_up_in"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_rejects_short_wall_and_zero_walls() {
        let mut line = sample_line(1);
        line.wall_length_ft = 1.0;
        assert!(line.validate(1).is_err());

        let mut line = sample_line(1);
        line.walls_per_line = 0;
        assert!(line.validate(1).is_err());
    }

    #[test]
    fn test_dc_override_range() {
        let mut line = sample_line(1);
        line.overrides.wall_dc_ratio = Override::enabled(1.2);
        assert!(line.validate(1).is_err());

        line.overrides.wall_dc_ratio = Override { enabled: false, value: 1.2 };
        assert!(line.validate(1).is_ok());

        line.overrides.tie_down_dc_ratio = Override::enabled(0.8);
        assert!(line.validate(1).is_ok());
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "direction": "Z", "name": "L2", "wall_length_ft": 12.0,
            "tributary_width_ft": 10.0, "tributary_length_ft": 20.0, "total_area_ft2": 200.0,
            "walls_per_line": 1, "allowable_drift_ratio": 0.02, "load_ratio": 1.0,
            "material": { "initial_moisture_content": 19.0, "final_moisture_content": 12.0, "e_psi": 1400000.0 },
            "take_up_in": [0.1], "chord_area_in2": [12.25]
        }"#;
        let line: WallLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.direction, Direction::Z);
        assert!(line.material.detailing.is_unconstrained());
        assert_eq!(line.overrides.drift_ratio.get(), None);
        assert!(line.story_forces_kips.is_none());
        assert!(line.validate(1).is_ok());
    }
}
