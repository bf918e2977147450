//! # Project Data Structures
//!
//! The `Project` struct is the root container for one building's shear wall
//! design case. Projects serialize to `.swd` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (code edition, redesign loop limits)
//! ├── site: SiteParameters (site class, Ss, S1, R, Ie, Cd, TL)
//! ├── building: BuildingGeometry (story heights, floor weights, ...)
//! └── wall_lines: Vec<WallLine> (one entry per direction + line name)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use shearwall_core::asce7::SiteClass;
//! use shearwall_core::calculations::seismic::{BuildingGeometry, SiteParameters};
//! use shearwall_core::project::Project;
//!
//! let site = SiteParameters { site_class: SiteClass::D, ss: 1.5, s1: 0.6, r: 6.5, ie: 1.0, cd: 4.0, tl: 8.0 };
//! let building = BuildingGeometry::uniform(vec![10.0, 10.0], vec![150.0, 200.0]);
//! let project = Project::new("Jane Engineer", "25-042", "ACME Corp", site, building);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::redesign::RedesignLimits;
use crate::calculations::seismic::{BuildingGeometry, SiteParameters};
use crate::calculations::wall_line::WallLine;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .swd files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container, serialized to `.swd` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: DesignSettings,

    pub site: SiteParameters,

    pub building: BuildingGeometry,

    /// Wall lines in design order
    #[serde(default)]
    pub wall_lines: Vec<WallLine>,
}

impl Project {
    /// Create a project with no wall lines.
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        site: SiteParameters,
        building: BuildingGeometry,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            site,
            building,
            wall_lines: Vec::new(),
        }
    }

    /// Find a wall line by label (`X/Line-A`) or, if unambiguous, by bare name
    pub fn find_wall_line(&self, key: &str) -> Option<&WallLine> {
        if let Some(line) = self.wall_lines.iter().find(|l| l.label() == key) {
            return Some(line);
        }
        let mut by_name = self.wall_lines.iter().filter(|l| l.name == key);
        match (by_name.next(), by_name.next()) {
            (Some(line), None) => Some(line),
            _ => None,
        }
    }

    /// Check the whole case before any design runs.
    pub fn validate(&self) -> CalcResult<()> {
        self.settings.limits.validate()?;
        self.site.validate()?;
        self.building.validate()?;

        if self.wall_lines.is_empty() {
            return Err(CalcError::missing_field("wall_lines"));
        }

        let stories = self.building.story_count();
        let mut seen = HashSet::new();
        for line in &self.wall_lines {
            line.validate(stories)?;
            if !seen.insert(line.label()) {
                return Err(CalcError::invalid_input(
                    "wall_lines",
                    line.label(),
                    "Duplicate wall line (direction + name must be unique)",
                ));
            }
            if line.wall_length_ft > self.settings.limits.max_wall_length_ft {
                return Err(CalcError::invalid_input(
                    format!("{}.wall_length_ft", line.label()),
                    line.wall_length_ft.to_string(),
                    "Nominal wall length exceeds settings.limits.max_wall_length_ft",
                ));
            }
        }
        Ok(())
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Project-wide design settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Seismic provisions edition, reported only
    pub code: String,

    /// Bounds on the per-story redesign loop
    pub limits: RedesignLimits,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: "ASCE 7-16".to_string(),
            limits: RedesignLimits::default(),
        }
    }
}
