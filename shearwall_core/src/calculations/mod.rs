//! # Shear Wall Line Calculations
//!
//! The design pipeline for one wall line, one stage per module. Stages are
//! pure functions over immutable records:
//!
//! ```text
//! seismic ──► assembly ──► anchorage ──► drift
//!    ▲                                     │
//!    └──────────── redesign ◄──────────────┘
//!                     │
//!               final_design
//! ```
//!
//! ## Available Stages
//!
//! - [`wall_line`] - Wall line input record and overrides
//! - [`seismic`] - ELF base shear, vertical distribution, wall line demand
//! - [`assembly`] - Shear wall assembly selection
//! - [`anchorage`] - Tie-down selection and rod elongation
//! - [`drift`] - Wall deflection and story drift check
//! - [`redesign`] - Per-story escalation loop
//! - [`final_design`] - Governing length and the emitted design tables

pub mod anchorage;
pub mod assembly;
pub mod drift;
pub mod final_design;
pub mod redesign;
pub mod seismic;
pub mod wall_line;

// Re-export commonly used types
pub use anchorage::{select_tie_down, TieDownChoice};
pub use assembly::{select_assembly, AssemblyChoice, Candidate, SelectionOptions};
pub use drift::{DriftCheck, DriftInput};
pub use final_design::{design_project, design_wall_line, DesignReport, ShearWallRow, TieDownRow, WallLineDesign};
pub use redesign::{run_redesign, ControllerState, DesignContext, FloorDesign, RedesignLimits, RedesignOutcome, RedesignState};
pub use seismic::{
    calculate_design_parameters, calculate_wall_line_demand, BuildingGeometry, SeismicDesignParameters,
    SiteParameters, StoryDemand, WallLineDemand,
};
pub use wall_line::{DesignOverrides, Direction, Override, WallLine, WallMaterial};
