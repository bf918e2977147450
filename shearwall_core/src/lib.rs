//! # shearwall_core - Seismic Shear Wall Line Design Engine
//!
//! `shearwall_core` designs light-frame wood shear wall lines for seismic
//! load. For each story of each wall line it selects a sheathing assembly and
//! a tie-down rod from discrete capacity tables, checks story drift, and
//! escalates (stronger assembly first, longer wall second) until every story
//! passes. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure stage functions over immutable records
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Configuration, infeasibility and non-convergence are distinct
//! - **Explicit Tables**: Capacity tables are passed in, never global state
//!
//! ## Quick Start
//!
//! ```rust
//! use shearwall_core::calculations::design_project;
//! use shearwall_core::materials::{builtin_shear_walls, builtin_tie_downs};
//! use shearwall_core::project::Project;
//!
//! let json = r#"{
//!   "meta": { "version": "0.1.0", "engineer": "J. Doe", "job_id": "25-001", "client": "Acme",
//!             "created": "2025-01-01T00:00:00Z", "modified": "2025-01-01T00:00:00Z" },
//!   "site": { "site_class": "D", "ss": 1.5, "s1": 0.6, "r": 6.5, "ie": 1.0, "cd": 4.0, "tl": 8.0 },
//!   "building": { "story_heights_ft": [10.0, 10.0], "floor_weights_kips": [100.0, 150.0] },
//!   "wall_lines": [{
//!     "direction": "X", "name": "Line-A", "wall_length_ft": 20.0,
//!     "tributary_width_ft": 30.0, "tributary_length_ft": 40.0, "total_area_ft2": 1200.0,
//!     "walls_per_line": 2, "allowable_drift_ratio": 0.02, "load_ratio": 0.5,
//!     "material": { "initial_moisture_content": 19.0, "final_moisture_content": 12.0, "e_psi": 1600000.0 },
//!     "take_up_in": [0.05, 0.05], "chord_area_in2": [16.5, 16.5],
//!     "story_forces_kips": [4.0, 3.0]
//!   }]
//! }"#;
//!
//! let project: Project = serde_json::from_str(json).unwrap();
//! let report = design_project(&project, builtin_shear_walls().unwrap(), builtin_tie_downs().unwrap()).unwrap();
//! assert_eq!(report.wall_lines[0].shear_walls.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, settings and validation
//! - [`calculations`] - Seismic demand, selection, drift, redesign loop, final design
//! - [`asce7`] - Code coefficient tables (site coefficients, period, Cs, k)
//! - [`materials`] - Capacity tables, detailing attributes, built-in library
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Project loading, table loading, atomic saves

pub mod asce7;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, load_shear_wall_table, load_tie_down_table, save_report};
pub use project::{DesignSettings, Project, ProjectMetadata};
