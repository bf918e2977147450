//! # Capacity Tables
//!
//! Discrete shear wall and tie-down assemblies the selectors choose from,
//! plus the typed detailing attributes used to express user preferences.
//!
//! Tables are loaded from CSV files (see [`ShearWallTable::load_from_csv`]
//! and [`TieDownTable::load_from_csv`]) or taken from the built-in sample
//! library, which covers common OSB shear walls and threaded-rod tie-downs.
//!
//! ## Example
//!
//! ```rust
//! use shearwall_core::materials::{builtin_shear_walls, builtin_tie_downs};
//!
//! let walls = builtin_shear_walls().unwrap();
//! let rods = builtin_tie_downs().unwrap();
//! assert!(walls.max_capacity_klf() > 0.8);
//! assert!(rods.max_capacity_kips() > 50.0);
//! ```

mod csv;
pub mod detailing;
pub mod shear_wall;
pub mod tie_down;

pub use detailing::{Constraint, DetailingFilter, NailSize, NailSpacing, PanelThickness};
pub use shear_wall::{ShearWallAssembly, ShearWallTable};
pub use tie_down::{TieDown, TieDownTable};

use once_cell::sync::Lazy;

use crate::errors::CalcResult;

static BUILTIN_SHEAR_WALLS: Lazy<CalcResult<ShearWallTable>> = Lazy::new(|| {
    ShearWallTable::from_csv_str(include_str!("../../data/shear_walls.csv"), "builtin:shear_walls.csv")
});

static BUILTIN_TIE_DOWNS: Lazy<CalcResult<TieDownTable>> = Lazy::new(|| {
    TieDownTable::from_csv_str(include_str!("../../data/tie_downs.csv"), "builtin:tie_downs.csv")
});

/// Built-in OSB shear wall library (16 assemblies, 3/8" to 19/32")
pub fn builtin_shear_walls() -> CalcResult<&'static ShearWallTable> {
    BUILTIN_SHEAR_WALLS.as_ref().map_err(Clone::clone)
}

/// Built-in threaded-rod tie-down library (5/8" to 1-1/2" rods)
pub fn builtin_tie_downs() -> CalcResult<&'static TieDownTable> {
    BUILTIN_TIE_DOWNS.as_ref().map_err(Clone::clone)
}
