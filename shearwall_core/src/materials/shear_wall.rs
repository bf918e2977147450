//! Shear Wall Assembly Table
//!
//! Discrete wood structural panel shear wall assemblies with their LRFD unit
//! shear capacity and apparent shear stiffness.
//!
//! ## CSV Format
//!
//! ```text
//! Assembly,LRFD(klf),Ga(OSB)(kips/in),panel thickness,nail size,nail spacing,OpenSeesTag
//! SW-06,0.380,21,15/32,8d,4,OSB1532_8d_4
//! ```
//!
//! `OpenSeesTag` is optional. Rows must be sorted by ascending capacity; the
//! selectors take the first qualifying row as the cheapest.

use serde::{Deserialize, Serialize};

use super::csv::CsvText;
use super::detailing::{NailSize, NailSpacing, PanelThickness};
use crate::errors::{CalcError, CalcResult};

/// One row of the shear wall capacity table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearWallAssembly {
    /// Assembly identifier
    pub id: String,
    /// LRFD unit shear capacity (klf)
    pub lrfd_klf: f64,
    /// Apparent shear stiffness Ga for OSB sheathing (kips/in)
    pub ga_kips_per_in: f64,
    pub panel_thickness: PanelThickness,
    pub nail_size: NailSize,
    pub nail_spacing: NailSpacing,
    /// Downstream analysis model tag, carried through to the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_tag: Option<String>,
}

/// Shear wall assemblies sorted by ascending capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShearWallTable {
    rows: Vec<ShearWallAssembly>,
}

impl ShearWallTable {
    /// Build a table, checking that it is non-empty, every value is positive,
    /// and capacities never decrease.
    pub fn new(rows: Vec<ShearWallAssembly>) -> CalcResult<Self> {
        if rows.is_empty() {
            return Err(CalcError::invalid_input(
                "shear_wall_table",
                "0 rows",
                "Shear wall table must have at least one assembly",
            ));
        }

        for row in &rows {
            if !(row.lrfd_klf > 0.0) || !(row.ga_kips_per_in > 0.0) {
                return Err(CalcError::invalid_input(
                    "shear_wall_table",
                    &row.id,
                    "Capacity and Ga must be positive",
                ));
            }
        }

        if let Some(pair) = rows.windows(2).find(|w| w[1].lrfd_klf < w[0].lrfd_klf) {
            return Err(CalcError::invalid_input(
                "shear_wall_table",
                format!("{} ({} klf) after {} ({} klf)", pair[1].id, pair[1].lrfd_klf, pair[0].id, pair[0].lrfd_klf),
                "Assemblies must be sorted by ascending capacity",
            ));
        }

        Ok(ShearWallTable { rows })
    }

    /// Parse a table from CSV text. `source` names the file in errors.
    pub fn from_csv_str(text: &str, source: &str) -> CalcResult<Self> {
        let csv = CsvText::parse(text, source)?;

        let id_idx = csv.column("Assembly")?;
        let cap_idx = csv.column("LRFD(klf)")?;
        let ga_idx = csv.column("Ga(OSB)(kips/in)")?;
        let thickness_idx = csv.column("panel thickness")?;
        let size_idx = csv.column("nail size")?;
        let spacing_idx = csv.column("nail spacing")?;
        let tag_idx = csv.optional_column("OpenSeesTag");

        let mut rows = Vec::new();
        for (line, fields) in csv.records() {
            let line = *line;
            let row = ShearWallAssembly {
                id: csv.text(line, fields, id_idx)?.to_string(),
                lrfd_klf: csv.number(line, fields, cap_idx)?,
                ga_kips_per_in: csv.number(line, fields, ga_idx)?,
                panel_thickness: PanelThickness::parse(csv.text(line, fields, thickness_idx)?)
                    .map_err(|e| csv.cell_error(line, e))?,
                nail_size: NailSize::parse(csv.text(line, fields, size_idx)?)
                    .map_err(|e| csv.cell_error(line, e))?,
                nail_spacing: NailSpacing::parse(csv.text(line, fields, spacing_idx)?)
                    .map_err(|e| csv.cell_error(line, e))?,
                model_tag: csv.optional_text(fields, tag_idx).map(str::to_string),
            };
            rows.push(row);
        }

        Self::new(rows)
    }

    /// Load a table from a CSV file on disk
    pub fn load_from_csv(path: &str) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path, format!("Failed to read CSV: {}", e)))?;
        Self::from_csv_str(&text, path)
    }

    /// All rows, weakest first
    pub fn rows(&self) -> &[ShearWallAssembly] {
        &self.rows
    }

    /// Row at `index`
    pub fn get(&self, index: usize) -> Option<&ShearWallAssembly> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if `index` is the last (strongest) row
    pub fn is_strongest(&self, index: usize) -> bool {
        index + 1 == self.rows.len()
    }

    /// Largest capacity in the table (klf)
    pub fn max_capacity_klf(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.lrfd_klf)
    }
}
