//! Tie-down (hold-down rod) table.
//!
//! ```text
//! Assembly,Capacity(kips),Ae(in^2)
//! ATS-R8,25.6,0.606
//! ```

use serde::{Deserialize, Serialize};

use super::csv::CsvText;
use crate::errors::{CalcError, CalcResult};

/// One row of the tie-down capacity table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieDown {
    pub id: String,
    /// LRFD tension capacity (kips)
    pub capacity_kips: f64,
    /// Effective rod area for elongation (in²)
    pub area_in2: f64,
}

/// Tie-downs sorted by ascending capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieDownTable {
    rows: Vec<TieDown>,
}

impl TieDownTable {
    /// Build a table, checking that it is non-empty, every value is positive,
    /// and capacities never decrease.
    pub fn new(rows: Vec<TieDown>) -> CalcResult<Self> {
        if rows.is_empty() {
            return Err(CalcError::invalid_input(
                "tie_down_table",
                "0 rows",
                "Tie-down table must have at least one assembly",
            ));
        }

        for row in &rows {
            if !(row.capacity_kips > 0.0) || !(row.area_in2 > 0.0) {
                return Err(CalcError::invalid_input(
                    "tie_down_table",
                    &row.id,
                    "Capacity and effective area must be positive",
                ));
            }
        }

        if let Some(pair) = rows.windows(2).find(|w| w[1].capacity_kips < w[0].capacity_kips) {
            return Err(CalcError::invalid_input(
                "tie_down_table",
                format!("{} after {}", pair[1].id, pair[0].id),
                "Tie-downs must be sorted by ascending capacity",
            ));
        }

        Ok(TieDownTable { rows })
    }

    /// Parse a table from CSV text. `source` names the file in errors.
    pub fn from_csv_str(text: &str, source: &str) -> CalcResult<Self> {
        let csv = CsvText::parse(text, source)?;

        let id_idx = csv.column("Assembly")?;
        let cap_idx = csv.column("Capacity(kips)")?;
        let area_idx = csv.column("Ae(in^2)")?;

        let rows = csv
            .records()
            .map(|(line, fields)| -> CalcResult<TieDown> {
                Ok(TieDown {
                    id: csv.text(*line, fields, id_idx)?.to_string(),
                    capacity_kips: csv.number(*line, fields, cap_idx)?,
                    area_in2: csv.number(*line, fields, area_idx)?,
                })
            })
            .collect::<CalcResult<Vec<_>>>()?;

        Self::new(rows)
    }

    /// Load a table from a CSV file on disk
    pub fn load_from_csv(path: &str) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path, format!("Failed to read CSV: {}", e)))?;
        Self::from_csv_str(&text, path)
    }

    pub fn rows(&self) -> &[TieDown] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest capacity in the table (kips)
    pub fn max_capacity_kips(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.capacity_kips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let csv = "Assembly,Capacity(kips),Ae(in^2)\nR5,10.0,0.226\nR6,14.4,0.334\n";
        let table = TieDownTable::from_csv_str(csv, "td.csv").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].id, "R6");
        assert_eq!(table.rows()[1].area_in2, 0.334);
        assert_eq!(table.max_capacity_kips(), 14.4);
    }

    #[test]
    fn test_rejects_bad_rows() {
        let unsorted = "Assembly,Capacity(kips),Ae(in^2)\nR6,14.4,0.334\nR5,10.0,0.226\n";
        assert!(TieDownTable::from_csv_str(unsorted, "td.csv").is_err());

        let zero_area = "Assembly,Capacity(kips),Ae(in^2)\nR5,10.0,0\n";
        assert!(TieDownTable::from_csv_str(zero_area, "td.csv").is_err());

        let not_number = "Assembly,Capacity(kips),Ae(in^2)\nR5,ten,0.226\n";
        assert!(TieDownTable::from_csv_str(not_number, "td.csv").is_err());
    }
}
