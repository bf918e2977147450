//! # Shear Wall Assembly Selection
//!
//! Picks the least-capacity row of a [`ShearWallTable`] that carries a unit
//! shear demand.
//!
//! ## Selection Rules
//!
//! 1. Qualifying rows have `capacity × multiplier ≥ demand` (the multiplier
//!    is the optional wall D/C target, 1.0 when absent).
//! 2. [`Candidate::Cheapest`] takes the first qualifying row that also
//!    matches every constrained detailing attribute. If none match, it
//!    falls back to the first qualifying row and logs a warning.
//! 3. [`Candidate::Escalated(n)`](Candidate::Escalated) takes row `n` of the
//!    qualifying set, ignoring detailing. [`AssemblyChoice::next_candidate`]
//!    gives the row just above a previous choice.
//!
//! The table's ascending order makes "first" mean "cheapest".
//!
//! ## Example
//!
//! ```rust
//! use shearwall_core::calculations::assembly::{select_assembly, Candidate, SelectionOptions};
//! use shearwall_core::materials::builtin_shear_walls;
//!
//! let table = builtin_shear_walls().unwrap();
//! let choice = select_assembly(0.35, 1, table, &SelectionOptions::default(), Candidate::Cheapest).unwrap();
//! assert_eq!(choice.assembly.lrfd_klf, 0.38);
//! assert!(choice.dc_ratio <= 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult, SelectionComponent};
use crate::materials::{DetailingFilter, ShearWallAssembly, ShearWallTable};

/// Position within the qualifying set the selector should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Candidate {
    /// Cheapest row honoring the detailing preference
    #[default]
    Cheapest,
    /// Row `n` of the qualifying set, detailing ignored
    Escalated(usize),
}

/// User preferences applied during selection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionOptions {
    /// Capacity multiplier (target D/C), in (0, 1]
    pub dc_multiplier: Option<f64>,
    pub detailing: DetailingFilter,
}

/// The selected assembly and how it was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyChoice {
    pub assembly: ShearWallAssembly,
    /// Row index in the full table
    pub table_index: usize,
    pub candidate: Candidate,
    /// Unit shear demand (klf)
    pub demand_klf: f64,
    /// demand / capacity
    pub dc_ratio: f64,
    /// The detailing preference matched nothing and was dropped
    pub detailing_fallback: bool,
    /// Position of the chosen row within the qualifying set
    pub qualifying_position: usize,
    /// Size of the detailing-unfiltered qualifying set
    pub qualifying_count: usize,
}

impl AssemblyChoice {
    /// True if a qualifying row stronger than the chosen one exists
    pub fn has_stronger_candidate(&self) -> bool {
        self.qualifying_position + 1 < self.qualifying_count
    }

    /// The qualifying row just above the chosen one.
    ///
    /// A detailing preference can put the cheapest choice anywhere in the
    /// qualifying set, so escalation counts from the chosen row rather than
    /// from the start of the set.
    pub fn next_candidate(&self) -> Candidate {
        Candidate::Escalated(self.qualifying_position + 1)
    }
}

/// Select a shear wall assembly for a unit shear demand at `level`.
pub fn select_assembly(
    demand_klf: f64,
    level: usize,
    table: &ShearWallTable,
    options: &SelectionOptions,
    candidate: Candidate,
) -> CalcResult<AssemblyChoice> {
    if !(demand_klf >= 0.0) || !demand_klf.is_finite() {
        return Err(CalcError::invalid_input(
            "unit_shear_klf",
            demand_klf.to_string(),
            "Unit shear demand must be a finite, non-negative number",
        ));
    }
    let multiplier = validate_multiplier(options.dc_multiplier, "wall_dc_ratio")?;

    let qualifying: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.lrfd_klf * multiplier >= demand_klf)
        .map(|(i, _)| i)
        .collect();

    if qualifying.is_empty() {
        return Err(CalcError::infeasible(
            SelectionComponent::ShearWall,
            level,
            demand_klf,
            format!("largest capacity {:.3} klf × {}", table.max_capacity_klf(), multiplier),
        ));
    }

    let (qualifying_position, detailing_fallback) = match candidate {
        Candidate::Cheapest => {
            let filter = &options.detailing;
            let matching = qualifying.iter().position(|&i| {
                let row = &table.rows()[i];
                filter.admits(&row.panel_thickness, &row.nail_size, &row.nail_spacing)
            });
            match matching {
                Some(position) => (position, false),
                None => {
                    tracing::warn!(
                        level,
                        demand_klf,
                        ?filter,
                        "no shear wall matches the detailing preference, using the cheapest qualifying assembly"
                    );
                    (0, true)
                }
            }
        }
        Candidate::Escalated(n) => match qualifying.get(n) {
            Some(_) => (n, false),
            None => {
                return Err(CalcError::infeasible(
                    SelectionComponent::ShearWall,
                    level,
                    demand_klf,
                    format!("escalation {} past the {} qualifying assemblies", n, qualifying.len()),
                ));
            }
        },
    };

    let table_index = qualifying[qualifying_position];
    let assembly = table.rows()[table_index].clone();
    let dc_ratio = demand_klf / assembly.lrfd_klf;

    Ok(AssemblyChoice {
        assembly,
        table_index,
        candidate,
        demand_klf,
        dc_ratio,
        detailing_fallback,
        qualifying_position,
        qualifying_count: qualifying.len(),
    })
}

/// Resolve an optional D/C multiplier, rejecting values outside (0, 1].
pub(crate) fn validate_multiplier(multiplier: Option<f64>, field: &str) -> CalcResult<f64> {
    match multiplier {
        None => Ok(1.0),
        Some(m) if m > 0.0 && m <= 1.0 => Ok(m),
        Some(m) => Err(CalcError::invalid_input(
            field,
            m.to_string(),
            "D/C ratio multiplier must be in (0, 1]",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{NailSize, NailSpacing, PanelThickness};

    fn row(id: &str, cap: f64, ga: f64, t: PanelThickness, n: NailSize, s: u8) -> ShearWallAssembly {
        ShearWallAssembly {
            id: id.to_string(),
            lrfd_klf: cap,
            ga_kips_per_in: ga,
            panel_thickness: t,
            nail_size: n,
            nail_spacing: NailSpacing(s),
            model_tag: None,
        }
    }

    fn three_rows() -> ShearWallTable {
        ShearWallTable::new(vec![
            row("A", 1.5, 20.0, PanelThickness::In15_32, NailSize::D8, 6),
            row("B", 2.2, 25.0, PanelThickness::In15_32, NailSize::D8, 4),
            row("C", 3.0, 30.0, PanelThickness::In19_32, NailSize::D10, 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_cheapest_qualifying_row() {
        let choice = select_assembly(2.0, 1, &three_rows(), &SelectionOptions::default(), Candidate::Cheapest).unwrap();
        assert_eq!(choice.assembly.id, "B");
        assert!((choice.dc_ratio - 2.0 / 2.2).abs() < 1e-12);
        assert!((choice.dc_ratio - 0.909).abs() < 1e-3);
        assert_eq!(choice.qualifying_count, 2);
        assert_eq!(choice.qualifying_position, 0);
        assert!(choice.has_stronger_candidate());
        assert_eq!(choice.next_candidate(), Candidate::Escalated(1));
    }

    #[test]
    fn test_escalated_candidate_ignores_adequacy_of_cheaper_row() {
        let choice = select_assembly(2.0, 1, &three_rows(), &SelectionOptions::default(), Candidate::Escalated(1)).unwrap();
        assert_eq!(choice.assembly.id, "C");
        assert_eq!(choice.table_index, 2);
        assert!(!choice.has_stronger_candidate());
    }

    #[test]
    fn test_escalated_past_end_is_infeasible() {
        let err = select_assembly(2.0, 2, &three_rows(), &SelectionOptions::default(), Candidate::Escalated(2)).unwrap_err();
        assert!(err.is_infeasible_selection());
    }

    #[test]
    fn test_dc_multiplier_pushes_to_stronger_row() {
        let options = SelectionOptions {
            dc_multiplier: Some(0.8),
            ..Default::default()
        };
        // 2.2 × 0.8 = 1.76 < 2.0, 3.0 × 0.8 = 2.4 ≥ 2.0
        let choice = select_assembly(2.0, 1, &three_rows(), &options, Candidate::Cheapest).unwrap();
        assert_eq!(choice.assembly.id, "C");
        assert!((choice.dc_ratio - 2.0 / 3.0).abs() < 1e-12);

        let bad = SelectionOptions {
            dc_multiplier: Some(1.5),
            ..Default::default()
        };
        assert!(select_assembly(2.0, 1, &three_rows(), &bad, Candidate::Cheapest).is_err());
    }

    #[test]
    fn test_detailing_filter_is_honored() {
        let options = SelectionOptions {
            detailing: DetailingFilter::any().with_nail_size(NailSize::D10),
            ..Default::default()
        };
        let choice = select_assembly(1.0, 1, &three_rows(), &options, Candidate::Cheapest).unwrap();
        assert_eq!(choice.assembly.id, "C");
        assert!(!choice.detailing_fallback);
        assert_eq!(choice.qualifying_position, 2);
        assert!(!choice.has_stronger_candidate());
    }

    #[test]
    fn test_escalation_from_detailed_choice_moves_up() {
        // 0.5 klf qualifies A..D; the 10d preference lands on C
        let mut rows = three_rows().rows().to_vec();
        rows.push(row("D", 3.5, 34.0, PanelThickness::In19_32, NailSize::D8, 2));
        let table = ShearWallTable::new(rows).unwrap();
        let options = SelectionOptions {
            detailing: DetailingFilter::any().with_nail_size(NailSize::D10),
            ..Default::default()
        };

        let first = select_assembly(0.5, 1, &table, &options, Candidate::Cheapest).unwrap();
        assert_eq!(first.assembly.id, "C");
        assert_eq!(first.qualifying_position, 2);
        assert!(first.has_stronger_candidate());
        assert_eq!(first.next_candidate(), Candidate::Escalated(3));

        let next = select_assembly(0.5, 1, &table, &options, first.next_candidate()).unwrap();
        assert_eq!(next.assembly.id, "D");
        assert!(next.assembly.lrfd_klf > first.assembly.lrfd_klf);
        assert!(!next.has_stronger_candidate());
    }

    #[test]
    fn test_detailing_fallback_still_meets_demand() {
        let options = SelectionOptions {
            detailing: DetailingFilter::any().with_nail_size(NailSize::D6),
            ..Default::default()
        };
        let choice = select_assembly(2.0, 1, &three_rows(), &options, Candidate::Cheapest).unwrap();
        assert_eq!(choice.assembly.id, "B");
        assert!(choice.detailing_fallback);
        assert!(choice.assembly.lrfd_klf >= 2.0);
    }

    #[test]
    fn test_demand_above_table_is_infeasible() {
        let err = select_assembly(3.5, 3, &three_rows(), &SelectionOptions::default(), Candidate::Cheapest).unwrap_err();
        match err {
            CalcError::InfeasibleSelection { component, level, demand, .. } => {
                assert_eq!(component, SelectionComponent::ShearWall);
                assert_eq!(level, 3);
                assert_eq!(demand, 3.5);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_rejects_nan_demand() {
        let err = select_assembly(f64::NAN, 1, &three_rows(), &SelectionOptions::default(), Candidate::Cheapest).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
