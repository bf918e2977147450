//! # Tie-down Selection
//!
//! Cheapest tie-down rod that carries the overturning tension at a story,
//! and the rod elongation it produces:
//!
//! ```text
//! Δrod = T · h · 12 / (E · Ae)      E = 29 000 ksi
//! ```

use serde::{Deserialize, Serialize};

use super::assembly::validate_multiplier;
use crate::errors::{CalcError, CalcResult, SelectionComponent};
use crate::materials::{TieDown, TieDownTable};
use crate::units::{Feet, Inches};

/// Modulus of elasticity of steel rod (ksi)
pub const STEEL_E_KSI: f64 = 29_000.0;

/// The selected tie-down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieDownChoice {
    pub tie_down: TieDown,
    pub table_index: usize,
    /// Tension demand (kips)
    pub demand_kips: f64,
    pub dc_ratio: f64,
    /// Rod elongation over the story height (in)
    pub elongation_in: f64,
}

/// Select a tie-down for `tension_kips` over a story of `story_height_ft`.
pub fn select_tie_down(
    tension_kips: f64,
    story_height_ft: f64,
    level: usize,
    table: &TieDownTable,
    dc_multiplier: Option<f64>,
) -> CalcResult<TieDownChoice> {
    if !(tension_kips >= 0.0) || !tension_kips.is_finite() {
        return Err(CalcError::invalid_input(
            "tension_kips",
            tension_kips.to_string(),
            "Tension demand must be a finite, non-negative number",
        ));
    }
    let multiplier = validate_multiplier(dc_multiplier, "tie_down_dc_ratio")?;

    let (table_index, tie_down) = table
        .rows()
        .iter()
        .enumerate()
        .find(|(_, row)| row.capacity_kips * multiplier >= tension_kips)
        .ok_or_else(|| {
            CalcError::infeasible(
                SelectionComponent::TieDown,
                level,
                tension_kips,
                format!("largest capacity {:.1} kips × {}", table.max_capacity_kips(), multiplier),
            )
        })?;

    let rod_length = Inches::from(Feet(story_height_ft));
    let elongation_in = tension_kips * rod_length.value() / (STEEL_E_KSI * tie_down.area_in2);

    Ok(TieDownChoice {
        tie_down: tie_down.clone(),
        table_index,
        demand_kips: tension_kips,
        dc_ratio: tension_kips / tie_down.capacity_kips,
        elongation_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TieDownTable {
        TieDownTable::new(vec![
            TieDown { id: "R5".into(), capacity_kips: 10.0, area_in2: 0.226 },
            TieDown { id: "R6".into(), capacity_kips: 14.4, area_in2: 0.334 },
            TieDown { id: "R8".into(), capacity_kips: 25.6, area_in2: 0.606 },
        ])
        .unwrap()
    }

    #[test]
    fn test_cheapest_rod_and_elongation() {
        let choice = select_tie_down(12.0, 10.0, 2, &table(), None).unwrap();
        assert_eq!(choice.tie_down.id, "R6");
        assert!((choice.dc_ratio - 12.0 / 14.4).abs() < 1e-12);
        let expected = 12.0 * 10.0 * 12.0 / (29_000.0 * 0.334);
        assert!((choice.elongation_in - expected).abs() < 1e-12);
    }

    #[test]
    fn test_multiplier() {
        // 14.4 × 0.75 = 10.8 < 12
        let choice = select_tie_down(12.0, 10.0, 1, &table(), Some(0.75)).unwrap();
        assert_eq!(choice.tie_down.id, "R8");
    }

    #[test]
    fn test_zero_tension_takes_smallest_rod() {
        let choice = select_tie_down(0.0, 10.0, 1, &table(), None).unwrap();
        assert_eq!(choice.table_index, 0);
        assert_eq!(choice.elongation_in, 0.0);
    }

    #[test]
    fn test_infeasible_surface_matches_wall_selector() {
        let err = select_tie_down(30.0, 10.0, 1, &table(), None).unwrap_err();
        assert!(err.is_infeasible_selection());
        assert!(err.to_string().contains("tie-down"));
    }
}
