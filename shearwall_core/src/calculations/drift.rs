//! # Shear Wall Deflection and Story Drift
//!
//! Three-term wall deflection (SDPWS-2015 Eq. 4.3-1) with a four-part
//! hold-down assembly displacement, amplified to a story drift per ASCE 7-16
//! 12.8.6 and compared against the allowable story drift.
//!
//! ## Formulas
//!
//! ```text
//! fc        = (T / 0.7) / A_chord                             (ksi)
//! crushing  = max(0, 1.75·(0.04 − 0.02·(1 − fc/0.625)/0.27))  (in)
//! shrinkage = 0.0025 · 1.5 · (MC_initial − MC_final)          (in)
//! Δa        = crushing + shrinkage + take-up + rod elongation
//!
//! v         = F_wall · 1000 / L                               (plf)
//! bending   = 8·v·h³ / (E·A·L)
//! shear     = v·h / (1000·Ga)
//! rotation  = Δa·h / (L − 1)
//!
//! drift     = (bending + shear + rotation) · Cd / Ie
//! limit     = h · 12 · ratio
//! ```
//!
//! `h` and `L` in feet, `E` in psi, `A` in in², `Ga` in kips/in.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Feet, Inches, Kips, PlF};

/// Chord tension is divided by this to get the LRFD compression force
const LRFD_CONVERSION: f64 = 0.7;

/// Input for one story of one wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftInput {
    pub story_height_ft: f64,
    /// Trial wall length (ft)
    pub wall_length_ft: f64,
    /// This story's own force on the wall (kips)
    pub story_force_per_wall_kips: f64,
    /// Accumulated chord tension (kips)
    pub tension_kips: f64,
    pub chord_area_in2: f64,
    pub e_psi: f64,
    pub initial_moisture_content: f64,
    pub final_moisture_content: f64,
    pub take_up_in: f64,
    pub rod_elongation_in: f64,
    /// Apparent shear stiffness of the chosen assembly (kips/in)
    pub ga_kips_per_in: f64,
    pub cd: f64,
    pub ie: f64,
    /// Allowable drift ratio in effect (code or user override)
    pub drift_ratio: f64,
}

impl DriftInput {
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.wall_length_ft > 1.0) {
            return Err(CalcError::invalid_input(
                "wall_length_ft",
                self.wall_length_ft.to_string(),
                "Wall length must exceed 1 ft for the rotation term",
            ));
        }
        let positive = [
            ("story_height_ft", self.story_height_ft),
            ("chord_area_in2", self.chord_area_in2),
            ("e_psi", self.e_psi),
            ("ga_kips_per_in", self.ga_kips_per_in),
            ("cd", self.cd),
            ("ie", self.ie),
            ("drift_ratio", self.drift_ratio),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        Ok(())
    }
}

/// Deflection terms, drift and verdict for one story
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftCheck {
    pub crushing_in: f64,
    pub shrinkage_in: f64,
    pub take_up_in: f64,
    pub rod_elongation_in: f64,
    /// Hold-down assembly displacement Δa (in)
    pub assembly_deflection_in: f64,

    /// Story unit shear used in the deflection terms (plf)
    pub unit_shear_plf: f64,
    pub bending_in: f64,
    pub shear_in: f64,
    pub rotation_in: f64,
    pub wall_deflection_in: f64,

    /// Amplified story drift (in)
    pub drift_in: f64,
    /// Allowable story drift (in)
    pub limit_in: f64,
    pub passes: bool,
}

/// Evaluate deflection and drift for one story.
pub fn calculate(input: &DriftInput) -> CalcResult<DriftCheck> {
    input.validate()?;

    let h = input.story_height_ft;
    let l = input.wall_length_ft;

    let fc_ksi = (input.tension_kips / LRFD_CONVERSION) / input.chord_area_in2;
    let crushing_in = (1.75 * (0.04 - 0.02 * (1.0 - fc_ksi / 0.625) / 0.27)).max(0.0);
    let shrinkage_in = 0.0025 * 1.5 * (input.initial_moisture_content - input.final_moisture_content);
    let assembly_deflection_in = crushing_in + shrinkage_in + input.take_up_in + input.rod_elongation_in;

    let unit_shear_plf = PlF::from(Kips(input.story_force_per_wall_kips) / Feet(l)).value();
    let ea = input.e_psi * input.chord_area_in2;
    let bending_in = 8.0 * unit_shear_plf * h.powi(3) / (ea * l);
    let shear_in = unit_shear_plf * h / (1000.0 * input.ga_kips_per_in);
    let rotation_in = assembly_deflection_in * h / (l - 1.0);
    let wall_deflection_in = bending_in + shear_in + rotation_in;

    let drift_in = wall_deflection_in * input.cd / input.ie;
    let limit_in = (Inches::from(Feet(h)) * input.drift_ratio).value();

    Ok(DriftCheck {
        crushing_in,
        shrinkage_in,
        take_up_in: input.take_up_in,
        rod_elongation_in: input.rod_elongation_in,
        assembly_deflection_in,
        unit_shear_plf,
        bending_in,
        shear_in,
        rotation_in,
        wall_deflection_in,
        drift_in,
        limit_in,
        passes: drift_in <= limit_in,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input() -> DriftInput {
        DriftInput {
            story_height_ft: 10.0,
            wall_length_ft: 20.0,
            story_force_per_wall_kips: 5.0,
            tension_kips: 4.0,
            chord_area_in2: 16.5,
            e_psi: 1_600_000.0,
            initial_moisture_content: 19.0,
            final_moisture_content: 12.0,
            take_up_in: 0.05,
            rod_elongation_in: 0.03,
            ga_kips_per_in: 21.0,
            cd: 4.0,
            ie: 1.0,
            drift_ratio: 0.02,
        }
    }

    #[test]
    fn test_terms() {
        let input = sample_input();
        let check = calculate(&input).unwrap();

        assert!((check.unit_shear_plf - 250.0).abs() < 1e-9);
        assert!((check.shrinkage_in - 0.0025 * 1.5 * 7.0).abs() < 1e-12);

        let bending = 8.0 * 250.0 * 1000.0 / (1_600_000.0 * 16.5 * 20.0);
        assert!((check.bending_in - bending).abs() < 1e-12);
        assert!((check.shear_in - 250.0 * 10.0 / (1000.0 * 21.0)).abs() < 1e-12);
        assert!((check.rotation_in - check.assembly_deflection_in * 10.0 / 19.0).abs() < 1e-12);
        assert!((check.drift_in - 4.0 * check.wall_deflection_in).abs() < 1e-12);
        assert!((check.limit_in - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_crushing_clipped_at_low_compression() {
        let mut input = sample_input();
        input.tension_kips = 0.0;
        assert_eq!(calculate(&input).unwrap().crushing_in, 0.0);

        // fc = 0.625 ksi gives the full 0.07 in
        input.tension_kips = 0.625 * 0.7 * input.chord_area_in2;
        let check = calculate(&input).unwrap();
        assert!((check.crushing_in - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_verdict_follows_limit() {
        let input = sample_input();
        let check = calculate(&input).unwrap();

        let mut loose = input;
        loose.drift_ratio = check.drift_in / (10.0 * 12.0) * 1.05;
        assert!(calculate(&loose).unwrap().passes);

        let mut tight = input;
        tight.drift_ratio = check.drift_in / (10.0 * 12.0) / 1.05;
        assert!(!calculate(&tight).unwrap().passes);
    }

    #[test]
    fn test_stiffer_assembly_never_drifts_more() {
        let soft = calculate(&sample_input()).unwrap();
        let mut input = sample_input();
        input.ga_kips_per_in = 30.0;
        let stiff = calculate(&input).unwrap();
        assert!(stiff.drift_in <= soft.drift_in);
    }

    #[test]
    fn test_degenerate_geometry_is_a_configuration_error() {
        let mut input = sample_input();
        input.wall_length_ft = 1.0;
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_INPUT");

        let mut input = sample_input();
        input.chord_area_in2 = 0.0;
        assert!(calculate(&input).is_err());

        let mut input = sample_input();
        input.ga_kips_per_in = 0.0;
        assert!(calculate(&input).is_err());
    }
}
