//! # Seismic Demand
//!
//! Equivalent Lateral Force procedure (ASCE 7-16 Chapter 12) from site and
//! building data down to per-story wall line demand.
//!
//! ## Story Ordering
//!
//! All per-story arrays are ordered top-down: index 0 is the roof story.
//! The reported level of story `i` in an `n` story building is `n - i`, so
//! the ground story is level 1.
//!
//! ## Example
//!
//! ```rust
//! use shearwall_core::asce7::SiteClass;
//! use shearwall_core::calculations::seismic::{
//!     calculate_design_parameters, BuildingGeometry, SiteParameters,
//! };
//!
//! let site = SiteParameters {
//!     site_class: SiteClass::D,
//!     ss: 1.5,
//!     s1: 0.6,
//!     r: 6.5,
//!     ie: 1.0,
//!     cd: 4.0,
//!     tl: 8.0,
//! };
//! let building = BuildingGeometry::uniform(vec![10.0, 10.0], vec![150.0, 200.0]);
//!
//! let params = calculate_design_parameters(&site, &building).unwrap();
//! assert!((params.sds - 1.0).abs() < 1e-9);
//! assert_eq!(params.story_force_kips.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use super::wall_line::WallLine;
use crate::asce7::{self, SiteClass};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Feet, Kips, KlF};

/// Wall length added to demand once the redesign loop has lengthened a wall (ft)
pub const REDESIGN_LENGTH_ALLOWANCE_FT: f64 = 0.5;

/// Site hazard and system factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteParameters {
    pub site_class: SiteClass,
    /// Mapped short-period spectral acceleration (g)
    pub ss: f64,
    /// Mapped 1-second spectral acceleration (g)
    pub s1: f64,
    /// Response modification coefficient
    pub r: f64,
    /// Seismic importance factor
    pub ie: f64,
    /// Deflection amplification factor
    pub cd: f64,
    /// Long-period transition period (s)
    pub tl: f64,
}

impl SiteParameters {
    pub fn validate(&self) -> CalcResult<()> {
        for (name, value) in [("ss", self.ss), ("s1", self.s1)] {
            if !(value >= 0.0) {
                return Err(CalcError::invalid_input(
                    format!("site.{}", name),
                    value.to_string(),
                    "Spectral acceleration cannot be negative",
                ));
            }
        }
        for (name, value) in [("r", self.r), ("ie", self.ie), ("cd", self.cd), ("tl", self.tl)] {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("site.{}", name),
                    value.to_string(),
                    "Must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Building geometry and seismic weight, one entry per story, top-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingGeometry {
    pub story_heights_ft: Vec<f64>,
    pub floor_weights_kips: Vec<f64>,
    #[serde(default)]
    pub floor_areas_ft2: Vec<f64>,
    #[serde(default)]
    pub floor_max_x_ft: Vec<f64>,
    #[serde(default)]
    pub floor_max_z_ft: Vec<f64>,
    #[serde(default)]
    pub live_loads_psf: Vec<f64>,
}

impl BuildingGeometry {
    /// Geometry with heights and weights only
    pub fn uniform(story_heights_ft: Vec<f64>, floor_weights_kips: Vec<f64>) -> Self {
        BuildingGeometry {
            story_heights_ft,
            floor_weights_kips,
            floor_areas_ft2: Vec::new(),
            floor_max_x_ft: Vec::new(),
            floor_max_z_ft: Vec::new(),
            live_loads_psf: Vec::new(),
        }
    }

    pub fn story_count(&self) -> usize {
        self.story_heights_ft.len()
    }

    /// Total height hn (ft)
    pub fn total_height_ft(&self) -> f64 {
        self.story_heights_ft.iter().sum()
    }

    /// Elevation of the floor at the top of each story above the base (ft)
    pub fn elevations_ft(&self) -> Vec<f64> {
        let mut elevations: Vec<f64> = self
            .story_heights_ft
            .iter()
            .rev()
            .scan(0.0, |acc, h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
        elevations.reverse();
        elevations
    }

    /// Reported level number of the story at `index`
    pub fn level(&self, index: usize) -> usize {
        self.story_count() - index
    }

    pub fn validate(&self) -> CalcResult<()> {
        let n = self.story_count();
        if n == 0 {
            return Err(CalcError::missing_field("building.story_heights_ft"));
        }
        if self.floor_weights_kips.len() != n {
            return Err(CalcError::invalid_input(
                "building.floor_weights_kips",
                format!("{} values", self.floor_weights_kips.len()),
                format!("Expected one value per story ({})", n),
            ));
        }
        for (name, values) in [
            ("floor_areas_ft2", &self.floor_areas_ft2),
            ("floor_max_x_ft", &self.floor_max_x_ft),
            ("floor_max_z_ft", &self.floor_max_z_ft),
            ("live_loads_psf", &self.live_loads_psf),
        ] {
            if !values.is_empty() && values.len() != n {
                return Err(CalcError::invalid_input(
                    format!("building.{}", name),
                    format!("{} values", values.len()),
                    format!("Expected one value per story ({}) or none", n),
                ));
            }
        }
        if let Some(h) = self.story_heights_ft.iter().find(|h| !(**h > 1.0)) {
            return Err(CalcError::invalid_input(
                "building.story_heights_ft",
                h.to_string(),
                "Story height must exceed 1 ft",
            ));
        }
        if let Some(w) = self.floor_weights_kips.iter().find(|w| !(**w >= 0.0)) {
            return Err(CalcError::invalid_input(
                "building.floor_weights_kips",
                w.to_string(),
                "Floor weight cannot be negative",
            ));
        }
        if !(self.floor_weights_kips.iter().sum::<f64>() > 0.0) {
            return Err(CalcError::invalid_input(
                "building.floor_weights_kips",
                "0",
                "Total seismic weight must be positive",
            ));
        }
        Ok(())
    }
}

/// Derived seismic design parameters for the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicDesignParameters {
    pub ss: f64,
    pub s1: f64,
    pub fa: f64,
    pub fv: f64,
    pub sms: f64,
    pub sm1: f64,
    pub sds: f64,
    pub sd1: f64,
    pub cu: f64,
    pub ct: f64,
    pub x: f64,
    /// Upper-bound approximate period Cu·Ta (s)
    pub period_s: f64,
    pub r: f64,
    pub ie: f64,
    pub cd: f64,
    pub tl: f64,
    pub cs: f64,
    pub k: f64,
    /// V = Cs·W (kips)
    pub base_shear_kips: f64,
    /// Vertical distribution factor per story, top-down
    pub cvx: Vec<f64>,
    /// Fx per story, top-down (kips)
    pub story_force_kips: Vec<f64>,
    /// Vx per story, top-down (kips)
    pub story_shear_kips: Vec<f64>,
}

/// Run the ELF procedure for a building.
pub fn calculate_design_parameters(
    site: &SiteParameters,
    building: &BuildingGeometry,
) -> CalcResult<SeismicDesignParameters> {
    site.validate()?;
    building.validate()?;

    let fa = site.site_class.fa(site.ss);
    let fv = site.site_class.fv(site.s1);
    let (sms, sm1, sds, sd1) = asce7::design_accelerations(site.ss, site.s1, fa, fv);

    let cu = asce7::cu_coefficient(sd1);
    let period_s = asce7::approximate_period(cu, building.total_height_ft());
    let cs = asce7::seismic_response_coefficient(sds, sd1, site.s1, period_s, site.tl, site.r, site.ie);
    let k = asce7::k_exponent(period_s);

    let total_weight: f64 = building.floor_weights_kips.iter().sum();
    let base_shear_kips = total_weight * cs;

    let weighted: Vec<f64> = building
        .floor_weights_kips
        .iter()
        .zip(building.elevations_ft())
        .map(|(w, hx)| w * hx.powf(k))
        .collect();
    let sum_weighted: f64 = weighted.iter().sum();
    let cvx: Vec<f64> = weighted.iter().map(|wh| wh / sum_weighted).collect();

    let story_force_kips: Vec<f64> = cvx.iter().map(|c| c * base_shear_kips).collect();
    let story_shear_kips = cumulative(&story_force_kips);

    Ok(SeismicDesignParameters {
        ss: site.ss,
        s1: site.s1,
        fa,
        fv,
        sms,
        sm1,
        sds,
        sd1,
        cu,
        ct: asce7::CT,
        x: asce7::X,
        period_s,
        r: site.r,
        ie: site.ie,
        cd: site.cd,
        tl: site.tl,
        cs,
        k,
        base_shear_kips,
        cvx,
        story_force_kips,
        story_shear_kips,
    })
}

/// Demand on one story of a wall line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoryDemand {
    pub level: usize,
    pub story_height_ft: f64,
    /// Story force carried by one wall (kips)
    pub story_force_per_wall_kips: f64,
    /// Accumulated unit shear (klf)
    pub unit_shear_klf: f64,
    /// Accumulated overturning tension (kips)
    pub tension_kips: f64,
}

/// Demand on every story of a wall line at one trial length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLineDemand {
    /// Trial wall length (ft)
    pub wall_length_ft: f64,
    /// Length used to spread shear: trial length plus the redesign allowance when set
    pub effective_length_ft: f64,
    pub redesigned: bool,
    /// One entry per story, top-down
    pub stories: Vec<StoryDemand>,
}

/// Wall length demand is spread over for a trial length
pub fn effective_length_ft(wall_length_ft: f64, redesigned: bool) -> f64 {
    if redesigned {
        wall_length_ft + REDESIGN_LENGTH_ALLOWANCE_FT
    } else {
        wall_length_ft
    }
}

/// Per-story unit shear and tension demand on a wall line.
///
/// The line's `story_forces_kips`, when given, replaces the ELF story
/// forces.
pub fn calculate_wall_line_demand(
    params: &SeismicDesignParameters,
    building: &BuildingGeometry,
    line: &WallLine,
    wall_length_ft: f64,
    redesigned: bool,
) -> CalcResult<WallLineDemand> {
    let length = effective_length_ft(wall_length_ft, redesigned);
    if !(length > 0.0) {
        return Err(CalcError::invalid_input(
            format!("{}.wall_length_ft", line.label()),
            wall_length_ft.to_string(),
            "Wall length must be positive",
        ));
    }
    if line.walls_per_line == 0 {
        return Err(CalcError::invalid_input(
            format!("{}.walls_per_line", line.label()),
            "0",
            "A wall line needs at least one wall",
        ));
    }

    let story_forces = line.story_forces_kips.as_ref().unwrap_or(&params.story_force_kips);
    if story_forces.len() != building.story_count() {
        return Err(CalcError::invalid_input(
            format!("{}.story_forces_kips", line.label()),
            format!("{} values", story_forces.len()),
            format!("Expected one value per story ({})", building.story_count()),
        ));
    }

    let walls = f64::from(line.walls_per_line);
    let force_per_wall: Vec<f64> = story_forces.iter().map(|f| f * line.load_ratio / walls).collect();
    let unit_shear: Vec<f64> = cumulative(&force_per_wall)
        .into_iter()
        .map(|v| (Kips(v) / Feet(length)).value())
        .collect();
    // overturning arm is the story height less 1 ft
    let tension_increments: Vec<f64> = unit_shear
        .iter()
        .zip(&building.story_heights_ft)
        .map(|(v, h)| (KlF(*v) * Feet(h - 1.0)).value())
        .collect();
    let tension = cumulative(&tension_increments);

    let stories = (0..building.story_count())
        .map(|i| StoryDemand {
            level: building.level(i),
            story_height_ft: building.story_heights_ft[i],
            story_force_per_wall_kips: force_per_wall[i],
            unit_shear_klf: unit_shear[i],
            tension_kips: tension[i],
        })
        .collect();

    Ok(WallLineDemand {
        wall_length_ft,
        effective_length_ft: length,
        redesigned,
        stories,
    })
}

/// Running sum from the top story down
fn cumulative(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calculations::wall_line::tests::sample_line;

    pub(crate) fn site_d() -> SiteParameters {
        SiteParameters {
            site_class: SiteClass::D,
            ss: 1.5,
            s1: 0.6,
            r: 6.5,
            ie: 1.0,
            cd: 4.0,
            tl: 8.0,
        }
    }

    pub(crate) fn three_story() -> BuildingGeometry {
        BuildingGeometry::uniform(vec![10.0, 10.0, 10.0], vec![120.0, 180.0, 180.0])
    }

    #[test]
    fn test_site_class_d_scenario() {
        let params = calculate_design_parameters(&site_d(), &three_story()).unwrap();
        assert!((params.fa - 1.0).abs() < 1e-12);
        assert!((params.fv - 1.5).abs() < 1e-12);
        assert!((params.sms - 1.5).abs() < 1e-12);
        assert!((params.sds - 1.0).abs() < 1e-12);
        assert!((params.sd1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_distribution() {
        let building = three_story();
        let params = calculate_design_parameters(&site_d(), &building).unwrap();

        let sum_cvx: f64 = params.cvx.iter().sum();
        assert!((sum_cvx - 1.0).abs() < 1e-12);

        // Base story shear equals the base shear
        let base = *params.story_shear_kips.last().unwrap();
        assert!((base - params.base_shear_kips).abs() < 1e-9);

        // Top story shear equals the top story force
        assert!((params.story_shear_kips[0] - params.story_force_kips[0]).abs() < 1e-12);

        // Short building: k = 1, so Cvx ∝ w·h
        assert_eq!(params.k, 1.0);
        let expected_top = 120.0 * 30.0 / (120.0 * 30.0 + 180.0 * 20.0 + 180.0 * 10.0);
        assert!((params.cvx[0] - expected_top).abs() < 1e-12);
    }

    #[test]
    fn test_elevations_and_levels() {
        let building = BuildingGeometry::uniform(vec![9.0, 10.0, 12.0], vec![1.0, 1.0, 1.0]);
        assert_eq!(building.elevations_ft(), vec![31.0, 22.0, 12.0]);
        assert_eq!(building.level(0), 3);
        assert_eq!(building.level(2), 1);
    }

    #[test]
    fn test_wall_line_demand_accumulates_top_down() {
        let building = three_story();
        let params = calculate_design_parameters(&site_d(), &building).unwrap();
        let mut line = sample_line(3);
        line.story_forces_kips = Some(vec![10.0, 8.0, 4.0]);

        let demand = calculate_wall_line_demand(&params, &building, &line, 20.0, false).unwrap();
        let s = &demand.stories;

        // load ratio 0.5, two walls
        assert!((s[0].story_force_per_wall_kips - 2.5).abs() < 1e-12);
        assert!((s[0].unit_shear_klf - 2.5 / 20.0).abs() < 1e-12);
        assert!((s[1].unit_shear_klf - 4.5 / 20.0).abs() < 1e-12);
        assert!((s[2].unit_shear_klf - 5.5 / 20.0).abs() < 1e-12);

        let t0 = s[0].unit_shear_klf * 9.0;
        let t1 = t0 + s[1].unit_shear_klf * 9.0;
        assert!((s[0].tension_kips - t0).abs() < 1e-12);
        assert!((s[1].tension_kips - t1).abs() < 1e-12);
        assert_eq!(s[0].level, 3);
    }

    #[test]
    fn test_redesign_allowance_lowers_demand() {
        let building = three_story();
        let params = calculate_design_parameters(&site_d(), &building).unwrap();
        let line = sample_line(3);

        let first = calculate_wall_line_demand(&params, &building, &line, 20.0, false).unwrap();
        let again = calculate_wall_line_demand(&params, &building, &line, 20.0, true).unwrap();
        assert_eq!(again.effective_length_ft, 20.5);
        let ratio = first.stories[2].unit_shear_klf / again.stories[2].unit_shear_klf;
        assert!((ratio - 20.5 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_elf_forces_used_without_override() {
        let building = three_story();
        let params = calculate_design_parameters(&site_d(), &building).unwrap();
        let line = sample_line(3);
        let demand = calculate_wall_line_demand(&params, &building, &line, 20.0, false).unwrap();
        let expected = params.story_force_kips[1] * 0.5 / 2.0;
        assert!((demand.stories[1].story_force_per_wall_kips - expected).abs() < 1e-12);
    }

    #[test]
    fn test_configuration_errors() {
        let mut building = three_story();
        building.floor_weights_kips.pop();
        assert!(calculate_design_parameters(&site_d(), &building).is_err());

        let mut site = site_d();
        site.r = 0.0;
        assert!(calculate_design_parameters(&site, &three_story()).is_err());

        let building = three_story();
        let params = calculate_design_parameters(&site_d(), &building).unwrap();
        let mut line = sample_line(3);
        line.story_forces_kips = Some(vec![1.0]);
        assert!(calculate_wall_line_demand(&params, &building, &line, 20.0, false).is_err());
        assert!(calculate_wall_line_demand(&params, &building, &sample_line(3), 0.0, false).is_err());
    }
}
