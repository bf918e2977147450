//! # Final Design Assembly
//!
//! Makes every story of a wall line agree on one wall length.
//!
//! 1. Run the redesign loop for each story from the nominal length.
//! 2. The governing length is the longest converged length.
//! 3. Run the loop again for each story starting at the governing length.
//! 4. If any story ended longer, that becomes the governing length and
//!    step 3 repeats.
//!
//! Each repeat starts without the redesign allowance, so a story whose
//! earlier run converged at a shorter length is re-evaluated at the
//! governing length as a fresh trial. The governing length only grows and
//! the loop's length bound caps it, so the repeats end.

use serde::{Deserialize, Serialize};

use super::redesign::{run_redesign, DesignContext, FloorDesign, RedesignLimits, RedesignState};
use super::seismic::{calculate_design_parameters, SeismicDesignParameters};
use super::wall_line::Direction;
use crate::errors::CalcResult;
use crate::materials::{ShearWallTable, TieDownTable};
use crate::project::Project;

/// One row of the shear wall table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearWallRow {
    pub assembly_id: String,
    pub ga_kips_per_in: f64,
    pub level: usize,
    pub lrfd_klf: f64,
    pub drift_in: f64,
    pub dc_ratio: f64,
    pub model_tag: Option<String>,
    pub wall_length_ft: f64,
}

/// One row of the tie-down table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieDownRow {
    pub assembly_id: String,
    pub elongation_in: f64,
    pub capacity_kips: f64,
    pub level: usize,
    pub dc_ratio: f64,
}

/// Length-consistent design of one wall line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLineDesign {
    /// `direction/name`
    pub wall_line: String,
    pub direction: Direction,
    pub name: String,
    /// Length every row was designed at (ft)
    pub governing_length_ft: f64,
    /// Converged length of each story in the first pass, top-down
    pub first_pass_lengths_ft: Vec<f64>,
    /// Runs at the governing length, 1 when no story lengthened again
    pub passes: usize,
    /// One row per story, top-down
    pub shear_walls: Vec<ShearWallRow>,
    /// One row per story, top-down
    pub tie_downs: Vec<TieDownRow>,
    /// Full records of the final pass
    pub floors: Vec<FloorDesign>,
}

impl From<&FloorDesign> for ShearWallRow {
    fn from(floor: &FloorDesign) -> Self {
        let assembly = &floor.assembly.assembly;
        ShearWallRow {
            assembly_id: assembly.id.clone(),
            ga_kips_per_in: assembly.ga_kips_per_in,
            level: floor.level,
            lrfd_klf: assembly.lrfd_klf,
            drift_in: floor.drift.drift_in,
            dc_ratio: floor.assembly.dc_ratio,
            model_tag: assembly.model_tag.clone(),
            wall_length_ft: floor.state.wall_length_ft,
        }
    }
}

impl From<&FloorDesign> for TieDownRow {
    fn from(floor: &FloorDesign) -> Self {
        TieDownRow {
            assembly_id: floor.tie_down.tie_down.id.clone(),
            elongation_in: floor.tie_down.elongation_in,
            capacity_kips: floor.tie_down.tie_down.capacity_kips,
            level: floor.level,
            dc_ratio: floor.tie_down.dc_ratio,
        }
    }
}

/// Design the wall line in `ctx` at one governing length.
pub fn design_wall_line(ctx: &DesignContext<'_>, limits: &RedesignLimits) -> CalcResult<WallLineDesign> {
    let line = ctx.line;
    let stories = ctx.building.story_count();

    let first_pass_lengths_ft = (0..stories)
        .map(|story| {
            run_redesign(ctx, story, RedesignState::initial(line.wall_length_ft), limits)
                .map(|outcome| outcome.final_state.wall_length_ft)
        })
        .collect::<CalcResult<Vec<_>>>()?;
    let mut governing_length_ft = longest(line.wall_length_ft, first_pass_lengths_ft.iter().copied());

    let mut passes = 0;
    let floors = loop {
        passes += 1;
        let floors = (0..stories)
            .map(|story| run_redesign(ctx, story, RedesignState::initial(governing_length_ft), limits).map(|o| o.design))
            .collect::<CalcResult<Vec<_>>>()?;

        let longest_ft = longest(governing_length_ft, floors.iter().map(|f| f.state.wall_length_ft));
        if longest_ft <= governing_length_ft {
            break floors;
        }
        tracing::debug!(
            wall_line = %line.label(),
            governing_length_ft,
            longest_ft,
            "a story lengthened past the governing length, repeating"
        );
        governing_length_ft = longest_ft;
    };

    tracing::info!(wall_line = %line.label(), governing_length_ft, passes, "wall line designed");

    Ok(WallLineDesign {
        wall_line: line.label(),
        direction: line.direction,
        name: line.name.clone(),
        governing_length_ft,
        first_pass_lengths_ft,
        passes,
        shear_walls: floors.iter().map(ShearWallRow::from).collect(),
        tie_downs: floors.iter().map(TieDownRow::from).collect(),
        floors,
    })
}

fn longest(start: f64, lengths: impl Iterator<Item = f64>) -> f64 {
    lengths.fold(start, f64::max)
}

/// Job information copied into a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub engineer: String,
    pub job_id: String,
    pub client: String,
    pub code: String,
}

/// Designs for every wall line of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub job: JobInfo,
    pub seismic: SeismicDesignParameters,
    pub wall_lines: Vec<WallLineDesign>,
}

/// Design every wall line of `project` in order.
///
/// Errors from the loop name the failing line.
pub fn design_project(
    project: &Project,
    shear_walls: &ShearWallTable,
    tie_downs: &TieDownTable,
) -> CalcResult<DesignReport> {
    project.validate()?;
    let params = calculate_design_parameters(&project.site, &project.building)?;
    let limits = project.settings.limits;

    let wall_lines = project
        .wall_lines
        .iter()
        .map(|line| {
            let ctx = DesignContext {
                params: &params,
                building: &project.building,
                line,
                shear_walls,
                tie_downs,
            };
            design_wall_line(&ctx, &limits).map_err(|e| e.with_wall_line(line.label()))
        })
        .collect::<CalcResult<Vec<_>>>()?;

    Ok(DesignReport {
        job: JobInfo {
            engineer: project.meta.engineer.clone(),
            job_id: project.meta.job_id.clone(),
            client: project.meta.client.clone(),
            code: project.settings.code.clone(),
        },
        seismic: params,
        wall_lines,
    })
}
