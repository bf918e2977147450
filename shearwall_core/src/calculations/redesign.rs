//! # Drift Redesign Loop
//!
//! Drives one story of one wall line to a design that passes the drift
//! check. Each iteration evaluates the full pipeline (demand, wall and
//! tie-down selection, drift) at the current [`RedesignState`] and then
//! takes one of these transitions:
//!
//! ```text
//! Initial ──► evaluate ──► drift ok ─────────────────────────────► Converged
//!                 │
//!                 ├── D/C ≤ 0.7, strongest row, or no stronger
//!                 │   qualifying row ─────────► EscalateLength (L += 0.5 ft)
//!                 ├── otherwise ──────────────► EscalateCandidate (next row up)
//!                 └── no feasible row ────────► EscalateLength, or
//!                                               Infeasible past the length bound
//! ```
//!
//! A length escalation resets the candidate to the cheapest row and sets
//! the redesign flag, which adds the redesign allowance to the length used
//! for demand on every later evaluation.
//!
//! The loop is bounded by [`RedesignLimits`]. Hitting a bound ends with
//! [`CalcError::NonConvergence`], unless the last evaluation itself found no
//! feasible row, in which case that [`CalcError::InfeasibleSelection`] is
//! returned.

use serde::{Deserialize, Serialize};

use super::anchorage::{select_tie_down, TieDownChoice};
use super::assembly::{select_assembly, AssemblyChoice, Candidate, SelectionOptions};
use super::drift::{self, DriftCheck, DriftInput};
use super::seismic::{calculate_wall_line_demand, BuildingGeometry, SeismicDesignParameters, StoryDemand};
use super::wall_line::WallLine;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{ShearWallTable, TieDownTable};

/// Wall length added per length escalation (ft)
pub const LENGTH_INCREMENT_FT: f64 = 0.5;

/// Assemblies at or below this D/C are not binding; a stronger one won't help
pub const NON_BINDING_DC: f64 = 0.7;

/// Where the controller is, or where it goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Initial,
    EscalateCandidate,
    EscalateLength,
    Converged,
    Infeasible,
}

/// Trial point of the loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedesignState {
    pub wall_length_ft: f64,
    pub candidate: Candidate,
    /// Wall length has been escalated at least once
    pub redesigned: bool,
}

impl RedesignState {
    /// Cheapest candidate at a starting length
    pub fn initial(wall_length_ft: f64) -> Self {
        RedesignState {
            wall_length_ft,
            candidate: Candidate::Cheapest,
            redesigned: false,
        }
    }

    /// Same length, the qualifying row just above the current choice
    pub fn escalate_candidate(&self, current: &AssemblyChoice) -> Self {
        RedesignState {
            candidate: current.next_candidate(),
            ..*self
        }
    }

    /// Longer wall, back to the cheapest row
    pub fn escalate_length(&self) -> Self {
        RedesignState {
            wall_length_ft: self.wall_length_ft + LENGTH_INCREMENT_FT,
            candidate: Candidate::Cheapest,
            redesigned: true,
        }
    }
}

/// Bounds on the redesign loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedesignLimits {
    /// Evaluations per story before giving up
    pub max_iterations: usize,
    /// Longest wall the loop may try (ft)
    pub max_wall_length_ft: f64,
}

impl Default for RedesignLimits {
    fn default() -> Self {
        RedesignLimits {
            max_iterations: 1000,
            max_wall_length_ft: 100.0,
        }
    }
}

impl RedesignLimits {
    pub fn validate(&self) -> CalcResult<()> {
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "settings.limits.max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        if !(self.max_wall_length_ft > 1.0) {
            return Err(CalcError::invalid_input(
                "settings.limits.max_wall_length_ft",
                self.max_wall_length_ft.to_string(),
                "Maximum wall length must exceed 1 ft",
            ));
        }
        Ok(())
    }
}

/// Everything a wall line evaluation reads. Building-level seismic
/// parameters do not depend on wall length and are computed once.
#[derive(Debug, Clone, Copy)]
pub struct DesignContext<'a> {
    pub params: &'a SeismicDesignParameters,
    pub building: &'a BuildingGeometry,
    pub line: &'a WallLine,
    pub shear_walls: &'a ShearWallTable,
    pub tie_downs: &'a TieDownTable,
}

/// One story evaluated at one trial state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDesign {
    pub level: usize,
    pub state: RedesignState,
    pub demand: StoryDemand,
    pub assembly: AssemblyChoice,
    pub tie_down: TieDownChoice,
    pub drift: DriftCheck,
}

/// Converged design plus the path the loop took to reach it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedesignOutcome {
    pub design: FloorDesign,
    pub final_state: RedesignState,
    pub iterations: usize,
    /// Drift of every successful evaluation (in)
    pub drift_history: Vec<f64>,
    /// Trial wall length of every evaluation (ft)
    pub length_history: Vec<f64>,
    /// `Initial`, the transitions taken, then `Converged`
    pub transitions: Vec<ControllerState>,
}

/// Evaluate the full pipeline for story `story_index` at `state`.
pub fn evaluate_floor(ctx: &DesignContext<'_>, story_index: usize, state: &RedesignState) -> CalcResult<FloorDesign> {
    let line = ctx.line;
    let demand = calculate_wall_line_demand(ctx.params, ctx.building, line, state.wall_length_ft, state.redesigned)?;
    let story = *demand.stories.get(story_index).ok_or_else(|| {
        CalcError::invalid_input(
            "story_index",
            story_index.to_string(),
            format!("Building has {} stories", demand.stories.len()),
        )
    })?;

    let options = SelectionOptions {
        dc_multiplier: line.overrides.wall_dc_ratio.get(),
        detailing: line.material.detailing,
    };
    let assembly = select_assembly(story.unit_shear_klf, story.level, ctx.shear_walls, &options, state.candidate)?;
    let tie_down = select_tie_down(
        story.tension_kips,
        story.story_height_ft,
        story.level,
        ctx.tie_downs,
        line.overrides.tie_down_dc_ratio.get(),
    )?;

    let drift = drift::calculate(&DriftInput {
        story_height_ft: story.story_height_ft,
        wall_length_ft: state.wall_length_ft,
        story_force_per_wall_kips: story.story_force_per_wall_kips,
        tension_kips: story.tension_kips,
        chord_area_in2: line.chord_area_in2.get(story_index).copied().unwrap_or(0.0),
        e_psi: line.material.e_psi,
        initial_moisture_content: line.material.initial_moisture_content,
        final_moisture_content: line.material.final_moisture_content,
        take_up_in: line.take_up_in.get(story_index).copied().unwrap_or(0.0),
        rod_elongation_in: tie_down.elongation_in,
        ga_kips_per_in: assembly.assembly.ga_kips_per_in,
        cd: ctx.params.cd,
        ie: ctx.params.ie,
        drift_ratio: line.overrides.drift_ratio.get().unwrap_or(line.allowable_drift_ratio),
    })?;

    Ok(FloorDesign {
        level: story.level,
        state: *state,
        demand: story,
        assembly,
        tie_down,
        drift,
    })
}

/// Next transition for an evaluated design.
pub fn decide(design: &FloorDesign, shear_walls: &ShearWallTable) -> ControllerState {
    if design.drift.passes {
        return ControllerState::Converged;
    }

    let choice = &design.assembly;
    let not_binding = choice.assembly.lrfd_klf >= choice.demand_klf / NON_BINDING_DC;
    if not_binding || shear_walls.is_strongest(choice.table_index) || !choice.has_stronger_candidate() {
        ControllerState::EscalateLength
    } else {
        ControllerState::EscalateCandidate
    }
}

/// Run the loop for story `story_index` from `start` until it converges or
/// a bound is hit.
pub fn run_redesign(
    ctx: &DesignContext<'_>,
    story_index: usize,
    start: RedesignState,
    limits: &RedesignLimits,
) -> CalcResult<RedesignOutcome> {
    let mut state = start;
    let mut drift_history = Vec::new();
    let mut length_history = Vec::new();
    let mut transitions = vec![ControllerState::Initial];
    let mut level = ctx.building.story_count().saturating_sub(story_index);

    for iteration in 1..=limits.max_iterations {
        length_history.push(state.wall_length_ft);

        let (next, advanced) = match evaluate_floor(ctx, story_index, &state) {
            Ok(design) => {
                level = design.level;
                drift_history.push(design.drift.drift_in);
                let next = decide(&design, ctx.shear_walls);
                tracing::debug!(
                    wall_line = %ctx.line.label(),
                    level,
                    iteration,
                    wall_length_ft = state.wall_length_ft,
                    assembly = %design.assembly.assembly.id,
                    drift_in = design.drift.drift_in,
                    limit_in = design.drift.limit_in,
                    ?next,
                    "redesign iteration"
                );

                match next {
                    ControllerState::Converged => {
                        transitions.push(next);
                        tracing::info!(
                            wall_line = %ctx.line.label(),
                            level,
                            iterations = iteration,
                            wall_length_ft = state.wall_length_ft,
                            "story converged"
                        );
                        return Ok(RedesignOutcome {
                            design,
                            final_state: state,
                            iterations: iteration,
                            drift_history,
                            length_history,
                            transitions,
                        });
                    }
                    ControllerState::EscalateCandidate => (next, state.escalate_candidate(&design.assembly)),
                    _ => (next, state.escalate_length()),
                }
            }
            Err(err) if err.is_infeasible_selection() => {
                tracing::debug!(
                    wall_line = %ctx.line.label(),
                    iteration,
                    wall_length_ft = state.wall_length_ft,
                    error = %err,
                    "no feasible selection, lengthening wall"
                );
                if state.wall_length_ft + LENGTH_INCREMENT_FT > limits.max_wall_length_ft {
                    tracing::warn!(
                        wall_line = %ctx.line.label(),
                        wall_length_ft = state.wall_length_ft,
                        max_wall_length_ft = limits.max_wall_length_ft,
                        "wall length bound reached with no feasible selection"
                    );
                    return Err(err.with_wall_line(ctx.line.label()));
                }
                (ControllerState::EscalateLength, state.escalate_length())
            }
            Err(err) => return Err(err),
        };

        if advanced.wall_length_ft > limits.max_wall_length_ft {
            return Err(non_convergence(ctx, level, iteration, state.wall_length_ft));
        }
        transitions.push(next);
        state = advanced;
    }

    Err(non_convergence(ctx, level, limits.max_iterations, state.wall_length_ft))
}

fn non_convergence(ctx: &DesignContext<'_>, level: usize, iterations: usize, wall_length_ft: f64) -> CalcError {
    tracing::warn!(
        wall_line = %ctx.line.label(),
        level,
        iterations,
        wall_length_ft,
        "redesign did not converge"
    );
    CalcError::NonConvergence {
        wall_line: ctx.line.label(),
        level,
        iterations,
        wall_length_ft,
    }
}
