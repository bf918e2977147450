//! # ASCE 7-16 Seismic Coefficients
//!
//! Site coefficients, period and response-coefficient rules used by the
//! Equivalent Lateral Force procedure.
//!
//! ## Overview
//!
//! ```text
//! SMS = Fa·Ss      SM1 = Fv·S1
//! SDS = ⅔·SMS      SD1 = ⅔·SM1
//! Ta  = Cu·Ct·hnˣ
//! Cs  = SDS / (R/Ie), bounded per 12.8-3 .. 12.8-6
//! Fx  = Cvx·V,  Cvx = wx·hxᵏ / Σ wi·hiᵏ
//! ```
//!
//! The piecewise tables are stored as breakpoint lists and evaluated by
//! linear interpolation with flat extrapolation at both ends, which keeps
//! every coefficient continuous at its segment boundaries.

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

// ============================================================================
// ASCE 7 Section References
// ============================================================================

/// ASCE 7-16 section references for the quantities computed here.
pub mod asce_ref {
    /// Short-period site coefficient Fa
    pub const FA: &str = "ASCE 7-16 Table 11.4-1";
    /// Long-period site coefficient Fv
    pub const FV: &str = "ASCE 7-16 Table 11.4-2";
    /// Design spectral accelerations SDS / SD1
    pub const DESIGN_SPECTRUM: &str = "ASCE 7-16 11.4.4";
    /// Upper limit coefficient Cu
    pub const CU: &str = "ASCE 7-16 Table 12.8-1";
    /// Approximate period parameters Ct and x
    pub const CT_X: &str = "ASCE 7-16 Table 12.8-2";
    /// Seismic response coefficient
    pub const CS: &str = "ASCE 7-16 12.8.1.1";
    /// Vertical distribution of seismic forces
    pub const VERTICAL_DISTRIBUTION: &str = "ASCE 7-16 12.8.3";
    /// Story drift determination
    pub const STORY_DRIFT: &str = "ASCE 7-16 12.8.6";
    /// Three-term shear wall deflection
    pub const WALL_DEFLECTION: &str = "SDPWS-2015 Eq. 4.3-1";
}

/// Ct for "all other structural systems" (Table 12.8-2)
pub const CT: f64 = 0.02;

/// x for "all other structural systems" (Table 12.8-2)
pub const X: f64 = 0.75;

// ============================================================================
// Site Class
// ============================================================================

/// Site class per ASCE 7-16 Chapter 20.
///
/// Parsed from the project file as a single letter. Anything outside A-E is
/// a configuration error; site class F needs a site response analysis and is
/// not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SiteClass {
    /// Hard rock
    A,
    /// Rock
    B,
    /// Very dense soil and soft rock
    C,
    /// Stiff soil
    D,
    /// Soft clay soil
    E,
}

impl SiteClass {
    /// All supported site classes
    pub const ALL: [SiteClass; 5] = [
        SiteClass::A,
        SiteClass::B,
        SiteClass::C,
        SiteClass::D,
        SiteClass::E,
    ];

    /// Single-letter code
    pub fn code(&self) -> &'static str {
        match self {
            SiteClass::A => "A",
            SiteClass::B => "B",
            SiteClass::C => "C",
            SiteClass::D => "D",
            SiteClass::E => "E",
        }
    }

    /// Parse a site class, tolerating whitespace and lower case.
    pub fn parse(s: &str) -> Result<Self, CalcError> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(SiteClass::A),
            "B" => Ok(SiteClass::B),
            "C" => Ok(SiteClass::C),
            "D" => Ok(SiteClass::D),
            "E" => Ok(SiteClass::E),
            _ => Err(CalcError::invalid_input(
                "site_class",
                s,
                "Site class must be one of A, B, C, D, E",
            )),
        }
    }

    /// Short-period site coefficient Fa for a mapped Ss.
    pub fn fa(&self, ss: f64) -> f64 {
        match self {
            SiteClass::A => 0.8,
            SiteClass::B => 1.0,
            SiteClass::C => interpolate(ss, &[(0.5, 1.2), (1.0, 1.0)]),
            SiteClass::D => interpolate(ss, &[(0.25, 1.6), (0.75, 1.2), (1.25, 1.0)]),
            SiteClass::E => interpolate(ss, &[(0.25, 2.5), (0.5, 1.7), (0.75, 1.2), (1.0, 0.9)]),
        }
    }

    /// Long-period site coefficient Fv for a mapped S1.
    pub fn fv(&self, s1: f64) -> f64 {
        match self {
            SiteClass::A => 0.8,
            SiteClass::B => 1.0,
            SiteClass::C => interpolate(s1, &[(0.1, 1.7), (0.5, 1.3)]),
            SiteClass::D => interpolate(s1, &[(0.1, 2.4), (0.2, 2.0), (0.4, 1.6), (0.5, 1.5)]),
            SiteClass::E => interpolate(s1, &[(0.1, 3.5), (0.2, 3.2), (0.4, 2.4)]),
        }
    }
}

impl TryFrom<String> for SiteClass {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SiteClass::parse(&value)
    }
}

impl From<SiteClass> for String {
    fn from(site: SiteClass) -> Self {
        site.code().to_string()
    }
}

impl std::fmt::Display for SiteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Site Class {}", self.code())
    }
}

// ============================================================================
// Coefficient Functions
// ============================================================================

/// Design spectral accelerations (SMS, SM1, SDS, SD1).
pub fn design_accelerations(ss: f64, s1: f64, fa: f64, fv: f64) -> (f64, f64, f64, f64) {
    let sms = fa * ss;
    let sm1 = fv * s1;
    (sms, sm1, 2.0 / 3.0 * sms, 2.0 / 3.0 * sm1)
}

/// Coefficient for upper limit on calculated period, Cu.
pub fn cu_coefficient(sd1: f64) -> f64 {
    interpolate(sd1, &[(0.1, 1.7), (0.15, 1.6), (0.2, 1.5), (0.3, 1.4)])
}

/// Upper-bound approximate period Tu = Cu·Ct·hnˣ, hn in feet.
pub fn approximate_period(cu: f64, hn_ft: f64) -> f64 {
    cu * CT * hn_ft.powf(X)
}

/// Seismic response coefficient Cs.
///
/// The upper bound is applied first, then the two lower bounds in order,
/// so a large S1 can lift Cs back above the period cap.
pub fn seismic_response_coefficient(
    sds: f64,
    sd1: f64,
    s1: f64,
    period: f64,
    tl: f64,
    r: f64,
    ie: f64,
) -> f64 {
    let r_ie = r / ie;
    let mut cs = sds / r_ie;

    let upper = if period <= tl {
        sd1 / (period * r_ie)
    } else {
        sd1 * tl / (period.powi(2) * r_ie)
    };
    if cs > upper {
        cs = upper;
    }

    let lower = (0.044 * sds * ie).max(0.01);
    if cs < lower {
        cs = lower;
    }

    if s1 >= 0.6 {
        let near_fault = 0.5 * s1 / r_ie;
        if cs < near_fault {
            cs = near_fault;
        }
    }

    cs
}

/// Vertical distribution exponent k.
pub fn k_exponent(period: f64) -> f64 {
    interpolate(period, &[(0.5, 1.0), (2.5, 2.0)])
}

/// Piecewise-linear lookup with flat extrapolation outside the breakpoints.
///
/// Breakpoints must be sorted by x.
fn interpolate(x: f64, points: &[(f64, f64)]) -> f64 {
    let Some(&(x0, y0)) = points.first() else {
        return 0.0;
    };
    if x <= x0 {
        return y0;
    }
    for pair in points.windows(2) {
        let (xa, ya) = pair[0];
        let (xb, yb) = pair[1];
        if x <= xb {
            return ya + (yb - ya) * (x - xa) / (xb - xa);
        }
    }
    points.last().map(|&(_, y)| y).unwrap_or(y0)
}
