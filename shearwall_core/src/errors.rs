//! # Error Types
//!
//! Structured error types for shearwall_core. A design run can fail in three
//! distinct ways and each has its own variant:
//!
//! - bad configuration (`InvalidInput`, `MissingField`)
//! - no capacity-table row can carry the demand (`InfeasibleSelection`)
//! - the redesign loop hit its iteration or length bound (`NonConvergence`)
//!
//! ## Example
//!
//! ```rust
//! use shearwall_core::errors::{CalcError, CalcResult};
//!
//! fn validate_wall_length(length_ft: f64) -> CalcResult<()> {
//!     if length_ft <= 1.0 {
//!         return Err(CalcError::invalid_input(
//!             "wall_length_ft",
//!             length_ft.to_string(),
//!             "Wall length must exceed 1 ft",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for shearwall_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Which capacity table a selection failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionComponent {
    /// Shear wall assembly table (unit shear, klf)
    ShearWall,
    /// Tie-down table (tension, kips)
    TieDown,
}

impl std::fmt::Display for SelectionComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionComponent::ShearWall => write!(f, "shear wall"),
            SelectionComponent::TieDown => write!(f, "tie-down"),
        }
    }
}

/// Structured error type for design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unknown code, wrong length)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// No row of a capacity table satisfies the demand
    #[error("No feasible {component} at level {level}{}: demand {demand:.3} exceeds {reason}", wall_line_suffix(.wall_line))]
    InfeasibleSelection {
        component: SelectionComponent,
        level: usize,
        demand: f64,
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wall_line: Option<String>,
    },

    /// The redesign loop exceeded its iteration or wall-length bound
    #[error("Redesign did not converge for '{wall_line}' level {level} after {iterations} iterations (wall length {wall_length_ft} ft)")]
    NonConvergence {
        wall_line: String,
        level: usize,
        iterations: usize,
        wall_length_ft: f64,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON / CSV parse error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InfeasibleSelection error
    pub fn infeasible(
        component: SelectionComponent,
        level: usize,
        demand: f64,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InfeasibleSelection {
            component,
            level,
            demand,
            reason: reason.into(),
            wall_line: None,
        }
    }

    /// Attach the wall line to a selection failure; other errors pass through.
    pub fn with_wall_line(self, label: impl Into<String>) -> Self {
        match self {
            CalcError::InfeasibleSelection {
                component,
                level,
                demand,
                reason,
                ..
            } => CalcError::InfeasibleSelection {
                component,
                level,
                demand,
                reason,
                wall_line: Some(label.into()),
            },
            other => other,
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when a longer wall could make this failure go away.
    pub fn is_infeasible_selection(&self) -> bool {
        matches!(self, CalcError::InfeasibleSelection { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InfeasibleSelection { .. } => "INFEASIBLE_SELECTION",
            CalcError::NonConvergence { .. } => "NON_CONVERGENCE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

fn wall_line_suffix(wall_line: &Option<String>) -> String {
    wall_line
        .as_ref()
        .map(|line| format!(" of '{}'", line))
        .unwrap_or_default()
}
