//! # File I/O Module
//!
//! Handles project and report file operations:
//! - **Atomic report saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//! - **Capacity tables**: CSV files, or the built-in library when no path is given
//!
//! ## File Format
//!
//! Projects are saved as `.swd` (shear wall design) files containing JSON.
//! Reports are plain JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shearwall_core::calculations::design_project;
//! use shearwall_core::file_io::{load_project, load_shear_wall_table, load_tie_down_table, save_report};
//! use std::path::Path;
//!
//! let project = load_project(Path::new("building.swd"))?;
//! let walls = load_shear_wall_table(None)?;
//! let rods = load_tie_down_table(Some(Path::new("rods.csv")))?;
//!
//! let report = design_project(&project, &walls, &rods)?;
//! save_report(&report, Path::new("building.report.json"))?;
//! # Ok::<(), shearwall_core::errors::CalcError>(())
//! ```

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::calculations::DesignReport;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{builtin_shear_walls, builtin_tie_downs, ShearWallTable, TieDownTable};
use crate::project::{Project, SCHEMA_VERSION};

/// Save a design report to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize the report to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp over the target (atomic on most filesystems)
///
/// A failure after the temporary file exists removes it again.
pub fn save_report(report: &DesignReport, path: &Path) -> CalcResult<()> {
    write_json_atomic(report, path)
}

fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    let written = tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| ("write temp file", e))
        .and_then(|()| tmp_file.sync_all().map_err(|e| ("sync temp file", e)));
    drop(tmp_file);
    discard_on_failure(&tmp_path, written)?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "saved");
    Ok(())
}

/// Remove a temp file whose write or sync failed.
fn discard_on_failure(tmp_path: &Path, written: Result<(), (&str, io::Error)>) -> CalcResult<()> {
    written.map_err(|(operation, e)| {
        let _ = fs::remove_file(tmp_path);
        CalcError::file_error(operation, tmp_path.display().to_string(), e.to_string())
    })
}

/// `report.json` -> `report.json.tmp`
fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
///
/// The project is not validated here; call [`Project::validate`] or let
/// the design run do it.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;

    tracing::debug!(
        path = %path.display(),
        job_id = %project.meta.job_id,
        wall_lines = project.wall_lines.len(),
        "project loaded"
    );
    Ok(project)
}

/// Shear wall table from a CSV file, or the built-in library for `None`.
pub fn load_shear_wall_table(path: Option<&Path>) -> CalcResult<Cow<'static, ShearWallTable>> {
    match path {
        Some(p) => {
            let table = ShearWallTable::load_from_csv(&p.display().to_string())?;
            tracing::debug!(path = %p.display(), rows = table.len(), "shear wall table loaded");
            Ok(Cow::Owned(table))
        }
        None => builtin_shear_walls().map(Cow::Borrowed),
    }
}

/// Tie-down table from a CSV file, or the built-in library for `None`.
pub fn load_tie_down_table(path: Option<&Path>) -> CalcResult<Cow<'static, TieDownTable>> {
    match path {
        Some(p) => {
            let table = TieDownTable::load_from_csv(&p.display().to_string())?;
            tracing::debug!(path = %p.display(), rows = table.len(), "tie-down table loaded");
            Ok(Cow::Owned(table))
        }
        None => builtin_tie_downs().map(Cow::Borrowed),
    }
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(str::parse::<u32>)
        .collect::<Result<_, _>>()
        .map_err(|_| mismatch())?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::design_project;
    use crate::project::tests::sample_project;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str, ext: &str) -> PathBuf {
        temp_dir().join(format!("shearwall_test_{}_{}.{}", name, std::process::id(), ext))
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(
            tmp_path_for(Path::new("/path/to/project.swd")),
            Path::new("/path/to/project.swd.tmp")
        );
        assert_eq!(tmp_path_for(Path::new("report")), Path::new("report.tmp"));
    }

    fn write_project(project: &Project, path: &Path) {
        fs::write(path, serde_json::to_string_pretty(project).unwrap()).unwrap();
    }

    #[test]
    fn test_load_roundtrip() {
        let path = temp_path("roundtrip", "swd");

        let project = sample_project();
        write_project(&project, &path);

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded, project);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic", "json");
        let tmp_path = tmp_path_for(&path);

        let project = sample_project();
        let report = design_project(&project, builtin_shear_walls().unwrap(), builtin_tie_downs().unwrap()).unwrap();
        save_report(&report, &path).unwrap();

        assert!(!tmp_path.exists());
        let text = fs::read_to_string(&path).unwrap();
        let roundtrip: DesignReport = serde_json::from_str(&text).unwrap();
        assert_eq!(roundtrip.wall_lines.len(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_removes_tmp_file() {
        let tmp = temp_path("partial", "json.tmp");
        fs::write(&tmp, "{\"wall_lines\": [").unwrap();

        let failure = Err(("write temp file", io::Error::new(io::ErrorKind::WriteZero, "disk full")));
        let err = discard_on_failure(&tmp, failure).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(err.to_string().contains("write temp file"));
        assert!(!tmp.exists());

        assert!(discard_on_failure(&tmp, Ok(())).is_ok());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_path("newer", "swd");
        let mut project = sample_project();
        project.meta.version = "0.9.0".to_string();
        write_project(&project, &path);

        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_project(Path::new("/nonexistent/dir/project.swd")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.3").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("banana").is_err());
    }

    #[test]
    fn test_table_loaders() {
        let walls = load_shear_wall_table(None).unwrap();
        assert_eq!(walls.len(), 16);
        assert!(matches!(walls, Cow::Borrowed(_)));

        let path = temp_path("rods", "csv");
        fs::write(&path, "Assembly,Capacity(kips),Ae(in^2)\nR1,5.0,0.2\nR2,9.0,0.3\n").unwrap();
        let rods = load_tie_down_table(Some(&path)).unwrap();
        assert_eq!(rods.len(), 2);
        assert_eq!(rods.max_capacity_kips(), 9.0);
        let _ = fs::remove_file(&path);

        assert!(load_shear_wall_table(Some(Path::new("/nonexistent/walls.csv"))).is_err());
    }
}
