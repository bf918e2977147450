//! # Shear Wall CLI Application
//!
//! Command-line front end for the shear wall line design engine.
//!
//! ```text
//! shearwall design building.swd                 # all wall lines, built-in tables
//! shearwall design building.swd --wall-line X/Line-A --json
//! shearwall design building.swd --shear-walls walls.csv --tie-downs rods.csv -o report.json
//! shearwall validate building.swd
//! shearwall tables
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG`; `-v` raises the default
//! level to info, `-vv` to debug.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shearwall_core::calculations::{design_project, DesignReport, WallLineDesign};
use shearwall_core::errors::{CalcError, CalcResult};
use shearwall_core::file_io::{load_project, load_shear_wall_table, load_tie_down_table, save_report};
use shearwall_core::project::Project;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shearwall")]
#[command(about = "Seismic shear wall line design - assembly, tie-down and drift", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design every wall line of a project (or one with --wall-line)
    Design {
        /// Path to the .swd project file
        project_path: PathBuf,
        /// Shear wall capacity table CSV (defaults to the built-in library)
        #[arg(long)]
        shear_walls: Option<PathBuf>,
        /// Tie-down capacity table CSV (defaults to the built-in library)
        #[arg(long)]
        tie_downs: Option<PathBuf>,
        /// Design only this wall line (`X/Line-A`, or a unique name)
        #[arg(long)]
        wall_line: Option<String>,
        /// Save the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the JSON report instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Validate a project file without designing
    Validate {
        /// Path to the .swd project file
        project_path: PathBuf,
    },
    /// Print the capacity tables in use
    Tables {
        /// Shear wall capacity table CSV
        #[arg(long)]
        shear_walls: Option<PathBuf>,
        /// Tie-down capacity table CSV
        #[arg(long)]
        tie_downs: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Design {
            project_path,
            shear_walls,
            tie_downs,
            wall_line,
            output,
            json,
        } => cmd_design(
            &project_path,
            shear_walls.as_deref(),
            tie_downs.as_deref(),
            wall_line.as_deref(),
            output.as_deref(),
            json,
        ),
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Tables { shear_walls, tie_downs } => cmd_tables(shear_walls.as_deref(), tie_downs.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "shearwall_core=warn",
        1 => "shearwall_core=info",
        _ => "shearwall_core=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_design(
    project_path: &Path,
    shear_walls: Option<&Path>,
    tie_downs: Option<&Path>,
    wall_line: Option<&str>,
    output: Option<&Path>,
    json: bool,
) -> CalcResult<()> {
    let mut project = load_project(project_path)?;
    if let Some(key) = wall_line {
        project = only_wall_line(project, key)?;
    }
    let walls = load_shear_wall_table(shear_walls)?;
    let rods = load_tie_down_table(tie_downs)?;

    tracing::info!(
        job_id = %project.meta.job_id,
        wall_lines = project.wall_lines.len(),
        "designing"
    );
    let report = design_project(&project, &walls, &rods)?;

    if let Some(path) = output {
        save_report(&report, path)?;
        tracing::info!(path = %path.display(), "report saved");
    }

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        println!("{}", text);
    } else {
        print_report(&report);
        if let Some(path) = output {
            println!("Report saved to {}", path.display());
        }
    }
    Ok(())
}

fn only_wall_line(mut project: Project, key: &str) -> CalcResult<Project> {
    let label = project
        .find_wall_line(key)
        .map(|l| l.label())
        .ok_or_else(|| CalcError::invalid_input("--wall-line", key, "No such wall line (or name is ambiguous)"))?;
    project.wall_lines.retain(|l| l.label() == label);
    Ok(project)
}

fn cmd_validate(project_path: &Path) -> CalcResult<()> {
    let project = load_project(project_path)?;
    project.validate()?;

    println!("Project is valid: {}", project_path.display());
    println!("  Job:        {} ({})", project.meta.job_id, project.meta.client);
    println!("  Engineer:   {}", project.meta.engineer);
    println!("  Stories:    {}", project.building.story_count());
    println!("  Wall lines: {}", project.wall_lines.len());
    for line in &project.wall_lines {
        println!("    - {} ({:.1} ft nominal, {} walls)", line.label(), line.wall_length_ft, line.walls_per_line);
    }
    Ok(())
}

fn cmd_tables(shear_walls: Option<&Path>, tie_downs: Option<&Path>) -> CalcResult<()> {
    let walls = load_shear_wall_table(shear_walls)?;
    let rods = load_tie_down_table(tie_downs)?;

    rule("SHEAR WALL ASSEMBLIES");
    println!("  {:<8} {:>8} {:>8} {:>7} {:>5} {:>5}  {}", "ID", "LRFD", "Ga", "Panel", "Nail", "Spc", "Model tag");
    println!("  {:<8} {:>8} {:>8}", "", "(klf)", "(k/in)");
    for row in walls.rows() {
        println!(
            "  {:<8} {:>8.3} {:>8.1} {:>7} {:>5} {:>5}  {}",
            row.id,
            row.lrfd_klf,
            row.ga_kips_per_in,
            row.panel_thickness.code(),
            row.nail_size.code(),
            row.nail_spacing.0,
            row.model_tag.as_deref().unwrap_or("-")
        );
    }
    println!();
    rule("TIE-DOWN RODS");
    println!("  {:<8} {:>10} {:>8}", "ID", "Cap (k)", "Ae (in²)");
    for row in rods.rows() {
        println!("  {:<8} {:>10.1} {:>8.3}", row.id, row.capacity_kips, row.area_in2);
    }
    Ok(())
}

fn print_report(report: &DesignReport) {
    let s = &report.seismic;
    rule("SEISMIC DESIGN PARAMETERS");
    println!("  Job:    {} ({}), {}", report.job.job_id, report.job.client, report.job.code);
    println!("  Fa = {:.3}   Fv = {:.3}", s.fa, s.fv);
    println!("  SDS = {:.3}  SD1 = {:.3}", s.sds, s.sd1);
    println!("  T = {:.3} s  k = {:.3}  Cs = {:.4}", s.period_s, s.k, s.cs);
    println!("  V = {:.2} kips", s.base_shear_kips);
    println!();

    for design in &report.wall_lines {
        print_wall_line(design);
    }
}

fn print_wall_line(design: &WallLineDesign) {
    rule(&format!("WALL LINE {}", design.wall_line));
    println!("  Governing length: {:.1} ft", design.governing_length_ft);
    let first: Vec<String> = design.first_pass_lengths_ft.iter().map(|l| format!("{:.1}", l)).collect();
    println!("  First pass:       [{}] ft", first.join(", "));
    if design.passes > 1 {
        println!("  Passes at governing length: {}", design.passes);
    }
    println!();

    println!("  Shear walls:");
    println!(
        "  {:>5} {:<8} {:>8} {:>8} {:>8} {:>6} {:>7}  {}",
        "Level", "ID", "LRFD", "Ga", "Drift", "D/C", "L (ft)", "Model tag"
    );
    for (row, floor) in design.shear_walls.iter().zip(&design.floors) {
        println!(
            "  {:>5} {:<8} {:>8.3} {:>8.1} {:>7.3}\" {:>6.3} {:>7.1}  {} {}",
            row.level,
            row.assembly_id,
            row.lrfd_klf,
            row.ga_kips_per_in,
            row.drift_in,
            row.dc_ratio,
            row.wall_length_ft,
            row.model_tag.as_deref().unwrap_or("-"),
            status_icon(floor.drift.passes && row.dc_ratio <= 1.0)
        );
    }
    println!();

    println!("  Tie-downs:");
    println!("  {:>5} {:<8} {:>10} {:>10} {:>6}", "Level", "ID", "Cap (k)", "Elong", "D/C");
    for row in &design.tie_downs {
        println!(
            "  {:>5} {:<8} {:>10.1} {:>9.4}\" {:>6.3} {}",
            row.level,
            row.assembly_id,
            row.capacity_kips,
            row.elongation_in,
            row.dc_ratio,
            status_icon(row.dc_ratio <= 1.0)
        );
    }
    println!();
}

fn rule(title: &str) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
