//! End-to-end run of the demo project shipped in `demos/`.

use std::path::PathBuf;

use shearwall_core::calculations::design_project;
use shearwall_core::file_io::{load_project, load_shear_wall_table, load_tie_down_table, save_report};
use shearwall_core::materials::NailSize;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos/sample_project.swd")
}

#[test]
fn demo_project_designs_every_line() {
    let project = load_project(&demo_path()).unwrap();
    project.validate().unwrap();

    let walls = load_shear_wall_table(None).unwrap();
    let rods = load_tie_down_table(None).unwrap();
    let report = design_project(&project, &walls, &rods).unwrap();

    assert_eq!(report.job.job_id, "25-042");
    assert_eq!(report.wall_lines.len(), 2);

    for design in &report.wall_lines {
        assert_eq!(design.shear_walls.len(), 3);
        assert_eq!(design.tie_downs.len(), 3);
        assert!(design.governing_length_ft >= 16.0);
        assert!(design.governing_length_ft <= project.settings.limits.max_wall_length_ft);
        for row in &design.shear_walls {
            assert_eq!(row.wall_length_ft, design.governing_length_ft);
        }
        for floor in &design.floors {
            assert!(floor.drift.passes);
            assert!(floor.assembly.dc_ratio <= 1.0);
            assert!(floor.tie_down.dc_ratio <= 1.0);
        }
    }

    // Z/Line-1 selects against 90% of capacity
    let z = &report.wall_lines[1];
    assert_eq!(z.wall_line, "Z/Line-1");
    for floor in &z.floors {
        assert!(floor.assembly.dc_ratio <= 0.9 + 1e-12);
    }

    // X/Line-A prefers 10d nails; the roof story needs no escalation
    let top = &report.wall_lines[0].floors[0];
    assert_eq!(top.assembly.assembly.nail_size, NailSize::D10);
    assert!(!top.assembly.detailing_fallback);
}

#[test]
fn demo_report_saves_atomically() {
    let project = load_project(&demo_path()).unwrap();
    let report = design_project(&project, &load_shear_wall_table(None).unwrap(), &load_tie_down_table(None).unwrap())
        .unwrap();

    let path = std::env::temp_dir().join(format!("shearwall_demo_report_{}.json", std::process::id()));
    save_report(&report, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"governing_length_ft\""));
    assert!(text.contains("X/Line-A"));
    let _ = std::fs::remove_file(&path);
}
