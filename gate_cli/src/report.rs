//! Design package generation.
//!
//! Writes a finished design record into an output directory named for
//! the gate size (e.g. `output/gate_6.0x2.4m/`):
//!
//! - `design.json` - the full record, saved atomically under a lock
//! - `calculation_summary.txt` - hand-check friendly result summary
//! - `material_list.json` - bill of materials
//! - `specifications.txt` - procurement specifications
//! - `drawings/general_arrangement.txt` - drawing placeholder
//!
//! All documents render from the record alone; nothing here re-runs
//! the calculation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use gate_core::designer::DesignRecord;
use gate_core::errors::{DesignError, DesignResult};
use gate_core::file_io::{save_design, FileLock};
use gate_core::materials::SectionCatalog;
use gate_core::reference::ReferenceCatalog;

use crate::config::GateConfig;

/// Unit weight of the CR135 crane rail used for the track run (kg/m)
const TRACK_RAIL_KG_M: f64 = 67.0;

/// One bill-of-materials line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialItem {
    /// What the line covers (e.g. "Bottom Rail")
    pub item: String,
    /// Size or catalog designation
    pub size: String,
    /// Total run length, where applicable (mm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<f64>,
    /// Line weight (kg)
    pub weight_kg: f64,
    /// Material designation
    pub material: String,
}

/// Write the full design package and return the package directory.
pub fn write_package(
    record: &DesignRecord,
    base_dir: &Path,
    config: &GateConfig,
) -> DesignResult<PathBuf> {
    let dir = base_dir.join(format!(
        "gate_{:.1}x{:.1}m",
        record.geometry.width_mm / 1000.0,
        record.geometry.height_mm / 1000.0
    ));
    fs::create_dir_all(&dir).map_err(|e| {
        DesignError::file_error("create package dir", dir.display().to_string(), e.to_string())
    })?;

    let design_path = dir.join("design.json");
    let lock = FileLock::acquire(&design_path, lock_holder())?;
    save_design(record, &design_path)?;
    drop(lock);

    if config.output.generate_calculations {
        write_text(&dir.join("calculation_summary.txt"), &calculation_summary(record))?;
    }

    if config.output.generate_specifications {
        write_text(&dir.join("specifications.txt"), &specifications(record))?;

        let items = material_items(record)?;
        let json = serde_json::to_string_pretty(&items).map_err(|e| {
            DesignError::SerializationError {
                reason: e.to_string(),
            }
        })?;
        write_text(&dir.join("material_list.json"), &json)?;
    }

    if config.output.generate_drawings {
        let drawings_dir = dir.join("drawings");
        fs::create_dir_all(&drawings_dir).map_err(|e| {
            DesignError::file_error(
                "create drawings dir",
                drawings_dir.display().to_string(),
                e.to_string(),
            )
        })?;
        write_text(
            &drawings_dir.join("general_arrangement.txt"),
            &general_arrangement(record),
        )?;
    }

    Ok(dir)
}

/// User identifier recorded in the design file lock
fn lock_holder() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "gatecalc".to_string())
}

fn write_text(path: &Path, contents: &str) -> DesignResult<()> {
    fs::write(path, contents).map_err(|e| {
        DesignError::file_error("write", path.display().to_string(), e.to_string())
    })
}

/// Render the calculation summary document
pub fn calculation_summary(record: &DesignRecord) -> String {
    let r = &record.result;
    let mut s = String::new();

    let _ = writeln!(s, "CANTILEVER SLIDE GATE CALCULATION SUMMARY");
    let _ = writeln!(s, "{}", "=".repeat(50));
    let _ = writeln!(s);
    let _ = writeln!(s, "Project Date: {}", Utc::now().format("%Y-%m-%d"));
    let _ = writeln!(
        s,
        "Gate Size: {:.1}m x {:.1}m",
        record.geometry.width_mm / 1000.0,
        record.geometry.height_mm / 1000.0
    );
    let _ = writeln!(s, "Steel Grade: {}", record.material.grade.display_name());
    let _ = writeln!(s, "Infill Type: {}", record.geometry.infill.display_name());
    let _ = writeln!(
        s,
        "Design Wind Speed: {:.1} m/s",
        record.requirements.wind_speed_ms
    );
    let _ = writeln!(s, "Reference Model: {}", record.reference_model);
    let _ = writeln!(s);

    let _ = writeln!(s, "STRUCTURAL RESULTS:");
    let _ = writeln!(s, "{}", "-".repeat(20));
    let _ = writeln!(s, "Gate Weight: {:.1} kg", r.gate_weight_kg);
    let _ = writeln!(s, "Wind Load: {:.1} N", r.wind_load_n);
    let _ = writeln!(
        s,
        "Overturning Moment: {:.2} kN·m",
        r.overturning_moment_nmm / 1.0e6
    );
    let _ = writeln!(
        s,
        "Counterweight: {:.1} kg (arm {:.0} mm)",
        r.counterweight_kg, record.geometry.counterweight_arm_mm
    );
    let _ = writeln!(
        s,
        "Bending Stress: {:.1} MPa (allowable {:.1} MPa, {})",
        r.bending_stress_mpa,
        r.allowable_stress_mpa,
        r.critical_section
    );
    let _ = writeln!(
        s,
        "Deflection: {:.1} mm (allowable {:.1} mm)",
        r.deflection_mm, r.allowable_deflection_mm
    );
    let _ = writeln!(s, "Front Wheel Load: {:.1} N", r.track_loads.front_wheel_load_n);
    let _ = writeln!(s, "Rear Wheel Load: {:.1} N", r.track_loads.rear_wheel_load_n);
    let _ = writeln!(s, "Horizontal Guide Load: {:.1} N", r.track_loads.horizontal_load_n);
    let _ = writeln!(s);

    let _ = writeln!(s, "DESIGN ADEQUACY:");
    let _ = writeln!(s, "{}", "-".repeat(20));
    let _ = writeln!(s, "Design Status: {}", record.verdict);
    let _ = writeln!(s, "Iterations: {}", record.iterations);
    if !record.notes.is_empty() {
        let _ = writeln!(s, "Design Notes:");
        for note in &record.notes {
            let _ = writeln!(s, "  - {note}");
        }
    }

    s
}

/// Render the procurement specifications document
pub fn specifications(record: &DesignRecord) -> String {
    let model = ReferenceCatalog::builtin().by_name(&record.reference_model);
    let mut s = String::new();

    let _ = writeln!(s, "CANTILEVER SLIDE GATE SPECIFICATIONS");
    let _ = writeln!(s, "{}", "=".repeat(40));
    let _ = writeln!(s);

    let _ = writeln!(s, "GENERAL REQUIREMENTS:");
    let _ = writeln!(s, "- Gate shall be cantilever slide type");
    let _ = writeln!(s, "- All steel shall be hot-dip galvanized");
    let _ = writeln!(s, "- Gate shall operate smoothly with minimal force");
    let _ = writeln!(s, "- Design shall comply with local building codes");
    let _ = writeln!(s);

    let _ = writeln!(s, "MATERIALS:");
    let _ = writeln!(s, "- Steel Grade: {}", record.material.grade.display_name());
    let _ = writeln!(s, "- Infill Type: {}", record.geometry.infill.display_name());
    let _ = writeln!(s, "- Hardware: Stainless steel where exposed");
    let _ = writeln!(s, "- Finish: Hot-dip galvanized per ASTM A123");
    let _ = writeln!(s);

    if let Some(model) = model {
        let _ = writeln!(s, "GATE SYSTEM:");
        let _ = writeln!(s, "- Track: {}", model.track_system);
        let _ = writeln!(s, "- Counterweight: {}", model.counterweight_system);
        let _ = writeln!(s);
    }

    let _ = writeln!(s, "PERFORMANCE REQUIREMENTS:");
    let _ = writeln!(
        s,
        "- Design Wind Speed: {:.1} m/s",
        record.requirements.wind_speed_ms
    );
    let _ = writeln!(s, "- Operating Temperature: -40°C to +60°C");
    let _ = writeln!(s, "- Service Life: 25 years minimum");
    let _ = writeln!(s, "- Maintenance: Annual inspection required");

    s
}

/// Render the general arrangement placeholder
pub fn general_arrangement(record: &DesignRecord) -> String {
    let g = &record.geometry;
    let mut s = String::new();

    let _ = writeln!(s, "CANTILEVER SLIDE GATE GENERAL ARRANGEMENT");
    let _ = writeln!(s, "{}", "=".repeat(40));
    let _ = writeln!(s);
    let _ = writeln!(
        s,
        "Gate Dimensions: {:.1}m x {:.1}m",
        g.width_mm / 1000.0,
        g.height_mm / 1000.0
    );
    let _ = writeln!(s, "Cantilever Length: {:.1}m", g.cantilever_length_mm / 1000.0);
    let _ = writeln!(s, "Track Length: {:.1}m", g.track_length_mm / 1000.0);
    let _ = writeln!(s, "Counterweight Arm: {:.1}m", g.counterweight_arm_mm / 1000.0);
    let _ = writeln!(s, "Frame Depth: {:.0} mm", g.frame_depth_mm);
    let _ = writeln!(s);
    let _ = writeln!(s, "Frame Members:");
    let _ = writeln!(s, "  Top Rail:    {}", g.members.top_rail);
    let _ = writeln!(s, "  Bottom Rail: {}", g.members.bottom_rail);
    let _ = writeln!(s, "  End Posts:   {}", g.members.vertical_post);

    s
}

/// Build the bill of materials for a finished design
pub fn material_items(record: &DesignRecord) -> DesignResult<Vec<MaterialItem>> {
    let catalog = SectionCatalog::builtin();
    let g = &record.geometry;
    let grade = record.material.grade.code().to_string();

    let frame_runs = [
        ("Top Rail", g.members.top_rail.as_str(), g.width_mm),
        ("Bottom Rail", g.members.bottom_rail.as_str(), g.width_mm),
        ("End Posts (2)", g.members.vertical_post.as_str(), 2.0 * g.height_mm),
    ];

    let mut items = Vec::new();
    for (role, label, length_mm) in frame_runs {
        let section = catalog.lookup(label)?;
        items.push(MaterialItem {
            item: role.to_string(),
            size: section.label.clone(),
            length_mm: Some(length_mm),
            weight_kg: section.weight_kg_m * length_mm / 1000.0,
            material: grade.clone(),
        });
    }

    items.push(MaterialItem {
        item: "Track Rail".to_string(),
        size: "CR135".to_string(),
        length_mm: Some(g.track_length_mm),
        weight_kg: TRACK_RAIL_KG_M * g.track_length_mm / 1000.0,
        material: grade.clone(),
    });

    items.push(MaterialItem {
        item: "Infill Panel".to_string(),
        size: g.infill.display_name().to_string(),
        length_mm: None,
        weight_kg: g.panel_area_m2() * g.infill.areal_weight_kg_m2(),
        material: g.infill.display_name().to_string(),
    });

    let counterweight_system = ReferenceCatalog::builtin()
        .by_name(&record.reference_model)
        .map(|m| m.counterweight_system.clone())
        .unwrap_or_else(|| "Stacked steel plates".to_string());
    let counterweight_material = if counterweight_system.to_lowercase().contains("concrete") {
        "Concrete"
    } else {
        "Steel"
    };
    items.push(MaterialItem {
        item: "Counterweight".to_string(),
        size: counterweight_system,
        length_mm: None,
        weight_kg: record.result.counterweight_kg,
        material: counterweight_material.to_string(),
    });

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_core::designer::{DesignRequirements, GateDesigner};
    use gate_core::materials::InfillType;
    use std::env::temp_dir;

    fn sample_record() -> DesignRecord {
        let requirements =
            DesignRequirements::new(6_000.0, 2_400.0, 33.5, "A572_50", InfillType::ChainLink);
        GateDesigner::new().evaluate(requirements).unwrap()
    }

    #[test]
    fn test_material_items() {
        let items = material_items(&sample_record()).unwrap();
        assert_eq!(items.len(), 6);

        let top_rail = &items[0];
        assert_eq!(top_rail.size, "HSS130x130x5");
        // 6 m of 19.625 kg/m
        assert!((top_rail.weight_kg - 117.75).abs() < 0.01);

        let infill = items.iter().find(|i| i.item == "Infill Panel").unwrap();
        assert!((infill.weight_kg - 360.0).abs() < 0.01);

        let counterweight = items.iter().find(|i| i.item == "Counterweight").unwrap();
        assert_eq!(counterweight.material, "Steel");
        assert!((counterweight.weight_kg - 3456.5).abs() < 1.0);
    }

    #[test]
    fn test_calculation_summary_contents() {
        let summary = calculation_summary(&sample_record());
        assert!(summary.contains("Gate Size: 6.0m x 2.4m"));
        assert!(summary.contains("Design Status: ADEQUATE"));
        assert!(summary.contains("Gate Weight: 689.7 kg"));
        assert!(summary.contains("ASTM A572 Grade 50"));
    }

    #[test]
    fn test_specifications_contents() {
        let spec = specifications(&sample_record());
        assert!(spec.contains("hot-dip galvanized"));
        assert!(spec.contains("Enclosed track"));
        assert!(spec.contains("Design Wind Speed: 33.5 m/s"));
    }

    #[test]
    fn test_write_package() {
        let base = temp_dir().join("gatecalc_test_report_pkg");
        let _ = fs::remove_dir_all(&base);

        let dir = write_package(&sample_record(), &base, &GateConfig::default()).unwrap();
        assert_eq!(dir, base.join("gate_6.0x2.4m"));

        assert!(dir.join("design.json").exists());
        assert!(dir.join("calculation_summary.txt").exists());
        assert!(dir.join("material_list.json").exists());
        assert!(dir.join("specifications.txt").exists());
        assert!(dir.join("drawings/general_arrangement.txt").exists());
        // Lock released after the save
        assert!(!dir.join("design.json.lock").exists());

        let bom: Vec<MaterialItem> =
            serde_json::from_str(&fs::read_to_string(dir.join("material_list.json")).unwrap())
                .unwrap();
        assert_eq!(bom.len(), 6);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_output_flags_skip_documents() {
        let base = temp_dir().join("gatecalc_test_report_flags");
        let _ = fs::remove_dir_all(&base);

        let mut config = GateConfig::default();
        config.output.generate_drawings = false;
        config.output.generate_specifications = false;

        let dir = write_package(&sample_record(), &base, &config).unwrap();
        assert!(dir.join("design.json").exists());
        assert!(dir.join("calculation_summary.txt").exists());
        assert!(!dir.join("specifications.txt").exists());
        assert!(!dir.join("drawings").exists());

        let _ = fs::remove_dir_all(&base);
    }
}
