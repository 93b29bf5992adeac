//! # Gatecalc CLI Application
//!
//! Terminal interface for cantilever slide gate design. Collects
//! requirements interactively, runs the designer, and writes the
//! design package to `output/`.
//!
//! Passing a saved design file as the first argument reviews it
//! instead of starting a new session:
//!
//! ```text
//! gate_cli output/gate_6.0x2.4m/design.json
//! ```

mod config;
mod report;

use std::io::{self, BufRead, Write};
use std::path::Path;

use gate_core::designer::{DesignRecord, DesignRequirements, GateDesigner};
use gate_core::file_io::load_design_with_lock_check;
use gate_core::materials::{InfillType, SteelGrade};

use config::{GateConfig, CONFIG_FILE};

fn main() {
    env_logger::init();

    println!("{}", "=".repeat(60));
    println!("GATECALC - Cantilever Slide Gate Design Tool");
    println!("{}", "=".repeat(60));
    println!();

    if let Some(path) = std::env::args().nth(1) {
        review_design(Path::new(&path));
        return;
    }

    let config = GateConfig::load_or_create(Path::new(CONFIG_FILE));

    let Some(requirements) = collect_requirements(&config) else {
        println!("Design cancelled.");
        return;
    };

    match GateDesigner::new().evaluate(requirements) {
        Ok(record) => {
            display_results(&record);
            write_package(&record, &config);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            std::process::exit(1);
        }
    }
}

/// Collect requirements interactively; `None` means the user cancelled
fn collect_requirements(config: &GateConfig) -> Option<DesignRequirements> {
    println!("Enter gate design requirements:");
    println!("{}", "=".repeat(40));

    let width_m = prompt_f64_bounded("Gate width (m)", 6.0, 3.0, 20.0);
    let height_m = prompt_f64_bounded("Gate height (m)", 2.4, 1.5, 5.0);
    let wind_speed_ms = prompt_f64_bounded(
        "Design wind speed (m/s)",
        config.defaults.wind_speed_ms,
        20.0,
        50.0,
    );

    println!();
    println!("Available steel grades:");
    for (i, grade) in SteelGrade::ALL.iter().enumerate() {
        println!("{}. {} - {}", i + 1, grade.code(), grade.description());
    }
    let default_grade = SteelGrade::ALL
        .iter()
        .position(|g| g.code() == config.defaults.steel_grade)
        .map(|p| p + 1)
        .unwrap_or(2);
    let grade_choice = prompt_menu_choice("Select steel grade", default_grade, SteelGrade::ALL.len());
    let steel_grade = SteelGrade::ALL[grade_choice - 1];

    println!();
    println!("Available infill types:");
    for (i, infill) in InfillType::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, infill.display_name());
    }
    let default_infill = InfillType::ALL
        .iter()
        .position(|t| *t == config.defaults.infill_type)
        .map(|p| p + 1)
        .unwrap_or(1);
    let infill_choice = prompt_menu_choice("Select infill type", default_infill, InfillType::ALL.len());
    let infill_type = InfillType::ALL[infill_choice - 1];

    let mut requirements = DesignRequirements::new(
        width_m * 1000.0,
        height_m * 1000.0,
        wind_speed_ms,
        steel_grade.code(),
        infill_type,
    );
    requirements.criteria = config.criteria;

    println!();
    println!("{}", "=".repeat(40));
    println!("DESIGN REQUIREMENTS SUMMARY");
    println!("{}", "=".repeat(40));
    println!("Gate Size:   {:.1}m x {:.1}m", width_m, height_m);
    println!("Steel Grade: {}", steel_grade.display_name());
    println!("Infill Type: {}", infill_type.display_name());
    println!("Wind Speed:  {:.1} m/s", wind_speed_ms);
    println!();

    if prompt_yes_no("Proceed with design? (y/n): ") {
        Some(requirements)
    } else {
        None
    }
}

fn display_results(record: &DesignRecord) {
    let r = &record.result;
    let g = &record.geometry;

    println!();
    println!("═══════════════════════════════════════");
    println!("  GATE DESIGN RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Geometry ({} reference):", record.reference_model);
    println!("  Cantilever:  {:.1} m", g.cantilever_length_mm / 1000.0);
    println!("  Track:       {:.1} m", g.track_length_mm / 1000.0);
    println!("  CW Arm:      {:.2} m", g.counterweight_arm_mm / 1000.0);
    println!("  Bottom Rail: {}", g.members.bottom_rail);
    println!();
    println!("Loads:");
    println!("  Gate Weight:   {:.1} kg", r.gate_weight_kg);
    println!("  Wind Load:     {:.1} N", r.wind_load_n);
    println!("  Overturning:   {:.2} kN·m", r.overturning_moment_nmm / 1.0e6);
    println!("  Counterweight: {:.1} kg", r.counterweight_kg);
    println!();
    println!("Track Loads:");
    println!("  Front Wheel:   {:.1} N", r.track_loads.front_wheel_load_n);
    println!("  Rear Wheel:    {:.1} N", r.track_loads.rear_wheel_load_n);
    println!("  Horizontal:    {:.1} N", r.track_loads.horizontal_load_n);
    println!();
    println!("Capacity Checks:");
    println!(
        "  Bending:    {:.2} ({:.1}/{:.1} MPa) {}",
        r.bending_unity,
        r.bending_stress_mpa,
        r.allowable_stress_mpa,
        status_icon(r.bending_unity <= 1.0)
    );
    println!(
        "  Deflection: {:.2} ({:.1}/{:.1} mm) {}",
        r.deflection_unity,
        r.deflection_mm,
        r.allowable_deflection_mm,
        status_icon(r.deflection_unity <= 1.0)
    );
    println!(
        "  CW Ceiling: {:.2} ({:.0}/{:.0} kg) {}",
        r.counterweight_unity(),
        r.counterweight_kg,
        r.counterweight_limit_kg,
        status_icon(r.counterweight_kg <= r.counterweight_limit_kg)
    );
    println!();
    if !record.notes.is_empty() {
        println!("Design Notes:");
        for note in &record.notes {
            println!("  - {note}");
        }
        println!();
    }
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} (governs: {})",
        record.verdict,
        r.governing_condition()
    );
    println!("═══════════════════════════════════════");
}

fn write_package(record: &DesignRecord, config: &GateConfig) {
    match report::write_package(record, Path::new(&config.output_directory), config) {
        Ok(dir) => {
            println!();
            println!("{}", "=".repeat(60));
            println!("DESIGN COMPLETED SUCCESSFULLY!");
            println!("{}", "=".repeat(60));
            println!("Output files saved to: {}", dir.display());
            println!();
            println!("Generated files:");
            println!("- design.json");
            if config.output.generate_calculations {
                println!("- calculation_summary.txt");
            }
            if config.output.generate_specifications {
                println!("- material_list.json");
                println!("- specifications.txt");
            }
            if config.output.generate_drawings {
                println!("- drawings/general_arrangement.txt");
            }
        }
        Err(e) => {
            eprintln!("Error writing design package: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a summary of a previously saved design file
fn review_design(path: &Path) {
    match load_design_with_lock_check(path) {
        Ok((saved, lock)) => {
            println!("Reviewing {}", path.display());
            println!("Saved at: {}", saved.saved_at.format("%Y-%m-%d %H:%M UTC"));
            if let Some(info) = lock {
                println!(
                    "Currently locked by {} ({}) since {}",
                    info.locked_by, info.machine, info.locked_at
                );
            }
            display_results(&saved.record);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt_f64_bounded(prompt: &str, default: f64, min: f64, max: f64) -> f64 {
    loop {
        print!("{} [{:.1}]: ", prompt, default);
        if io::stdout().flush().is_err() {
            return default;
        }
        let Some(input) = read_line_trimmed() else {
            return default;
        };
        if input.is_empty() {
            return default;
        }
        match parse_f64_bounded(&input, min, max) {
            Ok(value) => return value,
            Err(message) => println!("{message}"),
        }
    }
}

/// Parse a prompt reply against bounds; `Err` carries the re-prompt message
fn parse_f64_bounded(input: &str, min: f64, max: f64) -> Result<f64, String> {
    match input.parse::<f64>() {
        Ok(value) if !value.is_finite() => Err("Please enter a valid number.".to_string()),
        Ok(value) if value < min => Err(format!("Value must be >= {min}")),
        Ok(value) if value > max => Err(format!("Value must be <= {max}")),
        Ok(value) => Ok(value),
        Err(_) => Err("Please enter a valid number.".to_string()),
    }
}

fn prompt_menu_choice(prompt: &str, default: usize, count: usize) -> usize {
    loop {
        print!("{} [{}]: ", prompt, default);
        if io::stdout().flush().is_err() {
            return default;
        }
        let Some(input) = read_line_trimmed() else {
            return default;
        };
        if input.is_empty() {
            return default;
        }
        match input.parse::<usize>() {
            Ok(value) if (1..=count).contains(&value) => return value,
            Ok(_) => println!("Value must be 1-{count}"),
            Err(_) => println!("Please enter a valid integer."),
        }
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    print!("{prompt}");
    if io::stdout().flush().is_err() {
        return false;
    }
    matches!(
        read_line_trimmed().map(|s| s.to_lowercase()).as_deref(),
        Some("y" | "yes")
    )
}

/// Read one line from stdin; `None` on EOF or a read error
fn read_line_trimmed() -> Option<String> {
    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input.trim().to_string()),
        Err(_) => None,
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_bounded_accepts_in_range() {
        assert_eq!(parse_f64_bounded("6.0", 3.0, 20.0), Ok(6.0));
        assert_eq!(parse_f64_bounded("3.0", 3.0, 20.0), Ok(3.0));
        assert_eq!(parse_f64_bounded("20", 3.0, 20.0), Ok(20.0));
    }

    #[test]
    fn test_parse_f64_bounded_rejects_out_of_range() {
        assert!(parse_f64_bounded("2.9", 3.0, 20.0).is_err());
        assert!(parse_f64_bounded("20.1", 3.0, 20.0).is_err());
        assert!(parse_f64_bounded("six", 3.0, 20.0).is_err());
    }

    #[test]
    fn test_parse_f64_bounded_rejects_non_finite() {
        // f64::from_str accepts these spellings; the prompt must not
        assert!(parse_f64_bounded("nan", 3.0, 20.0).is_err());
        assert!(parse_f64_bounded("NaN", 3.0, 20.0).is_err());
        assert!(parse_f64_bounded("inf", 3.0, 20.0).is_err());
        assert!(parse_f64_bounded("-inf", 3.0, 20.0).is_err());
    }
}
