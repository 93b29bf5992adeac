//! # Engineering Constants
//!
//! Physical constants, default design criteria, and the supported
//! requirement bounds used throughout the calculation engine.
//!
//! All calculations run in a consistent N/mm/MPa unit system:
//!
//! ```text
//! force   N          moment   N·mm
//! length  mm         stress   MPa = N/mm²
//! mass    kg         area     mm² (member) / m² (panel)
//! ```

// ============================================================================
// Physical Constants
// ============================================================================

/// Standard gravitational acceleration (m/s²)
pub const GRAVITY_MS2: f64 = 9.81;

/// Air density at standard conditions (kg/m³).
///
/// Gives the familiar dynamic pressure form q = 0.613·v² Pa.
pub const AIR_DENSITY_KG_M3: f64 = 1.226;

/// Drag coefficient for a flat gate panel normal to the wind
pub const DRAG_COEFFICIENT: f64 = 1.2;

/// Density of structural steel (kg/m³)
pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

// ============================================================================
// Default Design Criteria
// ============================================================================

/// Default safety factor applied to overturning and allowable stress
pub const DEFAULT_SAFETY_FACTOR: f64 = 2.5;

/// Default gust/exposure factor (exposure C, no topographic effects)
pub const DEFAULT_GUST_FACTOR: f64 = 1.0;

/// Default deflection limit denominator: allowable = span / ratio
pub const DEFAULT_DEFLECTION_LIMIT_RATIO: f64 = 240.0;

/// Default practical ceiling on counterweight mass (kg)
pub const DEFAULT_MAX_COUNTERWEIGHT_KG: f64 = 20_000.0;

/// Default optimization iteration budget
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Largest accepted iteration budget override
pub const MAX_ITERATION_BUDGET: u32 = 100;

/// Counterweight arm lengthening step per iteration, as a fraction of
/// gate width
pub const COUNTERWEIGHT_ARM_STEP_RATIO: f64 = 0.05;

/// Practical upper bound on the counterweight arm, as a fraction of
/// gate width
pub const MAX_COUNTERWEIGHT_ARM_RATIO: f64 = 0.45;

/// Counterweight above this multiple of gate weight draws an advisory note
pub const COUNTERWEIGHT_ADVISORY_RATIO: f64 = 2.0;

/// Wind speeds above this draw an advisory note (m/s)
pub const WIND_SPEED_ADVISORY_MS: f64 = 50.0;

// ============================================================================
// Supported Requirement Bounds
// ============================================================================

/// Minimum supported gate width (mm)
pub const MIN_GATE_WIDTH_MM: f64 = 3_000.0;
/// Maximum supported gate width (mm)
pub const MAX_GATE_WIDTH_MM: f64 = 20_000.0;
/// Minimum supported gate height (mm)
pub const MIN_GATE_HEIGHT_MM: f64 = 1_500.0;
/// Maximum supported gate height (mm)
pub const MAX_GATE_HEIGHT_MM: f64 = 5_000.0;

/// Safety factor override bounds
pub const MIN_SAFETY_FACTOR: f64 = 2.0;
pub const MAX_SAFETY_FACTOR: f64 = 3.0;

/// Deflection limit ratio override bounds
pub const MIN_DEFLECTION_LIMIT_RATIO: f64 = 120.0;
pub const MAX_DEFLECTION_LIMIT_RATIO: f64 = 480.0;

// ============================================================================
// Unit Conversions
// ============================================================================

/// Millimeters per meter
pub const MM_PER_M: f64 = 1000.0;

/// Square millimeters per square meter
pub const MM2_PER_M2: f64 = 1.0e6;

/// Pascals per megapascal
pub const PA_PER_MPA: f64 = 1.0e6;

/// Convert a mass in kilograms to a gravity force in newtons
pub fn kg_to_n(mass_kg: f64) -> f64 {
    mass_kg * GRAVITY_MS2
}

/// Convert a gravity force in newtons to the equivalent mass in kilograms
pub fn n_to_kg(force_n: f64) -> f64 {
    force_n / GRAVITY_MS2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_pressure_coefficient() {
        // 0.5 * rho_air must reproduce the 0.613 coefficient
        assert!((0.5 * AIR_DENSITY_KG_M3 - 0.613).abs() < 1e-9);
    }

    #[test]
    fn test_mass_force_round_trip() {
        let mass = 3456.0;
        assert!((n_to_kg(kg_to_n(mass)) - mass).abs() < 1e-9);
    }
}
