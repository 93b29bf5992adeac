//! # Cantilever Gate Structural Calculation
//!
//! Analyzes a cantilever slide gate panel in the closed position per
//! simplified hand-calculation methods.
//!
//! ## Assumptions
//!
//! - Gate frame is a welded rectangle: top rail, bottom rail, two end
//!   posts; the bottom rail doubles as the cantilever chord and is the
//!   critical member for bending and deflection
//! - Wind acts normal to the panel as a uniform pressure with its
//!   resultant at mid-height
//! - Self-weight acts at the cantilever mid-length for overturning
//! - Counterweight is solved algebraically from moment balance
//! - All checks run in a consistent N/mm/MPa unit system
//!
//! ## Example
//!
//! ```rust
//! use gate_core::calculations::cantilever::{calculate, DesignCriteria, FrameMembers, GateGeometry};
//! use gate_core::materials::{InfillType, SectionCatalog, SteelGrade};
//!
//! let geometry = GateGeometry {
//!     width_mm: 6000.0,
//!     height_mm: 2400.0,
//!     cantilever_length_mm: 3000.0,
//!     track_length_mm: 9000.0,
//!     counterweight_arm_mm: 1800.0,
//!     frame_depth_mm: 200.0,
//!     members: FrameMembers::uniform("HSS130x130x5"),
//!     infill: InfillType::ChainLink,
//! };
//!
//! let material = SteelGrade::A572Grade50.properties();
//! let criteria = DesignCriteria::default();
//! let result = calculate(&geometry, &material, SectionCatalog::builtin(), 33.5, &criteria).unwrap();
//!
//! println!("Gate weight: {:.0} kg", result.gate_weight_kg);
//! println!("Wind load: {:.0} N", result.wind_load_n);
//! println!("Counterweight: {:.0} kg", result.counterweight_kg);
//! println!("Pass: {}", result.passes());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    kg_to_n, n_to_kg, AIR_DENSITY_KG_M3, DEFAULT_DEFLECTION_LIMIT_RATIO, DEFAULT_GUST_FACTOR,
    DEFAULT_MAX_COUNTERWEIGHT_KG, DEFAULT_SAFETY_FACTOR, DRAG_COEFFICIENT,
    MAX_DEFLECTION_LIMIT_RATIO, MAX_SAFETY_FACTOR, MIN_DEFLECTION_LIMIT_RATIO, MIN_SAFETY_FACTOR,
    MM2_PER_M2,
};
use crate::errors::{DesignError, DesignResult};
use crate::materials::{InfillType, SectionCatalog, SteelProperties};

/// Frame member roles mapped to catalog section labels
///
/// The gate frame carries one section label per role; the reference
/// design starts all roles at the same section and the optimization
/// loop steps up only the critical member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMembers {
    /// Top rail section label (runs the gate width)
    pub top_rail: String,
    /// Bottom rail / cantilever chord section label (critical member)
    pub bottom_rail: String,
    /// End post section label (two posts, one per end)
    pub vertical_post: String,
}

impl FrameMembers {
    /// All roles on the same section, as the reference designs specify
    pub fn uniform(label: impl Into<String>) -> Self {
        let label = label.into();
        FrameMembers {
            top_rail: label.clone(),
            bottom_rail: label.clone(),
            vertical_post: label,
        }
    }

    /// Label of the critical member for bending and deflection checks
    pub fn critical_member(&self) -> &str {
        &self.bottom_rail
    }
}

/// Candidate gate geometry produced by reference scaling
///
/// Lengths are in mm. `members` maps frame roles to section labels in
/// the standard catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateGeometry {
    /// Clear opening width (mm)
    pub width_mm: f64,
    /// Panel height (mm)
    pub height_mm: f64,
    /// Cantilever overhang length (mm)
    pub cantilever_length_mm: f64,
    /// Total track length (mm)
    pub track_length_mm: f64,
    /// Counterweight arm from the support pivot (mm)
    pub counterweight_arm_mm: f64,
    /// Truss depth of the tail frame (mm)
    pub frame_depth_mm: f64,
    /// Frame member sections by role
    pub members: FrameMembers,
    /// Panel infill
    pub infill: InfillType,
}

impl GateGeometry {
    /// Guard against non-physical dimensions.
    ///
    /// The Gate Designer validates requirements before scaling, so
    /// this is a defensive contract for direct calculator callers.
    pub fn validate_physical(&self) -> DesignResult<()> {
        let dims = [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("cantilever_length_mm", self.cantilever_length_mm),
            ("track_length_mm", self.track_length_mm),
            ("counterweight_arm_mm", self.counterweight_arm_mm),
            ("frame_depth_mm", self.frame_depth_mm),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(DesignError::invalid_geometry(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Gross panel area (m²)
    pub fn panel_area_m2(&self) -> f64 {
        self.width_mm * self.height_mm / MM2_PER_M2
    }

    /// Frame member runs as (section label, total length in mm) pairs
    pub fn member_runs(&self) -> [(&str, f64); 3] {
        [
            (self.members.top_rail.as_str(), self.width_mm),
            (self.members.bottom_rail.as_str(), self.width_mm),
            (self.members.vertical_post.as_str(), 2.0 * self.height_mm),
        ]
    }

    /// Total frame member length (mm), the full perimeter for a
    /// rectangular frame
    pub fn frame_length_mm(&self) -> f64 {
        self.member_runs().iter().map(|(_, l)| l).sum()
    }
}

/// Acceptance criteria and load factors for one calculation pass
///
/// All fields are optional overrides in a requirements JSON; defaults
/// follow the configured code-derived limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignCriteria {
    /// Safety factor on overturning and allowable stress (2.0-3.0)
    pub safety_factor: f64,
    /// Gust/exposure factor on wind pressure
    pub gust_factor: f64,
    /// Deflection limit denominator: allowable = span / ratio
    pub deflection_limit_ratio: f64,
    /// Practical ceiling on counterweight mass (kg)
    pub max_counterweight_kg: f64,
}

impl Default for DesignCriteria {
    fn default() -> Self {
        DesignCriteria {
            safety_factor: DEFAULT_SAFETY_FACTOR,
            gust_factor: DEFAULT_GUST_FACTOR,
            deflection_limit_ratio: DEFAULT_DEFLECTION_LIMIT_RATIO,
            max_counterweight_kg: DEFAULT_MAX_COUNTERWEIGHT_KG,
        }
    }
}

impl DesignCriteria {
    /// Validate override values against their documented ranges.
    pub fn validate(&self) -> DesignResult<()> {
        if !(MIN_SAFETY_FACTOR..=MAX_SAFETY_FACTOR).contains(&self.safety_factor) {
            return Err(DesignError::invalid_input(
                "safety_factor",
                self.safety_factor.to_string(),
                format!("Safety factor must be {MIN_SAFETY_FACTOR}-{MAX_SAFETY_FACTOR}"),
            ));
        }
        if !self.gust_factor.is_finite() || self.gust_factor <= 0.0 || self.gust_factor > 2.0 {
            return Err(DesignError::invalid_input(
                "gust_factor",
                self.gust_factor.to_string(),
                "Gust factor must be in (0, 2.0]",
            ));
        }
        if !(MIN_DEFLECTION_LIMIT_RATIO..=MAX_DEFLECTION_LIMIT_RATIO)
            .contains(&self.deflection_limit_ratio)
        {
            return Err(DesignError::invalid_input(
                "deflection_limit_ratio",
                self.deflection_limit_ratio.to_string(),
                format!(
                    "Deflection limit ratio must be {MIN_DEFLECTION_LIMIT_RATIO}-{MAX_DEFLECTION_LIMIT_RATIO}"
                ),
            ));
        }
        if !self.max_counterweight_kg.is_finite() || self.max_counterweight_kg <= 0.0 {
            return Err(DesignError::invalid_input(
                "max_counterweight_kg",
                self.max_counterweight_kg.to_string(),
                "Counterweight ceiling must be positive",
            ));
        }
        Ok(())
    }
}

/// Overturning moment components about the support pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CantileverMoments {
    /// Self-weight eccentricity moment (N·mm)
    pub dead_moment_nmm: f64,
    /// Wind resultant moment (N·mm)
    pub wind_moment_nmm: f64,
    /// Total overturning moment (N·mm)
    pub total_moment_nmm: f64,
}

/// Wheel and guide reactions at the support trucks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackLoads {
    /// Front wheel vertical reaction (N)
    pub front_wheel_load_n: f64,
    /// Rear wheel vertical reaction including counterweight (N)
    pub rear_wheel_load_n: f64,
    /// Horizontal guide load (N)
    pub horizontal_load_n: f64,
}

/// Results from one calculation pass
///
/// All quantities are derived; re-run [`calculate`] with changed
/// inputs to get different values.
///
/// ## JSON Example
///
/// ```json
/// {
///   "gate_weight_kg": 689.7,
///   "gate_weight_n": 6766.0,
///   "wind_pressure_pa": 687.9,
///   "wind_load_n": 11887.6,
///   "dead_moment_nmm": 10148935.0,
///   "wind_moment_nmm": 14265116.0,
///   "overturning_moment_nmm": 24414051.0,
///   "counterweight_n": 33908.4,
///   "counterweight_kg": 3456.5,
///   "counterweight_limit_kg": 20000.0,
///   "bending_stress_mpa": 101.2,
///   "allowable_stress_mpa": 138.0,
///   "bending_unity": 0.73,
///   "deflection_mm": 8.75,
///   "allowable_deflection_mm": 12.5,
///   "deflection_unity": 0.70
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    // === Weights ===
    /// Total gate mass: frame members plus infill (kg)
    pub gate_weight_kg: f64,
    /// Gate weight as a gravity force (N)
    pub gate_weight_n: f64,

    // === Wind ===
    /// Dynamic pressure q = 0.5·ρ·v² (Pa)
    pub wind_pressure_pa: f64,
    /// Wind resultant on the solid-equivalent panel area (N)
    pub wind_load_n: f64,

    // === Moments ===
    /// Self-weight eccentricity moment (N·mm)
    pub dead_moment_nmm: f64,
    /// Wind resultant moment (N·mm)
    pub wind_moment_nmm: f64,
    /// Total overturning moment about the support (N·mm)
    pub overturning_moment_nmm: f64,

    // === Counterweight ===
    /// Required counterweight force from moment balance (N)
    pub counterweight_n: f64,
    /// Required counterweight mass (kg)
    pub counterweight_kg: f64,
    /// Practical ceiling the counterweight is checked against (kg)
    pub counterweight_limit_kg: f64,

    // === Track Reactions ===
    /// Wheel and guide reactions
    pub track_loads: TrackLoads,

    // === Bending Check ===
    /// Critical member section label
    pub critical_section: String,
    /// Dead-load bending stress M/S on the critical member (MPa)
    pub bending_stress_mpa: f64,
    /// Allowable stress Fy / SF (MPa)
    pub allowable_stress_mpa: f64,
    /// Bending unity check: actual / allowable, ≤ 1.0 passes
    pub bending_unity: f64,

    // === Deflection Check ===
    /// Cantilever tip deflection (mm)
    pub deflection_mm: f64,
    /// Allowable deflection: cantilever span / limit ratio (mm)
    pub allowable_deflection_mm: f64,
    /// Deflection unity check: actual / allowable, ≤ 1.0 passes
    pub deflection_unity: f64,

    // === Section Properties (for reference) ===
    /// Critical member section modulus (mm³)
    pub section_modulus_mm3: f64,
    /// Critical member moment of inertia (mm⁴)
    pub moment_of_inertia_mm4: f64,
}

impl CalculationResult {
    /// Check if all adequacy conditions pass
    pub fn passes(&self) -> bool {
        self.bending_unity <= 1.0
            && self.deflection_unity <= 1.0
            && self.counterweight_kg <= self.counterweight_limit_kg
    }

    /// Counterweight demand over its practical ceiling
    pub fn counterweight_unity(&self) -> f64 {
        self.counterweight_kg / self.counterweight_limit_kg
    }

    /// Get the governing (highest) unity ratio
    pub fn governing_unity(&self) -> f64 {
        self.bending_unity
            .max(self.deflection_unity)
            .max(self.counterweight_unity())
    }

    /// Get a description of what governs the design
    pub fn governing_condition(&self) -> &'static str {
        let cw = self.counterweight_unity();
        if self.bending_unity >= self.deflection_unity && self.bending_unity >= cw {
            "Bending"
        } else if self.deflection_unity >= cw {
            "Deflection"
        } else {
            "Counterweight"
        }
    }
}

/// Total gate weight: frame members plus infill (N)
///
/// Frame weight sums cross-sectional area × run length × density over
/// every member role; infill weight is panel area × areal density.
pub fn gate_weight_n(
    geometry: &GateGeometry,
    material: &SteelProperties,
    catalog: &SectionCatalog,
) -> DesignResult<f64> {
    geometry.validate_physical()?;
    if material.density_kg_m3 <= 0.0 {
        return Err(DesignError::invalid_material(format!(
            "Density must be positive, got {}",
            material.density_kg_m3
        )));
    }

    let mut frame_mass_kg = 0.0;
    for (label, length_mm) in geometry.member_runs() {
        let section = catalog.lookup(label)?;
        // mm² × mm × kg/m³ / 1e9 = kg
        frame_mass_kg += section.area_mm2 * length_mm * material.density_kg_m3 / 1.0e9;
    }

    let infill_mass_kg = geometry.panel_area_m2() * geometry.infill.areal_weight_kg_m2();

    Ok(kg_to_n(frame_mass_kg + infill_mass_kg))
}

/// Dynamic wind pressure q = 0.5·ρ_air·v² (Pa)
pub fn wind_pressure_pa(wind_speed_ms: f64) -> f64 {
    0.5 * AIR_DENSITY_KG_M3 * wind_speed_ms.powi(2)
}

/// Wind resultant on the gate panel (N)
///
/// q × gust factor × drag coefficient × solid-equivalent panel area.
pub fn wind_load_n(geometry: &GateGeometry, wind_speed_ms: f64, gust_factor: f64) -> DesignResult<f64> {
    geometry.validate_physical()?;
    if !wind_speed_ms.is_finite() || wind_speed_ms <= 0.0 {
        return Err(DesignError::invalid_input(
            "wind_speed_ms",
            wind_speed_ms.to_string(),
            "Wind speed must be positive",
        ));
    }

    let effective_area_m2 = geometry.panel_area_m2() * geometry.infill.solidity_ratio();
    Ok(wind_pressure_pa(wind_speed_ms) * gust_factor * DRAG_COEFFICIENT * effective_area_m2)
}

/// Overturning moment components about the support pivot
///
/// Self-weight acts at half the cantilever length; the wind resultant
/// acts at half the panel height.
pub fn cantilever_moments(
    gate_weight_n: f64,
    wind_load_n: f64,
    geometry: &GateGeometry,
) -> CantileverMoments {
    let dead_moment_nmm = gate_weight_n * geometry.cantilever_length_mm / 2.0;
    let wind_moment_nmm = wind_load_n * geometry.height_mm / 2.0;
    CantileverMoments {
        dead_moment_nmm,
        wind_moment_nmm,
        total_moment_nmm: dead_moment_nmm + wind_moment_nmm,
    }
}

/// Minimum counterweight force from moment balance (N)
///
/// Solves counterweight × arm ≥ overturning moment × safety factor for
/// the counterweight; an explicit algebraic solve, not iterative.
pub fn required_counterweight_n(
    total_moment_nmm: f64,
    counterweight_arm_mm: f64,
    safety_factor: f64,
) -> DesignResult<f64> {
    if counterweight_arm_mm <= 0.0 {
        return Err(DesignError::invalid_geometry(format!(
            "Counterweight arm must be positive, got {counterweight_arm_mm}"
        )));
    }
    if safety_factor <= 0.0 {
        return Err(DesignError::invalid_input(
            "safety_factor",
            safety_factor.to_string(),
            "Safety factor must be positive",
        ));
    }
    Ok(total_moment_nmm * safety_factor / counterweight_arm_mm)
}

/// Wheel and guide reactions at the support trucks
///
/// Front wheel carries half the gate; the rear wheel adds the full
/// counterweight force; the horizontal guide sees 10% of gate weight.
pub fn track_loads(gate_weight_n: f64, counterweight_n: f64) -> TrackLoads {
    TrackLoads {
        front_wheel_load_n: gate_weight_n / 2.0,
        rear_wheel_load_n: gate_weight_n / 2.0 + counterweight_n,
        horizontal_load_n: 0.1 * gate_weight_n,
    }
}

/// Bending stress M/S on a member (MPa)
pub fn bending_stress_mpa(moment_nmm: f64, section_modulus_mm3: f64) -> DesignResult<f64> {
    if section_modulus_mm3 <= 0.0 {
        return Err(DesignError::invalid_geometry(format!(
            "Section modulus must be positive, got {section_modulus_mm3}"
        )));
    }
    Ok(moment_nmm / section_modulus_mm3)
}

/// Cantilever tip deflection under a uniform line load (mm)
///
/// δ = w·L⁴ / (8·E·I) with w in N/mm, E in MPa, I in mm⁴.
pub fn tip_deflection_mm(
    line_load_n_mm: f64,
    cantilever_length_mm: f64,
    elastic_modulus_mpa: f64,
    moment_of_inertia_mm4: f64,
) -> DesignResult<f64> {
    if elastic_modulus_mpa <= 0.0 {
        return Err(DesignError::invalid_material(format!(
            "Elastic modulus must be positive, got {elastic_modulus_mpa}"
        )));
    }
    if moment_of_inertia_mm4 <= 0.0 {
        return Err(DesignError::invalid_geometry(format!(
            "Moment of inertia must be positive, got {moment_of_inertia_mm4}"
        )));
    }
    Ok(line_load_n_mm * cantilever_length_mm.powi(4)
        / (8.0 * elastic_modulus_mpa * moment_of_inertia_mm4))
}

/// Run a full calculation pass for a candidate geometry.
///
/// Pure and deterministic: identical inputs produce identical results.
///
/// # Arguments
///
/// * `geometry` - Candidate gate geometry (from reference scaling)
/// * `material` - Steel properties for all frame members
/// * `catalog` - Section catalog resolving member labels
/// * `wind_speed_ms` - Design wind speed (m/s)
/// * `criteria` - Safety factor, gust factor, and allowable limits
///
/// # Returns
///
/// * `Ok(CalculationResult)` - All quantities and unity checks
/// * `Err(DesignError)` - Guard failure on non-physical inputs or an
///   unknown section label
pub fn calculate(
    geometry: &GateGeometry,
    material: &SteelProperties,
    catalog: &SectionCatalog,
    wind_speed_ms: f64,
    criteria: &DesignCriteria,
) -> DesignResult<CalculationResult> {
    geometry.validate_physical()?;
    criteria.validate()?;
    if material.yield_strength_pa <= 0.0 || material.elastic_modulus_pa <= 0.0 {
        return Err(DesignError::invalid_material(format!(
            "Steel {} has non-physical strength or stiffness",
            material.grade.code()
        )));
    }

    // === Weights and Wind ===
    let weight_n = gate_weight_n(geometry, material, catalog)?;
    let wind_n = wind_load_n(geometry, wind_speed_ms, criteria.gust_factor)?;

    // === Overturning and Counterweight ===
    let moments = cantilever_moments(weight_n, wind_n, geometry);
    let counterweight_n = required_counterweight_n(
        moments.total_moment_nmm,
        geometry.counterweight_arm_mm,
        criteria.safety_factor,
    )?;

    // === Bending Check (dead-load moment on the critical member) ===
    let section = catalog.lookup(geometry.members.critical_member())?;
    let stress_mpa = bending_stress_mpa(moments.dead_moment_nmm, section.sx_mm3)?;
    let allowable_stress_mpa = material.yield_strength_mpa() / criteria.safety_factor;

    // === Deflection Check ===
    let line_load_n_mm = weight_n / geometry.width_mm;
    let deflection_mm = tip_deflection_mm(
        line_load_n_mm,
        geometry.cantilever_length_mm,
        material.elastic_modulus_mpa(),
        section.ix_mm4,
    )?;
    let allowable_deflection_mm = geometry.cantilever_length_mm / criteria.deflection_limit_ratio;

    Ok(CalculationResult {
        gate_weight_kg: n_to_kg(weight_n),
        gate_weight_n: weight_n,
        wind_pressure_pa: wind_pressure_pa(wind_speed_ms),
        wind_load_n: wind_n,
        dead_moment_nmm: moments.dead_moment_nmm,
        wind_moment_nmm: moments.wind_moment_nmm,
        overturning_moment_nmm: moments.total_moment_nmm,
        counterweight_n,
        counterweight_kg: n_to_kg(counterweight_n),
        counterweight_limit_kg: criteria.max_counterweight_kg,
        track_loads: track_loads(weight_n, counterweight_n),
        critical_section: section.label.clone(),
        bending_stress_mpa: stress_mpa,
        allowable_stress_mpa,
        bending_unity: stress_mpa / allowable_stress_mpa,
        deflection_mm,
        allowable_deflection_mm,
        deflection_unity: deflection_mm / allowable_deflection_mm,
        section_modulus_mm3: section.sx_mm3,
        moment_of_inertia_mm4: section.ix_mm4,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::SteelGrade;
    use approx::assert_relative_eq;

    /// The documented sample gate: 6.0 m x 2.4 m, 33.5 m/s, A572-50, chain link
    fn sample_geometry() -> GateGeometry {
        GateGeometry {
            width_mm: 6000.0,
            height_mm: 2400.0,
            cantilever_length_mm: 3000.0,
            track_length_mm: 9000.0,
            counterweight_arm_mm: 1800.0,
            frame_depth_mm: 200.0,
            members: FrameMembers::uniform("HSS130x130x5"),
            infill: InfillType::ChainLink,
        }
    }

    fn sample_result() -> CalculationResult {
        let material = SteelGrade::A572Grade50.properties();
        calculate(
            &sample_geometry(),
            &material,
            SectionCatalog::builtin(),
            33.5,
            &DesignCriteria::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_gate_weight() {
        // Frame: 16,800 mm of HSS130x130x5 (A = 2500 mm²) = 329.7 kg
        // Infill: 14.4 m² x 25 kg/m² = 360 kg
        let result = sample_result();
        assert_relative_eq!(result.gate_weight_kg, 689.7, epsilon = 0.1);
        assert_relative_eq!(result.gate_weight_n, 689.7 * 9.81, epsilon = 1.0);
    }

    #[test]
    fn test_wind_load() {
        // q = 0.613 x 33.5² = 687.9 Pa; F = q x 1.2 x 14.4 m²
        let result = sample_result();
        assert_relative_eq!(result.wind_pressure_pa, 687.939, epsilon = 0.01);
        assert_relative_eq!(result.wind_load_n, 11_887.6, epsilon = 1.0);
    }

    #[test]
    fn test_overturning_and_counterweight() {
        let result = sample_result();
        assert_relative_eq!(result.dead_moment_nmm, 10.149e6, epsilon = 5e3);
        assert_relative_eq!(result.wind_moment_nmm, 14.265e6, epsilon = 5e3);
        // CW = M x 2.5 / 1800 mm = 33,908 N = 3,457 kg
        assert_relative_eq!(result.counterweight_kg, 3456.5, epsilon = 1.0);
    }

    #[test]
    fn test_sample_gate_is_adequate() {
        let result = sample_result();
        assert!(result.bending_unity < 1.0);
        assert!(result.deflection_unity < 1.0);
        assert!(result.passes());
    }

    #[test]
    fn test_bending_stress_against_hand_calc() {
        // M/S = 10.149e6 / 100,320 mm³ = 101.2 MPa vs 345/2.5 = 138 allowable
        let result = sample_result();
        assert_relative_eq!(result.bending_stress_mpa, 101.2, epsilon = 0.1);
        assert_relative_eq!(result.allowable_stress_mpa, 138.0, epsilon = 1e-9);
    }

    #[test]
    fn test_deflection_against_hand_calc() {
        // w = 6766 N / 6000 mm; δ = w·L⁴/(8EI) = 8.75 mm vs 3000/240 = 12.5
        let result = sample_result();
        assert_relative_eq!(result.deflection_mm, 8.75, epsilon = 0.01);
        assert_relative_eq!(result.allowable_deflection_mm, 12.5, epsilon = 1e-9);
    }

    #[test]
    fn test_track_loads() {
        let result = sample_result();
        let w = result.gate_weight_n;
        assert_relative_eq!(result.track_loads.front_wheel_load_n, w / 2.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.track_loads.rear_wheel_load_n,
            w / 2.0 + result.counterweight_n,
            epsilon = 1e-9
        );
        assert_relative_eq!(result.track_loads.horizontal_load_n, 0.1 * w, epsilon = 1e-9);
    }

    #[test]
    fn test_wind_quadratic_in_speed() {
        let geometry = sample_geometry();
        let at_v = wind_load_n(&geometry, 20.0, 1.0).unwrap();
        let at_2v = wind_load_n(&geometry, 40.0, 1.0).unwrap();
        assert_relative_eq!(at_2v / at_v, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weight_and_wind_monotonic_in_size() {
        let material = SteelGrade::A572Grade50.properties();
        let catalog = SectionCatalog::builtin();
        let base = sample_geometry();

        let mut wider = base.clone();
        wider.width_mm = 8000.0;
        let mut taller = base.clone();
        taller.height_mm = 3000.0;

        let w_base = gate_weight_n(&base, &material, catalog).unwrap();
        let w_wider = gate_weight_n(&wider, &material, catalog).unwrap();
        let w_taller = gate_weight_n(&taller, &material, catalog).unwrap();
        assert!(w_base > 0.0);
        assert!(w_wider > w_base);
        assert!(w_taller > w_base);

        let f_base = wind_load_n(&base, 33.5, 1.0).unwrap();
        let f_wider = wind_load_n(&wider, 33.5, 1.0).unwrap();
        let f_taller = wind_load_n(&taller, 33.5, 1.0).unwrap();
        assert!(f_base > 0.0);
        assert!(f_wider > f_base);
        assert!(f_taller > f_base);
    }

    #[test]
    fn test_solidity_reduces_wind_area() {
        let mut geometry = sample_geometry();
        let solid = wind_load_n(&geometry, 33.5, 1.0).unwrap();
        geometry.infill = InfillType::ExpandedMetal;
        let mesh = wind_load_n(&geometry, 33.5, 1.0).unwrap();
        assert_relative_eq!(mesh / solid, 0.6, epsilon = 1e-9);
    }

    #[test]
    fn test_counterweight_monotonicity() {
        // Non-decreasing in moment, non-increasing in arm
        let at_m = required_counterweight_n(24.0e6, 1800.0, 2.5).unwrap();
        let at_2m = required_counterweight_n(48.0e6, 1800.0, 2.5).unwrap();
        let long_arm = required_counterweight_n(24.0e6, 2700.0, 2.5).unwrap();
        assert!(at_2m > at_m);
        assert!(long_arm < at_m);
    }

    #[test]
    fn test_guards_reject_non_physical_inputs() {
        let material = SteelGrade::A36.properties();
        let catalog = SectionCatalog::builtin();

        let mut geometry = sample_geometry();
        geometry.width_mm = 0.0;
        let err = calculate(&geometry, &material, catalog, 33.5, &DesignCriteria::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");

        assert!(wind_load_n(&sample_geometry(), -10.0, 1.0).is_err());
        assert!(required_counterweight_n(1.0e6, 0.0, 2.5).is_err());
        assert!(bending_stress_mpa(1.0e6, 0.0).is_err());
        assert!(tip_deflection_mm(1.0, 3000.0, 0.0, 1.0e6).is_err());
    }

    #[test]
    fn test_unknown_member_section() {
        let material = SteelGrade::A36.properties();
        let mut geometry = sample_geometry();
        geometry.members = FrameMembers::uniform("HSS1x1x1");
        let err = calculate(
            &geometry,
            &material,
            SectionCatalog::builtin(),
            33.5,
            &DesignCriteria::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "SECTION_NOT_FOUND");
    }

    #[test]
    fn test_criteria_validation() {
        let mut criteria = DesignCriteria::default();
        criteria.safety_factor = 1.2;
        assert!(criteria.validate().is_err());

        criteria = DesignCriteria::default();
        criteria.deflection_limit_ratio = 1000.0;
        assert!(criteria.validate().is_err());

        assert!(DesignCriteria::default().validate().is_ok());
    }

    #[test]
    fn test_determinism() {
        let a = sample_result();
        let b = sample_result();
        assert_eq!(a, b);
    }

    #[test]
    fn test_result_serialization() {
        let result = sample_result();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("gate_weight_kg"));
        assert!(json.contains("bending_unity"));
        assert!(json.contains("track_loads"));

        let roundtrip: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_relative_eq!(result.counterweight_kg, roundtrip.counterweight_kg, epsilon = 1e-9);
    }

    #[test]
    fn test_governing_condition() {
        let result = sample_result();
        // Bending unity 0.73 governs over deflection 0.70 for the sample
        assert_eq!(result.governing_condition(), "Bending");
        assert!(result.governing_unity() < 1.0);
    }
}
