//! # Gate Designer
//!
//! Turns a set of design requirements into a finished design record.
//! The designer validates the requirements, scales a reference model
//! to the requested opening, evaluates the candidate through the
//! structural calculator, and runs a bounded optimization loop when
//! the first pass is inadequate.
//!
//! ## Optimization Loop
//!
//! One corrective adjustment per iteration, in fixed priority order:
//!
//! 1. Bending stress over allowable: step the bottom rail up to the
//!    next standard section. Ladder exhausted ends the loop.
//! 2. Counterweight over its ceiling: lengthen the counterweight arm
//!    by 5% of width, up to 45% of width. Arm at the cap ends the
//!    loop.
//! 3. Anything else (deflection): no standard adjustment corrects it,
//!    so the loop ends with a NEEDS_REVISION verdict.
//!
//! The iteration budget is a hard cap on calculation passes. A design
//! that stays inadequate still produces a complete record with notes
//! explaining each adjustment, so the caller can see why.
//!
//! ## Example
//!
//! ```rust
//! use gate_core::designer::{DesignRequirements, GateDesigner};
//! use gate_core::materials::InfillType;
//!
//! let requirements =
//!     DesignRequirements::new(6000.0, 2400.0, 33.5, "A572_50", InfillType::ChainLink);
//!
//! let record = GateDesigner::new().evaluate(requirements).unwrap();
//!
//! assert!(record.verdict.is_adequate());
//! println!("Counterweight: {:.0} kg", record.result.counterweight_kg);
//! for note in &record.notes {
//!     println!("  {note}");
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::cantilever::{
    calculate, CalculationResult, DesignCriteria, GateGeometry,
};
use crate::constants::{
    COUNTERWEIGHT_ADVISORY_RATIO, COUNTERWEIGHT_ARM_STEP_RATIO, DEFAULT_MAX_ITERATIONS,
    MAX_COUNTERWEIGHT_ARM_RATIO, MAX_GATE_HEIGHT_MM, MAX_GATE_WIDTH_MM, MAX_ITERATION_BUDGET,
    MIN_GATE_HEIGHT_MM, MIN_GATE_WIDTH_MM, WIND_SPEED_ADVISORY_MS,
};
use crate::errors::{DesignError, DesignResult};
use crate::materials::{get_steel_properties, InfillType, SectionCatalog, SteelProperties};
use crate::reference::ReferenceCatalog;

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

/// What the caller wants built
///
/// Owned by the caller and never mutated; the designer copies it into
/// the final record. `criteria` and `max_iterations` may be omitted
/// from a requirements JSON and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRequirements {
    /// Clear opening width (mm), supported range 3,000-20,000
    pub gate_width_mm: f64,
    /// Panel height (mm), supported range 1,500-5,000
    pub gate_height_mm: f64,
    /// Design wind speed (m/s)
    pub wind_speed_ms: f64,
    /// Steel grade name, e.g. "A572_50" (flexible spelling accepted)
    pub steel_grade: String,
    /// Panel infill
    pub infill_type: InfillType,
    /// Safety factor, gust factor, and allowable-limit overrides
    #[serde(default)]
    pub criteria: DesignCriteria,
    /// Hard cap on calculation passes
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl DesignRequirements {
    /// Requirements with default criteria and iteration budget
    pub fn new(
        gate_width_mm: f64,
        gate_height_mm: f64,
        wind_speed_ms: f64,
        steel_grade: impl Into<String>,
        infill_type: InfillType,
    ) -> Self {
        DesignRequirements {
            gate_width_mm,
            gate_height_mm,
            wind_speed_ms,
            steel_grade: steel_grade.into(),
            infill_type,
            criteria: DesignCriteria::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Validate against the supported bounds.
    ///
    /// Fails fast with a descriptive error; nothing is calculated for
    /// out-of-range requirements.
    pub fn validate(&self) -> DesignResult<()> {
        if !self.gate_width_mm.is_finite()
            || !(MIN_GATE_WIDTH_MM..=MAX_GATE_WIDTH_MM).contains(&self.gate_width_mm)
        {
            return Err(DesignError::invalid_input(
                "gate_width_mm",
                self.gate_width_mm.to_string(),
                format!("Gate width must be {MIN_GATE_WIDTH_MM:.0}-{MAX_GATE_WIDTH_MM:.0} mm"),
            ));
        }
        if !self.gate_height_mm.is_finite()
            || !(MIN_GATE_HEIGHT_MM..=MAX_GATE_HEIGHT_MM).contains(&self.gate_height_mm)
        {
            return Err(DesignError::invalid_input(
                "gate_height_mm",
                self.gate_height_mm.to_string(),
                format!("Gate height must be {MIN_GATE_HEIGHT_MM:.0}-{MAX_GATE_HEIGHT_MM:.0} mm"),
            ));
        }
        if !self.wind_speed_ms.is_finite() || self.wind_speed_ms <= 0.0 {
            return Err(DesignError::invalid_input(
                "wind_speed_ms",
                self.wind_speed_ms.to_string(),
                "Wind speed must be positive",
            ));
        }
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATION_BUDGET {
            return Err(DesignError::invalid_input(
                "max_iterations",
                self.max_iterations.to_string(),
                format!("Iteration budget must be 1-{MAX_ITERATION_BUDGET}"),
            ));
        }
        self.criteria.validate()
    }
}

/// Adequacy verdict for a finished design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdequacyVerdict {
    /// Every check passed; the design can go to detailing
    Adequate,
    /// One or more checks still fail; the notes say which and why
    NeedsRevision,
}

impl AdequacyVerdict {
    pub fn is_adequate(&self) -> bool {
        matches!(self, AdequacyVerdict::Adequate)
    }
}

impl fmt::Display for AdequacyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdequacyVerdict::Adequate => write!(f, "ADEQUATE"),
            AdequacyVerdict::NeedsRevision => write!(f, "NEEDS_REVISION"),
        }
    }
}

/// The designer's final artifact
///
/// Immutable after `evaluate` returns; reporting renders it without
/// further core calls. Identical requirements always produce an
/// identical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRecord {
    /// The requirements this design answers
    pub requirements: DesignRequirements,
    /// Name of the reference model the geometry was scaled from
    pub reference_model: String,
    /// Accepted geometry, including any loop adjustments
    pub geometry: GateGeometry,
    /// Steel properties used for every member
    pub material: SteelProperties,
    /// Last calculation pass
    pub result: CalculationResult,
    /// Adequacy verdict
    pub verdict: AdequacyVerdict,
    /// Calculation passes consumed
    pub iterations: u32,
    /// Ordered notes accumulated across iterations
    pub notes: Vec<String>,
}

impl DesignRecord {
    pub fn is_adequate(&self) -> bool {
        self.verdict.is_adequate()
    }
}

/// Orchestrates reference scaling, calculation, and the optimization
/// loop
///
/// Stateless between requests; one designer may serve any number of
/// `evaluate` calls, including from multiple threads.
#[derive(Debug, Clone)]
pub struct GateDesigner {
    sections: SectionCatalog,
    references: ReferenceCatalog,
}

impl Default for GateDesigner {
    fn default() -> Self {
        GateDesigner::new()
    }
}

impl GateDesigner {
    /// Designer over the builtin section and reference catalogs
    pub fn new() -> Self {
        GateDesigner {
            sections: SectionCatalog::builtin().clone(),
            references: ReferenceCatalog::builtin().clone(),
        }
    }

    /// Designer over custom catalogs
    pub fn with_catalogs(sections: SectionCatalog, references: ReferenceCatalog) -> Self {
        GateDesigner {
            sections,
            references,
        }
    }

    /// Produce a design record for the given requirements.
    ///
    /// # Returns
    ///
    /// * `Ok(DesignRecord)` - Complete record, verdict ADEQUATE or
    ///   NEEDS_REVISION
    /// * `Err(DesignError)` - Out-of-bounds requirements or an unknown
    ///   grade/section; no partial record is produced
    pub fn evaluate(&self, requirements: DesignRequirements) -> DesignResult<DesignRecord> {
        requirements.validate()?;
        let material = get_steel_properties(&requirements.steel_grade)?;
        let model = self.references.for_width(requirements.gate_width_mm)?;

        log::info!(
            "Evaluating {:.0} x {:.0} mm gate, wind {:.1} m/s, grade {}",
            requirements.gate_width_mm,
            requirements.gate_height_mm,
            requirements.wind_speed_ms,
            material.grade.code()
        );

        let mut geometry = model.scale(
            requirements.gate_width_mm,
            requirements.gate_height_mm,
            requirements.infill_type,
        );

        let mut notes = vec![format!(
            "Scaled {} reference model to {:.0} x {:.0} mm opening",
            model.name, requirements.gate_width_mm, requirements.gate_height_mm
        )];
        if requirements.wind_speed_ms > WIND_SPEED_ADVISORY_MS {
            notes.push(format!(
                "Wind speed {:.1} m/s exceeds {WIND_SPEED_ADVISORY_MS:.1} m/s; verify site exposure data",
                requirements.wind_speed_ms
            ));
        }

        let arm_cap_mm = MAX_COUNTERWEIGHT_ARM_RATIO * geometry.width_mm;
        let arm_step_mm = COUNTERWEIGHT_ARM_STEP_RATIO * geometry.width_mm;

        let mut iterations = 0u32;
        let result = loop {
            let result = calculate(
                &geometry,
                &material,
                &self.sections,
                requirements.wind_speed_ms,
                &requirements.criteria,
            )?;
            iterations += 1;
            log::debug!(
                "Iteration {}: {} governs at unity {:.2}",
                iterations,
                result.governing_condition(),
                result.governing_unity()
            );

            if result.passes() {
                break result;
            }
            if iterations >= requirements.max_iterations {
                notes.push(format!(
                    "Iteration budget of {} exhausted; design remains inadequate",
                    requirements.max_iterations
                ));
                break result;
            }

            // One corrective adjustment per iteration, stress first
            if result.bending_unity > 1.0 {
                match self.sections.next_size_up(geometry.members.critical_member())? {
                    Some(next) => {
                        notes.push(format!(
                            "Iteration {}: bending stress {:.1} MPa exceeds allowable {:.1} MPa; upsized bottom rail {} to {}",
                            iterations,
                            result.bending_stress_mpa,
                            result.allowable_stress_mpa,
                            geometry.members.bottom_rail,
                            next.label
                        ));
                        geometry.members.bottom_rail = next.label.clone();
                    }
                    None => {
                        notes.push(format!(
                            "Iteration {}: bending stress {:.1} MPa exceeds allowable {:.1} MPa; no standard section larger than {}",
                            iterations,
                            result.bending_stress_mpa,
                            result.allowable_stress_mpa,
                            geometry.members.bottom_rail
                        ));
                        break result;
                    }
                }
            } else if result.counterweight_kg > result.counterweight_limit_kg {
                let next_arm_mm = (geometry.counterweight_arm_mm + arm_step_mm).min(arm_cap_mm);
                if next_arm_mm > geometry.counterweight_arm_mm {
                    notes.push(format!(
                        "Iteration {}: counterweight {:.0} kg exceeds limit {:.0} kg; lengthened counterweight arm {:.0} to {:.0} mm",
                        iterations,
                        result.counterweight_kg,
                        result.counterweight_limit_kg,
                        geometry.counterweight_arm_mm,
                        next_arm_mm
                    ));
                    geometry.counterweight_arm_mm = next_arm_mm;
                } else {
                    notes.push(format!(
                        "Iteration {}: counterweight {:.0} kg exceeds limit {:.0} kg; counterweight arm already at practical limit {:.0} mm",
                        iterations,
                        result.counterweight_kg,
                        result.counterweight_limit_kg,
                        geometry.counterweight_arm_mm
                    ));
                    break result;
                }
            } else {
                notes.push(format!(
                    "Iteration {}: deflection {:.1} mm exceeds allowable {:.1} mm; no standard adjustment corrects deflection, revise spans or frame depth",
                    iterations, result.deflection_mm, result.allowable_deflection_mm
                ));
                break result;
            }
        };

        let verdict = if result.passes() {
            notes.push(format!(
                "Design adequate after {} iteration(s); {} governs at unity {:.2}",
                iterations,
                result.governing_condition(),
                result.governing_unity()
            ));
            AdequacyVerdict::Adequate
        } else {
            AdequacyVerdict::NeedsRevision
        };

        if result.counterweight_kg > COUNTERWEIGHT_ADVISORY_RATIO * result.gate_weight_kg {
            notes.push(format!(
                "Counterweight {:.0} kg exceeds twice the gate weight; consider a longer counterweight arm or a lighter infill",
                result.counterweight_kg
            ));
        }

        log::info!(
            "Verdict {} after {} iteration(s), counterweight {:.0} kg",
            verdict,
            iterations,
            result.counterweight_kg
        );

        Ok(DesignRecord {
            requirements,
            reference_model: model.name.clone(),
            geometry,
            material,
            result,
            verdict,
            iterations,
            notes,
        })
    }
}
