//! Structural Steel Grades (ASTM)
//!
//! Reference properties for the plate and shape steels commonly used in
//! cantilever gate frames. Values are mill-minimum mechanical properties;
//! elastic constants are shared across carbon steels.

use serde::{Deserialize, Serialize};

use crate::constants::PA_PER_MPA;
use crate::errors::{DesignError, DesignResult};

/// ASTM steel grades supported by the material table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    /// ASTM A36 carbon steel
    #[serde(rename = "A36")]
    A36,
    /// ASTM A572 Grade 50 high-strength low-alloy
    #[serde(rename = "A572_50")]
    A572Grade50,
    /// ASTM A588 weathering steel
    #[serde(rename = "A588")]
    A588,
    /// ASTM A992 wide-flange shape steel
    #[serde(rename = "A992")]
    A992,
}

impl SteelGrade {
    /// All steel grades for UI selection
    pub const ALL: [SteelGrade; 4] = [
        SteelGrade::A36,
        SteelGrade::A572Grade50,
        SteelGrade::A588,
        SteelGrade::A992,
    ];

    /// Get the canonical grade label (e.g., "A572_50")
    pub fn code(&self) -> &'static str {
        match self {
            SteelGrade::A36 => "A36",
            SteelGrade::A572Grade50 => "A572_50",
            SteelGrade::A588 => "A588",
            SteelGrade::A992 => "A992",
        }
    }

    /// Parse from common string representations
    ///
    /// Accepts mill-cert style names ("A572-50", "A572 Grade 50") as well
    /// as the canonical labels, case-insensitively.
    pub fn from_str_flexible(s: &str) -> DesignResult<Self> {
        match s.to_uppercase().replace([' ', '-', '_', '.'], "").as_str() {
            "A36" | "ASTMA36" => Ok(SteelGrade::A36),
            "A57250" | "A572GRADE50" | "A572GR50" | "ASTMA57250" => Ok(SteelGrade::A572Grade50),
            "A588" | "ASTMA588" | "A588GRADEA" => Ok(SteelGrade::A588),
            "A992" | "ASTMA992" => Ok(SteelGrade::A992),
            _ => Err(DesignError::material_not_found(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelGrade::A36 => "ASTM A36",
            SteelGrade::A572Grade50 => "ASTM A572 Grade 50",
            SteelGrade::A588 => "ASTM A588",
            SteelGrade::A992 => "ASTM A992",
        }
    }

    /// One-line selection guidance for menus
    pub fn description(&self) -> &'static str {
        match self {
            SteelGrade::A36 => "General purpose structural steel",
            SteelGrade::A572Grade50 => "High-strength low-alloy steel (recommended for gates)",
            SteelGrade::A588 => "Weathering steel (corrosion resistant)",
            SteelGrade::A992 => "Standard for wide flange shapes",
        }
    }

    /// Reference properties for this grade
    pub fn properties(&self) -> SteelProperties {
        let (yield_strength_pa, ultimate_strength_pa) = match self {
            SteelGrade::A36 => (248.0e6, 400.0e6),
            SteelGrade::A572Grade50 => (345.0e6, 450.0e6),
            SteelGrade::A588 => (345.0e6, 485.0e6),
            SteelGrade::A992 => (345.0e6, 450.0e6),
        };
        SteelProperties {
            grade: *self,
            yield_strength_pa,
            ultimate_strength_pa,
            elastic_modulus_pa: 200.0e9,
            density_kg_m3: 7850.0,
            poisson_ratio: 0.30,
            thermal_expansion_per_c: 12.0e-6,
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Mechanical and physical properties for a steel grade
///
/// Immutable once looked up; strengths and moduli are stored in Pa,
/// with MPa/GPa accessors for display and for the N/mm calculation
/// system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelProperties {
    /// Grade this property set belongs to
    pub grade: SteelGrade,
    /// Minimum yield strength Fy (Pa)
    pub yield_strength_pa: f64,
    /// Minimum ultimate tensile strength Fu (Pa)
    pub ultimate_strength_pa: f64,
    /// Elastic modulus E (Pa)
    pub elastic_modulus_pa: f64,
    /// Mass density (kg/m³)
    pub density_kg_m3: f64,
    /// Poisson's ratio
    pub poisson_ratio: f64,
    /// Coefficient of thermal expansion (1/°C)
    pub thermal_expansion_per_c: f64,
}

impl SteelProperties {
    /// Yield strength in MPa (N/mm²)
    pub fn yield_strength_mpa(&self) -> f64 {
        self.yield_strength_pa / PA_PER_MPA
    }

    /// Ultimate strength in MPa (N/mm²)
    pub fn ultimate_strength_mpa(&self) -> f64 {
        self.ultimate_strength_pa / PA_PER_MPA
    }

    /// Elastic modulus in MPa (N/mm²)
    pub fn elastic_modulus_mpa(&self) -> f64 {
        self.elastic_modulus_pa / PA_PER_MPA
    }

    /// Elastic modulus in GPa
    pub fn elastic_modulus_gpa(&self) -> f64 {
        self.elastic_modulus_pa / 1.0e9
    }
}

/// Look up steel properties by grade name
///
/// Accepts the same flexible spellings as [`SteelGrade::from_str_flexible`].
pub fn get_steel_properties(grade_name: &str) -> DesignResult<SteelProperties> {
    Ok(SteelGrade::from_str_flexible(grade_name)?.properties())
}
