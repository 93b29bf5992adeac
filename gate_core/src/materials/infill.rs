//! Gate Infill Types
//!
//! The panel material filling the gate frame. Infill drives two
//! quantities: panel weight (areal density) and the solid-equivalent
//! wind area (solidity ratio).
//!
//! Chain-link carries a solidity of 1.0: fencing wind guides design
//! mesh fabric for the gross panel face, since the openings foul with
//! debris and ice in service. Expanded metal and welded wire use their
//! net solidity.

use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, DesignResult};

/// Panel infill options for gate frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfillType {
    /// Galvanized chain-link fabric with fittings
    ChainLink,
    /// Expanded metal mesh panels
    ExpandedMetal,
    /// Solid steel plate
    SolidPlate,
    /// Welded wire panels
    WeldedWire,
}

impl InfillType {
    /// All infill types for UI selection
    pub const ALL: [InfillType; 4] = [
        InfillType::ChainLink,
        InfillType::ExpandedMetal,
        InfillType::SolidPlate,
        InfillType::WeldedWire,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> DesignResult<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "chain_link" | "chainlink" | "chain_link_fabric" => Ok(InfillType::ChainLink),
            "expanded_metal" | "expanded_mesh" => Ok(InfillType::ExpandedMetal),
            "solid_plate" | "solid_panel" | "plate" => Ok(InfillType::SolidPlate),
            "welded_wire" | "welded_mesh" | "wire_panel" => Ok(InfillType::WeldedWire),
            _ => Err(DesignError::invalid_input(
                "infill_type",
                s,
                "Unknown infill type",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            InfillType::ChainLink => "Chain Link",
            InfillType::ExpandedMetal => "Expanded Metal",
            InfillType::SolidPlate => "Solid Plate",
            InfillType::WeldedWire => "Welded Wire",
        }
    }

    /// Installed panel weight per unit area (kg/m²)
    ///
    /// Includes fabric/panel, tension members, and attachment hardware.
    pub fn areal_weight_kg_m2(&self) -> f64 {
        match self {
            InfillType::ChainLink => 25.0,
            InfillType::ExpandedMetal => 35.0,
            InfillType::SolidPlate => 45.0,
            InfillType::WeldedWire => 28.0,
        }
    }

    /// Fraction of the gross panel face used as wind area
    pub fn solidity_ratio(&self) -> f64 {
        match self {
            InfillType::ChainLink => 1.0,
            InfillType::ExpandedMetal => 0.6,
            InfillType::SolidPlate => 1.0,
            InfillType::WeldedWire => 0.8,
        }
    }
}

impl std::fmt::Display for InfillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
