//! # Materials Database
//!
//! Material definitions and property lookups for gate design: ASTM
//! steel grades, the standard hollow-section catalog, and panel infill
//! types.
//!
//! ## Example
//!
//! ```rust
//! use gate_core::materials::{SteelGrade, SectionCatalog, InfillType};
//!
//! let steel = SteelGrade::from_str_flexible("A572-50").unwrap().properties();
//! let section = SectionCatalog::builtin().lookup("HSS130x130x5").unwrap();
//! println!(
//!     "Fy = {} MPa, frame section A = {} mm², infill {} kg/m²",
//!     steel.yield_strength_mpa(),
//!     section.area_mm2,
//!     InfillType::ChainLink.areal_weight_kg_m2()
//! );
//! ```

pub mod infill;
pub mod sections;
pub mod steel;

pub use infill::InfillType;
pub use sections::{SectionCatalog, SteelSection};
pub use steel::{get_steel_properties, SteelGrade, SteelProperties};
