//! # gate_core - Cantilever Slide Gate Design Engine
//!
//! `gate_core` is the computational heart of Gatecalc. It turns a set of
//! design requirements (opening size, wind exposure, steel grade, infill)
//! into quantitative engineering results and an adequacy verdict, scaling
//! a proven reference design and iterating proportions when the first
//! pass fails. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Deterministic**: Identical requirements produce identical records
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use gate_core::designer::{DesignRequirements, GateDesigner};
//! use gate_core::materials::InfillType;
//!
//! let requirements =
//!     DesignRequirements::new(6000.0, 2400.0, 33.5, "A572_50", InfillType::ChainLink);
//!
//! let record = GateDesigner::new().evaluate(requirements).unwrap();
//! println!("{} after {} iteration(s)", record.verdict, record.iterations);
//!
//! // Serialize for storage or transmission
//! let json = serde_json::to_string_pretty(&record).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`designer`] - Requirements validation and the optimization loop
//! - [`calculations`] - Structural calculation passes
//! - [`reference`] - Proven reference models and proportional scaling
//! - [`materials`] - Steel grades, section catalog, and infill types
//! - [`constants`] - Physical constants and supported bounds
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculations;
pub mod constants;
pub mod designer;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod reference;

// Re-export commonly used types at crate root for convenience
pub use designer::{AdequacyVerdict, DesignRecord, DesignRequirements, GateDesigner};
pub use errors::{DesignError, DesignResult};
pub use file_io::{load_design, save_design, FileLock, SavedDesign};
