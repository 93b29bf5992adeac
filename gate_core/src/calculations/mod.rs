//! # Structural Calculations
//!
//! Calculation passes follow one pattern:
//!
//! - Input types (JSON-serializable) describing the candidate
//! - A `*Result` type (JSON-serializable) with derived quantities and
//!   unity checks
//! - A pure `calculate(...) -> DesignResult<*Result>` function
//!
//! ## Available Calculations
//!
//! - [`cantilever`] - Cantilever slide gate panel analysis

pub mod cantilever;

// Re-export commonly used types
pub use cantilever::{
    calculate, CalculationResult, CantileverMoments, DesignCriteria, FrameMembers, GateGeometry,
    TrackLoads,
};
