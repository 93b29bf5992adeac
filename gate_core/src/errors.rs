//! # Error Types
//!
//! Structured error types for gate_core. Each variant carries enough
//! context for a caller to report the problem or handle it
//! programmatically without string-matching on messages.
//!
//! ## Example
//!
//! ```rust
//! use gate_core::errors::{DesignError, DesignResult};
//!
//! fn validate_wind_speed(wind_speed_ms: f64) -> DesignResult<()> {
//!     if wind_speed_ms <= 0.0 {
//!         return Err(DesignError::InvalidInput {
//!             field: "wind_speed_ms".to_string(),
//!             value: wind_speed_ms.to_string(),
//!             reason: "Wind speed must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for gate_core operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Structured error type for gate design operations.
///
/// Validation and lookup failures abort a design request before any
/// calculation runs; geometry/material guards protect the calculator
/// against non-physical inputs; the file variants belong to the
/// design-file persistence layer.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignError {
    /// A requirement value is outside the supported range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Steel grade not found in the material table
    #[error("Steel grade not found: {grade}")]
    MaterialNotFound { grade: String },

    /// Section label not found in the standard section catalog
    #[error("Steel section not found: {section}")]
    SectionNotFound { section: String },

    /// No reference design model covers the requested width
    #[error("No reference design covers a {width_mm} mm wide gate")]
    ReferenceNotFound { width_mm: f64 },

    /// Calculator guard: geometry is non-physical
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Calculator guard: material properties are non-physical
    #[error("Invalid material: {reason}")]
    InvalidMaterial { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Design file schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl DesignError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(grade: impl Into<String>) -> Self {
        DesignError::MaterialNotFound {
            grade: grade.into(),
        }
    }

    /// Create a SectionNotFound error
    pub fn section_not_found(section: impl Into<String>) -> Self {
        DesignError::SectionNotFound {
            section: section.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        DesignError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create an InvalidMaterial error
    pub fn invalid_material(reason: impl Into<String>) -> Self {
        DesignError::InvalidMaterial {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        DesignError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DesignError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DesignError::InvalidInput { .. } => "INVALID_INPUT",
            DesignError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            DesignError::SectionNotFound { .. } => "SECTION_NOT_FOUND",
            DesignError::ReferenceNotFound { .. } => "REFERENCE_NOT_FOUND",
            DesignError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            DesignError::InvalidMaterial { .. } => "INVALID_MATERIAL",
            DesignError::FileError { .. } => "FILE_ERROR",
            DesignError::FileLocked { .. } => "FILE_LOCKED",
            DesignError::SerializationError { .. } => "SERIALIZATION_ERROR",
            DesignError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DesignError::invalid_input("gate_width_mm", "2999", "Width must be 3000-20000 mm");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: DesignError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DesignError::material_not_found("Z999").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(DesignError::section_not_found("HSS999x999x9").error_code(), "SECTION_NOT_FOUND");
        assert_eq!(DesignError::invalid_geometry("zero width").error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_recoverable() {
        let locked = DesignError::file_locked("design.json", "user@host", "2025-01-01T00:00:00Z");
        assert!(locked.is_recoverable());
        assert!(!DesignError::material_not_found("Z999").is_recoverable());
    }
}
