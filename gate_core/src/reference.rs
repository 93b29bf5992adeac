//! # Reference Model Catalog
//!
//! Proven cantilever gate designs that seed the optimization loop.
//! Each reference model records the width envelope it covers and the
//! proportions of its as-built geometry; a candidate gate is produced
//! by scaling those proportions to the requested opening.
//!
//! ## Proportions
//!
//! | Quantity          | Rule                    |
//! |-------------------|-------------------------|
//! | Cantilever length | 0.5 × width             |
//! | Track length      | 1.5 × width             |
//! | Counterweight arm | 0.3 × width             |
//! | Frame depth       | 0.1 × height, 200 mm cap|
//!
//! ## Example
//!
//! ```rust
//! use gate_core::materials::InfillType;
//! use gate_core::reference::ReferenceCatalog;
//!
//! let model = ReferenceCatalog::builtin().for_width(6000.0).unwrap();
//! let geometry = model.scale(6000.0, 2400.0, InfillType::ChainLink);
//!
//! assert_eq!(geometry.cantilever_length_mm, 3000.0);
//! assert_eq!(geometry.track_length_mm, 9000.0);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::calculations::cantilever::{FrameMembers, GateGeometry};
use crate::errors::{DesignError, DesignResult};
use crate::materials::InfillType;

/// A proven as-built design and the envelope it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceModel {
    /// Model name, e.g. "light-duty"
    pub name: String,
    /// Smallest opening width this model covers (mm)
    pub min_width_mm: f64,
    /// Largest opening width this model covers (mm)
    pub max_width_mm: f64,
    /// Smallest panel height this model covers (mm)
    pub min_height_mm: f64,
    /// Largest panel height this model covers (mm)
    pub max_height_mm: f64,
    /// Starting frame section for all member roles
    pub frame_section: String,
    /// Cantilever length as a fraction of width
    pub cantilever_ratio: f64,
    /// Track length as a fraction of width
    pub track_ratio: f64,
    /// Counterweight arm as a fraction of width
    pub counterweight_arm_ratio: f64,
    /// Frame depth as a fraction of height
    pub frame_depth_ratio: f64,
    /// Cap on scaled frame depth (mm)
    pub max_frame_depth_mm: f64,
    /// Track hardware description for specifications
    pub track_system: String,
    /// Counterweight hardware description for specifications
    pub counterweight_system: String,
}

impl ReferenceModel {
    /// Check whether this model's envelope covers the given width
    pub fn covers_width(&self, width_mm: f64) -> bool {
        (self.min_width_mm..=self.max_width_mm).contains(&width_mm)
    }

    /// Scale this model's proportions to a requested opening.
    ///
    /// Produces the starting candidate for the optimization loop; the
    /// loop may later substitute member sections or lengthen the
    /// counterweight arm.
    pub fn scale(&self, width_mm: f64, height_mm: f64, infill: InfillType) -> GateGeometry {
        let frame_depth_mm = (self.frame_depth_ratio * height_mm).min(self.max_frame_depth_mm);
        GateGeometry {
            width_mm,
            height_mm,
            cantilever_length_mm: self.cantilever_ratio * width_mm,
            track_length_mm: self.track_ratio * width_mm,
            counterweight_arm_mm: self.counterweight_arm_ratio * width_mm,
            frame_depth_mm,
            members: FrameMembers::uniform(self.frame_section.clone()),
            infill,
        }
    }
}

/// Builtin reference models as
/// (name, width range, frame section, track system, counterweight system)
const BUILTIN_MODELS: [(&str, f64, f64, &str, &str, &str); 2] = [
    (
        "light-duty",
        3_000.0,
        12_000.0,
        "HSS130x130x5",
        "Enclosed track, two sealed truck assemblies",
        "Stacked steel plates in a bolted tail frame",
    ),
    (
        "heavy-duty",
        12_000.0,
        20_000.0,
        "HSS200x200x8",
        "Enclosed track, four sealed truck assemblies",
        "Cast concrete block on a welded tail frame",
    ),
];

static BUILTIN: Lazy<ReferenceCatalog> = Lazy::new(|| {
    let models = BUILTIN_MODELS
        .iter()
        .map(
            |&(name, min_w, max_w, section, track, counterweight)| ReferenceModel {
                name: name.to_string(),
                min_width_mm: min_w,
                max_width_mm: max_w,
                min_height_mm: 1_500.0,
                max_height_mm: 5_000.0,
                frame_section: section.to_string(),
                cantilever_ratio: 0.5,
                track_ratio: 1.5,
                counterweight_arm_ratio: 0.3,
                frame_depth_ratio: 0.1,
                max_frame_depth_mm: 200.0,
                track_system: track.to_string(),
                counterweight_system: counterweight.to_string(),
            },
        )
        .collect();
    ReferenceCatalog::new(models)
});

/// Catalog of reference models, searched in insertion order
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    models: Vec<ReferenceModel>,
}

impl ReferenceCatalog {
    /// Create a catalog from a model list
    pub fn new(models: Vec<ReferenceModel>) -> Self {
        ReferenceCatalog { models }
    }

    /// The builtin light-duty and heavy-duty models
    pub fn builtin() -> &'static ReferenceCatalog {
        &BUILTIN
    }

    /// First model whose width envelope covers the request.
    ///
    /// At an envelope boundary the earlier (lighter) model wins.
    pub fn for_width(&self, width_mm: f64) -> DesignResult<&ReferenceModel> {
        self.models
            .iter()
            .find(|m| m.covers_width(width_mm))
            .ok_or(DesignError::ReferenceNotFound { width_mm })
    }

    /// Look up a model by name, case-insensitively
    pub fn by_name(&self, name: &str) -> Option<&ReferenceModel> {
        self.models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// All models in search order
    pub fn models(&self) -> &[ReferenceModel] {
        &self.models
    }
}
