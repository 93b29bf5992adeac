//! Standard Section Catalog (square HSS)
//!
//! Section properties for the hollow structural sections used in gate
//! frames. Properties are derived from outer dimensions and wall
//! thickness with sharp-corner formulas:
//!
//! ```text
//! A  = 2·t·(d + b − 2·t)
//! Ix = (b·d³ − (b−2t)·(d−2t)³) / 12
//! Sx = 2·Ix / d
//! ```
//!
//! The catalog is an ordered ladder from the lightest to the heaviest
//! standard size; the optimization loop walks it upward one step at a
//! time via [`SectionCatalog::next_size_up`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::STEEL_DENSITY_KG_M3;
use crate::errors::{DesignError, DesignResult};

/// Square/rectangular hollow structural section with derived properties
///
/// All dimensional values are metric (mm, mm², mm³, mm⁴, kg/m).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelSection {
    /// Catalog label (e.g., "HSS130x130x5")
    pub label: String,
    /// Overall depth (mm)
    pub depth_mm: f64,
    /// Overall width (mm)
    pub width_mm: f64,
    /// Wall thickness (mm)
    pub wall_thickness_mm: f64,
    /// Cross-sectional area (mm²)
    pub area_mm2: f64,
    /// Moment of inertia, strong axis (mm⁴)
    pub ix_mm4: f64,
    /// Elastic section modulus, strong axis (mm³)
    pub sx_mm3: f64,
    /// Moment of inertia, weak axis (mm⁴)
    pub iy_mm4: f64,
    /// Elastic section modulus, weak axis (mm³)
    pub sy_mm3: f64,
    /// Radius of gyration, strong axis (mm)
    pub rx_mm: f64,
    /// Radius of gyration, weak axis (mm)
    pub ry_mm: f64,
    /// Unit weight (kg/m)
    pub weight_kg_m: f64,
}

impl SteelSection {
    /// Derive a section from outer dimensions and wall thickness
    ///
    /// Fails with `InvalidGeometry` when the wall is non-positive or
    /// too thick to leave a hollow core.
    pub fn from_dimensions(depth_mm: f64, width_mm: f64, wall_thickness_mm: f64) -> DesignResult<Self> {
        let (d, b, t) = (depth_mm, width_mm, wall_thickness_mm);
        if d <= 0.0 || b <= 0.0 || t <= 0.0 {
            return Err(DesignError::invalid_geometry(format!(
                "HSS dimensions must be positive (d={d}, b={b}, t={t})"
            )));
        }
        if 2.0 * t >= d.min(b) {
            return Err(DesignError::invalid_geometry(format!(
                "Wall thickness {t} mm leaves no hollow core in a {d}x{b} section"
            )));
        }

        let area_mm2 = 2.0 * t * (d + b - 2.0 * t);
        let ix_mm4 = (b * d.powi(3) - (b - 2.0 * t) * (d - 2.0 * t).powi(3)) / 12.0;
        let iy_mm4 = (d * b.powi(3) - (d - 2.0 * t) * (b - 2.0 * t).powi(3)) / 12.0;
        let sx_mm3 = 2.0 * ix_mm4 / d;
        let sy_mm3 = 2.0 * iy_mm4 / b;

        Ok(SteelSection {
            label: format!("HSS{:.0}x{:.0}x{:.0}", d, b, t),
            depth_mm: d,
            width_mm: b,
            wall_thickness_mm: t,
            area_mm2,
            ix_mm4,
            sx_mm3,
            iy_mm4,
            sy_mm3,
            rx_mm: (ix_mm4 / area_mm2).sqrt(),
            ry_mm: (iy_mm4 / area_mm2).sqrt(),
            weight_kg_m: area_mm2 * STEEL_DENSITY_KG_M3 / 1.0e6,
        })
    }

    /// Get the section's display name (same as label)
    pub fn display_name(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Display for SteelSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (A={:.0} mm², Ix={:.2e} mm⁴, Sx={:.2e} mm³)",
            self.label, self.area_mm2, self.ix_mm4, self.sx_mm3
        )
    }
}

/// Ordered catalog of standard sections
///
/// Sections are held lightest-first; lookups are case-insensitive by
/// label. The ladder order defines what "next standard increment"
/// means for the optimization loop.
#[derive(Debug, Clone, Default)]
pub struct SectionCatalog {
    /// Sections in ladder order, lightest first
    sections: Vec<SteelSection>,
    /// Ladder position indexed by uppercase label
    index: HashMap<String, usize>,
}

impl SectionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section at the top of the ladder.
    ///
    /// Re-inserting an existing label replaces that entry in place,
    /// keeping its ladder position.
    pub fn insert(&mut self, section: SteelSection) {
        let key = section.label.to_uppercase();
        match self.index.get(&key).copied() {
            Some(pos) => self.sections[pos] = section,
            None => {
                self.index.insert(key, self.sections.len());
                self.sections.push(section);
            }
        }
    }

    /// Look up a section by its label
    ///
    /// Label matching is case-insensitive.
    pub fn lookup(&self, label: &str) -> DesignResult<&SteelSection> {
        self.position(label)
            .map(|i| &self.sections[i])
            .ok_or_else(|| DesignError::section_not_found(label))
    }

    /// Get the next larger standard section, if one exists
    ///
    /// Returns `Ok(None)` when `label` is already the largest section
    /// in the catalog; the optimization loop treats that as
    /// "no further stress fix available".
    pub fn next_size_up(&self, label: &str) -> DesignResult<Option<&SteelSection>> {
        let pos = self
            .position(label)
            .ok_or_else(|| DesignError::section_not_found(label))?;
        Ok(self.sections.get(pos + 1))
    }

    /// All sections in ladder order
    pub fn sections(&self) -> &[SteelSection] {
        &self.sections
    }

    /// All section labels in ladder order
    pub fn all_labels(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.label.as_str()).collect()
    }

    /// Get the number of sections in the catalog
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.index.get(&label.to_uppercase()).copied()
    }
}

// ============================================================================
// Built-in Standard Ladder
// ============================================================================

/// (depth, width, wall) for the standard gate frame ladder, lightest first
const BUILTIN_LADDER: [(f64, f64, f64); 6] = [
    (100.0, 100.0, 5.0),
    (130.0, 130.0, 5.0),
    (150.0, 150.0, 6.0),
    (200.0, 200.0, 8.0),
    (250.0, 250.0, 10.0),
    (300.0, 300.0, 12.0),
];

static BUILTIN: Lazy<SectionCatalog> = Lazy::new(|| {
    let mut catalog = SectionCatalog::new();
    for (d, b, t) in BUILTIN_LADDER {
        // The ladder dimensions are all valid by construction
        if let Ok(section) = SteelSection::from_dimensions(d, b, t) {
            catalog.insert(section);
        }
    }
    catalog
});

impl SectionCatalog {
    /// The built-in standard section ladder
    pub fn builtin() -> &'static SectionCatalog {
        &BUILTIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_properties_hss130() {
        let s = SteelSection::from_dimensions(130.0, 130.0, 5.0).unwrap();
        assert_eq!(s.label, "HSS130x130x5");
        assert_relative_eq!(s.area_mm2, 2500.0, epsilon = 1e-9);
        assert_relative_eq!(s.ix_mm4, 6_520_833.333, epsilon = 1.0);
        assert_relative_eq!(s.sx_mm3, 100_320.5, epsilon = 0.1);
        assert_relative_eq!(s.weight_kg_m, 19.625, epsilon = 1e-9);
    }

    #[test]
    fn test_derived_properties_hss150() {
        let s = SteelSection::from_dimensions(150.0, 150.0, 6.0).unwrap();
        assert_relative_eq!(s.area_mm2, 3456.0, epsilon = 1e-9);
        assert_relative_eq!(s.ix_mm4, 11_964_672.0, epsilon = 1.0);
        assert_relative_eq!(s.sx_mm3, 159_528.96, epsilon = 0.1);
    }

    #[test]
    fn test_square_section_symmetry() {
        let s = SteelSection::from_dimensions(200.0, 200.0, 8.0).unwrap();
        assert_eq!(s.ix_mm4, s.iy_mm4);
        assert_eq!(s.sx_mm3, s.sy_mm3);
        assert_eq!(s.rx_mm, s.ry_mm);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(SteelSection::from_dimensions(100.0, 100.0, 0.0).is_err());
        assert!(SteelSection::from_dimensions(100.0, 100.0, 50.0).is_err());
        assert!(SteelSection::from_dimensions(-100.0, 100.0, 5.0).is_err());
    }

    #[test]
    fn test_builtin_ladder_is_sorted() {
        let catalog = SectionCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        let areas: Vec<f64> = catalog.sections().iter().map(|s| s.area_mm2).collect();
        assert!(areas.windows(2).all(|w| w[0] < w[1]), "ladder must grow monotonically");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let catalog = SectionCatalog::builtin();
        let upper = catalog.lookup("HSS130X130X5").unwrap();
        let lower = catalog.lookup("hss130x130x5").unwrap();
        assert_eq!(upper.label, lower.label);
    }

    #[test]
    fn test_next_size_up_chain() {
        let catalog = SectionCatalog::builtin();
        let next = catalog.next_size_up("HSS130x130x5").unwrap().unwrap();
        assert_eq!(next.label, "HSS150x150x6");

        // Top of the ladder has no larger section
        assert!(catalog.next_size_up("HSS300x300x12").unwrap().is_none());
    }

    #[test]
    fn test_unknown_section() {
        let catalog = SectionCatalog::builtin();
        let err = catalog.lookup("HSS999x999x9").unwrap_err();
        assert_eq!(err.error_code(), "SECTION_NOT_FOUND");
        assert!(catalog.next_size_up("HSS999x999x9").is_err());
    }

    #[test]
    fn test_insert_replaces_duplicate_label() {
        let mut catalog = SectionCatalog::new();
        catalog.insert(SteelSection::from_dimensions(130.0, 130.0, 5.0).unwrap());
        catalog.insert(SteelSection::from_dimensions(150.0, 150.0, 6.0).unwrap());
        assert_eq!(catalog.len(), 2);

        let mut revised = SteelSection::from_dimensions(130.0, 130.0, 5.0).unwrap();
        revised.weight_kg_m = 21.0;
        catalog.insert(revised);

        // No orphan entry; the ladder walk still runs in order
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("HSS130x130x5").unwrap().weight_kg_m, 21.0);
        let next = catalog.next_size_up("HSS130x130x5").unwrap().unwrap();
        assert_eq!(next.label, "HSS150x150x6");
    }
}
