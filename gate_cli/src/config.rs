//! Tool configuration, persisted next to the working directory.
//!
//! The config file is created with defaults on first run so users can
//! edit it; a broken or unreadable file falls back to defaults rather
//! than blocking a design session.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gate_core::calculations::cantilever::DesignCriteria;
use gate_core::materials::InfillType;

/// Default config file name in the working directory
pub const CONFIG_FILE: &str = "gatecalc_config.json";

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Unit system label (informational; calculations are metric)
    pub units: String,
    /// Base directory for design packages
    pub output_directory: String,
    /// Prompt defaults for a new design session
    pub defaults: SessionDefaults,
    /// Acceptance criteria applied to every design
    pub criteria: DesignCriteria,
    /// Which package files to generate
    pub output: OutputSettings,
}

/// Prompt defaults for a new design session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    /// Steel grade offered as the menu default
    pub steel_grade: String,
    /// Infill offered as the menu default
    pub infill_type: InfillType,
    /// Design wind speed default (m/s)
    pub wind_speed_ms: f64,
}

/// Which package files to generate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub generate_calculations: bool,
    pub generate_specifications: bool,
    pub generate_drawings: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            units: "metric".to_string(),
            output_directory: "output".to_string(),
            defaults: SessionDefaults::default(),
            criteria: DesignCriteria::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        SessionDefaults {
            steel_grade: "A572_50".to_string(),
            infill_type: InfillType::ChainLink,
            wind_speed_ms: 33.5,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            generate_calculations: true,
            generate_specifications: true,
            generate_drawings: true,
        }
    }
}

impl GateConfig {
    /// Load the config file, writing defaults on first run.
    ///
    /// An unreadable or invalid file logs a warning and returns
    /// defaults without overwriting the file.
    pub fn load_or_create(path: &Path) -> GateConfig {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                        return GateConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("Could not read config {}: {}", path.display(), e);
                    return GateConfig::default();
                }
            }
        }

        let config = GateConfig::default();
        match serde_json::to_string_pretty(&config) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not write default config {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("Could not serialize default config: {}", e),
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.units, "metric");
        assert_eq!(config.output_directory, "output");
        assert_eq!(config.defaults.steel_grade, "A572_50");
        assert_eq!(config.defaults.infill_type, InfillType::ChainLink);
        assert!(config.output.generate_drawings);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let path = temp_dir().join("gatecalc_test_config_create.json");
        let _ = fs::remove_file(&path);

        let config = GateConfig::load_or_create(&path);
        assert_eq!(config, GateConfig::default());
        assert!(path.exists());

        // Second run reads the same file back
        let reread = GateConfig::load_or_create(&path);
        assert_eq!(reread, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let path = temp_dir().join("gatecalc_test_config_invalid.json");
        fs::write(&path, "{ not json").unwrap();

        let config = GateConfig::load_or_create(&path);
        assert_eq!(config, GateConfig::default());

        // The broken file is left in place for the user to inspect
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let json = r#"{ "defaults": { "wind_speed_ms": 40.0 } }"#;
        let config: GateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.defaults.wind_speed_ms, 40.0);
        assert_eq!(config.defaults.steel_grade, "A572_50");
        assert_eq!(config.units, "metric");
    }
}
