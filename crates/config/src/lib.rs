//! Settings models and loaders for Kartographer.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine tunables. Every field has a default, so partial files are valid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub planner: PlannerSettings,
    pub warp: WarpSettings,
    pub logging: LoggingSettings,
}

/// Maneuver planner defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Rung of the delta-v ladder (0.01, 0.1, 1, 10, 100, 1000 m/s) selected at start-up.
    pub default_increment_index: usize,
    /// Distance ahead of the clock at which new nodes are created (s).
    pub new_node_lead_s: f64,
    /// Time step tier (0 fine, 1 medium, 2 coarse).
    pub granularity_index: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_increment_index: 2,
            new_node_lead_s: 600.0,
            granularity_index: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpSettings {
    /// Seconds past the target before the watchdog forces 1x.
    pub overshoot_margin_s: f64,
    /// Stop this far ahead of a sphere-of-influence change (s).
    pub soi_lead_s: f64,
    /// Stop this far ahead of the end of the current patch (s).
    pub transition_lead_s: f64,
}

impl Default for WarpSettings {
    fn default() -> Self {
        Self {
            overshoot_margin_s: 1.0,
            soi_lead_s: 10.0,
            transition_lead_s: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Settings {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("warp.overshoot_margin_s", self.warp.overshoot_margin_s),
            ("warp.soi_lead_s", self.warp.soi_lead_s),
            ("warp.transition_lead_s", self.warp.transition_lead_s),
            ("planner.new_node_lead_s", self.planner.new_node_lead_s),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number of seconds, got {value}"),
                });
            }
        }
        if self.planner.default_increment_index > 5 {
            return Err(ConfigError::Invalid {
                field: "planner.default_increment_index",
                reason: format!("{} is past the last rung (5)", self.planner.default_increment_index),
            });
        }
        if self.planner.granularity_index > 2 {
            return Err(ConfigError::Invalid {
                field: "planner.granularity_index",
                reason: format!("{} is past the coarsest tier (2)", self.planner.granularity_index),
            });
        }
        Ok(())
    }
}

/// Load and validate settings from a YAML or TOML file (picked by extension).
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let settings: Settings = load_document(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Load any document from YAML, or TOML when the extension says so.
pub fn load_document<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
