//! Runtime configuration.
//!
//! Every field has a default, so an empty document (or no file at all) gives
//! the stock behaviour. Unknown keys are rejected.
//!
//! ```yaml
//! contrast_method: simple
//! target_ratio: 7.0
//! adjust_colors: true
//! debounce_ms: 500
//! mobile_breakpoint: 600
//! default_block_width: 600
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{ContrastEngine, ContrastMethod, DEFAULT_TARGET_RATIO};
use crate::error::ConfigError;

/// Settings shared by the scanner, the appliers and the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How foreground colors are corrected.
    pub contrast_method: ContrastMethod,
    /// WCAG ratio the full method aims for.
    pub target_ratio: f64,
    /// Master switch; when off every color passes through.
    pub adjust_colors: bool,
    /// Quiet period before a batch of page changes is re-scanned.
    pub debounce_ms: u64,
    /// Viewports narrower than this get the compact tooltip layout.
    pub mobile_breakpoint: f64,
    /// Width assumed for a tooltip's text block when it has not been measured.
    pub default_block_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contrast_method: ContrastMethod::Full,
            target_ratio: DEFAULT_TARGET_RATIO,
            adjust_colors: true,
            debounce_ms: 2000,
            mobile_breakpoint: 600.0,
            default_block_width: 600.0,
        }
    }
}

impl Config {
    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] for malformed YAML or unknown keys and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_ratio.is_finite() || !(1.0..=21.0).contains(&self.target_ratio) {
            return Err(ConfigError::InvalidValue {
                field: "target_ratio",
                message: format!("{} is outside 1..=21", self.target_ratio),
            });
        }
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "mobile_breakpoint",
                message: format!("{} must be a non-negative width", self.mobile_breakpoint),
            });
        }
        if !self.default_block_width.is_finite() || self.default_block_width <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "default_block_width",
                message: format!("{} must be a positive width", self.default_block_width),
            });
        }
        Ok(())
    }

    /// The color engine these settings describe.
    pub fn contrast_engine(&self) -> ContrastEngine {
        ContrastEngine {
            method: self.contrast_method,
            target_ratio: self.target_ratio,
            enabled: self.adjust_colors,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
