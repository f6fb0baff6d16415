//! @ai:module:intent Configuration for report rendering, loaded from optional TOML
//! @ai:module:layer infrastructure
//! @ai:module:public_api Config, ReportConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
}

/// @ai:intent Controls what the report formatter shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// List system identifiers that have no gold label.
    pub show_unscored: bool,
    /// Identifier lists longer than this are summarized.
    pub max_listed: usize,
    /// Decimal places for metric values.
    pub decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_unscored: true,
            max_listed: default_max_listed(),
            decimals: default_decimals(),
        }
    }
}

fn default_max_listed() -> usize {
    20
}

fn default_decimals() -> usize {
    2
}

impl ReportConfig {
    /// @ai:intent Apply command-line overrides on top of file or default values
    /// @ai:effects pure
    pub fn apply_overrides(&mut self, hide_unscored: bool, max_listed: Option<usize>) {
        if hide_unscored {
            self.show_unscored = false;
        }

        if let Some(max_listed) = max_listed {
            self.max_listed = max_listed;
        }
    }
}

impl Config {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
