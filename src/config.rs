//! Application configuration.
//!
//! The configuration is a JSON file describing the grid page the solver
//! works on: its dimensions in cells and the pixel metrics used to map a
//! drag position onto those cells.  The top-level schema uses a `"layout"`
//! key so further sections can be added without breaking existing files.
//!
//! # Example
//!
//! ```json
//! {
//!   "layout": {
//!     "count_x": 4,
//!     "count_y": 5,
//!     "cell_width": 100,
//!     "cell_height": 120,
//!     "border_space_x": 12,
//!     "border_space_y": 12
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Grid dimensions and pixel metrics.
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Grid dimensions and pixel metrics.
///
/// All sizes are in **pixels**; counts are in cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of columns.
    pub count_x: i32,
    /// Number of rows.
    pub count_y: i32,
    /// Width of one cell.
    pub cell_width: i32,
    /// Height of one cell.
    pub cell_height: i32,
    /// Horizontal gap between adjacent cells.
    pub border_space_x: i32,
    /// Vertical gap between adjacent cells.
    pub border_space_y: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            count_x: 4,
            count_y: 5,
            cell_width: 100,
            cell_height: 120,
            border_space_x: 12,
            border_space_y: 12,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "layout": {
                "count_x": 5,
                "count_y": 6,
                "cell_width": 90,
                "cell_height": 110,
                "border_space_x": 8,
                "border_space_y": 16
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.layout.count_x, 5);
        assert_eq!(cfg.layout.count_y, 6);
        assert_eq!(cfg.layout.cell_width, 90);
        assert_eq!(cfg.layout.cell_height, 110);
        assert_eq!(cfg.layout.border_space_x, 8);
        assert_eq!(cfg.layout.border_space_y, 16);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.layout, LayoutConfig::default());
    }

    #[test]
    fn deserialize_partial_layout() {
        let json = r#"{ "layout": { "count_x": 6 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.layout.count_x, 6);
        let defaults = LayoutConfig::default();
        assert_eq!(cfg.layout.count_y, defaults.count_y);
        assert_eq!(cfg.layout.cell_width, defaults.cell_width);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "layout": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/cellreorder/config.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cellreorder/config.json"));
    }
}
