//! Paths and resolution settings consumed at initialize time.

use crate::error::{HdUiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "HDUI_CONFIG";

/// Configuration for the HD UI manager.
///
/// Every field has a default matching the shipped `uplinkHD` data layout,
/// so a partial JSON file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Directory searched for layout documents.
    pub layout_dir: PathBuf,
    /// Base directory for image files referenced by layouts.
    pub asset_dir: PathBuf,
    /// Directory holding atlas manifests.
    pub atlas_dir: PathBuf,
    /// Atlas manifest loaded during initialize.
    pub default_atlas: String,
    /// Design resolution the layouts are authored against.
    pub base_width: u32,
    pub base_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            layout_dir: PathBuf::from("uplinkHD/layouts"),
            asset_dir: PathBuf::from("uplinkHD/graphics"),
            atlas_dir: PathBuf::from("uplinkHD/graphics"),
            default_atlas: "uplinkHD_atlas_00.xml".to_string(),
            base_width: 1920,
            base_height: 1080,
        }
    }
}

impl UiConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HdUiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load from `$HDUI_CONFIG` when set, falling back to defaults.
    ///
    /// A config file that exists but fails to parse is logged and ignored.
    pub fn from_env_or_default() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::load(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded UI config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring UI config {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.base_width, 1920);
        assert_eq!(config.base_height, 1080);
        assert_eq!(config.default_atlas, "uplinkHD_atlas_00.xml");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "layout_dir": "custom/layouts", "base_width": 1280 }}"#).unwrap();

        let config = UiConfig::load(file.path()).unwrap();
        assert_eq!(config.layout_dir, PathBuf::from("custom/layouts"));
        assert_eq!(config.base_width, 1280);
        assert_eq!(config.base_height, 1080);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            UiConfig::load(file.path()),
            Err(HdUiError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = UiConfig::load(Path::new("/nonexistent/hdui.json"));
        assert!(matches!(result, Err(HdUiError::Io { .. })));
    }
}
