use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// User-tunable plugin settings, stored as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Ticks to wait after a scene load before matching saved records.
    pub load_delay_frames: u32,
    pub preset_dir: PathBuf,
    /// Write a `debug.json` mirror next to each preset on every successful save.
    pub write_debug_mirror: bool,
    /// Spring speed of the depth-of-field focus puller.
    pub focus_speed: f32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            load_delay_frames: 3,
            preset_dir: PathBuf::from("presets"),
            write_debug_mirror: true,
            focus_speed: 6.0,
        }
    }
}

impl PluginConfig {
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config: PluginConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PluginConfig::load_or_default(&dir.path().join("graphics.json")).unwrap();
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.load_delay_frames, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphics.json");
        std::fs::write(&path, r#"{ "load_delay_frames": 5 }"#).unwrap();

        let config = PluginConfig::load_or_default(&path).unwrap();
        assert_eq!(config.load_delay_frames, 5);
        assert_eq!(config.focus_speed, 6.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("graphics.json");
        let config = PluginConfig {
            write_debug_mirror: false,
            ..PluginConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(PluginConfig::load_or_default(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphics.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(PluginConfig::load_or_default(&path), Err(ConfigError::Json(_))));
    }
}
