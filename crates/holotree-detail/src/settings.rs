//! RON settings for the detail view.
//!
//! Loaded from `~/.config/holotree/detail_view.ron` by default. Every field is
//! optional; missing fields take their defaults.
//!
//! ```ron
//! (
//!     layout: (timeline_count: 8, panel_count: 5),
//!     render: (sphere_radius: 0.6),
//!     phase_speed: 2.5,
//!     expansion_speed: 1.5,
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SettingsError;
use crate::inputs::RenderConfig;
use crate::layout::LayoutConfig;

/// File name inside the holotree config directory.
pub const SETTINGS_FILE_NAME: &str = "detail_view.ron";

/// Everything a host needs to set up a detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailViewSettings {
    /// Requested slot counts.
    pub layout: LayoutConfig,
    /// Render tuning shared with the rest of the scene.
    pub render: RenderConfig,
    /// How fast host-side phases ease toward their targets (per second).
    pub phase_speed: f32,
    /// How fast the host's expansion scale eases (per second).
    pub expansion_speed: f32,
}

impl Default for DetailViewSettings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
            phase_speed: 2.5,
            expansion_speed: 1.5,
        }
    }
}

impl DetailViewSettings {
    /// Parse settings from RON text.
    pub fn from_ron_str(text: &str) -> crate::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Pretty RON text for these settings.
    pub fn to_ron_string(&self) -> crate::Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

/// Default settings path (`<config dir>/holotree/detail_view.ron`).
pub fn settings_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("holotree").join(SETTINGS_FILE_NAME))
}

/// Load and parse a settings file.
pub fn load_settings(path: &Path) -> crate::Result<DetailViewSettings> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DetailViewSettings::from_ron_str(&text)
}

/// Load settings from `path` (or the default path), falling back to defaults
/// on any problem.
pub fn load_settings_or_default(path: Option<&Path>) -> DetailViewSettings {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match settings_file_path() {
            Some(p) => p,
            None => {
                info!("No config directory available, using default detail view settings");
                return DetailViewSettings::default();
            }
        },
    };

    if !path.exists() {
        info!("Settings file not found at {:?}, using defaults", path);
        return DetailViewSettings::default();
    }

    match load_settings(&path) {
        Ok(settings) => {
            info!("Loaded detail view settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!("Failed to load settings from {:?}: {}", path, e);
            warn!("Falling back to default detail view settings");
            DetailViewSettings::default()
        }
    }
}

/// Write settings as pretty RON, creating parent directories.
pub fn save_settings(path: &Path, settings: &DetailViewSettings) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = settings.to_ron_string()?;
    std::fs::write(path, text).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write defaults to the default path. Returns where they went.
pub fn write_default_settings() -> crate::Result<PathBuf> {
    let path = settings_file_path().ok_or(SettingsError::NoConfigDir)?;
    save_settings(&path, &DetailViewSettings::default())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_settings() {
        let ron = r#"
            (
                layout: (timeline_count: 10),
                render: (sphere_radius: 0.9),
            )
        "#;

        let settings = DetailViewSettings::from_ron_str(ron).unwrap();
        assert_eq!(settings.layout.timeline_count, 10);
        assert_eq!(settings.layout.panel_count, 5);
        assert_eq!(settings.render, RenderConfig { sphere_radius: 0.9 });
        assert_eq!(settings.phase_speed, 2.5);
    }

    #[test]
    fn test_parse_error() {
        let err = DetailViewSettings::from_ron_str("(layout: oops)").unwrap_err();
        assert!(matches!(err, SettingsError::Ron(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let mut settings = DetailViewSettings::default();
        settings.layout.panel_count = 3;
        settings.expansion_speed = 0.75;
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ron");

        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::Io { .. })
        ));
        assert_eq!(
            load_settings_or_default(Some(&path)),
            DetailViewSettings::default()
        );
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "not ron at all {{").unwrap();

        assert_eq!(
            load_settings_or_default(Some(&path)),
            DetailViewSettings::default()
        );
    }
}
