//! Persisted user preferences.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Visual theme preference, persisted as the literal "light"/"dark".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// The other mode. Toggling twice restores the original.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Preferences kept between sessions. Last write wins; there is no
/// migration of old files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeMode,
    /// Base URL of the screening service, scheme and port included.
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            server_url: "http://127.0.0.1:5002".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults; a
    /// corrupt file is logged and treated the same way.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("ignoring corrupt settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let raw = toml::to_string(self).context("settings not serializable")?;
        fs::write(path, raw).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_light_theme_and_local_service() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.server_url, "http://127.0.0.1:5002");
    }

    #[test]
    fn toggling_twice_restores_the_mode() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.toggled().toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn theme_persists_as_the_literal_strings() -> Result<()> {
        let settings = Settings {
            theme: ThemeMode::Dark,
            ..Settings::default()
        };
        let raw = toml::to_string(&settings)?;
        assert!(raw.contains("theme = \"dark\""));

        let light = toml::to_string(&Settings::default())?;
        assert!(light.contains("theme = \"light\""));
        Ok(())
    }

    #[test]
    fn save_and_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            theme: ThemeMode::Dark,
            server_url: "http://scanner.local:8080".to_string(),
        };

        settings.save(&path)?;
        assert_eq!(Settings::load(&path), settings);
        Ok(())
    }

    #[test]
    fn missing_file_loads_as_defaults() {
        let dir = tempdir().unwrap();
        let loaded = Settings::load(&dir.path().join("absent.toml"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn corrupt_file_loads_as_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        fs::write(&path, "theme = \"midnight\"\nnot even toml [[")?;

        assert_eq!(Settings::load(&path), Settings::default());
        Ok(())
    }

    #[test]
    fn partial_file_fills_in_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        fs::write(&path, "theme = \"dark\"\n")?;

        let loaded = Settings::load(&path);
        assert_eq!(loaded.theme, ThemeMode::Dark);
        assert_eq!(loaded.server_url, Settings::default().server_url);
        Ok(())
    }
}
