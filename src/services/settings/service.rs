use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

/// Environment variable that points at an alternative settings file.
pub const CONFIG_ENV_VAR: &str = "BARBER_SCHEDULE_CONFIG";

const SETTINGS_FILE: &str = "settings.toml";
const DATABASE_FILE: &str = "appointments.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "BarberSchedule", "BarberSchedule")
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file from `$BARBER_SCHEDULE_CONFIG`, else the platform
    /// config directory, else the working directory.
    pub fn from_environment() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::new(path);
        }

        match project_dirs() {
            Some(dirs) => Self::new(dirs.config_dir().join(SETTINGS_FILE)),
            None => Self::new(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings; a missing file yields the defaults.
    pub fn get(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings: Settings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings from {}", self.path.display()))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;

        Ok(settings)
    }

    /// Like [`Self::get`] but falls back to defaults on any error.
    pub fn load_or_default(&self) -> Settings {
        match self.get() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {:#}, using defaults", e);
                Settings::default()
            }
        }
    }

    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }

    /// Where the SQLite file lives for the given settings.
    pub fn database_path(settings: &Settings) -> PathBuf {
        if let Some(ref path) = settings.database_path {
            return PathBuf::from(path);
        }

        match project_dirs() {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE),
            None => PathBuf::from(DATABASE_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("absent.toml"));
        assert_eq!(service.get().unwrap(), Settings::default());
    }

    #[test]
    fn test_update_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("nested").join(SETTINGS_FILE));

        let settings = Settings {
            open_time: "09:00".to_string(),
            close_time: "18:00".to_string(),
            hour_height_px: 200.0,
            ..Settings::default()
        };
        service.update(&settings).unwrap();

        assert_eq!(service.get().unwrap(), settings);
    }

    #[test]
    fn test_update_rejects_invalid_settings() {
        let dir = tempfile::tempdir().unwrap();
        let service = SettingsService::new(dir.path().join(SETTINGS_FILE));

        let settings = Settings {
            close_time: "07:00".to_string(),
            ..Settings::default()
        };
        assert!(service.update(&settings).is_err());
        assert!(!service.path().exists());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "open_time = [not toml").unwrap();

        let service = SettingsService::new(&path);
        assert!(service.get().is_err());
        assert_eq!(service.load_or_default(), Settings::default());
    }

    #[test]
    fn test_database_path_override() {
        let settings = Settings {
            database_path: Some("/tmp/shop.db".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            SettingsService::database_path(&settings),
            PathBuf::from("/tmp/shop.db")
        );
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::env::set_var(CONFIG_ENV_VAR, &path);

        let service = SettingsService::from_environment();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(service.path(), path.as_path());
    }
}
