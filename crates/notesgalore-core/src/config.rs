use crate::theme::ThemePreference;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    ProjectDir,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config io error: {err}"),
            ConfigError::Serde(err) => write!(f, "config parse error: {err}"),
            ConfigError::ProjectDir => write!(f, "no platform config directory"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where preferences and uploaded assets live. Platform data dir when unset.
    pub data_dir: Option<String>,
    pub log_filter: String,
    pub theme_default: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            theme_default: ThemePreference::Light.as_str().to_string(),
        }
    }
}

impl AppConfig {
    pub fn theme_default(&self) -> ThemePreference {
        ThemePreference::from_str(&self.theme_default).unwrap_or_default()
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = self.data_dir.as_deref().filter(|dir| !dir.trim().is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let project_dirs = project_dirs()?;
        Ok(project_dirs.data_dir().to_path_buf())
    }

    pub fn preferences_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolve_data_dir()?.join("preferences.db"))
    }

    pub fn assets_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolve_data_dir()?.join("assets"))
    }
}

pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn default_store() -> Result<Self, ConfigError> {
        let project_dirs = project_dirs()?;
        Ok(Self::new(project_dirs.config_dir().join("config.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(&self.config_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, data)?;
        Ok(())
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("app", "notesgalore", "NotesGalore").ok_or(ConfigError::ProjectDir)
}
