use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::risk::{DEFAULT_RAINFALL_FACTOR, DEFAULT_TEMPERATURE_FACTOR};

pub const API_KEY_ENV: &str = "OPENTOPO_API_KEY";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_rainfall_factor() -> f64 {
    DEFAULT_RAINFALL_FACTOR
}

fn default_temperature_factor() -> f64 {
    DEFAULT_TEMPERATURE_FACTOR
}

fn default_base_url() -> String {
    "https://cloud.sdsc.edu/v1/CommunityDEM".to_string()
}

fn default_dem_type() -> String {
    "SRTM_GL1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub opentopo: OpenTopoSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Fixed seed for reproducible fields; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_rainfall_factor")]
    pub rainfall_factor: f64,
    #[serde(default = "default_temperature_factor")]
    pub temperature_factor: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            seed: None,
            rainfall_factor: default_rainfall_factor(),
            temperature_factor: default_temperature_factor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTopoSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_dem_type")]
    pub dem_type: String,
}

impl Default for OpenTopoSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            dem_type: default_dem_type(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Replace the configured API key with `OPENTOPO_API_KEY` when set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.opentopo.api_key = key;
            }
        }
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Settings> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Settings::from_yaml_str(&data)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the defaults.
    pub fn load_or_default(&self, file: impl AsRef<Path>) -> Result<Settings> {
        let path = self.base_dir.join(file.as_ref());
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        self.load(file)
    }
}
