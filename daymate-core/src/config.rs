use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{geolocation::Coordinates, map::DEFAULT_MAP_BASE};

pub const DEFAULT_API_BASE: &str = "https://daymate-django.onrender.com";
pub const DEFAULT_CLOCK_PERIOD_SECS: u64 = 60;

/// Fixed device position used as the geolocation capability.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeviceConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_base_url = "https://daymate-django.onrender.com"
///
/// [device]
/// latitude = 23.8103
/// longitude = 90.4125
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base URL of the weather/news endpoint.
    pub api_base_url: Option<String>,

    /// Prefix the encoded location is appended to for the map preview.
    pub map_base_url: Option<String>,

    pub clock_period_secs: Option<u64>,

    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    pub fn api_base_url(&self) -> &str {
        non_empty(self.api_base_url.as_deref()).unwrap_or(DEFAULT_API_BASE)
    }

    pub fn map_base_url(&self) -> &str {
        non_empty(self.map_base_url.as_deref()).unwrap_or(DEFAULT_MAP_BASE)
    }

    /// Clock tick period, never shorter than one second.
    pub fn clock_period(&self) -> Duration {
        let secs = self.clock_period_secs.unwrap_or(DEFAULT_CLOCK_PERIOD_SECS).max(1);
        Duration::from_secs(secs)
    }

    /// Device coordinates, only when both halves are configured.
    pub fn device_coordinates(&self) -> Option<Coordinates> {
        match (self.device.latitude, self.device.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }

    pub fn set_device_coordinates(&mut self, coords: Option<Coordinates>) {
        self.device = match coords {
            Some(c) => DeviceConfig { latitude: Some(c.latitude), longitude: Some(c.longitude) },
            None => DeviceConfig::default(),
        };
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "daymate", "daymate")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
