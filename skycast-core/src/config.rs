use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::units::UnitSystem;

/// External services the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    OpenWeather,
    Pexels,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "openweather",
            ServiceId::Pexels => "pexels",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::OpenWeather, ServiceId::Pexels]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ServiceId::OpenWeather),
            "pexels" => Ok(ServiceId::Pexels),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: openweather, pexels."
            )),
        }
    }
}

/// Configuration for a single service (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default unit system, "metric" or "imperial".
    pub default_units: Option<String>,

    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    pub services: HashMap<String, ServiceConfig>,
}

impl Config {
    /// The configured default unit system; metric when unset or unparsable.
    pub fn default_unit_system(&self) -> UnitSystem {
        self.default_units
            .as_deref()
            .and_then(|s| UnitSystem::try_from(s).ok())
            .unwrap_or(UnitSystem::Metric)
    }

    pub fn set_default_units(&mut self, unit: UnitSystem) {
        self.default_units = Some(unit.as_str().to_string());
    }

    pub fn service_config(&self, id: ServiceId) -> Option<&ServiceConfig> {
        self.services.get(id.as_str())
    }

    /// Returns API key for a service, if present.
    pub fn service_api_key(&self, id: ServiceId) -> Option<&str> {
        self.services.get(id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_service_configured(&self, id: ServiceId) -> bool {
        self.service_api_key(id).is_some()
    }

    /// Set/replace a service API key.
    pub fn upsert_service_api_key(&mut self, id: ServiceId, api_key: String) {
        self.services
            .insert(id.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
