use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Provider endpoints; overridable so tests and mirrors can point elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub forecast_url: String,
    pub geocoding_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "pt"
/// default_city = "Lisboa"
/// refresh_interval_secs = 3600
///
/// [endpoints]
/// forecast_url = "https://api.open-meteo.com/v1/forecast"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language for geocoding results, e.g. "en" or "pt".
    pub language: String,

    /// City used when a command gets neither a city nor coordinates.
    pub default_city: Option<String>,

    pub forecast_days: u8,

    /// Candidates requested when resolving a city name.
    pub search_count: u8,

    /// Candidates requested for autocomplete suggestions.
    pub suggestion_count: u8,

    pub timeout_secs: u64,

    pub refresh_interval_secs: u64,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            default_city: None,
            forecast_days: 15,
            search_count: 10,
            suggestion_count: 5,
            timeout_secs: 10,
            refresh_interval_secs: 60 * 60,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Return the configured default city, or a hint on how to set one.
    pub fn default_city(&self) -> Result<&str> {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No city given and no default city configured.\n\
                     Hint: pass a city name, use --lat/--lon, or run `meteo configure`."
                )
            })
    }

    pub fn set_default_city(&mut self, city: Option<String>) {
        self.default_city = city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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
        let dirs = ProjectDirs::from("dev", "meteo", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
