use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Top-level configuration stored on disk.
///
/// Every field has a default, so a missing config file means "defaults".
/// Base URLs are configurable mainly so tests can point the clients at a
/// mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Forecast API base, e.g. <https://api.open-meteo.com/v1>.
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Geocoding API base, e.g. <https://geocoding-api.open-meteo.com/v1>.
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// HTTP timeout applied to every client, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// User-directory service settings (profile-location lookups).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_directory_base_url")]
    pub base_url: String,

    /// Credential for the directory service. Absent means profile-location
    /// lookups report the service as unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Rain-alert backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alerts_base_url")]
    pub base_url: String,
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_directory_base_url() -> String {
    "https://api.farcaster.directory/v1".to_string()
}

fn default_alerts_base_url() -> String {
    "https://farweather-be.vercel.app".to_string()
}

const fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            directory: DirectoryConfig::default(),
            alerts: AlertsConfig::default(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_base_url(),
            api_key: None,
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            base_url: default_alerts_base_url(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
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
        let path = Self::config_file_path()?;
        self.save_to(&path)
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
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Path to the persisted-location file (see [`crate::store`]).
    pub fn location_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.data_dir().join("location.json"))
    }

    pub fn set_directory_api_key(&mut self, api_key: String) {
        self.directory.api_key = Some(api_key);
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "farweather", "farweather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let cfg = Config::default();
        assert_eq!(cfg.forecast_base_url, "https://api.open-meteo.com/v1");
        assert_eq!(cfg.geocoding_base_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(cfg.http_timeout_secs, 30);
        assert!(cfg.directory.api_key.is_none());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(cfg.alerts.base_url, "https://farweather-be.vercel.app");
    }

    #[test]
    fn roundtrips_through_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_directory_api_key("SECRET".to_string());
        cfg.forecast_base_url = "http://localhost:9000".to_string();
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.forecast_base_url, "http://localhost:9000");
        assert_eq!(loaded.directory.api_key.as_deref(), Some("SECRET"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "http_timeout_secs = 5\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.http_timeout_secs, 5);
        assert_eq!(cfg.forecast_base_url, "https://api.open-meteo.com/v1");
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "not valid toml [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
