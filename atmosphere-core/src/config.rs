use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinates;

pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_ADVISOR_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ADVISOR_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IP_LOCATOR_ENDPOINT: &str = "http://ip-api.com/json";

/// Environment variables checked (in order) for the language-model credential.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Language-model advisor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Absent key means the advisor is switched off.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl AdvisorConfig {
    /// Credential, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ADVISOR_MODEL.to_string(),
            endpoint: DEFAULT_ADVISOR_ENDPOINT.to_string(),
        }
    }
}

/// Where device position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// Coarse position from the public IP address.
    #[default]
    Ip,
    /// Coordinates written in the config file.
    Fixed,
    /// No location capability at all.
    None,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Ip => "ip",
            LocationSource::Fixed => "fixed",
            LocationSource::None => "none",
        }
    }

    pub const fn all() -> &'static [LocationSource] {
        &[LocationSource::Ip, LocationSource::Fixed, LocationSource::None]
    }
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub source: LocationSource,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IP geolocation endpoint.
    pub endpoint: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: LocationSource::default(),
            latitude: None,
            longitude: None,
            endpoint: DEFAULT_IP_LOCATOR_ENDPOINT.to_string(),
        }
    }
}

impl LocationConfig {
    /// Configured coordinates, if both halves are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }

    pub fn set_fixed(&mut self, at: Coordinates) {
        self.source = LocationSource::Fixed;
        self.latitude = Some(at.latitude);
        self.longitude = Some(at.longitude);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub endpoint: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_WEATHER_ENDPOINT.to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [advisor]
/// api_key = "..."
///
/// [location]
/// source = "fixed"
/// latitude = 40.0
/// longitude = -74.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub advisor: AdvisorConfig,
    pub location: LocationConfig,
    pub weather: WeatherConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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
        let dirs = ProjectDirs::from("dev", "atmosphere", "atmosphere")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay the advisor credential from the environment, if one is set.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());

        if let Some(key) = key {
            self.advisor.api_key = Some(key);
        }
    }

    /// Credential for the advisor, ignoring blank values.
    pub fn advisor_api_key(&self) -> Option<&str> {
        self.advisor.api_key()
    }

    pub fn is_advisor_configured(&self) -> bool {
        self.advisor_api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_services() {
        let cfg = Config::default();

        assert_eq!(cfg.weather.endpoint, DEFAULT_WEATHER_ENDPOINT);
        assert_eq!(cfg.advisor.model, DEFAULT_ADVISOR_MODEL);
        assert_eq!(cfg.location.source, LocationSource::Ip);
        assert!(!cfg.is_advisor_configured());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = Config::from_toml(
            r#"
            [location]
            source = "fixed"
            latitude = 40.0
            longitude = -74.0
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.location.source, LocationSource::Fixed);
        assert_eq!(cfg.location.coordinates(), Some(Coordinates::new(40.0, -74.0)));
        assert_eq!(cfg.advisor.endpoint, DEFAULT_ADVISOR_ENDPOINT);
    }

    #[test]
    fn unknown_location_source_is_rejected() {
        let err = Config::from_toml("[location]\nsource = \"gps\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn coordinates_need_both_halves() {
        let mut loc = LocationConfig::default();
        loc.latitude = Some(1.0);
        assert!(loc.coordinates().is_none());

        loc.set_fixed(Coordinates::new(51.5, -0.12));
        assert_eq!(loc.source, LocationSource::Fixed);
        assert_eq!(loc.coordinates(), Some(Coordinates::new(51.5, -0.12)));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.advisor.api_key = Some("FILE_KEY".into());

        cfg.apply_env_from(|name| (name == "API_KEY").then(|| "ENV_KEY".to_string()));

        assert_eq!(cfg.advisor_api_key(), Some("ENV_KEY"));
    }

    #[test]
    fn gemini_env_var_wins_over_generic_one() {
        let mut cfg = Config::default();

        cfg.apply_env_from(|name| match name {
            "GEMINI_API_KEY" => Some("GEMINI".to_string()),
            "API_KEY" => Some("GENERIC".to_string()),
            _ => None,
        });

        assert_eq!(cfg.advisor_api_key(), Some("GEMINI"));
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let mut cfg = Config::default();
        cfg.apply_env_from(|_| Some("   ".to_string()));
        assert!(!cfg.is_advisor_configured());

        cfg.advisor.api_key = Some(String::new());
        assert!(!cfg.is_advisor_configured());
    }

    #[test]
    fn advisor_key_helper_ignores_blank_values() {
        let mut advisor = AdvisorConfig::default();
        assert_eq!(advisor.api_key(), None);

        advisor.api_key = Some("  ".into());
        assert_eq!(advisor.api_key(), None);

        advisor.api_key = Some("KEY".into());
        assert_eq!(advisor.api_key(), Some("KEY"));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.advisor.api_key = Some("KEY".into());
        cfg.location.set_fixed(Coordinates::new(40.0, -74.0));

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");

        assert_eq!(back.advisor_api_key(), Some("KEY"));
        assert_eq!(back.location.coordinates(), Some(Coordinates::new(40.0, -74.0)));
    }
}
