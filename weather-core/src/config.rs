use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    catalog::{CatalogEntry, LocationCatalog},
    generator::{DEFAULT_DAYS, DEFAULT_SEED, SyntheticWeatherGenerator, default_epoch},
};

/// Overrides the on-disk config location.
pub const CONFIG_PATH_ENV: &str = "WEATHERBOARD_CONFIG";

/// Defaults for synthetic series generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            seed: DEFAULT_SEED,
            epoch: default_epoch(),
        }
    }
}

/// Open-Meteo endpoints and HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            geocoding_url: default_geocoding_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [generator]
/// days = 30
/// seed = 7
///
/// [[cities]]
/// name = "Paris"
/// lat = 48.85
/// lon = 2.35
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Replaces the builtin catalog when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cities: Vec<CatalogEntry>,

    #[serde(default)]
    pub api: ApiConfig,
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Catalog for generation: configured cities, or the builtin set.
    pub fn catalog(&self) -> LocationCatalog {
        if self.cities.is_empty() {
            LocationCatalog::builtin()
        } else {
            self.cities.iter().cloned().collect()
        }
    }

    pub fn generator(&self) -> SyntheticWeatherGenerator {
        SyntheticWeatherGenerator::new(self.generator.epoch)
    }

    pub fn set_city(&mut self, name: &str, lat: f64, lon: f64) {
        let mut catalog = self.catalog();
        catalog.insert(name, lat, lon);
        self.cities = catalog.iter().cloned().collect();
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.generator()
            .check_horizon(cfg.generator.days)
            .with_context(|| format!("Invalid [generator] settings in {}", path.display()))?;

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
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "weatherboard", "weatherboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let cfg = Config::default();

        assert_eq!(cfg.generator.days, 120);
        assert_eq!(cfg.generator.seed, 42);
        assert_eq!(cfg.generator.epoch, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(cfg.catalog(), LocationCatalog::builtin());
        assert_eq!(cfg.api.timeout_secs, 10);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [generator]
            seed = 7

            [[cities]]
            name = "Paris"
            lat = 48.85
            lon = 2.35
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.generator.seed, 7);
        assert_eq!(cfg.generator.days, 120);
        assert_eq!(cfg.api, ApiConfig::default());

        let catalog = cfg.catalog();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("paris").is_some());
    }

    #[test]
    fn epoch_parses_from_iso_date() {
        let cfg: Config = toml::from_str("[generator]\nepoch = \"2023-06-01\"\n").expect("valid toml");
        assert_eq!(cfg.generator().epoch(), NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
    }

    #[test]
    fn set_city_extends_builtin_catalog() {
        let mut cfg = Config::default();
        cfg.set_city("Paris", 48.85, 2.35);

        let catalog = cfg.catalog();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.iter().last().map(|e| e.name.as_str()), Some("paris"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("weatherboard-cfg-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.generator.days = 3;
        cfg.set_city("Oslo", 59.91, 10.75);
        cfg.save_to(&path).expect("save succeeds");

        let loaded = Config::load_from(&path).expect("load succeeds");
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn epoch_without_room_for_days_is_rejected() {
        let dir = std::env::temp_dir().join(format!("weatherboard-epoch-{}", std::process::id()));
        let path = dir.join("config.toml");
        fs::create_dir_all(&dir).expect("temp dir");
        fs::write(&path, "[generator]\nepoch = \"+262142-12-31\"\ndays = 2\n").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid [generator] settings"));
        assert!(format!("{err:#}").contains("last representable date"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("weatherboard-does-not-exist.toml");
        assert_eq!(Config::load_from(&path).expect("defaults"), Config::default());
    }
}
