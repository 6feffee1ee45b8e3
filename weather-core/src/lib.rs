//! Core library for the `weatherboard` CLI.
//!
//! This crate defines:
//! - A deterministic synthetic hourly weather generator over a location catalog
//! - Feature projection of the generated table for model training
//! - Configuration handling
//! - Open-Meteo geocoding, forecast and air quality clients, plus sun times
//!
//! It is used by `weatherboard-cli`, but can also be reused by other binaries or services.

pub mod astro;
pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod generator;
pub mod geocode;
pub mod model;
pub mod noise;
pub mod provider;
pub mod table;

pub use astro::sun_times;
pub use catalog::{CatalogEntry, LocationCatalog};
pub use config::{ApiConfig, Config, GeneratorConfig};
pub use error::{DatasetError, GeneratorError};
pub use features::{FEATURE_COLUMNS, build_features, series_features};
pub use generator::{SyntheticWeatherGenerator, generate};
pub use geocode::Geocoder;
pub use model::{
    AirQuality, CurrentConditions, CurrentWeather, DailyForecast, GeoLocation, HourlyPoint,
    SunTimes, WeatherSample, WeatherSeries,
};
pub use noise::{NoiseSource, SeededNoise};
pub use provider::{WeatherProvider, provider_from_config};
pub use table::{Column, ColumnData, Table};
