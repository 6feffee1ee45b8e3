use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::{
    config::ApiConfig,
    model::{AirQuality, CurrentConditions, CurrentWeather, DailyForecast, HourlyPoint},
    provider::{HOURLY_POINTS, MAX_FORECAST_DAYS, truncate_body},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,wind_speed_10m,pressure_msl,cloud_cover,visibility";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,apparent_temperature_max,apparent_temperature_min,precipitation_sum,precipitation_probability_max,wind_speed_10m_max,wind_direction_10m_dominant,uv_index_max";
const AIR_QUALITY_FIELDS: &str = "european_aqi,pm10,pm2_5";

/// Cloud cover (%) above which conditions are described as cloudy.
const CLOUDY_ABOVE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    forecast_url: String,
    air_quality_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(forecast_url: String, air_quality_url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Open-Meteo HTTP client")?;

        Ok(Self {
            forecast_url,
            air_quality_url,
            http,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            api.forecast_url.clone(),
            api.air_quality_url.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
    }

    async fn fetch_air_quality(&self, lat: f64, lon: f64) -> Result<Option<AirQuality>> {
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("hourly", AIR_QUALITY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];

        let parsed: OmAirQualityResponse = self
            .get_json(&self.air_quality_url, &query, "air quality")
            .await?;

        Ok(parsed.hourly.and_then(|h| h.latest()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct OmCurrent {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    wind_speed_10m: Option<f64>,
    pressure_msl: Option<f64>,
    cloud_cover: Option<f64>,
    visibility: Option<f64>,
}

impl From<OmCurrent> for CurrentConditions {
    fn from(c: OmCurrent) -> Self {
        let description = match c.cloud_cover {
            Some(clouds) if clouds > CLOUDY_ABOVE => "Cloudy",
            _ => "Clear",
        };

        CurrentConditions {
            temp: c.temperature_2m,
            feels_like: c.apparent_temperature,
            humidity: c.relative_humidity_2m,
            wind_speed: c.wind_speed_10m,
            pressure: c.pressure_msl,
            clouds: c.cloud_cover,
            visibility: c.visibility,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OmHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

impl OmHourly {
    fn points(&self, limit: usize) -> Vec<HourlyPoint> {
        self.time
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, time)| HourlyPoint {
                time: time.clone(),
                temp: at(&self.temperature_2m, i),
                humidity: at(&self.relative_humidity_2m, i),
                wind_speed: at(&self.wind_speed_10m, i),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    #[serde(default)]
    current: OmCurrent,
    #[serde(default)]
    hourly: OmHourly,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_max: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m_dominant: Vec<Option<f64>>,
    #[serde(default)]
    uv_index_max: Vec<Option<f64>>,
}

impl OmDaily {
    fn into_forecast(self) -> Vec<DailyForecast> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let temp_max = at(&self.temperature_2m_max, i);
                let temp_min = at(&self.temperature_2m_min, i);

                DailyForecast {
                    date: *date,
                    temp_max,
                    temp_min,
                    temp_mean: temp_max.zip(temp_min).map(|(hi, lo)| (hi + lo) / 2.0),
                    feels_like_max: at(&self.apparent_temperature_max, i),
                    feels_like_min: at(&self.apparent_temperature_min, i),
                    precipitation_mm: at(&self.precipitation_sum, i),
                    rain_probability: at(&self.precipitation_probability_max, i),
                    wind_speed_max: at(&self.wind_speed_10m_max, i),
                    wind_direction: at(&self.wind_direction_10m_dominant, i),
                    uv_index_max: at(&self.uv_index_max, i),
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OmDailyResponse {
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmAirQualityHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    european_aqi: Vec<Option<f64>>,
    #[serde(default)]
    pm10: Vec<Option<f64>>,
    #[serde(default)]
    pm2_5: Vec<Option<f64>>,
}

impl OmAirQualityHourly {
    fn latest(&self) -> Option<AirQuality> {
        let idx = self.time.len().checked_sub(1)?;
        let time = parse_local_time(&self.time[idx])?;

        Some(AirQuality {
            time,
            aqi: at(&self.european_aqi, idx),
            pm10: at(&self.pm10, idx),
            pm2_5: at(&self.pm2_5, idx),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmAirQualityResponse {
    hourly: Option<OmAirQualityHourly>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, lat: f64, lon: f64, timezone: &str) -> Result<CurrentWeather> {
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", timezone.to_string()),
        ];

        let parsed: OmCurrentResponse = self
            .get_json(&self.forecast_url, &query, "current weather")
            .await?;

        Ok(CurrentWeather {
            current: parsed.current.into(),
            hourly: parsed.hourly.points(HOURLY_POINTS),
        })
    }

    #[instrument(skip(self))]
    async fn daily_forecast(&self, lat: f64, lon: f64, days: u32) -> Result<Vec<DailyForecast>> {
        if days == 0 {
            bail!("days must be >= 1");
        }
        let days = days.min(MAX_FORECAST_DAYS);

        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", days.to_string()),
        ];

        let parsed: OmDailyResponse = self
            .get_json(&self.forecast_url, &query, "forecast")
            .await?;

        let daily = parsed
            .daily
            .ok_or_else(|| anyhow!("No 'daily' section found in Open-Meteo response"))?;

        Ok(daily.into_forecast())
    }

    async fn current_air_quality(&self, lat: f64, lon: f64) -> Option<AirQuality> {
        match self.fetch_air_quality(lat, lon).await {
            Ok(aq) => aq,
            Err(err) => {
                tracing::warn!("air quality unavailable: {err:#}");
                None
            }
        }
    }
}

fn at(values: &[Option<f64>], idx: usize) -> Option<f64> {
    values.get(idx).copied().flatten()
}

/// Open-Meteo reports local times as `YYYY-MM-DDTHH:MM`.
fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
