use crate::{
    Config,
    model::{AirQuality, CurrentWeather, DailyForecast},
    provider::openmeteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// Longest forecast horizon the API serves, in days.
pub const MAX_FORECAST_DAYS: u32 = 16;

/// Number of hourly points kept alongside the current conditions.
pub const HOURLY_POINTS: usize = 8;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus the next few hourly points.
    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
        timezone: &str,
    ) -> anyhow::Result<CurrentWeather>;

    /// Daily forecast. `days == 0` is an error; values above
    /// [`MAX_FORECAST_DAYS`] are clamped.
    async fn daily_forecast(
        &self,
        lat: f64,
        lon: f64,
        days: u32,
    ) -> anyhow::Result<Vec<DailyForecast>>;

    /// Latest air quality reading; `None` on any failure.
    async fn current_air_quality(&self, lat: f64, lon: f64) -> Option<AirQuality>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenMeteoProvider::from_config(&config.api)?))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
