//! Place-name lookup via the Open-Meteo geocoding API (no API key required).

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::{config::ApiConfig, model::GeoLocation, provider::truncate_body};

#[derive(Debug, Clone)]
pub struct Geocoder {
    url: String,
    http: Client,
}

impl Geocoder {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build geocoding HTTP client")?;

        Ok(Self { url, http })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(api.geocoding_url.clone(), Duration::from_secs(api.timeout_secs))
    }

    /// Best match for `name`, or `None` when nothing matches.
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> Result<Option<GeoLocation>> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("name", name), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await
            .context("Failed to send request to Open-Meteo geocoding")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        let Some(first) = parsed.results.into_iter().next() else {
            tracing::debug!("no geocoding results");
            return Ok(None);
        };

        Ok(Some(GeoLocation {
            name: first.name.unwrap_or_else(|| name.to_string()),
            lat: first.latitude,
            lon: first.longitude,
            timezone: first.timezone.unwrap_or_else(|| "UTC".to_string()),
            country: first.country.unwrap_or_default(),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    timezone: Option<String>,
    country: Option<String>,
}
