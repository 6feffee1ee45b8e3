use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::DatasetError,
    table::{ColumnData, Table},
};

/// One synthetic observation for a (city, date, hour) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub city: String,
    pub timestamp: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    pub day_of_year: u32,
    pub hour: u32,
    pub temp: f64,
    /// Not clamped to [0, 100].
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_dir: u16,
    pub aqi: f64,
    pub uv: f64,
    pub visibility: f64,
    pub pressure: f64,
}

/// Hourly samples grouped by city, chronological within each city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
}

impl WeatherSeries {
    pub fn new(samples: Vec<WeatherSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherSample> {
        self.samples.iter()
    }

    pub fn into_samples(self) -> Vec<WeatherSample> {
        self.samples
    }

    /// Samples of a single city, in series order.
    pub fn for_city(&self, city: &str) -> impl Iterator<Item = &WeatherSample> {
        let city = city.trim().to_lowercase();
        self.samples.iter().filter(move |s| s.city == city)
    }

    /// Columnar view using the sample field names as column names.
    pub fn to_table(&self) -> Result<Table, DatasetError> {
        let s = &self.samples;
        let floats = |f: fn(&WeatherSample) -> f64| ColumnData::Float(s.iter().map(f).collect());
        let ints = |f: fn(&WeatherSample) -> i64| ColumnData::Int(s.iter().map(f).collect());

        Table::new()
            .with_column("city", ColumnData::Text(s.iter().map(|x| x.city.clone()).collect()))?
            .with_column("timestamp", ColumnData::Timestamp(s.iter().map(|x| x.timestamp).collect()))?
            .with_column("lat", floats(|x| x.lat))?
            .with_column("lon", floats(|x| x.lon))?
            .with_column("day_of_year", ints(|x| i64::from(x.day_of_year)))?
            .with_column("hour", ints(|x| i64::from(x.hour)))?
            .with_column("temp", floats(|x| x.temp))?
            .with_column("humidity", floats(|x| x.humidity))?
            .with_column("wind_speed", floats(|x| x.wind_speed))?
            .with_column("wind_dir", ints(|x| i64::from(x.wind_dir)))?
            .with_column("aqi", floats(|x| x.aqi))?
            .with_column("uv", floats(|x| x.uv))?
            .with_column("visibility", floats(|x| x.visibility))?
            .with_column("pressure", floats(|x| x.pressure))
    }
}

impl<'a> IntoIterator for &'a WeatherSeries {
    type Item = &'a WeatherSample;
    type IntoIter = std::slice::Iter<'a, WeatherSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Result of a place-name lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub country: String,
}

/// Current conditions as shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub clouds: Option<f64>,
    pub visibility: Option<f64>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub time: String,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    /// Midpoint of max and min, when both are known.
    pub temp_mean: Option<f64>,
    pub feels_like_max: Option<f64>,
    pub feels_like_min: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub rain_probability: Option<f64>,
    pub wind_speed_max: Option<f64>,
    pub wind_direction: Option<f64>,
    pub uv_index_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub time: NaiveDateTime,
    pub aqi: Option<f64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunTimes {
    pub dawn: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub dusk: DateTime<Utc>,
}
