//! Deterministic synthetic hourly weather.
//!
//! Each sample is a seasonal plus diurnal temperature curve with Gaussian
//! noise, and a handful of variables derived from it. All randomness comes
//! from a single [`NoiseSource`] consumed in a fixed order (city, day, hour,
//! then variable), so the same seed always yields the same series.

use std::f64::consts::PI;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::instrument;

use crate::{
    catalog::{CatalogEntry, LocationCatalog},
    error::GeneratorError,
    model::{WeatherSample, WeatherSeries},
    noise::{NoiseSource, SeededNoise},
};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DAYS: u32 = 120;

/// January 1st of the reference year.
pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Generate `days` days of hourly samples for every city, starting at the default epoch.
pub fn generate(catalog: &LocationCatalog, days: u32, seed: u64) -> WeatherSeries {
    SyntheticWeatherGenerator::default().generate(catalog, days, seed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticWeatherGenerator {
    epoch: NaiveDate,
}

impl Default for SyntheticWeatherGenerator {
    fn default() -> Self {
        Self::new(default_epoch())
    }
}

impl SyntheticWeatherGenerator {
    pub fn new(epoch: NaiveDate) -> Self {
        Self { epoch }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// Checks that every hour of `days` days from the epoch is a valid timestamp.
    pub fn check_horizon(&self, days: u32) -> Result<(), GeneratorError> {
        let Some(last_hour) = (u64::from(days) * 24).checked_sub(1) else {
            return Ok(());
        };

        let start = self.epoch.and_time(NaiveTime::MIN);
        Duration::try_hours(last_hour as i64)
            .and_then(|offset| start.checked_add_signed(offset))
            .map(|_| ())
            .ok_or(GeneratorError::HorizonOverflow {
                epoch: self.epoch,
                days,
            })
    }

    /// # Panics
    ///
    /// When [`check_horizon`](Self::check_horizon) fails for `days`.
    pub fn generate(&self, catalog: &LocationCatalog, days: u32, seed: u64) -> WeatherSeries {
        let mut noise = SeededNoise::new(seed);
        self.generate_with(catalog, days, &mut noise)
    }

    /// Row count is `catalog.len() * days * 24`; `days == 0` gives an empty series.
    ///
    /// # Panics
    ///
    /// When [`check_horizon`](Self::check_horizon) fails for `days`.
    #[instrument(skip(self, catalog, noise), fields(cities = catalog.len()))]
    pub fn generate_with<N: NoiseSource>(
        &self,
        catalog: &LocationCatalog,
        days: u32,
        noise: &mut N,
    ) -> WeatherSeries {
        let start = self.epoch.and_time(NaiveTime::MIN);
        let mut samples = Vec::with_capacity(catalog.len() * days as usize * 24);

        for entry in catalog {
            for day in 0..days {
                for hour in 0..24 {
                    let timestamp =
                        start + Duration::days(i64::from(day)) + Duration::hours(i64::from(hour));
                    samples.push(sample(entry, day, hour, timestamp, noise));
                }
            }
        }

        tracing::debug!(rows = samples.len(), days, "generated synthetic weather");
        WeatherSeries::new(samples)
    }
}

/// Temperature without noise for a given day of year and hour.
pub fn expected_temp(day_of_year: u32, hour: u32) -> f64 {
    20.0 + seasonal(day_of_year) + diurnal(hour)
}

fn seasonal(day_of_year: u32) -> f64 {
    10.0 * (2.0 * PI * (f64::from(day_of_year) - 80.0) / 365.0).sin()
}

fn diurnal(hour: u32) -> f64 {
    6.0 * (2.0 * PI * (f64::from(hour) - 14.0) / 24.0).sin()
}

fn sample<N: NoiseSource>(
    entry: &CatalogEntry,
    day: u32,
    hour: u32,
    timestamp: NaiveDateTime,
    noise: &mut N,
) -> WeatherSample {
    let day_of_year = timestamp.ordinal();
    let diurnal = diurnal(hour);

    // Draw order matters for reproducibility.
    let temp = 20.0 + seasonal(day_of_year) + diurnal + noise.normal(0.0, 1.5);
    let humidity = 60.0 + noise.normal(0.0, 8.0) - 0.2 * diurnal;
    let wind_speed = noise.normal(6.0, 2.0).abs();
    let wind_dir = noise.integer(0, 360) as u16;
    let aqi = 60.0 + 0.4 * temp + 0.3 * humidity - 0.5 * wind_speed + noise.normal(0.0, 5.0);
    let uv = (10.0 * (PI * f64::from(hour) / 24.0).sin()).max(0.0);
    let visibility = (10.0 - (humidity - 50.0) * 0.05 + noise.normal(0.0, 0.5)).max(1.0);
    let pressure = 1005.0 + 5.0 * (f64::from(day) / 10.0).sin() + noise.normal(0.0, 1.0);

    WeatherSample {
        city: entry.name.clone(),
        timestamp,
        lat: entry.lat,
        lon: entry.lon,
        day_of_year,
        hour,
        temp,
        humidity,
        wind_speed,
        wind_dir,
        aqi,
        uv,
        visibility,
        pressure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    /// Replays a fixed script of values and records what was asked for.
    #[derive(Default)]
    struct ScriptedNoise {
        normals: Vec<f64>,
        integers: Vec<u32>,
        calls: Vec<&'static str>,
    }

    impl NoiseSource for ScriptedNoise {
        fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
            self.calls.push("normal");
            mean + self.normals.pop().unwrap_or(0.0)
        }

        fn integer(&mut self, low: u32, _high: u32) -> u32 {
            self.calls.push("integer");
            self.integers.pop().unwrap_or(low)
        }
    }

    fn test_city() -> LocationCatalog {
        [("testcity", 0.0, 0.0)].into_iter().collect()
    }

    #[test]
    fn single_day_scenario() {
        let series = generate(&test_city(), 1, 42);

        assert_eq!(series.len(), 24);
        assert!(series.iter().all(|s| s.day_of_year == 1));

        let hours: Vec<u32> = series.iter().map(|s| s.hour).collect();
        assert_eq!(hours, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let catalog = LocationCatalog::builtin();
        let a = generate(&catalog, 3, 42);
        let b = generate(&catalog, 3, 42);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.temp.to_bits(), y.temp.to_bits());
            assert_eq!(x.humidity.to_bits(), y.humidity.to_bits());
            assert_eq!(x.pressure.to_bits(), y.pressure.to_bits());
            assert_eq!(x, y);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let catalog = test_city();
        assert_ne!(generate(&catalog, 1, 1), generate(&catalog, 1, 2));
    }

    #[test]
    fn row_count_matches_catalog_days_hours() {
        let catalog = LocationCatalog::builtin();
        for days in [1, 2, 7] {
            assert_eq!(generate(&catalog, days, 0).len(), catalog.len() * days as usize * 24);
        }
    }

    #[test]
    fn zero_days_or_empty_catalog_is_empty() {
        assert!(generate(&LocationCatalog::builtin(), 0, 42).is_empty());
        assert!(generate(&LocationCatalog::new(), 10, 42).is_empty());
    }

    #[test]
    fn bounds_hold_for_every_row() {
        let series = generate(&LocationCatalog::builtin(), 30, 7);

        for s in &series {
            assert!(s.wind_speed >= 0.0);
            assert!(s.uv >= 0.0);
            assert!(s.visibility >= 1.0);
            assert!(s.wind_dir < 360);
            for v in [s.temp, s.humidity, s.wind_speed, s.aqi, s.uv, s.visibility, s.pressure] {
                assert!(v.is_finite());
            }
        }
    }

    #[test]
    fn rows_grouped_by_city_then_chronological() {
        let catalog = LocationCatalog::builtin();
        let days = 3;
        let series = generate(&catalog, days, 5);
        let per_city = days as usize * 24;

        for (i, entry) in catalog.iter().enumerate() {
            let block = &series.samples()[i * per_city..(i + 1) * per_city];
            assert!(block.iter().all(|s| s.city == entry.name));
            assert!(block.iter().all(|s| (s.lat, s.lon) == (entry.lat, entry.lon)));
            assert!(block.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        }
    }

    #[test]
    fn timestamps_follow_epoch() {
        let epoch = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date");
        let series = SyntheticWeatherGenerator::new(epoch).generate(&test_city(), 2, 1);

        let first = &series.samples()[0];
        assert_eq!(first.timestamp.date(), epoch);
        assert_eq!(first.day_of_year, 365);

        let next_day = &series.samples()[24];
        assert_eq!(next_day.day_of_year, 1);
        assert_eq!(next_day.timestamp.hour(), 0);
    }

    #[test]
    fn horizon_past_last_date_is_rejected() {
        let generator = SyntheticWeatherGenerator::new(NaiveDate::MAX);

        assert_eq!(generator.check_horizon(0), Ok(()));
        assert_eq!(generator.check_horizon(1), Ok(()));
        assert_eq!(
            generator.check_horizon(2),
            Err(GeneratorError::HorizonOverflow {
                epoch: NaiveDate::MAX,
                days: 2
            })
        );

        let default = SyntheticWeatherGenerator::default();
        assert_eq!(default.check_horizon(DEFAULT_DAYS), Ok(()));
        assert!(default.check_horizon(u32::MAX).is_err());
    }

    #[test]
    fn leap_year_reaches_day_366() {
        let series = generate(&test_city(), 366, 1);
        let last = series.samples().last().expect("non-empty");
        assert_eq!(last.day_of_year, 366);
        assert_eq!(last.hour, 23);
    }

    #[test]
    fn draws_seven_values_per_sample_in_order() {
        let mut noise = ScriptedNoise::default();
        SyntheticWeatherGenerator::default().generate_with(&test_city(), 1, &mut noise);

        assert_eq!(noise.calls.len(), 24 * 7);
        assert_eq!(
            &noise.calls[..7],
            ["normal", "normal", "normal", "integer", "normal", "normal", "normal"]
        );
    }

    #[test]
    fn noise_free_values_match_model() {
        let mut noise = ScriptedNoise::default();
        let series = SyntheticWeatherGenerator::default().generate_with(&test_city(), 1, &mut noise);

        let noon = &series.samples()[12];
        let diurnal = 6.0 * (2.0 * PI * (12.0 - 14.0) / 24.0).sin();
        let temp = expected_temp(1, 12);
        let humidity = 60.0 - 0.2 * diurnal;

        assert!((noon.temp - temp).abs() < 1e-12);
        assert!((noon.humidity - humidity).abs() < 1e-12);
        assert!((noon.wind_speed - 6.0).abs() < 1e-12);
        assert_eq!(noon.wind_dir, 0);
        assert!((noon.aqi - (60.0 + 0.4 * temp + 0.3 * humidity - 3.0)).abs() < 1e-12);
        assert!((noon.uv - 10.0).abs() < 1e-12);
        assert!((noon.visibility - (10.0 - (humidity - 50.0) * 0.05)).abs() < 1e-12);
        assert!((noon.pressure - 1005.0).abs() < 1e-12);
    }

    #[test]
    fn wind_speed_is_folded_positive() {
        let mut noise = ScriptedNoise {
            // popped from the back: temp, humidity, wind speed offset
            normals: vec![0.0, 0.0, 0.0, 0.0, -10.0, 0.0, 0.0],
            ..Default::default()
        };
        let series = SyntheticWeatherGenerator::default().generate_with(&test_city(), 1, &mut noise);

        assert!((series.samples()[0].wind_speed - 4.0).abs() < 1e-12);
    }

    #[test]
    fn humidity_is_not_clamped() {
        let mut noise = ScriptedNoise {
            normals: vec![0.0, 0.0, 0.0, 0.0, 0.0, 100.0, 0.0],
            ..Default::default()
        };
        let series = SyntheticWeatherGenerator::default().generate_with(&test_city(), 1, &mut noise);

        assert!(series.samples()[0].humidity > 100.0);
    }

    #[test]
    fn uv_is_zero_only_at_midnight() {
        let series = generate(&test_city(), 1, 3);
        assert_eq!(series.samples()[0].uv, 0.0);
        assert!(series.samples()[1..].iter().all(|s| s.uv > 0.0));
    }

    #[test]
    fn temp_mean_converges_to_seasonal_curve() {
        let catalog = test_city();
        let seeds = 200;
        let hour = 14;
        // near trough, rising zero, peak, falling zero
        let days = [1u32, 80, 172, 264];

        let runs: Vec<WeatherSeries> = (0..seeds)
            .map(|seed| generate(&catalog, 264, seed))
            .collect();

        for day in days {
            let idx = (day as usize - 1) * 24 + hour as usize;
            let mean = runs.iter().map(|s| s.samples()[idx].temp).sum::<f64>() / seeds as f64;

            // stddev of the mean is 1.5 / sqrt(200) ~= 0.11
            let expected = expected_temp(day, hour);
            assert!(
                (mean - expected).abs() < 0.5,
                "day {day}: mean was {mean}, expected {expected}"
            );
        }
    }
}
