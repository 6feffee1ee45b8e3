//! Human-friendly text rendering of dashboard data.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use weatherboard_core::{
    AirQuality, CurrentWeather, DailyForecast, GeoLocation, LocationCatalog, SunTimes,
};

pub fn location_line(location: &GeoLocation) -> String {
    format!(
        "Location: {}, {} (lat: {:.2}, lon: {:.2})",
        location.name, location.country, location.lat, location.lon
    )
}

pub fn cities(catalog: &LocationCatalog) -> String {
    let mut out = String::new();
    for entry in catalog {
        let _ = writeln!(out, "{:<16} {:>8.2} {:>8.2}", entry.name, entry.lat, entry.lon);
    }
    out
}

fn value(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v:.1}{unit}"),
        None => "--".to_string(),
    }
}

/// Formats a UTC instant in the location's timezone, falling back to UTC.
fn local_time(t: DateTime<Utc>, timezone: &str) -> String {
    match timezone.parse::<Tz>() {
        Ok(tz) => t.with_timezone(&tz).format("%H:%M").to_string(),
        Err(_) => format!("{} UTC", t.format("%H:%M")),
    }
}

pub fn current_cards(
    location: &GeoLocation,
    weather: &CurrentWeather,
    sun: Option<&SunTimes>,
    air: Option<&AirQuality>,
) -> String {
    let c = &weather.current;
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  {}", value(c.temp, "°C"), location.name);
    let _ = writeln!(out, "  {} · feels like {}", c.description, value(c.feels_like, "°C"));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Humidity     {}", value(c.humidity, "%"));
    let _ = writeln!(out, "  Wind         {}", value(c.wind_speed, " km/h"));
    let _ = writeln!(out, "  Pressure     {}", value(c.pressure, " hPa"));
    let _ = writeln!(out, "  Clouds       {}", value(c.clouds, "%"));
    let _ = writeln!(
        out,
        "  Visibility   {}",
        value(c.visibility.map(|m| m / 1000.0), " km")
    );

    if let Some(sun) = sun {
        let tz = location.timezone.as_str();
        let _ = writeln!(out);
        let _ = writeln!(out, "  Dawn         {}", local_time(sun.dawn, tz));
        let _ = writeln!(out, "  Sunrise      {}", local_time(sun.sunrise, tz));
        let _ = writeln!(out, "  Sunset       {}", local_time(sun.sunset, tz));
        let _ = writeln!(out, "  Dusk         {}", local_time(sun.dusk, tz));
    }

    if let Some(air) = air {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  AQI {}  PM10 {}  PM2.5 {}  ({})",
            value(air.aqi, ""),
            value(air.pm10, ""),
            value(air.pm2_5, ""),
            air.time.format("%H:%M")
        );
    }

    if !weather.hourly.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Next hours");
        for point in &weather.hourly {
            let time = point.time.split('T').nth(1).unwrap_or(&point.time);
            let _ = writeln!(
                out,
                "  {:<6} {:>8} {:>7} {:>11}",
                time,
                value(point.temp, "°C"),
                value(point.humidity, "%"),
                value(point.wind_speed, " km/h"),
            );
        }
    }

    out
}

pub fn daily_table(forecast: &[DailyForecast]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>8} {:>8} {:>6} {:>11} {:>5}",
        "date", "max", "min", "mean", "precip", "rain", "wind", "uv"
    );

    for day in forecast {
        let _ = writeln!(
            out,
            "{:<10} {:>8} {:>8} {:>8} {:>8} {:>6} {:>11} {:>5}",
            day.date,
            value(day.temp_max, "°C"),
            value(day.temp_min, "°C"),
            value(day.temp_mean, "°C"),
            value(day.precipitation_mm, "mm"),
            value(day.rain_probability, "%"),
            value(day.wind_speed_max, " km/h"),
            value(day.uv_index_max, ""),
        );
    }
    out
}
