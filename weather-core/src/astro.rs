use anyhow::{Context, Result};
use chrono::NaiveDate;
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use crate::model::SunTimes;

/// Civil dawn, sunrise, sunset and civil dusk (UTC) for a location and date.
///
/// Fails when any of the four events does not occur that day (polar day or night).
pub fn sun_times(lat: f64, lon: f64, date: NaiveDate) -> Result<SunTimes> {
    let coordinates = Coordinates::new(lat, lon)
        .with_context(|| format!("Invalid coordinates: lat={lat}, lon={lon}"))?;

    let day = SolarDay::new(coordinates, date);
    let event = |event: SolarEvent, name: &str| {
        day.event_time(event).with_context(|| {
            format!("No {name} at lat={lat}, lon={lon} on {date} (polar day or night)")
        })
    };

    Ok(SunTimes {
        dawn: event(SolarEvent::Dawn(DawnType::Civil), "dawn")?,
        sunrise: event(SolarEvent::Sunrise, "sunrise")?,
        sunset: event(SolarEvent::Sunset, "sunset")?,
        dusk: event(SolarEvent::Dusk(DawnType::Civil), "dusk")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn events_are_ordered() {
        // London, midsummer
        let t = sun_times(51.50, -0.12, date(2024, 6, 21)).expect("valid coordinates");

        assert!(t.dawn < t.sunrise);
        assert!(t.sunrise < t.sunset);
        assert!(t.sunset < t.dusk);
    }

    #[test]
    fn equator_day_is_about_twelve_hours() {
        let t = sun_times(0.0, 0.0, date(2024, 3, 20)).expect("valid coordinates");
        let minutes = (t.sunset - t.sunrise).num_minutes();

        assert!((715..=735).contains(&minutes), "day length was {minutes} min");
        assert!((5..=6).contains(&t.sunrise.hour()));
    }

    #[test]
    fn midnight_sun_is_an_error() {
        // Tromsø, midsummer: the sun never sets
        let err = sun_times(69.65, 18.96, date(2024, 6, 21)).unwrap_err();
        assert!(err.to_string().contains("polar day or night"), "{err}");
    }

    #[test]
    fn polar_night_is_an_error() {
        let err = sun_times(78.22, 15.65, date(2024, 12, 21)).unwrap_err();
        assert!(err.to_string().contains("polar day or night"), "{err}");
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = sun_times(95.0, 0.0, date(2024, 1, 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid coordinates"));
    }
}
