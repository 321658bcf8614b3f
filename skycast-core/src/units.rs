//! Unit systems and the toggle-style conversions applied to fetched data.
//!
//! The conversions are deliberately untagged: `convert_temperature(v, Metric)`
//! assumes `v` is currently Fahrenheit. Applying a conversion twice corrupts
//! the value, which is why [`retarget`] converts current weather, forecast and
//! hourly data in one pass and is a pure pass-through when source and target
//! systems match.

use crate::model::{CurrentConditions, WeatherSample};

/// Metric (Celsius, m/s) or imperial (Fahrenheit, mph). Always paired,
/// never mixed within one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported systems: metric, imperial."
            )),
        }
    }
}

/// Conversion factor between m/s and mph.
const MPH_PER_MPS: f64 = 2.237;

/// Toggle a temperature into `target`, rounded to the nearest degree.
///
/// `Metric` treats the input as Fahrenheit, `Imperial` treats it as Celsius;
/// the caller is responsible for knowing the source system.
pub fn convert_temperature(value: f64, target: UnitSystem) -> f64 {
    match target {
        UnitSystem::Metric => ((value - 32.0) * 5.0 / 9.0).round(),
        UnitSystem::Imperial => (value * 9.0 / 5.0 + 32.0).round(),
    }
}

/// Toggle a wind speed into `target`, rounded to one decimal place.
/// `Metric` treats the input as mph, `Imperial` as m/s.
pub fn convert_wind_speed(value: f64, target: UnitSystem) -> f64 {
    let converted = match target {
        UnitSystem::Metric => value / MPH_PER_MPS,
        UnitSystem::Imperial => value * MPH_PER_MPS,
    };
    (converted * 10.0).round() / 10.0
}

fn convert_sample(sample: &WeatherSample, target: UnitSystem) -> WeatherSample {
    WeatherSample {
        temperature: convert_temperature(sample.temperature, target),
        feels_like: convert_temperature(sample.feels_like, target),
        temp_min: convert_temperature(sample.temp_min, target),
        temp_max: convert_temperature(sample.temp_max, target),
        wind_speed: convert_wind_speed(sample.wind_speed, target),
        ..sample.clone()
    }
}

/// Convert current weather, the forecast series and the hourly window from
/// `from` to `to` as one logical transaction.
///
/// Returns new values, never mutates in place. When `from == to` the inputs
/// are returned unchanged; converting only some of the three pieces would
/// leave the session mixing unit systems, so there is no per-piece variant.
pub fn retarget(
    current: &CurrentConditions,
    forecast: &[WeatherSample],
    hourly: &[WeatherSample],
    from: UnitSystem,
    to: UnitSystem,
) -> (CurrentConditions, Vec<WeatherSample>, Vec<WeatherSample>) {
    if from == to {
        return (current.clone(), forecast.to_vec(), hourly.to_vec());
    }

    let converted_current = CurrentConditions {
        location: current.location.clone(),
        sample: convert_sample(&current.sample, to),
    };
    let converted_forecast = forecast.iter().map(|s| convert_sample(s, to)).collect();
    let converted_hourly = hourly.iter().map(|s| convert_sample(s, to)).collect();

    (converted_current, converted_forecast, converted_hourly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Location};
    use chrono::{TimeZone, Utc};

    fn sample(temp: f64, wind: f64) -> WeatherSample {
        WeatherSample {
            timestamp_utc: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            temperature: temp,
            feels_like: temp - 1.0,
            temp_min: temp - 2.0,
            temp_max: temp + 2.0,
            humidity_pct: 60,
            pressure_hpa: 1013,
            wind_speed: wind,
            cloudiness_pct: None,
            visibility_meters: None,
            condition: Condition {
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon_code: "01d".to_string(),
            },
        }
    }

    fn current(temp: f64, wind: f64) -> CurrentConditions {
        CurrentConditions {
            location: Location {
                name: "Lisbon".to_string(),
                country_code: "PT".to_string(),
                latitude: 38.72,
                longitude: -9.14,
                timezone_offset_seconds: 3600,
            },
            sample: sample(temp, wind),
        }
    }

    #[test]
    fn unit_system_as_str_roundtrip() {
        for unit in UnitSystem::all() {
            let parsed = UnitSystem::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
        }
    }

    #[test]
    fn unknown_unit_system_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn celsius_to_fahrenheit_known_points() {
        assert_eq!(convert_temperature(0.0, UnitSystem::Imperial), 32.0);
        assert_eq!(convert_temperature(100.0, UnitSystem::Imperial), 212.0);
        assert_eq!(convert_temperature(-40.0, UnitSystem::Imperial), -40.0);
    }

    #[test]
    fn fahrenheit_to_celsius_known_points() {
        assert_eq!(convert_temperature(32.0, UnitSystem::Metric), 0.0);
        assert_eq!(convert_temperature(212.0, UnitSystem::Metric), 100.0);
        assert_eq!(convert_temperature(68.0, UnitSystem::Metric), 20.0);
    }

    #[test]
    fn temperature_roundtrip_within_one_degree() {
        for t in -50..=50 {
            let t = f64::from(t);
            let back = convert_temperature(
                convert_temperature(t, UnitSystem::Imperial),
                UnitSystem::Metric,
            );
            assert!(
                (back - t).abs() <= 1.0,
                "roundtrip of {t} drifted to {back}"
            );
        }
    }

    #[test]
    fn wind_speed_converts_and_rounds_to_one_decimal() {
        assert_eq!(convert_wind_speed(10.0, UnitSystem::Imperial), 22.4);
        assert_eq!(convert_wind_speed(22.37, UnitSystem::Metric), 10.0);
    }

    #[test]
    fn retarget_same_system_is_passthrough() {
        let cur = current(21.0, 4.0);
        let series = vec![sample(10.0, 3.0), sample(12.0, 5.0)];
        let hourly = vec![sample(11.0, 4.0)];

        let (c, f, h) = retarget(&cur, &series, &hourly, UnitSystem::Metric, UnitSystem::Metric);

        assert_eq!(c, cur);
        assert_eq!(f, series);
        assert_eq!(h, hourly);
    }

    #[test]
    fn retarget_converts_every_field_of_every_record() {
        let cur = current(20.0, 10.0);
        let series = vec![sample(0.0, 10.0)];
        let hourly = vec![sample(100.0, 10.0)];

        let (c, f, h) = retarget(&cur, &series, &hourly, UnitSystem::Metric, UnitSystem::Imperial);

        assert_eq!(c.sample.temperature, 68.0);
        assert_eq!(c.sample.feels_like, 66.0);
        assert_eq!(c.sample.temp_min, 64.0);
        assert_eq!(c.sample.temp_max, 72.0);
        assert_eq!(c.sample.wind_speed, 22.4);
        assert_eq!(f[0].temperature, 32.0);
        assert_eq!(f[0].wind_speed, 22.4);
        assert_eq!(h[0].temperature, 212.0);
        // untouched fields survive the conversion
        assert_eq!(c.sample.humidity_pct, 60);
        assert_eq!(c.location, cur.location);
    }

    #[test]
    fn repeated_conversion_is_destructive() {
        // the toggle is untagged: converting twice toward the same target
        // corrupts the value, which retarget's pass-through rule guards against
        let once = convert_temperature(20.0, UnitSystem::Imperial);
        let twice = convert_temperature(once, UnitSystem::Imperial);
        assert_ne!(once, twice);
    }
}
