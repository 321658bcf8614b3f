use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition label as reported by the provider.
///
/// `main` is the coarse label used for grouping and classification
/// (e.g. "Rain"); `description` is the human-readable variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon_code: String,
}

/// One observation at a point in time.
///
/// All unit-bearing fields (`temperature`, `feels_like`, `temp_min`,
/// `temp_max`, `wind_speed`) share a single unit system at any observable
/// instant; conversion replaces the whole record, never individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp_utc: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed: f64,
    /// Present in current-weather payloads only.
    pub cloudiness_pct: Option<u8>,
    /// Present in current-weather payloads only.
    pub visibility_meters: Option<u32>,
    pub condition: Condition,
}

/// A place the weather was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Signed offset from UTC used to render the location's wall-clock time.
    /// Fixed for the session; daylight-saving transitions are not tracked.
    pub timezone_offset_seconds: i32,
}

/// Current conditions for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: Location,
    pub sample: WeatherSample,
}

/// Ordered 3-hourly forecast samples spanning up to 5 days (at most 40
/// entries), non-decreasing by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub location: Location,
    pub samples: Vec<WeatherSample>,
}

/// Derived per-calendar-day rollup of a forecast series. Never persisted.
///
/// Averages are unrounded; rounding is a presentation concern.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub day_name_long: String,
    pub day_name_short: String,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub dominant_condition: Condition,
    pub avg_humidity_pct: f64,
    pub avg_wind_speed: f64,
}

/// One remembered city search. Deduplicated by `(name, country_code)` and
/// bounded to the most recent eight entries (see the `history` module).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub id: String,
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub saved_at_utc: DateTime<Utc>,
}

impl SearchHistoryEntry {
    pub fn new(name: String, country_code: String, latitude: f64, longitude: f64) -> Self {
        let saved_at_utc = Utc::now();
        Self {
            id: format!("{name}-{}", saved_at_utc.timestamp_millis()),
            name,
            country_code,
            latitude,
            longitude,
            saved_at_utc,
        }
    }
}
