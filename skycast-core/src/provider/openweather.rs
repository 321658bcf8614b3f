use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::FetchError;
use crate::model::{Condition, CurrentConditions, ForecastSeries, Location, WeatherSample};
use crate::units::UnitSystem;

use super::WeatherProvider;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeather current-weather and 5-day forecast endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{BASE_URL}/{path}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        match res.status() {
            status if status.is_success() => Ok(res.json::<T>().await?),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            status => Err(FetchError::Unknown(format!(
                "OpenWeather {path} request failed with status {status}"
            ))),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("units", unit.as_str().to_string()),
                ],
            )
            .await?;

        Ok(map_current(parsed))
    }

    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: UnitSystem,
    ) -> Result<ForecastSeries, FetchError> {
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("units", unit.as_str().to_string()),
                ],
            )
            .await?;

        Ok(map_forecast(parsed))
    }

    async fn get_current_by_city(
        &self,
        city: &str,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                &[
                    ("q", city.to_string()),
                    ("units", unit.as_str().to_string()),
                ],
            )
            .await?;

        Ok(map_current(parsed))
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    coord: OwCoord,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
    clouds: Option<OwClouds>,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
    coord: OwCoord,
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn condition_from(weather: &[OwCondition]) -> Condition {
    weather.first().map_or_else(
        || Condition {
            main: "Unknown".to_string(),
            description: "unknown".to_string(),
            icon_code: String::new(),
        },
        |w| Condition {
            main: w.main.clone(),
            description: w.description.clone(),
            icon_code: w.icon.clone(),
        },
    )
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

fn map_current(parsed: OwCurrentResponse) -> CurrentConditions {
    let location = Location {
        name: parsed.name,
        country_code: parsed.sys.country.unwrap_or_default(),
        latitude: parsed.coord.lat,
        longitude: parsed.coord.lon,
        timezone_offset_seconds: parsed.timezone,
    };

    let sample = WeatherSample {
        timestamp_utc: unix_to_utc(parsed.dt),
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        temp_min: parsed.main.temp_min,
        temp_max: parsed.main.temp_max,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        wind_speed: parsed.wind.speed,
        cloudiness_pct: parsed.clouds.map(|c| c.all),
        visibility_meters: parsed.visibility,
        condition: condition_from(&parsed.weather),
    };

    CurrentConditions { location, sample }
}

fn map_forecast(parsed: OwForecastResponse) -> ForecastSeries {
    let location = Location {
        name: parsed.city.name,
        country_code: parsed.city.country,
        latitude: parsed.city.coord.lat,
        longitude: parsed.city.coord.lon,
        timezone_offset_seconds: parsed.city.timezone,
    };

    let samples = parsed
        .list
        .into_iter()
        .map(|entry| WeatherSample {
            timestamp_utc: unix_to_utc(entry.dt),
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            temp_min: entry.main.temp_min,
            temp_max: entry.main.temp_max,
            humidity_pct: entry.main.humidity,
            pressure_hpa: entry.main.pressure,
            wind_speed: entry.wind.speed,
            // forecast entries never carry these; they are current-only fields
            cloudiness_pct: None,
            visibility_meters: None,
            condition: condition_from(&entry.weather),
        })
        .collect();

    ForecastSeries { location, samples }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_JSON: &str = r#"{
        "coord": {"lon": -9.1333, "lat": 38.7167},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 21.4, "feels_like": 21.1, "temp_min": 19.8, "temp_max": 23.0,
                 "pressure": 1018, "humidity": 56},
        "visibility": 10000,
        "wind": {"speed": 5.66, "deg": 320},
        "clouds": {"all": 0},
        "dt": 1717243200,
        "sys": {"country": "PT", "sunrise": 1717216800, "sunset": 1717270200},
        "timezone": 3600,
        "id": 2267057,
        "name": "Lisbon",
        "cod": 200
    }"#;

    const FORECAST_JSON: &str = r#"{
        "cod": "200",
        "cnt": 2,
        "list": [
            {"dt": 1717254000,
             "main": {"temp": 20.1, "feels_like": 19.8, "temp_min": 19.5, "temp_max": 20.1,
                      "pressure": 1018, "humidity": 60},
             "weather": [{"id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d"}],
             "wind": {"speed": 4.2, "deg": 310}},
            {"dt": 1717264800,
             "main": {"temp": 18.3, "feels_like": 18.0, "temp_min": 17.9, "temp_max": 18.3,
                      "pressure": 1019, "humidity": 68},
             "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10n"}],
             "wind": {"speed": 3.1, "deg": 290}}
        ],
        "city": {"id": 2267057, "name": "Lisbon",
                 "coord": {"lat": 38.7167, "lon": -9.1333},
                 "country": "PT", "timezone": 3600}
    }"#;

    #[test]
    fn current_payload_maps_into_domain_model() {
        let parsed: OwCurrentResponse =
            serde_json::from_str(CURRENT_JSON).expect("current JSON should parse");
        let current = map_current(parsed);

        assert_eq!(current.location.name, "Lisbon");
        assert_eq!(current.location.country_code, "PT");
        assert_eq!(current.location.timezone_offset_seconds, 3600);
        assert_eq!(current.sample.temperature, 21.4);
        assert_eq!(current.sample.humidity_pct, 56);
        assert_eq!(current.sample.pressure_hpa, 1018);
        assert_eq!(current.sample.cloudiness_pct, Some(0));
        assert_eq!(current.sample.visibility_meters, Some(10000));
        assert_eq!(current.sample.condition.main, "Clear");
        assert_eq!(current.sample.condition.icon_code, "01d");
        assert_eq!(current.sample.timestamp_utc.timestamp(), 1717243200);
    }

    #[test]
    fn forecast_payload_maps_into_ordered_series() {
        let parsed: OwForecastResponse =
            serde_json::from_str(FORECAST_JSON).expect("forecast JSON should parse");
        let series = map_forecast(parsed);

        assert_eq!(series.location.name, "Lisbon");
        assert_eq!(series.samples.len(), 2);
        assert!(series.samples[0].timestamp_utc < series.samples[1].timestamp_utc);
        assert_eq!(series.samples[0].condition.main, "Clouds");
        assert_eq!(series.samples[1].condition.main, "Rain");
        // current-only fields stay absent on forecast samples
        assert_eq!(series.samples[0].cloudiness_pct, None);
        assert_eq!(series.samples[0].visibility_meters, None);
    }

    #[test]
    fn missing_condition_array_falls_back_to_unknown() {
        let condition = condition_from(&[]);
        assert_eq!(condition.main, "Unknown");
    }
}
