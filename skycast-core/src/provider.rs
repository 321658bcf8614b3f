use crate::error::FetchError;
use crate::model::{CurrentConditions, ForecastSeries};
use crate::units::UnitSystem;
use crate::{Config, ServiceId};
use async_trait::async_trait;
use std::{fmt::Debug, future::Future, time::Duration};

pub mod openweather;

use openweather::OpenWeatherClient;

/// Maximum attempts for one logical fetch, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Upstream weather data source.
///
/// All calls return the taxonomy in [`FetchError`]; callers wrap transient
/// failures with [`fetch_with_retry`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at a coordinate, fetched in `unit`.
    async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, FetchError>;

    /// 5-day / 3-hourly forecast at a coordinate, fetched in `unit`.
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: UnitSystem,
    ) -> Result<ForecastSeries, FetchError>;

    /// Resolve a typed city name to its current conditions (and thereby its
    /// coordinates, for the follow-up forecast fetch).
    async fn get_current_by_city(
        &self,
        city: &str,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, FetchError>;
}

/// Retry a fetch up to [`MAX_ATTEMPTS`] times with increasing backoff.
///
/// Rate-limit responses wait twice as long as other transient failures;
/// permanent failures (not found, denied) return immediately.
pub async fn fetch_with_retry<T, F, Fut>(mut op: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                let mut delay = BASE_BACKOFF * attempt;
                if matches!(err, FetchError::RateLimited) {
                    delay *= 2;
                }
                tracing::warn!(%err, attempt, "transient fetch failure, backing off");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.service_api_key(ServiceId::OpenWeather).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for '{}'.\n\
             Hint: run `skycast configure {}` and enter your API key.",
            ServiceId::OpenWeather,
            ServiceId::OpenWeather,
        )
    })?;

    Ok(OpenWeatherClient::new(api_key.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retry_recovers_from_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = fetch_with_retry(|| {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(FetchError::Timeout)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = fetch_with_retry(|| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::RateLimited)
            }
        })
        .await;

        assert_eq!(result, Err(FetchError::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = fetch_with_retry(|| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::NotFound)
            }
        })
        .await;

        assert_eq!(result, Err(FetchError::NotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "KEY".to_string());
        assert!(provider_from_config(&cfg).is_ok());
    }
}
