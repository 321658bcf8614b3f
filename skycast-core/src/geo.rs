//! Geolocation collaborator.
//!
//! The dashboard only needs a coordinate pair with a timeout; everything
//! else about positioning is the platform's business. `LocationDenied` is
//! reserved for capabilities with a permission model.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;

use crate::error::FetchError;

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Resolve the current position, failing with `LocationDenied`,
    /// `LocationUnavailable` or `Timeout`.
    async fn current_position(&self, timeout: Duration) -> Result<(f64, f64), FetchError>;
}

const IP_API_URL: &str = "http://ip-api.com/json";

/// IP-based lookup, the CLI stand-in for a platform positioning capability.
/// Coarse, but good enough to seed a weather query.
#[derive(Debug, Clone, Default)]
pub struct IpApiGeolocator {
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn position_from(parsed: &IpApiResponse) -> Result<(f64, f64), FetchError> {
    match (parsed.status.as_str(), parsed.lat, parsed.lon) {
        ("success", Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(FetchError::LocationUnavailable),
    }
}

#[async_trait]
impl Geolocator for IpApiGeolocator {
    async fn current_position(&self, timeout: Duration) -> Result<(f64, f64), FetchError> {
        let res = self
            .http
            .get(IP_API_URL)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::LocationUnavailable
                }
            })?;

        let parsed: IpApiResponse = res
            .json()
            .await
            .map_err(|_| FetchError::LocationUnavailable)?;

        position_from(&parsed)
    }
}
