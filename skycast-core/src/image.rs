//! Best-effort backdrop image lookup.
//!
//! Image search never fails upward: any provider error or empty result falls
//! back to a static per-condition default, so the dashboard always has a
//! backdrop to show.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{Config, ServiceId};

const SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Image search collaborator. `None` covers both "nothing found" and any
/// transport failure.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn search(&self, query: &str) -> Option<String>;
}

/// Prioritized candidate queries for a city backdrop. The weather-flavored
/// query goes first when a condition is known; the attempt count is bounded
/// by the list length.
pub fn candidate_queries(city: &str, country: &str, condition: Option<&str>) -> Vec<String> {
    let mut queries = Vec::new();
    if let Some(condition) = condition {
        queries.push(format!("{city} {condition}"));
    }
    queries.push(format!("{city} {country} city"));
    queries.push(format!("{city} skyline"));
    queries.push(format!("{city} cityscape"));
    queries
}

/// Try each candidate query in order, short-circuiting on the first hit, and
/// fall back to the static default for the condition.
pub async fn fetch_city_image(
    provider: &dyn ImageProvider,
    city: &str,
    country: &str,
    condition: Option<&str>,
) -> String {
    for query in candidate_queries(city, country, condition) {
        if let Some(url) = provider.search(&query).await {
            return url;
        }
        tracing::debug!(%query, "image search returned nothing, trying next candidate");
    }

    fallback_image(condition.unwrap_or_default()).to_string()
}

/// Static per-condition backdrop used when every search attempt comes back
/// empty.
pub fn fallback_image(condition: &str) -> &'static str {
    match condition {
        "Clear" => "https://images.pexels.com/photos/1174732/pexels-photo-1174732.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Clouds" => "https://images.pexels.com/photos/1118873/pexels-photo-1118873.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Rain" => "https://images.pexels.com/photos/125510/pexels-photo-125510.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Snow" => "https://images.pexels.com/photos/688660/pexels-photo-688660.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Thunderstorm" => "https://images.pexels.com/photos/1162251/pexels-photo-1162251.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Drizzle" => "https://images.pexels.com/photos/39811/pexels-photo-39811.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Mist" | "Fog" => "https://images.pexels.com/photos/2448749/pexels-photo-2448749.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        "Haze" => "https://images.pexels.com/photos/355241/pexels-photo-355241.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
        _ => "https://images.pexels.com/photos/572897/pexels-photo-572897.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    }
}

/// Client for the Pexels photo search API.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    api_key: String,
    http: Client,
}

impl PexelsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    width: u32,
    height: u32,
    src: PexelsSources,
}

#[derive(Debug, Deserialize)]
struct PexelsSources {
    original: String,
    large2x: Option<String>,
}

fn pick_photo(response: PexelsSearchResponse) -> Option<String> {
    response
        .photos
        .into_iter()
        .find(|p| p.width > p.height && !p.src.original.is_empty())
        .map(|p| p.src.large2x.unwrap_or(p.src.original))
}

#[async_trait]
impl ImageProvider for PexelsClient {
    async fn search(&self, query: &str) -> Option<String> {
        let res = self
            .http
            .get(SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", "5"), ("orientation", "landscape")])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .ok()?;

        if !res.status().is_success() {
            tracing::debug!(status = %res.status(), "pexels search rejected");
            return None;
        }

        let parsed: PexelsSearchResponse = res.json().await.ok()?;
        pick_photo(parsed)
    }
}

/// Construct the image provider from config, if a key is present. A missing
/// key just disables backdrops; it is never an error.
pub fn image_provider_from_config(config: &Config) -> Option<PexelsClient> {
    config
        .service_api_key(ServiceId::Pexels)
        .map(|key| PexelsClient::new(key.to_owned()))
}
