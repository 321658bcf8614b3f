//! Command implementations: wire config, providers, session and rendering
//! together for each CLI verb.

use anyhow::{Context, Result, anyhow};
use std::time::Duration;

use skycast_core::{
    Config, SearchHistoryEntry, ServiceId, UnitSystem,
    geo::{Geolocator, IpApiGeolocator},
    history::{FileHistoryStore, HistoryStore},
    provider::{WeatherProvider, fetch_with_retry, provider_from_config},
    session::{Session, SessionEvent, fetch_weather},
};

use crate::render;

const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

pub fn configure(service: &str) -> Result<()> {
    let id = ServiceId::try_from(service)?;
    let mut config = Config::load()?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.upsert_service_api_key(id, api_key);

    if config.default_units.is_none() {
        let choice = inquire::Select::new("Default units:", vec!["metric", "imperial"])
            .prompt()
            .context("Failed to read unit choice")?;
        if let Ok(unit) = UnitSystem::try_from(choice) {
            config.set_default_units(unit);
        }
    }

    config.save()?;
    println!("Saved configuration for {id}.");
    Ok(())
}

fn resolve_units(flag: Option<&str>, config: &Config) -> Result<UnitSystem> {
    match flag {
        Some(value) => UnitSystem::try_from(value),
        None => Ok(config.default_unit_system()),
    }
}

pub async fn show(city: &str, units: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let unit = resolve_units(units, &config)?;
    let provider = provider_from_config(&config)?;

    let store = FileHistoryStore::open_default()?;
    let mut session = Session::new(unit);
    session.state.history = store.load().unwrap_or_default();

    // resolve the typed name first so the fan-out runs on coordinates
    let resolved = fetch_with_retry(|| provider.get_current_by_city(city, unit))
        .await
        .map_err(|err| anyhow!("{}", err.user_message()))?;
    let location = resolved.location;

    let seq = session.begin_fetch(false);
    let outcome = fetch_weather(&provider, location.latitude, location.longitude, unit, seq).await;
    session.apply(SessionEvent::FetchResolved(outcome));

    // only explicit city selections enter the history
    session.apply(SessionEvent::RecordSearch(SearchHistoryEntry::new(
        location.name,
        location.country_code,
        location.latitude,
        location.longitude,
    )));
    store.save(&session.state.history)?;

    render::render_session(&session, &config).await
}

pub async fn here(units: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let unit = resolve_units(units, &config)?;
    let provider = provider_from_config(&config)?;

    let geolocator = IpApiGeolocator::default();
    let (latitude, longitude) = geolocator
        .current_position(GEOLOCATION_TIMEOUT)
        .await
        .map_err(|err| anyhow!("{}", err.user_message()))?;

    let mut session = Session::new(unit);
    let seq = session.begin_fetch(false);
    let outcome = fetch_weather(&provider, latitude, longitude, unit, seq).await;
    session.apply(SessionEvent::FetchResolved(outcome));

    // geolocation never touches the search history
    render::render_session(&session, &config).await
}

pub fn history(clear: bool) -> Result<()> {
    let store = FileHistoryStore::open_default()?;

    if clear {
        store.save(&[])?;
        println!("Search history cleared.");
        return Ok(());
    }

    let entries = store.load()?;
    if entries.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}, {}  ({:.2}, {:.2})  saved {}",
            entry.name,
            entry.country_code,
            entry.latitude,
            entry.longitude,
            entry.saved_at_utc.format("%Y-%m-%d %H:%M UTC"),
        );
    }
    Ok(())
}
