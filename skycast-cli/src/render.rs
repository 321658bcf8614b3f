//! Human-friendly terminal rendering of the dashboard state.

use anyhow::Result;
use chrono::{FixedOffset, Offset, Utc};

use skycast_core::{
    Config, CurrentConditions, DailySummary, Session, UnitSystem, WeatherSample, alerts,
    image::{fetch_city_image, image_provider_from_config},
};

/// Terminal emoji for an OpenWeather icon code.
pub fn weather_icon(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" => "🌧️",
        "10d" | "10n" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}

fn local_clock(offset_seconds: i32) -> String {
    FixedOffset::east_opt(offset_seconds).map_or_else(
        || Utc::now().format("%A, %B %e, %H:%M UTC").to_string(),
        |offset| {
            Utc::now()
                .with_timezone(&offset)
                .format("%A, %B %e, %H:%M")
                .to_string()
        },
    )
}

fn render_current(current: &CurrentConditions, unit: UnitSystem) {
    let sample = &current.sample;
    let temp = unit.temperature_symbol();
    let wind = unit.wind_symbol();

    println!(
        "{} {}, {}  |  {}",
        weather_icon(&sample.condition.icon_code),
        current.location.name,
        current.location.country_code,
        local_clock(current.location.timezone_offset_seconds),
    );
    println!(
        "  {:.0}{temp} (feels like {:.0}{temp}), {}",
        sample.temperature, sample.feels_like, sample.condition.description,
    );
    println!(
        "  humidity {}%, pressure {} hPa, wind {:.1} {wind}",
        sample.humidity_pct, sample.pressure_hpa, sample.wind_speed,
    );
    if let Some(visibility) = sample.visibility_meters {
        println!("  visibility {:.1} km", f64::from(visibility) / 1000.0);
    }
    if let Some(clouds) = sample.cloudiness_pct {
        println!("  cloud cover {clouds}%");
    }
}

fn render_daily(days: &[DailySummary], unit: UnitSystem) {
    let temp = unit.temperature_symbol();
    let wind = unit.wind_symbol();

    println!("\n5-day forecast:");
    for day in days {
        println!(
            "  {} {}  {} {:<13} {:>4.0}{temp} / {:>4.0}{temp} / {:>4.0}{temp}  humidity {:.0}%  wind {:.1} {wind}",
            day.day_name_short,
            day.date.format("%m-%d"),
            weather_icon(&day.dominant_condition.icon_code),
            day.dominant_condition.main,
            day.min_temp,
            day.avg_temp,
            day.max_temp,
            day.avg_humidity_pct,
            day.avg_wind_speed,
        );
    }
}

fn render_hourly(samples: &[WeatherSample], offset_seconds: i32, unit: UnitSystem) {
    let temp = unit.temperature_symbol();
    let offset = FixedOffset::east_opt(offset_seconds).unwrap_or_else(|| Utc.fix());

    println!("\nNext 24 hours:");
    for sample in samples {
        println!(
            "  {}  {} {:>4.0}{temp}  {}",
            sample.timestamp_utc.with_timezone(&offset).format("%H:%M"),
            weather_icon(&sample.condition.icon_code),
            sample.temperature,
            sample.condition.description,
        );
    }
}

/// Render everything the session resolved: the current view independently of
/// forecast availability, degraded placeholders where a fetch failed.
pub async fn render_session(session: &Session, config: &Config) -> Result<()> {
    let state = &session.state;

    if let Some(err) = &state.error {
        println!("{}", err.user_message());
    }

    let offset_seconds = state
        .current
        .as_ref()
        .map_or(0, |c| c.location.timezone_offset_seconds);

    if let Some(current) = &state.current {
        render_current(current, state.unit);

        if alerts::current_is_extreme(current, state.unit) {
            println!("  ⚠️  Extreme weather conditions.");
        }

        if let Some(images) = image_provider_from_config(config) {
            let url = fetch_city_image(
                &images,
                &current.location.name,
                &current.location.country_code,
                Some(current.sample.condition.main.as_str()),
            )
            .await;
            println!("  backdrop: {url}");
        }
    }

    match &state.daily {
        Some(days) => render_daily(days, state.unit),
        None if state.current.is_some() => println!("\n5-day forecast unavailable."),
        None => {}
    }

    match &state.hourly {
        Some(samples) => render_hourly(samples, offset_seconds, state.unit),
        None if state.current.is_some() => println!("Hourly forecast unavailable."),
        None => {}
    }

    Ok(())
}
