//! Extreme-weather classification.
//!
//! Thresholds are defined in Celsius and m/s. The public wrappers normalize
//! imperial values with exact arithmetic before classifying, so a session
//! displaying Fahrenheit never applies metric thresholds to imperial numbers.

use crate::model::{CurrentConditions, DailySummary};
use crate::units::UnitSystem;

/// Condition labels that are extreme on their own, exact match.
const EXTREME_CONDITIONS: [&str; 4] = ["Thunderstorm", "Snow", "Tornado", "Hurricane"];

const MAX_SAFE_TEMP_C: f64 = 40.0;
const MIN_SAFE_TEMP_C: f64 = -10.0;
const MAX_SAFE_WIND_MPS: f64 = 20.0;

/// True when the condition label, the temperature (°C) or the wind speed
/// (m/s) crosses an extreme threshold.
pub fn is_extreme(condition_main: &str, temperature_c: f64, wind_mps: f64) -> bool {
    if EXTREME_CONDITIONS.contains(&condition_main) {
        return true;
    }
    if temperature_c > MAX_SAFE_TEMP_C || temperature_c < MIN_SAFE_TEMP_C {
        return true;
    }
    wind_mps > MAX_SAFE_WIND_MPS
}

// Unrounded normalization: display rounding must not shift a value across a
// threshold.
fn to_celsius(value: f64, unit: UnitSystem) -> f64 {
    match unit {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => (value - 32.0) * 5.0 / 9.0,
    }
}

fn to_mps(value: f64, unit: UnitSystem) -> f64 {
    match unit {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value / 2.237,
    }
}

/// Classify current conditions, whatever unit system they are held in.
pub fn current_is_extreme(current: &CurrentConditions, unit: UnitSystem) -> bool {
    let sample = &current.sample;
    is_extreme(
        &sample.condition.main,
        to_celsius(sample.temperature, unit),
        to_mps(sample.wind_speed, unit),
    )
}

/// Classify a daily summary. Both the day's high and low are checked so a
/// cold snap is flagged even when the daytime high looks harmless.
pub fn summary_is_extreme(summary: &DailySummary, unit: UnitSystem) -> bool {
    let wind = to_mps(summary.avg_wind_speed, unit);
    is_extreme(
        &summary.dominant_condition.main,
        to_celsius(summary.max_temp, unit),
        wind,
    ) || is_extreme(
        &summary.dominant_condition.main,
        to_celsius(summary.min_temp, unit),
        wind,
    )
}
