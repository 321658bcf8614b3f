//! Forecast aggregation: calendar-day bucketing, daily summaries and the
//! short-range hourly window.
//!
//! Inputs are tiny (a 5-day series at 3-hour cadence is at most 40 samples),
//! so everything here is plain synchronous computation over slices.

use chrono::{FixedOffset, Local, NaiveDate};

use crate::model::{Condition, DailySummary, WeatherSample};

/// At most this many daily summaries are produced, even when the series
/// spans more calendar days.
pub const DAILY_SUMMARY_CAP: usize = 5;

/// Samples in the hourly view: 8 entries at 3-hour cadence, about 24 hours.
pub const HOURLY_WINDOW_LEN: usize = 8;

/// Group samples by the calendar day their timestamp falls on once shifted
/// by `offset`. Bucket keys appear in first-encounter order and samples keep
/// their input order; nothing is reordered.
pub fn bucket_by_day(
    samples: &[WeatherSample],
    offset: FixedOffset,
) -> Vec<(NaiveDate, Vec<&WeatherSample>)> {
    let mut buckets: Vec<(NaiveDate, Vec<&WeatherSample>)> = Vec::new();

    for sample in samples {
        let day = sample.timestamp_utc.with_timezone(&offset).date_naive();
        match buckets.iter_mut().find(|(key, _)| *key == day) {
            Some((_, bucket)) => bucket.push(sample),
            None => buckets.push((day, vec![sample])),
        }
    }

    buckets
}

/// Summarize a forecast series into at most [`DAILY_SUMMARY_CAP`] daily
/// entries, bucketing by the runtime's local timezone.
///
/// An empty series yields an empty vector; fewer than five distinct days
/// yield fewer summaries, never padded.
pub fn summarize_daily(samples: &[WeatherSample]) -> Vec<DailySummary> {
    summarize_daily_at(samples, *Local::now().offset())
}

/// Like [`summarize_daily`] but bucketing at an explicit UTC offset, for
/// callers that prefer the queried city's wall clock.
pub fn summarize_daily_at(samples: &[WeatherSample], offset: FixedOffset) -> Vec<DailySummary> {
    bucket_by_day(samples, offset)
        .into_iter()
        .take(DAILY_SUMMARY_CAP)
        .filter_map(|(date, bucket)| summarize_bucket(date, &bucket))
        .collect()
}

fn summarize_bucket(date: NaiveDate, bucket: &[&WeatherSample]) -> Option<DailySummary> {
    let dominant_condition = dominant_condition(bucket)?;
    let count = bucket.len() as f64;

    let avg_temp = bucket.iter().map(|s| s.temperature).sum::<f64>() / count;
    let max_temp = bucket
        .iter()
        .map(|s| s.temperature)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_temp = bucket
        .iter()
        .map(|s| s.temperature)
        .fold(f64::INFINITY, f64::min);
    let avg_humidity_pct = bucket.iter().map(|s| f64::from(s.humidity_pct)).sum::<f64>() / count;
    let avg_wind_speed = bucket.iter().map(|s| s.wind_speed).sum::<f64>() / count;

    Some(DailySummary {
        date,
        day_name_long: date.format("%A").to_string(),
        day_name_short: date.format("%a").to_string(),
        avg_temp,
        max_temp,
        min_temp,
        dominant_condition,
        avg_humidity_pct,
        avg_wind_speed,
    })
}

/// Most frequent `condition.main` in the bucket. The tally runs in encounter
/// order and only a strictly higher count displaces the leader, so ties keep
/// the first-encountered label. The returned condition is the first sample's
/// condition carrying that label, not a synthesized one.
fn dominant_condition(bucket: &[&WeatherSample]) -> Option<Condition> {
    let mut tally: Vec<(&str, usize)> = Vec::new();

    for sample in bucket {
        match tally
            .iter_mut()
            .find(|(label, _)| *label == sample.condition.main)
        {
            Some((_, count)) => *count += 1,
            None => tally.push((sample.condition.main.as_str(), 1)),
        }
    }

    let (mut leader, mut best) = *tally.first()?;
    for (label, count) in &tally[1..] {
        if *count > best {
            leader = label;
            best = *count;
        }
    }

    bucket
        .iter()
        .find(|s| s.condition.main == leader)
        .map(|s| s.condition.clone())
}

/// First `min(8, len)` samples of the series, order preserved, source
/// untouched. A short series returns all of it without error.
pub fn window_hourly(samples: &[WeatherSample]) -> Vec<WeatherSample> {
    samples.iter().take(HOURLY_WINDOW_LEN).cloned().collect()
}
