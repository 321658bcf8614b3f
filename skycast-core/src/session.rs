//! Per-session dashboard state and its reducer.
//!
//! One explicit record holds everything a session displays, and every user
//! action becomes a [`SessionEvent`] applied through [`Session::apply`].
//! Fetch rounds are keyed by a monotonically increasing sequence number so a
//! stale response can never overwrite fresher state.

use crate::error::FetchError;
use crate::forecast::{summarize_daily, window_hourly};
use crate::history;
use crate::model::{
    CurrentConditions, DailySummary, ForecastSeries, SearchHistoryEntry, WeatherSample,
};
use crate::provider::{WeatherProvider, fetch_with_retry};
use crate::units::{self, UnitSystem};

/// Everything one dashboard session displays.
///
/// `daily` and `hourly` are `None` while the forecast is unavailable; the
/// current-weather view renders independently of them.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub unit: UnitSystem,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Vec<WeatherSample>>,
    pub daily: Option<Vec<DailySummary>>,
    pub hourly: Option<Vec<WeatherSample>>,
    pub history: Vec<SearchHistoryEntry>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

/// Result of one fan-out fetch round, tagged with its sequence number.
///
/// Current and forecast resolve independently so one failing does not drag
/// the other down.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub current: Result<CurrentConditions, FetchError>,
    pub forecast: Result<ForecastSeries, FetchError>,
}

/// A user action or resolved side effect, applied through the reducer.
#[derive(Debug)]
pub enum SessionEvent {
    FetchResolved(FetchOutcome),
    ToggleUnit(UnitSystem),
    RecordSearch(SearchHistoryEntry),
    ClearHistory,
}

/// Owns the dashboard state plus the latest issued request sequence number.
/// Single logical thread of control; nothing here is shared across sessions.
#[derive(Debug, Default)]
pub struct Session {
    pub state: DashboardState,
    issued_seq: u64,
}

impl Session {
    pub fn new(unit: UnitSystem) -> Self {
        Self {
            state: DashboardState {
                unit,
                ..DashboardState::default()
            },
            issued_seq: 0,
        }
    }

    /// Start a new fetch round and return the sequence number the eventual
    /// [`FetchOutcome`] must carry. A silent refresh leaves the loading flag
    /// alone so already-rendered data stays up while new data arrives.
    pub fn begin_fetch(&mut self, silent: bool) -> u64 {
        self.issued_seq += 1;
        if !silent {
            self.state.loading = true;
        }
        self.state.error = None;
        self.issued_seq
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::FetchResolved(outcome) => self.apply_fetch(outcome),
            SessionEvent::ToggleUnit(target) => self.toggle_unit(target),
            SessionEvent::RecordSearch(entry) => {
                history::push_entry(&mut self.state.history, entry);
            }
            SessionEvent::ClearHistory => self.state.history.clear(),
        }
    }

    fn apply_fetch(&mut self, outcome: FetchOutcome) {
        if outcome.seq != self.issued_seq {
            tracing::debug!(
                seq = outcome.seq,
                latest = self.issued_seq,
                "dropping stale fetch response"
            );
            return;
        }

        self.state.loading = false;

        match outcome.current {
            Ok(current) => {
                self.state.current = Some(current);
                self.state.error = None;
            }
            Err(err) => {
                self.state.error = Some(err);
            }
        }

        match outcome.forecast {
            Ok(series) => {
                self.state.daily = Some(summarize_daily(&series.samples));
                self.state.hourly = Some(window_hourly(&series.samples));
                self.state.forecast = Some(series.samples);
            }
            Err(err) => {
                // the current-weather view renders without these
                tracing::warn!(%err, "forecast unavailable, daily and hourly views degrade");
                self.state.forecast = None;
                self.state.daily = None;
                self.state.hourly = None;
            }
        }
    }

    /// One atomic unit toggle across current weather, forecast and hourly
    /// data. A no-op when already in `target` or when nothing is loaded,
    /// since the underlying conversion is destructive if repeated.
    fn toggle_unit(&mut self, target: UnitSystem) {
        if target == self.state.unit {
            return;
        }
        let Some(current) = self.state.current.as_ref() else {
            return;
        };

        let from = self.state.unit;
        let forecast = self.state.forecast.as_deref().unwrap_or_default();
        let hourly = self.state.hourly.as_deref().unwrap_or_default();

        let (converted_current, converted_forecast, converted_hourly) =
            units::retarget(current, forecast, hourly, from, target);

        self.state.current = Some(converted_current);
        if self.state.forecast.is_some() {
            self.state.daily = Some(summarize_daily(&converted_forecast));
            self.state.forecast = Some(converted_forecast);
        }
        if self.state.hourly.is_some() {
            self.state.hourly = Some(converted_hourly);
        }
        self.state.unit = target;
    }
}

/// Fan out the current and forecast fetches, fan in when both resolve.
///
/// The hourly view derives from the forecast series, so no third network
/// round trip is needed. Each leg carries the retry contract for transient
/// failures.
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    latitude: f64,
    longitude: f64,
    unit: UnitSystem,
    seq: u64,
) -> FetchOutcome {
    let (current, forecast) = tokio::join!(
        fetch_with_retry(|| provider.get_current(latitude, longitude, unit)),
        fetch_with_retry(|| provider.get_forecast(latitude, longitude, unit)),
    );

    FetchOutcome { seq, current, forecast }
}
