//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - The forecast aggregation pipeline (daily summaries, hourly window)
//! - Unit conversion and extreme-weather classification
//! - Clients for the weather, image and geolocation services
//! - Session state, search history and configuration
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod alerts;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geo;
pub mod history;
pub mod image;
pub mod model;
pub mod provider;
pub mod session;
pub mod units;

pub use config::{Config, ServiceConfig, ServiceId};
pub use error::FetchError;
pub use model::{
    Condition, CurrentConditions, DailySummary, ForecastSeries, Location, SearchHistoryEntry,
    WeatherSample,
};
pub use session::{DashboardState, FetchOutcome, Session, SessionEvent};
pub use units::UnitSystem;
