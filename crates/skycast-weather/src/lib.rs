//! Weather acquisition and normalization pipeline for Skycast.
//!
//! Resolves a place name or device coordinates, fetches current conditions
//! plus a multi-day forecast from Open-Meteo, and assembles display-ready
//! snapshots. Failures degrade to locally synthesized placeholder data so
//! the presentation layer is never left empty.

pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod geocode;
pub mod normalize;
pub mod provider;
pub mod suggest;
pub mod types;

pub use error::{GeocodeError, WeatherError};
pub use fetcher::{FetchOutcome, FetchPhase, Notice, ViewState, WeatherFetcher};
pub use geocode::GeocodeClient;
pub use normalize::{collapse_daily, MAX_FORECAST_DAYS};
pub use provider::WeatherProvider;
pub use suggest::SuggestionDebouncer;
pub use types::*;
