//! Fetch-cycle orchestration: resolve → fetch → normalize → snapshot.
//!
//! Every search or geolocation event starts a fetch cycle. A cycle owns a
//! monotonic token; only the cycle holding the latest token may commit its
//! result, so a slow response can never overwrite a newer search (last
//! search wins). A failed cycle commits placeholder data and emits one
//! warning notice instead of leaving the view empty.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::WeatherError;
use crate::fallback;
use crate::geocode::GeocodeClient;
use crate::normalize::{collapse_daily, MAX_FORECAST_DAYS};
use crate::provider::WeatherProvider;
use crate::types::{
    describe_wmo_code, Condition, Coordinates, CurrentConditions, ResolvedLocation,
    WeatherSnapshot,
};

/// Phase of the current fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    /// Live data was fetched and committed.
    Success,
    /// Placeholder data was committed after a failure.
    FallbackServed,
}

/// What the presentation layer reads.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub phase: FetchPhase,
    pub snapshot: Option<WeatherSnapshot>,
}

/// A user-visible warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// How a fetch cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    FallbackServed,
    /// A newer search started before this cycle finished; its result was
    /// discarded.
    Superseded,
}

/// Orchestrates fetch cycles and owns the shared view state.
///
/// Cheap to clone; clones share state, cycle counter, and notice channel.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    geocode: Arc<GeocodeClient>,
    provider: Arc<WeatherProvider>,
    state: Arc<Mutex<ViewState>>,
    cycle: Arc<AtomicU64>,
    notice_tx: UnboundedSender<Notice>,
    default_location: String,
}

impl WeatherFetcher {
    /// Build the fetcher and its notice receiver from configuration.
    pub fn new(
        config: &skycast_core::Config,
    ) -> Result<(Self, UnboundedReceiver<Notice>), WeatherError> {
        let geocode = GeocodeClient::new(config)?;
        let provider = WeatherProvider::new(config)?;
        Ok(Self::with_clients(
            geocode,
            provider,
            &config.weather.default_location,
        ))
    }

    /// Assemble a fetcher from already-built clients.
    pub fn with_clients(
        geocode: GeocodeClient,
        provider: WeatherProvider,
        default_location: &str,
    ) -> (Self, UnboundedReceiver<Notice>) {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        (
            Self {
                geocode: Arc::new(geocode),
                provider: Arc::new(provider),
                state: Arc::new(Mutex::new(ViewState::default())),
                cycle: Arc::new(AtomicU64::new(0)),
                notice_tx,
                default_location: default_location.to_string(),
            },
            notice_rx,
        )
    }

    /// Current view state (cloned).
    pub fn view(&self) -> ViewState {
        self.state.lock().clone()
    }

    /// Run a fetch cycle for a free-text location query.
    pub async fn search(&self, query: &str) -> FetchOutcome {
        let token = self.begin_cycle();
        tracing::info!("Fetch cycle {} started for \"{}\"", token, query);

        let result = async {
            let location = self.geocode.resolve(query).await?;
            self.assemble(location).await
        }
        .await;

        self.finish(token, query, result)
    }

    /// Run a fetch cycle for device coordinates.
    ///
    /// A reverse-geocoding failure is not surfaced; the cycle degrades to
    /// the configured default location.
    pub async fn locate(&self, coordinates: Coordinates) -> FetchOutcome {
        let token = self.begin_cycle();
        tracing::info!(
            "Fetch cycle {} started for coordinates {:.4}, {:.4}",
            token,
            coordinates.latitude,
            coordinates.longitude
        );

        match self.geocode.resolve_coordinates(coordinates).await {
            Ok(location) => {
                let name = location.name.clone();
                let result = self.assemble(location).await;
                self.finish(token, &name, result)
            }
            Err(e) => {
                tracing::debug!(
                    "Reverse geocoding failed: {}; using default location \"{}\"",
                    e,
                    self.default_location
                );
                let default_location = self.default_location.clone();
                self.search(&default_location).await
            }
        }
    }

    /// Fetch, map, and normalize live data for a resolved location.
    async fn assemble(&self, location: ResolvedLocation) -> Result<WeatherSnapshot, WeatherError> {
        let payload = self.provider.fetch(location.coordinates).await?;

        let current = payload
            .current
            .ok_or_else(|| WeatherError::InvalidResponse("missing current block".to_string()))?;
        let daily = payload
            .daily
            .ok_or_else(|| WeatherError::InvalidResponse("missing daily block".to_string()))?;

        let forecast = collapse_daily(&daily);

        // Today's high/low mirror day 0; fall back to the instantaneous
        // reading when the daily series came back empty.
        let (high, low) = forecast.first().map_or_else(
            || {
                let t = current.temperature_2m.round() as i32;
                (t, t)
            },
            |day| (day.high, day.low),
        );

        let humidity = current
            .relative_humidity_2m
            .map_or(0, |h| h.clamp(0.0, 100.0).round() as u8);

        Ok(WeatherSnapshot {
            location: location.name.clone(),
            country: location.country.clone(),
            current: CurrentConditions {
                location: location.name,
                country: location.country,
                temperature: current.temperature_2m,
                feels_like: current.apparent_temperature,
                humidity,
                wind_speed: current.wind_speed_10m.max(0.0),
                condition: Condition::from_wmo_code(current.weather_code),
                description: describe_wmo_code(current.weather_code).to_string(),
                observed_at: Utc::now(),
                high,
                low,
            },
            forecast,
        })
    }

    /// Start a new cycle: bump the token and enter `Loading`.
    fn begin_cycle(&self) -> u64 {
        let token = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().phase = FetchPhase::Loading;
        token
    }

    /// Commit a finished cycle, serving placeholder data on failure.
    fn finish(
        &self,
        token: u64,
        requested: &str,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> FetchOutcome {
        match result {
            Ok(snapshot) => self.commit(token, snapshot, None),
            Err(e) => {
                tracing::warn!(
                    "Fetch cycle {} for \"{}\" failed: {}; serving placeholder data",
                    token,
                    requested,
                    e
                );
                let snapshot = fallback::placeholder_snapshot(requested, MAX_FORECAST_DAYS);
                self.commit(
                    token,
                    snapshot,
                    Some(Notice {
                        message: e.user_message(),
                    }),
                )
            }
        }
    }

    /// Apply a cycle result unless a newer cycle has started.
    ///
    /// The snapshot is replaced wholesale, never patched. The notice is
    /// sent only for a committed cycle, so a superseded failure stays
    /// silent.
    fn commit(&self, token: u64, snapshot: WeatherSnapshot, notice: Option<Notice>) -> FetchOutcome {
        let mut state = self.state.lock();
        if self.cycle.load(Ordering::SeqCst) != token {
            tracing::debug!("Fetch cycle {} superseded; discarding result", token);
            return FetchOutcome::Superseded;
        }

        let outcome = if notice.is_some() {
            state.phase = FetchPhase::FallbackServed;
            FetchOutcome::FallbackServed
        } else {
            state.phase = FetchPhase::Success;
            FetchOutcome::Success
        };
        state.snapshot = Some(snapshot);
        drop(state);

        if let Some(notice) = notice {
            let _ = self.notice_tx.send(notice);
        }

        outcome
    }
}
