//! Open-Meteo forecast API client.
//!
//! Units are requested explicitly (Celsius, km/h) rather than relying on
//! provider defaults.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::WeatherError;
use crate::types::Coordinates;

const REQUEST_TIMEOUT_SECS: u64 = 10;

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Current instantaneous readings from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentReadings {
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: f64,
    pub weather_code: i32,
}

/// The provider's daily block: parallel arrays indexed by day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
    #[serde(default)]
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// Raw forecast payload before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub current: Option<CurrentReadings>,
    pub daily: Option<DailySeries>,
}

/// Client for the forecast endpoint.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<reqwest::Client>,
    base_url: String,
    forecast_days: u8,
}

impl WeatherProvider {
    pub fn new(config: &skycast_core::Config) -> Result<Self, WeatherError> {
        Self::with_base_url(&config.weather.forecast_url, config.weather.forecast_days)
    }

    pub fn with_base_url(base_url: &str, forecast_days: u8) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.to_string(),
            forecast_days,
        })
    }

    /// Fetch current conditions plus the daily series for the coordinates.
    pub async fn fetch(&self, coordinates: Coordinates) -> Result<ForecastPayload, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("temperature_unit", "celsius".to_string()),
                ("wind_speed_unit", "kmh".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", self.forecast_days.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Http(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}
