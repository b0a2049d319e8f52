use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Sunny,
    #[default]
    Cloudy,
    PartlyCloudy,
    Rain,
    Shower,
    Thunderstorm,
    Snow,
    Foggy,
    Windy,
}

impl Condition {
    /// Convert a WMO weather code to a Condition.
    ///
    /// Exact codes are matched before ranges; anything outside the known
    /// code space falls back to `Cloudy`.
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Sunny,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Foggy,
            51..=57 => Self::Shower, // Drizzle, incl. freezing
            61..=67 => Self::Rain,   // Rain, incl. freezing
            71..=77 => Self::Snow,
            80..=82 => Self::Shower, // Rain showers
            85..=86 => Self::Snow,   // Snow showers
            95..=99 => Self::Thunderstorm,
            _ => Self::Cloudy,
        }
    }

    /// Short human-readable label for this condition.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sunny => "Clear sky",
            Self::Cloudy => "Cloudy",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Rain => "Rain",
            Self::Shower => "Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Foggy => "Foggy",
            Self::Windy => "Windy",
        }
    }
}

/// Human-readable description for a WMO weather code.
///
/// Total over all inputs; unknown codes describe as "Unknown".
pub fn describe_wmo_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// Geographic coordinates, immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A candidate shown in the autocomplete dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub name: String,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

impl LocationSuggestion {
    /// Display form, e.g. "Paris, Île-de-France, France".
    pub fn display_name(&self) -> String {
        match (&self.admin1, &self.country) {
            (Some(admin), Some(country)) => format!("{}, {}, {}", self.name, admin, country),
            (None, Some(country)) => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// A geocoded place. Superseded, never mutated, on each new search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
    pub description: String,
    pub observed_at: DateTime<Utc>,
    /// Today's high, mirrors day 0 of the forecast
    pub high: i32,
    /// Today's low, mirrors day 0 of the forecast
    pub low: i32,
}

/// One forecast day: a single entry per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: Condition,
    pub high: i32,
    pub low: i32,
    pub description: String,
    pub precipitation_chance: u8,
}

/// The complete record handed to the presentation layer.
///
/// Replaced wholesale on every successful or fallback fetch, never patched
/// field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub country: Option<String>,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}
