//! Pipeline error types.

use thiserror::Error;

/// Geocoding errors (forward and reverse lookup).
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The provider returned an empty result set. An empty `results` array
    /// is "not found", never a transport failure.
    #[error("No match for location: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geocoding API error: status {0}")]
    Http(u16),

    #[error("Invalid geocoding response: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(name) => format!("Location \"{}\" not found. Check and try again.", name),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Http(status) if *status >= 500 => {
                "The location service is experiencing issues. Please try again later.".to_string()
            }
            Self::Http(_) => "Location lookup failed. Please try again.".to_string(),
            Self::InvalidResponse(_) => "Received an unexpected location response.".to_string(),
        }
    }
}

/// Weather fetch errors.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather API error: status {0}")]
    Http(u16),

    #[error("Invalid weather response: {0}")]
    InvalidResponse(String),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Http(status) if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later.".to_string()
            }
            Self::Http(_) => "Weather request failed. Please try again.".to_string(),
            Self::InvalidResponse(_) => "Received an unexpected weather response.".to_string(),
            Self::Geocode(e) => e.user_message(),
        }
    }
}
