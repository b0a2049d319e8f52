//! Locally synthesized placeholder weather.
//!
//! Served whenever a fetch cycle fails so the presentation layer is never
//! left empty. Values are plausible, not deterministic.

use chrono::{Days, Utc};
use rand::Rng;

use crate::types::{Condition, CurrentConditions, ForecastDay, WeatherSnapshot};

const PLACEHOLDER_CONDITIONS: [Condition; 6] = [
    Condition::Sunny,
    Condition::Cloudy,
    Condition::PartlyCloudy,
    Condition::Rain,
    Condition::Thunderstorm,
    Condition::Snow,
];

/// Generate a placeholder snapshot for the requested location name.
pub fn placeholder_snapshot(location: &str, days: usize) -> WeatherSnapshot {
    let mut rng = rand::rng();
    let now = Utc::now();
    let today = now.date_naive();

    let forecast: Vec<ForecastDay> = (0..days)
        .map(|i| {
            let condition = PLACEHOLDER_CONDITIONS[rng.random_range(0..PLACEHOLDER_CONDITIONS.len())];
            let high: i32 = rng.random_range(18..=30);
            let low = high - 5 - rng.random_range(0..=8);

            ForecastDay {
                date: today + Days::new(i as u64),
                condition,
                high,
                low,
                description: condition.label().to_string(),
                precipitation_chance: rng.random_range(0..=99),
            }
        })
        .collect();

    let current = match forecast.first() {
        Some(day) => CurrentConditions {
            location: location.to_string(),
            country: None,
            temperature: f64::from(day.high),
            feels_like: f64::from(day.high - 2),
            humidity: rng.random_range(30..=90),
            wind_speed: f64::from(rng.random_range(0..30)),
            condition: day.condition,
            description: day.description.clone(),
            observed_at: now,
            high: day.high,
            low: day.low,
        },
        None => CurrentConditions {
            location: location.to_string(),
            country: None,
            temperature: 20.0,
            feels_like: 18.0,
            humidity: 50,
            wind_speed: 0.0,
            condition: Condition::Cloudy,
            description: Condition::Cloudy.label().to_string(),
            observed_at: now,
            high: 20,
            low: 12,
        },
    };

    WeatherSnapshot {
        location: location.to_string(),
        country: None,
        current,
        forecast,
    }
}
