//! Collapse the provider's daily series into per-day forecast entries.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::provider::DailySeries;
use crate::types::{describe_wmo_code, Condition, ForecastDay};

/// Upper bound on forecast entries handed to the presentation layer.
pub const MAX_FORECAST_DAYS: usize = 7;

/// Build one [`ForecastDay`] per calendar day, capped at [`MAX_FORECAST_DAYS`].
///
/// Walks the parallel arrays in order. The feed is normally already daily,
/// but a sub-daily feed is tolerated: only the first entry seen for a
/// calendar day is kept. Rows with an unparseable timestamp or missing
/// temperatures are skipped; a missing precipitation probability defaults
/// to 0. Temperatures round to the nearest integer, half away from zero.
pub fn collapse_daily(series: &DailySeries) -> Vec<ForecastDay> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut days = Vec::new();

    for (i, stamp) in series.time.iter().enumerate() {
        let Some(date) = parse_day(stamp) else {
            tracing::debug!("Skipping forecast entry with unparseable time: {}", stamp);
            continue;
        };

        // First entry wins for each calendar day
        if !seen.insert(date) {
            continue;
        }

        let Some(&high) = series.temperature_2m_max.get(i) else {
            continue;
        };
        let Some(&low) = series.temperature_2m_min.get(i) else {
            continue;
        };

        let code = series.weather_code.get(i).copied().unwrap_or(-1);
        let precipitation = series
            .precipitation_probability_max
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(0.0);

        days.push(ForecastDay {
            date,
            condition: Condition::from_wmo_code(code),
            high: high.round() as i32,
            low: low.round() as i32,
            description: describe_wmo_code(code).to_string(),
            precipitation_chance: clamp_percentage(precipitation),
        });

        if days.len() == MAX_FORECAST_DAYS {
            break;
        }
    }

    days.sort_by_key(|d| d.date);
    days
}

/// Parse a provider timestamp ("2026-08-06" or "2026-08-06T15:00") down to
/// its calendar day.
fn parse_day(stamp: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(stamp, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M")
        .map(|dt| dt.date())
        .ok()
}

fn clamp_percentage(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}
