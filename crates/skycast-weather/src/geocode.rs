//! Forward and reverse geocoding.
//!
//! Forward search uses the Open-Meteo geocoding API; reverse lookup uses
//! Nominatim (OpenStreetMap). Neither requires an API key.

use std::time::Duration;

use serde::Deserialize;

use crate::error::GeocodeError;
use crate::types::{Coordinates, LocationSuggestion, ResolvedLocation};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skycast/0.1.0 (https://github.com/skycast)";

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<GeocodeMatch>,
}

#[derive(Debug, Deserialize)]
struct GeocodeMatch {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

/// Client for place-name and coordinate resolution.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    search_url: String,
    reverse_url: String,
    suggestion_limit: u8,
}

impl GeocodeClient {
    pub fn new(config: &skycast_core::Config) -> Result<Self, GeocodeError> {
        Self::with_urls(
            &config.weather.geocoding_url,
            &config.weather.reverse_geocoding_url,
            config.search.suggestion_limit,
        )
    }

    pub fn with_urls(
        search_url: &str,
        reverse_url: &str,
        suggestion_limit: u8,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            search_url: search_url.to_string(),
            reverse_url: reverse_url.to_string(),
            suggestion_limit,
        })
    }

    /// Incremental autocomplete lookup.
    ///
    /// A trimmed query shorter than [`MIN_QUERY_LEN`] returns an empty list
    /// without touching the network. Provider order is preserved.
    pub async fn suggest(&self, query: &str) -> Result<Vec<LocationSuggestion>, GeocodeError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let matches = self.search(trimmed, self.suggestion_limit).await?;
        Ok(matches
            .into_iter()
            .take(self.suggestion_limit as usize)
            .map(|m| LocationSuggestion {
                name: m.name,
                country: m.country,
                admin1: m.admin1,
            })
            .collect())
    }

    /// Resolve a search term to the provider's top match.
    pub async fn resolve(&self, query: &str) -> Result<ResolvedLocation, GeocodeError> {
        let trimmed = query.trim();
        let matches = self.search(trimmed, 1).await?;

        let top = matches
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(trimmed.to_string()))?;

        Ok(ResolvedLocation {
            name: top.name,
            country: top.country,
            coordinates: Coordinates {
                latitude: top.latitude,
                longitude: top.longitude,
            },
        })
    }

    /// Resolve device coordinates to the nearest place name.
    pub async fn resolve_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<ResolvedLocation, GeocodeError> {
        let response = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await?;

        let body: ReverseResponse = handle_response(response).await?;

        let Some(addr) = body.address else {
            return Err(GeocodeError::NotFound(format!(
                "{:.4}, {:.4}",
                coordinates.latitude, coordinates.longitude
            )));
        };

        let country = addr.country.clone();

        // Prefer city > town > village > municipality for the place name
        let name = addr
            .city
            .or(addr.town)
            .or(addr.village)
            .or(addr.municipality)
            .or(addr.county)
            .or(addr.state)
            .ok_or_else(|| {
                GeocodeError::NotFound(format!(
                    "{:.4}, {:.4}",
                    coordinates.latitude, coordinates.longitude
                ))
            })?;

        tracing::info!("Reverse geocoded to: {}", name);

        Ok(ResolvedLocation {
            name,
            country,
            coordinates,
        })
    }

    async fn search(&self, name: &str, count: u8) -> Result<Vec<GeocodeMatch>, GeocodeError> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("name", name),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let body: SearchResponse = handle_response(response).await?;
        Ok(body.results)
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GeocodeError> {
    let status = response.status();
    if !status.is_success() {
        return Err(GeocodeError::Http(status.as_u16()));
    }

    response
        .json()
        .await
        .map_err(|e| GeocodeError::InvalidResponse(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocode_result(name: &str, country: &str, lat: f64, lon: f64) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "latitude": lat,
            "longitude": lon,
            "country": country,
            "admin1": "Region"
        })
    }

    fn client_for(server: &MockServer) -> GeocodeClient {
        GeocodeClient::with_urls(
            &format!("{}/v1/search", server.uri()),
            &format!("{}/reverse", server.uri()),
            5,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_picks_top_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    geocode_result("Paris", "France", 48.8566, 2.3522),
                    geocode_result("Paris", "United States", 33.6609, -95.5555),
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let location = client.resolve("Paris").await.unwrap();

        assert_eq!(location.name, "Paris");
        assert_eq!(location.country.as_deref(), Some("France"));
        assert_eq!(location.coordinates.latitude, 48.8566);
    }

    #[tokio::test]
    async fn test_resolve_empty_results_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.resolve("Nowhereland123").await;

        assert!(matches!(result, Err(GeocodeError::NotFound(ref q)) if q == "Nowhereland123"));
    }

    #[tokio::test]
    async fn test_resolve_absent_results_field_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "generationtime_ms": 0.5 })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.resolve("Atlantis").await;

        assert!(matches!(result, Err(GeocodeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_suggest_short_query_skips_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(client.suggest("P").await.unwrap().is_empty());
        assert!(client.suggest("  p  ").await.unwrap().is_empty());
        assert!(client.suggest("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_preserves_provider_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Pa"))
            .and(query_param("count", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    geocode_result("Paris", "France", 48.85, 2.35),
                    geocode_result("Palermo", "Italy", 38.11, 13.36),
                    geocode_result("Pattaya", "Thailand", 12.93, 100.88),
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let suggestions = client.suggest("Pa").await.unwrap();

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].name, "Paris");
        assert_eq!(suggestions[1].name, "Palermo");
        assert_eq!(suggestions[2].name, "Pattaya");
    }

    #[tokio::test]
    async fn test_suggest_server_error_is_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.suggest("Paris").await;

        assert!(matches!(result, Err(GeocodeError::Http(500))));
    }

    #[tokio::test]
    async fn test_reverse_geocode_prefers_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {
                    "city": "Seattle",
                    "state": "Washington",
                    "country": "United States"
                }
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let location = client
            .resolve_coordinates(Coordinates {
                latitude: 47.6062,
                longitude: -122.3321,
            })
            .await
            .unwrap();

        assert_eq!(location.name, "Seattle");
        assert_eq!(location.country.as_deref(), Some("United States"));
        assert_eq!(location.coordinates.latitude, 47.6062);
    }

    #[tokio::test]
    async fn test_reverse_geocode_empty_address_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "Unable to geocode"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client
            .resolve_coordinates(Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            })
            .await;

        assert!(matches!(result, Err(GeocodeError::NotFound(_))));
    }
}
