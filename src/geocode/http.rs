//! HTTP geocoding provider client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Coordinate, GeocodeProvider};
use crate::config::ProviderConfig;

/// Thin wrapper over the provider's forward-geocoding endpoint.
///
/// Exactly one outbound call per `geocode` invocation; no caching, no
/// retry. Retrying is the orchestrator's business, and it does so simply
/// by leaving a missed candidate pending for the next batch.
pub struct HttpGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl HttpGeocoder {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("gramgeo/0.1 (admin-unit geocoder)")
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    /// Structured address string, most specific component first.
    fn build_address(place: &str, locality: &str, district: &str, state: &str) -> String {
        [place, locality, district, state]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.trim())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl GeocodeProvider for HttpGeocoder {
    async fn geocode(
        &self,
        place: &str,
        locality: &str,
        district: &str,
        state: &str,
    ) -> Option<Coordinate> {
        let address = Self::build_address(place, locality, district, state);

        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("address", address.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Geocode request for '{}' failed: {}", address, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Geocode request for '{}' returned HTTP {}",
                address,
                response.status()
            );
            return None;
        }

        let body: GeocodeResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to parse geocode response for '{}': {}", address, e);
                return None;
            }
        };

        // Quota, denied, zero results: all the same from here — no usable
        // coordinate this round.
        if body.status != "OK" {
            debug!("Provider status {} for '{}'", body.status, address);
            return None;
        }

        let location = &body.results.first()?.geometry.location;

        debug!(
            "Provider match for '{}': ({}, {})",
            address, location.lat, location.lng
        );

        Some(Coordinate {
            lat: location.lat,
            lon: location.lng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_most_specific_first() {
        assert_eq!(
            HttpGeocoder::build_address("Sahaswan", "Sahaswan", "Budaun", "Uttar Pradesh"),
            "Sahaswan, Sahaswan, Budaun, Uttar Pradesh"
        );
    }

    #[test]
    fn test_address_skips_empty_components() {
        assert_eq!(
            HttpGeocoder::build_address("Alapur", "", "Budaun", "Uttar Pradesh"),
            "Alapur, Budaun, Uttar Pradesh"
        );
    }

    #[test]
    fn test_parses_provider_response() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [
                    {"geometry": {"location": {"lat": 27.85, "lng": 78.75}}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(body.status, "OK");
        assert_eq!(body.results[0].geometry.location.lat, 27.85);
    }

    #[test]
    fn test_parses_zero_results_without_results_field() {
        let body: GeocodeResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS"}"#).unwrap();
        assert!(body.results.is_empty());
    }
}
