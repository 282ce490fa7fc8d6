//! Geocoding provider client.

pub mod http;

use async_trait::async_trait;

pub use http::HttpGeocoder;

/// A geocoded coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Seam over the external geocoding provider.
///
/// `None` covers every non-success outcome — zero results, quota/denied
/// status, transport error, timeout. Callers treat all of them identically
/// as "no coordinate this round"; nothing here is fatal.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn geocode(
        &self,
        place: &str,
        locality: &str,
        district: &str,
        state: &str,
    ) -> Option<Coordinate>;
}
