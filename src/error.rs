//! Fatal configuration errors.
//!
//! Per-candidate outcomes (provider miss, validation rejection, store
//! write failure) are tallied inside the pipeline and never surface as
//! errors; only misconfiguration aborts a whole invocation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("geocoding provider API key is missing (set provider.api_key or GRAMGEO_API_KEY)")]
    MissingApiKey,

    #[error("invalid provider endpoint `{0}`: {1}")]
    InvalidEndpoint(String, #[source] url::ParseError),

    #[error("invalid district envelope: {0}")]
    InvalidEnvelope(String),
}
