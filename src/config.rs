//! Pipeline configuration.
//!
//! One TOML file carries the district identity and envelope, the geocoding
//! provider settings, and the entity-store connection. The API key may be
//! supplied via `GRAMGEO_API_KEY` instead of the file. All validation
//! happens at load time; a bad config never reaches the pipeline.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::validate::Envelope;

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineSettings {
    pub district: DistrictConfig,
    pub provider: ProviderConfig,
    pub store: StoreConfig,
}

/// Identity and envelope of the governing district.
#[derive(Debug, Deserialize, Clone)]
pub struct DistrictConfig {
    pub name: String,
    pub state: String,
    pub envelope: Envelope,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub es_url: String,
    #[serde(default = "default_index")]
    pub index: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_throttle_ms() -> u64 {
    200
}

fn default_index() -> String {
    "admin_units".to_string()
}

impl PipelineSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let mut settings: PipelineSettings =
            toml::from_str(&content).context("Failed to parse config file")?;

        if settings.provider.api_key.is_none() {
            settings.provider.api_key = std::env::var("GRAMGEO_API_KEY").ok();
        }
        settings.validate()?;

        Ok(settings)
    }

    /// Fail fast on anything that would otherwise fail every candidate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.district.envelope.validate()?;

        if self
            .provider
            .api_key
            .as_deref()
            .map_or(true, |k| k.trim().is_empty())
        {
            return Err(ConfigError::MissingApiKey);
        }

        Url::parse(&self.provider.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(self.provider.endpoint.clone(), e))?;

        Ok(())
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(api_key: Option<&str>) -> PipelineSettings {
        PipelineSettings {
            district: DistrictConfig {
                name: "Budaun".to_string(),
                state: "Uttar Pradesh".to_string(),
                envelope: Envelope {
                    south: 27.8,
                    north: 28.5,
                    west: 78.35,
                    east: 79.45,
                },
            },
            provider: ProviderConfig {
                endpoint: "https://maps.example.com/geocode/json".to_string(),
                api_key: api_key.map(String::from),
                timeout_secs: 10,
                throttle_ms: 200,
            },
            store: StoreConfig {
                es_url: "http://localhost:9200".to_string(),
                index: "admin_units".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(sample(Some("key")).validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = sample(None).validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = sample(Some("  ")).validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_bad_endpoint_is_fatal() {
        let mut settings = sample(Some("key"));
        settings.provider.endpoint = "not a url".to_string();
        assert!(matches!(
            settings.validate().unwrap_err(),
            ConfigError::InvalidEndpoint(..)
        ));
    }

    #[test]
    fn test_parses_toml() {
        let settings: PipelineSettings = toml::from_str(
            r#"
            [district]
            name = "Budaun"
            state = "Uttar Pradesh"

            [district.envelope]
            south = 27.8
            north = 28.5
            west = 78.35
            east = 79.45

            [provider]
            endpoint = "https://maps.example.com/geocode/json"
            api_key = "k"

            [store]
            es_url = "http://localhost:9200"
        "#,
        )
        .unwrap();

        assert_eq!(settings.district.name, "Budaun");
        assert_eq!(settings.provider.timeout_secs, 10);
        assert_eq!(settings.provider.throttle_ms, 200);
        assert_eq!(settings.store.index, "admin_units");
    }
}
