//! Geocoding pipeline: batch orchestration, status aggregation, and the
//! coordinate audit pass.

pub mod audit;
pub mod batch;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{DistrictConfig, PipelineSettings};
use crate::error::ConfigError;
use crate::geocode::GeocodeProvider;
use crate::store::UnitStore;
use crate::validate::BoundaryValidator;

pub use audit::{AuditFinding, AuditReport};
pub use batch::BatchOutcome;
pub use status::{LevelStatus, StatusReport};

/// Drives normalization, provider calls, validation and persistence for
/// one governing district. The only writer of geocoding state in normal
/// operation; the audit pass is the only other one.
pub struct GeocodePipeline {
    store: Arc<dyn UnitStore>,
    provider: Arc<dyn GeocodeProvider>,
    validator: BoundaryValidator,
    district: String,
    state: String,
    throttle: Duration,
}

impl GeocodePipeline {
    pub fn new(
        store: Arc<dyn UnitStore>,
        provider: Arc<dyn GeocodeProvider>,
        district: &DistrictConfig,
        throttle: Duration,
    ) -> Result<Self, ConfigError> {
        let validator = BoundaryValidator::new(district.envelope, district.name.clone())?;

        Ok(Self {
            store,
            provider,
            validator,
            district: district.name.clone(),
            state: district.state.clone(),
            throttle,
        })
    }

    pub fn from_settings(
        store: Arc<dyn UnitStore>,
        provider: Arc<dyn GeocodeProvider>,
        settings: &PipelineSettings,
    ) -> Result<Self, ConfigError> {
        Self::new(
            store,
            provider,
            &settings.district,
            settings.provider.throttle(),
        )
    }
}
