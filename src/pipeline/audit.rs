//! Audit pass over previously accepted coordinates.
//!
//! Re-validates everything currently flagged geocoded and reverts the
//! failures to pending. This is how a tightened envelope or bad
//! historical data self-heals without manual data surgery.

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info, warn};

use super::GeocodePipeline;
use crate::models::Level;

/// One unit whose stored coordinate no longer passes validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    pub id: String,
    pub area_name: String,
    pub level: Level,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub reason: String,
}

/// Findings are returned to the caller and logged, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub checked: u64,
    pub invalid_found: u64,
    pub invalid: Vec<AuditFinding>,
}

impl GeocodePipeline {
    /// Re-validate every geocoded unit; clear coordinates and reset the
    /// flag on each failure, returning the unit to the candidate pool.
    ///
    /// Idempotent: with no intervening writes a second run finds nothing.
    pub async fn audit(&self) -> Result<AuditReport> {
        let units = self.store.find_geocoded().await?;
        let checked = units.len() as u64;

        info!("Auditing {} geocoded unit(s)", checked);

        let mut invalid = Vec::new();

        for unit in &units {
            let reason = match (unit.latitude, unit.longitude) {
                (Some(lat), Some(lon)) => {
                    let verdict = self.validator.validate(lat, lon, &unit.area_name);
                    if verdict.valid {
                        continue;
                    }
                    verdict
                        .reason
                        .unwrap_or_else(|| "failed validation".to_string())
                }
                // Flag set with a coordinate missing breaks the written
                // invariant; treat it as invalid and repair it too.
                _ => format!("{}: flagged geocoded without coordinates", unit.area_name),
            };

            warn!("Audit invalidated {}: {}", unit.id, reason);

            if let Err(e) = self.store.clear_coordinates(&unit.id).await {
                // Still reported; the next audit run will retry the clear.
                error!("Failed to reset {}: {:#}", unit.id, e);
            }

            invalid.push(AuditFinding {
                id: unit.id.clone(),
                area_name: unit.area_name.clone(),
                level: unit.level,
                latitude: unit.latitude,
                longitude: unit.longitude,
                reason,
            });
        }

        info!(
            "Audit complete: {} checked, {} invalidated",
            checked,
            invalid.len()
        );

        Ok(AuditReport {
            checked,
            invalid_found: invalid.len() as u64,
            invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::{geocoded_village, pipeline, village, MemoryStore, ScriptedProvider};

    #[tokio::test]
    async fn test_out_of_envelope_unit_is_reset() {
        let store = Arc::new(MemoryStore::with_units(vec![
            geocoded_village("v-1", "Alapur", 28.0, 78.9),
            // Accepted under an older, looser envelope.
            geocoded_village("v-2", "Bhamori", 40.0, 78.9),
        ]));

        let p = pipeline(store.clone(), Arc::new(ScriptedProvider::default()));
        let report = p.audit().await.unwrap();

        assert_eq!(report.checked, 2);
        assert_eq!(report.invalid_found, 1);
        assert_eq!(report.invalid[0].id, "v-2");
        assert!(report.invalid[0].reason.contains("outside"));

        let reset = store.get("v-2").unwrap();
        assert!(reset.latitude.is_none());
        assert!(reset.longitude.is_none());
        assert!(!reset.is_geocoded);

        // The valid unit is untouched.
        assert!(store.get("v-1").unwrap().is_geocoded);
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing() {
        let store = Arc::new(MemoryStore::with_units(vec![geocoded_village(
            "v-1", "Alapur", 0.0, 0.0,
        )]));

        let p = pipeline(store, Arc::new(ScriptedProvider::default()));

        let first = p.audit().await.unwrap();
        assert_eq!(first.invalid_found, 1);

        let second = p.audit().await.unwrap();
        assert_eq!(second.checked, 0);
        assert_eq!(second.invalid_found, 0);
    }

    #[tokio::test]
    async fn test_flag_without_coordinates_is_a_finding() {
        let mut half_written = village("v-1", "Alapur");
        half_written.is_geocoded = true;

        let store = Arc::new(MemoryStore::with_units(vec![half_written]));
        let p = pipeline(store.clone(), Arc::new(ScriptedProvider::default()));

        let report = p.audit().await.unwrap();
        assert_eq!(report.invalid_found, 1);
        assert!(report.invalid[0].reason.contains("without coordinates"));
        assert!(!store.get("v-1").unwrap().is_geocoded);
    }

    #[tokio::test]
    async fn test_reset_unit_is_geocodable_again() {
        let store = Arc::new(MemoryStore::with_units(vec![geocoded_village(
            "v-1", "Alapur", 40.0, 78.9,
        )]));
        let provider = Arc::new(ScriptedProvider::default().with_response("Alapur", 28.0, 78.9));

        let p = pipeline(store.clone(), provider);
        p.audit().await.unwrap();

        let outcome = p
            .run_batch(crate::models::Level::Village, 10)
            .await
            .unwrap();

        assert_eq!(outcome.success, 1);
        assert_eq!(store.get("v-1").unwrap().latitude, Some(28.0));
    }
}
