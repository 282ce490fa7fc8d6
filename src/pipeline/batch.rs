//! Batch orchestration: one throttled, sequential pass over pending
//! candidates of a single level.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use super::GeocodePipeline;
use crate::models::Level;
use crate::normalize::normalize_area_name;

/// Tally of one batch run. Every selected candidate lands in exactly one
/// of `success`/`failed`; nothing per-candidate escapes the run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchOutcome {
    pub success: u64,
    pub failed: u64,
    pub total: u64,
}

impl GeocodePipeline {
    /// Select up to `batch_size` pending units of `level` and attempt to
    /// geocode each in turn.
    ///
    /// Candidates are processed strictly sequentially with a fixed sleep
    /// between provider calls; the provider's rate ceiling is strict
    /// enough that a delay beats a worker pool here. A failed candidate
    /// stays pending and is naturally retried by the next invocation.
    /// Only the initial candidate query can fail the whole call.
    pub async fn run_batch(&self, level: Level, batch_size: usize) -> Result<BatchOutcome> {
        let candidates = self.store.find_candidates(level, batch_size).await?;
        let total = candidates.len() as u64;

        info!(
            "Geocoding batch: {} pending {} unit(s) in {}",
            total, level, self.district
        );

        let mut success = 0u64;
        let mut failed = 0u64;

        for unit in &candidates {
            let place = normalize_area_name(&unit.area_name);

            let coordinate = self
                .provider
                .geocode(&place, &unit.subdistrict_name, &self.district, &self.state)
                .await;

            match coordinate {
                None => {
                    warn!("No usable geocode for '{}' ({})", unit.area_name, unit.id);
                    failed += 1;
                }
                Some(coord) => {
                    let verdict = self.validator.validate(coord.lat, coord.lon, &place);
                    if !verdict.valid {
                        // Discarded, never persisted.
                        warn!(
                            "Rejected geocode for {}: {}",
                            unit.id,
                            verdict.reason.as_deref().unwrap_or("unknown")
                        );
                        failed += 1;
                    } else {
                        match self
                            .store
                            .commit_coordinates(&unit.id, coord.lat, coord.lon)
                            .await
                        {
                            Ok(()) => {
                                info!(
                                    "Geocoded {} '{}' -> ({}, {})",
                                    unit.id, unit.area_name, coord.lat, coord.lon
                                );
                                success += 1;
                            }
                            Err(e) => {
                                // Store failure is local to this candidate.
                                warn!("Failed to persist geocode for {}: {:#}", unit.id, e);
                                failed += 1;
                            }
                        }
                    }
                }
            }

            // Fixed inter-call delay keeps us under the provider's rate
            // ceiling without a limiter.
            tokio::time::sleep(self.throttle).await;
        }

        info!(
            "Batch complete for {}: {} succeeded, {} failed of {}",
            level, success, failed, total
        );

        Ok(BatchOutcome {
            success,
            failed,
            total,
        })
    }
}
