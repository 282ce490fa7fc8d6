//! Entity store access for administrative-unit records.

pub mod es;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AdminUnit, Level};

pub use es::EsUnitStore;

/// Read/write seam over the document store holding administrative units.
///
/// The pipeline never creates or deletes unit documents; it only reads
/// them and updates the coordinate fields plus the `isGeocoded` flag.
/// Both flag and coordinates move together in every write.
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Up to `limit` units of `level` still lacking validated coordinates
    /// (`isGeocoded` false or a coordinate absent), in a deterministic
    /// order.
    async fn find_candidates(&self, level: Level, limit: usize) -> Result<Vec<AdminUnit>>;

    /// Units currently flagged geocoded, for the audit pass.
    async fn find_geocoded(&self) -> Result<Vec<AdminUnit>>;

    /// Persist a validated coordinate pair: sets `latitude`, `longitude`
    /// and `isGeocoded = true` in one document write.
    async fn commit_coordinates(&self, id: &str, lat: f64, lon: f64) -> Result<()>;

    /// Revert a unit to pending: clears both coordinates and resets
    /// `isGeocoded = false` in one document write.
    async fn clear_coordinates(&self, id: &str) -> Result<()>;

    /// Total units at `level`.
    async fn count_units(&self, level: Level) -> Result<u64>;

    /// Units at `level` with the flag set and both coordinates present.
    async fn count_geocoded(&self, level: Level) -> Result<u64>;
}
