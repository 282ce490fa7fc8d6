//! Read-only geocoding progress aggregation.

use anyhow::Result;
use serde::Serialize;

use super::GeocodePipeline;
use crate::models::Level;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LevelStatus {
    pub total: u64,
    pub geocoded: u64,
    pub pending: u64,
    /// `geocoded / total * 100`, one decimal; 0 for an empty level.
    pub percentage: f64,
}

impl LevelStatus {
    fn from_counts(total: u64, geocoded: u64) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            (geocoded as f64 / total as f64 * 1000.0).round() / 10.0
        };

        Self {
            total,
            geocoded,
            pending: total.saturating_sub(geocoded),
            percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    pub villages: LevelStatus,
    pub towns: LevelStatus,
    pub wards: LevelStatus,
    pub overall: LevelStatus,
}

impl GeocodePipeline {
    /// Per-level geocoded/pending counts plus an overall rollup. Pure
    /// read over the store counts, no side effects.
    pub async fn status(&self) -> Result<StatusReport> {
        let villages = self.level_status(Level::Village).await?;
        let towns = self.level_status(Level::Town).await?;
        let wards = self.level_status(Level::Ward).await?;

        let overall = LevelStatus::from_counts(
            villages.total + towns.total + wards.total,
            villages.geocoded + towns.geocoded + wards.geocoded,
        );

        Ok(StatusReport {
            villages,
            towns,
            wards,
            overall,
        })
    }

    async fn level_status(&self, level: Level) -> Result<LevelStatus> {
        let total = self.store.count_units(level).await?;
        let geocoded = self.store.count_geocoded(level).await?;
        Ok(LevelStatus::from_counts(total, geocoded))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::{geocoded_village, pipeline, village, MemoryStore, ScriptedProvider};
    use super::LevelStatus;
    use crate::models::Level;

    #[test]
    fn test_percentage_arithmetic() {
        let status = LevelStatus::from_counts(100, 37);
        assert_eq!(status.pending, 63);
        assert_eq!(status.percentage, 37.0);
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        let status = LevelStatus::from_counts(3, 1);
        assert_eq!(status.percentage, 33.3);
    }

    #[test]
    fn test_empty_level_has_zero_percentage() {
        let status = LevelStatus::from_counts(0, 0);
        assert_eq!(status.percentage, 0.0);
        assert_eq!(status.pending, 0);
    }

    #[tokio::test]
    async fn test_report_rolls_up_levels() {
        let mut town = geocoded_village("t-1", "Ujhani", 28.0, 79.0);
        town.level = Level::Town;

        let store = Arc::new(MemoryStore::with_units(vec![
            geocoded_village("v-1", "Alapur", 28.0, 78.9),
            village("v-2", "Bhamori"),
            town,
        ]));

        let report = pipeline(store, Arc::new(ScriptedProvider::default()))
            .status()
            .await
            .unwrap();

        assert_eq!(report.villages.total, 2);
        assert_eq!(report.villages.geocoded, 1);
        assert_eq!(report.villages.percentage, 50.0);
        assert_eq!(report.towns.total, 1);
        assert_eq!(report.wards.total, 0);
        assert_eq!(report.overall.total, 3);
        assert_eq!(report.overall.geocoded, 2);
        assert_eq!(report.overall.percentage, 66.7);
    }

    #[tokio::test]
    async fn test_flag_without_coordinates_counts_as_pending() {
        let mut half_written = village("v-1", "Alapur");
        half_written.is_geocoded = true; // coordinates still absent

        let store = Arc::new(MemoryStore::with_units(vec![half_written]));
        let report = pipeline(store, Arc::new(ScriptedProvider::default()))
            .status()
            .await
            .unwrap();

        assert_eq!(report.villages.geocoded, 0);
        assert_eq!(report.villages.pending, 1);
    }
}
