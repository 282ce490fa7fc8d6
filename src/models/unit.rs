//! Administrative-unit record types.
//!
//! One document per (place, level, residence) triple; a named place can
//! carry up to three records (total/urban/rural) at the same hierarchy
//! position. The pipeline only ever touches the coordinate fields and the
//! `isGeocoded` flag; creation and deletion belong to the import step.

use serde::{Deserialize, Serialize};

/// Census hierarchy level of an administrative unit.
///
/// Fixed taxonomy, immutable once a record is created. Only town, village
/// and ward are geocoding targets; the upper levels exist as hierarchy
/// context on every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    State,
    District,
    Subdistrict,
    Town,
    Village,
    Ward,
}

impl Level {
    /// Parse a level from its wire/query representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "state" => Some(Level::State),
            "district" => Some(Level::District),
            "subdistrict" => Some(Level::Subdistrict),
            "town" => Some(Level::Town),
            "village" => Some(Level::Village),
            "ward" => Some(Level::Ward),
            _ => None,
        }
    }

    /// Wire/field name for this level.
    pub fn field_name(&self) -> &'static str {
        match self {
            Level::State => "state",
            Level::District => "district",
            Level::Subdistrict => "subdistrict",
            Level::Town => "town",
            Level::Village => "village",
            Level::Ward => "ward",
        }
    }

}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Residence classification, orthogonal to [`Level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Residence {
    Total,
    Urban,
    Rural,
}

/// A single administrative-unit document as persisted in the entity store.
///
/// Field names follow the store's camelCase layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnit {
    /// Store document id.
    pub id: String,

    pub level: Level,

    pub residence: Residence,

    pub state_code: i32,
    pub district_code: i32,
    pub subdistrict_code: i32,

    pub district_name: String,
    pub subdistrict_name: String,

    /// Unit code unique within its level; present for town/village/ward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<String>,

    /// Display name, also the geocoding query input (after normalization).
    pub area_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Authoritative status flag. When true, both coordinates are present
    /// and have passed boundary validation for the governing district.
    #[serde(default)]
    pub is_geocoded: bool,

    /// Reporting context only; never read by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub households: Option<i64>,
}

impl AdminUnit {
    /// Whether this unit is eligible for a geocoding attempt.
    ///
    /// A missing coordinate and a false flag are treated as equivalent
    /// signals; selection and status logic must never rely on one alone.
    pub fn is_candidate(&self) -> bool {
        !self.is_geocoded || self.latitude.is_none() || self.longitude.is_none()
    }
}
