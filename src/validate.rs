//! Spatial plausibility gate for geocoding results.
//!
//! A rectangular envelope per district, not point-in-polygon: the gate
//! only has to reject gross errors (a same-named place in another state,
//! the provider's (0,0) no-match sentinel), so a conservative box derived
//! from the district boundary with a safety margin is enough.

use serde::Deserialize;

use crate::error::ConfigError;

/// Rectangular latitude/longitude bounding box `[south, north] x [west, east]`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Envelope {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Envelope {
    /// Check the box is well-formed: finite, ordered, within world bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.south, self.north, self.west, self.east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidEnvelope(
                "bounds must be finite numbers".to_string(),
            ));
        }
        if self.south >= self.north {
            return Err(ConfigError::InvalidEnvelope(format!(
                "south ({}) must be less than north ({})",
                self.south, self.north
            )));
        }
        if self.west >= self.east {
            return Err(ConfigError::InvalidEnvelope(format!(
                "west ({}) must be less than east ({})",
                self.west, self.east
            )));
        }
        if self.south < -90.0 || self.north > 90.0 || self.west < -180.0 || self.east > 180.0 {
            return Err(ConfigError::InvalidEnvelope(
                "bounds exceed valid latitude/longitude range".to_string(),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Outcome of a single validation check.
#[derive(Debug, Clone)]
pub struct Validation {
    pub valid: bool,
    pub reason: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Validates coordinate pairs against a district envelope.
#[derive(Debug, Clone)]
pub struct BoundaryValidator {
    envelope: Envelope,
    district: String,
}

impl BoundaryValidator {
    pub fn new(envelope: Envelope, district: impl Into<String>) -> Result<Self, ConfigError> {
        envelope.validate()?;
        Ok(Self {
            envelope,
            district: district.into(),
        })
    }

    /// Run the checks in order; the first failure wins and its reason
    /// names the failing check plus the unit label.
    pub fn validate(&self, lat: f64, lon: f64, label: &str) -> Validation {
        if !lat.is_finite() || !lon.is_finite() {
            return Validation::rejected(format!(
                "{}: coordinates are not finite numbers ({}, {})",
                label, lat, lon
            ));
        }

        if lat == 0.0 && lon == 0.0 {
            return Validation::rejected(format!(
                "{}: zero coordinates (provider no-match sentinel)",
                label
            ));
        }

        if !self.envelope.contains(lat, lon) {
            return Validation::rejected(format!(
                "{}: ({}, {}) outside {} envelope [{}, {}] x [{}, {}]",
                label,
                lat,
                lon,
                self.district,
                self.envelope.south,
                self.envelope.north,
                self.envelope.west,
                self.envelope.east
            ));
        }

        Validation::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> BoundaryValidator {
        BoundaryValidator::new(
            Envelope {
                south: 27.8,
                north: 28.5,
                west: 78.35,
                east: 79.45,
            },
            "Budaun",
        )
        .unwrap()
    }

    #[test]
    fn test_accepts_point_inside_envelope() {
        let v = validator().validate(28.0, 78.9, "X");
        assert!(v.valid);
        assert!(v.reason.is_none());
    }

    #[test]
    fn test_rejects_zero_sentinel() {
        let v = validator().validate(0.0, 0.0, "X");
        assert!(!v.valid);
        assert!(v.reason.unwrap().contains("zero"));
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let v = validator().validate(40.0, 78.9, "X");
        assert!(!v.valid);
        assert!(v.reason.unwrap().contains("outside"));
    }

    #[test]
    fn test_rejects_nan() {
        let v = validator().validate(f64::NAN, 78.9, "X");
        assert!(!v.valid);
        assert!(v.reason.unwrap().contains("finite"));
    }

    #[test]
    fn test_boundary_points_inclusive() {
        assert!(validator().validate(27.8, 78.35, "edge").valid);
        assert!(validator().validate(28.5, 79.45, "edge").valid);
    }

    #[test]
    fn test_rejects_malformed_envelope() {
        let err = BoundaryValidator::new(
            Envelope {
                south: 28.5,
                north: 27.8,
                west: 78.35,
                east: 79.45,
            },
            "Budaun",
        );
        assert!(err.is_err());
    }
}
