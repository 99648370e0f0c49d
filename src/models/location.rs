//! Geographic value types: points, radii and bounding boxes

use serde::{Deserialize, Serialize};

use crate::AssistantError;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point without range checks
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point, rejecting non-finite or out-of-range degrees
    pub fn try_new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AssistantError::validation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AssistantError::validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Format point as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Great-circle distance to another point in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// A validated circle radius in kilometers
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd)]
#[serde(try_from = "f64")]
pub struct Radius(f64);

impl TryFrom<f64> for Radius {
    type Error = AssistantError;

    fn try_from(km: f64) -> Result<Self, Self::Error> {
        Self::new(km)
    }
}

impl Radius {
    /// Accepts only positive, finite kilometer values
    pub fn new(km: f64) -> crate::Result<Self> {
        if !km.is_finite() {
            return Err(AssistantError::validation(format!(
                "radius {km} km is not a finite number"
            )));
        }
        if km <= 0.0 {
            return Err(AssistantError::validation(format!(
                "radius must be positive, got {km} km"
            )));
        }
        Ok(Self(km))
    }

    #[must_use]
    pub fn km(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn to_meters(self) -> f64 {
        self.0 * 1000.0
    }
}

/// Latitude/longitude box used to fit a map viewport.
///
/// `west` may be greater than `east` when the box spans the antimeridian.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitude extent in degrees, accounting for antimeridian wrap
    #[must_use]
    pub fn longitude_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east + 360.0 - self.west
        } else {
            self.east - self.west
        }
    }

    #[must_use]
    pub fn latitude_span(&self) -> f64 {
        self.north - self.south
    }
}
