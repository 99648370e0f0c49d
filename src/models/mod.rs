//! Data models for the GeoAssist application
//!
//! - Location: points, radii and bounding boxes
//! - Geocode: reverse geocoding and country metadata payloads

pub mod geocode;
pub mod location;

pub use geocode::{Address, CountryInfo, ReverseGeocodeResult};
pub use location::{BoundingBox, GeoPoint, Radius};
