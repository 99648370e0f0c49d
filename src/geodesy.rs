//! Geodesic sampling and viewport framing
//!
//! `sample` picks a point uniformly by area inside a circle on the sphere and
//! `frame` computes a latitude/longitude box that contains a circle of the
//! same radius, suitable for fitting a web map viewport.

use std::f64::consts::PI;

use rand::RngExt;

use crate::models::{BoundingBox, GeoPoint};

/// Mean Earth radius (IUGG) in kilometers
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Kilometers per degree of latitude used for framing
pub const KM_PER_DEGREE_LATITUDE: f64 = 111.0;

/// Kilometers per degree of longitude at the equator used for framing
pub const KM_PER_DEGREE_LONGITUDE: f64 = 111.32;

/// Web Mercator stops being usable beyond this latitude
pub const MAX_RENDER_LATITUDE: f64 = 85.0;

const MIN_COS_LATITUDE: f64 = 0.0001;

/// Sample a uniformly distributed point within `radius_km` of `center`
/// using the thread-local RNG.
#[must_use]
pub fn sample(center: GeoPoint, radius_km: f64) -> GeoPoint {
    sample_with(&mut rand::rng(), center, radius_km)
}

/// Same as [`sample`], drawing from the supplied RNG.
pub fn sample_with<R: RngExt + ?Sized>(rng: &mut R, center: GeoPoint, radius_km: f64) -> GeoPoint {
    let u: f64 = rng.random();
    let v: f64 = rng.random();
    destination_from_draws(center, radius_km, u, v)
}

/// Spherical destination for the unit draws `u` (distance) and `v` (bearing).
///
/// `sqrt(u)` makes the density uniform per unit area instead of per unit
/// radius.
fn destination_from_draws(center: GeoPoint, radius_km: f64, u: f64, v: f64) -> GeoPoint {
    let angular_distance = (radius_km / EARTH_MEAN_RADIUS_KM) * u.sqrt();
    let bearing = 2.0 * PI * v;
    destination(center, angular_distance, bearing)
}

/// Point reached from `start` after travelling `angular_distance` radians
/// along the great circle with initial `bearing` (radians, clockwise from north).
#[must_use]
pub fn destination(start: GeoPoint, angular_distance: f64, bearing: f64) -> GeoPoint {
    let lat1 = start.latitude.to_radians();
    let lng1 = start.longitude.to_radians();
    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_w, cos_w) = angular_distance.sin_cos();

    let lat2 = (sin_lat1 * cos_w + cos_lat1 * sin_w * bearing.cos()).asin();
    let lng2 = lng1 + (bearing.sin() * sin_w * cos_lat1).atan2(cos_w - sin_lat1 * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), normalize_longitude(lng2.to_degrees()))
}

/// Wrap any longitude into [-180, 180).
#[must_use]
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Bounding box that contains a circle of `radius_km` around `point`.
///
/// Uses a flat local approximation of degrees per kilometer; good enough for
/// fitting a viewport, not for geodesy.
#[must_use]
pub fn frame(point: GeoPoint, radius_km: f64) -> BoundingBox {
    let lat_half_span = radius_km / KM_PER_DEGREE_LATITUDE;

    let clamped_lat = point
        .latitude
        .clamp(-MAX_RENDER_LATITUDE, MAX_RENDER_LATITUDE)
        .to_radians();
    let lng_half_span =
        radius_km / (KM_PER_DEGREE_LONGITUDE * clamped_lat.cos().max(MIN_COS_LATITUDE));

    // both edges clamped so south <= north also holds past the render limit
    let south = (point.latitude - lat_half_span).clamp(-MAX_RENDER_LATITUDE, MAX_RENDER_LATITUDE);
    let north = (point.latitude + lat_half_span).clamp(-MAX_RENDER_LATITUDE, MAX_RENDER_LATITUDE);

    // single wrap: half-spans beyond 360 degrees are not corrected
    let mut west = point.longitude - lng_half_span;
    let mut east = point.longitude + lng_half_span;
    if west < -180.0 {
        west += 360.0;
    }
    if east > 180.0 {
        east -= 360.0;
    }

    BoundingBox {
        south,
        west,
        north,
        east,
    }
}
