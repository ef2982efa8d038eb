//! Great-circle geometry over route points.
//!
//! Every distance shown to the user and every distance used to time an
//! exported track goes through [`haversine_distance_km`].

use geo::{BoundingRect, LineString, coord};

use crate::models::RoutePoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// The intermediate term is clamped to `[0, 1]` so nearly coincident or
/// antipodal points never produce NaN.
pub fn haversine_distance_km(p1: &RoutePoint, p2: &RoutePoint) -> f64 {
    let lat1_rad = p1.lat.to_radians();
    let lat2_rad = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total length of the route in kilometers.
pub fn cumulative_distance_km(points: &[RoutePoint]) -> f64 {
    points
        .windows(2)
        .fold(0.0, |total, pair| total + haversine_distance_km(&pair[0], &pair[1]))
}

/// Distance travelled up to each point, starting at 0 for the first one.
///
/// The last entry is bit-identical to [`cumulative_distance_km`].
pub fn cumulative_distances_km(points: &[RoutePoint]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len());
    let mut total = 0.0;

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += haversine_distance_km(&points[i - 1], point);
        }
        distances.push(total);
    }

    distances
}

/// Initial great-circle bearing from `from` to `to`, in degrees `[0, 360)`.
pub fn initial_bearing_deg(from: &RoutePoint, to: &RoutePoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative angles
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Latitude/longitude extent of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Bounding box of the points, `None` for an empty route.
pub fn bounds(points: &[RoutePoint]) -> Option<Bounds> {
    let line: LineString<f64> = points
        .iter()
        .map(|p| coord! { x: p.lng, y: p.lat })
        .collect();

    line.bounding_rect().map(|rect| Bounds {
        min_lat: rect.min().y,
        min_lon: rect.min().x,
        max_lat: rect.max().y,
        max_lon: rect.max().x,
    })
}
