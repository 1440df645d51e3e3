//! Great-circle geometry between airports.

use contrail_types::{Airport, Waypoint};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two airports in kilometres (haversine).
pub fn great_circle_km(a: &Airport, b: &Airport) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().clamp(0.0, 1.0).asin()
}

/// Point at `fraction` (0.0 to 1.0) of the great circle from `a` to `b`.
pub fn intermediate_point(a: &Airport, b: &Airport, fraction: f64) -> Waypoint {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let delta = great_circle_km(a, b) / EARTH_RADIUS_KM;
    let sin_delta = delta.sin();
    if sin_delta.abs() < f64::EPSILON {
        return Waypoint {
            latitude: a.latitude,
            longitude: a.longitude,
        };
    }

    let wa = ((1.0 - fraction) * delta).sin() / sin_delta;
    let wb = (fraction * delta).sin() / sin_delta;
    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    Waypoint {
        latitude: z.atan2(x.hypot(y)).to_degrees(),
        longitude: y.atan2(x).to_degrees(),
    }
}
