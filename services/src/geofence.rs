use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn as_pair(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Great-circle distance between two points in metres.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// A circle around the library a check-in location must fall inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofencePolicy {
    pub center: GeoPoint,
    pub radius_m: f64,
}

impl GeofencePolicy {
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.is_valid() && haversine_m(self.center, point) <= self.radius_m
    }
}
