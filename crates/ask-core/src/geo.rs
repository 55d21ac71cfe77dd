//! Great-circle geometry

/// Mean Earth radius in nautical miles
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Coordinates {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

/// Haversine distance in nautical miles
///
/// The intermediate term is clamped to `[0, 1]` so rounding on near-antipodal
/// points never produces NaN.
pub fn haversine_nm(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.latitude_deg.to_radians();
    let phi2 = to.latitude_deg.to_radians();
    let delta_phi = (to.latitude_deg - from.latitude_deg).to_radians();
    let delta_lambda = (to.longitude_deg - from.longitude_deg).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_NM * c
}
