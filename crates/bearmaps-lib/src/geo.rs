//! Spherical geometry helpers shared by the graph, spatial index and router.
//!
//! Distances are great-circle distances in miles, computed with the haversine
//! formula. Bearings are initial forward azimuths in degrees within `[0, 360)`.

use serde::Serialize;

/// Earth radius used by every distance in the crate, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to another position in miles.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine(self.lon, self.lat, other.lon, other.lat)
    }

    /// Initial compass bearing towards another position in degrees.
    pub fn bearing_to(&self, other: &Self) -> f64 {
        bearing(self.lon, self.lat, other.lon, other.lat)
    }

    /// Point on the unit sphere. Squared chord length between two such points
    /// grows monotonically with their great-circle distance.
    pub(crate) fn unit_vector(&self) -> [f64; 3] {
        let phi = self.lat.to_radians();
        let lambda = self.lon.to_radians();
        [
            phi.cos() * lambda.cos(),
            phi.cos() * lambda.sin(),
            phi.sin(),
        ]
    }
}

/// Haversine distance between two coordinates, in miles.
pub fn haversine(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let phi_a = lat_a.to_radians();
    let phi_b = lat_b.to_radians();
    let d_phi = (lat_b - lat_a).to_radians();
    let d_lambda = (lon_b - lon_a).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Forward azimuth from the first coordinate to the second, in `[0, 360)`.
pub fn bearing(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let phi_a = lat_a.to_radians();
    let phi_b = lat_b.to_radians();
    let d_lambda = (lon_b - lon_a).to_radians();

    let y = d_lambda.sin() * phi_b.cos();
    let x = phi_a.cos() * phi_b.sin() - phi_a.sin() * phi_b.cos() * d_lambda.cos();
    let degrees = y.atan2(x).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn distance_to_self_is_zero() {
        let p = Position::new(-122.26, 37.87);
        assert!(p.distance_to(&p).abs() < EPS);
    }

    #[test]
    fn one_degree_of_latitude_matches_arc_length() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 1.0);
        let expected = EARTH_RADIUS_MILES * 1.0_f64.to_radians();
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(-122.2998, 37.8922);
        let b = Position::new(-122.2119, 37.8228);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < EPS);
    }

    #[test]
    fn cardinal_bearings() {
        let origin = Position::new(0.0, 0.0);
        assert!((origin.bearing_to(&Position::new(0.0, 1.0)) - 0.0).abs() < EPS);
        assert!((origin.bearing_to(&Position::new(1.0, 0.0)) - 90.0).abs() < EPS);
        assert!((origin.bearing_to(&Position::new(0.0, -1.0)) - 180.0).abs() < EPS);
        assert!((origin.bearing_to(&Position::new(-1.0, 0.0)) - 270.0).abs() < EPS);
    }

    #[test]
    fn bearing_stays_in_range() {
        let origin = Position::new(-122.25, 37.85);
        for step in 0..72 {
            let angle = (step as f64 * 5.0).to_radians();
            let target = Position::new(-122.25 + 0.01 * angle.sin(), 37.85 + 0.01 * angle.cos());
            let b = origin.bearing_to(&target);
            assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
        }
    }

    #[test]
    fn unit_vector_has_unit_length() {
        let v = Position::new(-122.25, 37.85).unit_vector();
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((norm - 1.0).abs() < EPS);
    }
}
