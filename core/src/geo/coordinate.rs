use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Neg, Sub};

/// Geodetic position: latitude and longitude in radians, altitude in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeodeticCoordinate {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Builds a coordinate from degrees of latitude/longitude and feet of altitude.
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, altitude_ft: f64) -> Self {
        Self::new(
            latitude_deg.to_radians(),
            longitude_deg.to_radians(),
            altitude_ft,
        )
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude.to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

/// Earth-centered, earth-fixed position in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Ecef) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl Sub for Ecef {
    type Output = Ecef;

    fn sub(self, rhs: Ecef) -> Ecef {
        Ecef::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Ecef {
    type Output = Ecef;

    fn neg(self) -> Ecef {
        Ecef::new(-self.x, -self.y, -self.z)
    }
}

/// Position of a target as seen from an observer.
///
/// `altitude_angle` is measured from the observer's zenith (0 straight up,
/// π straight down). `azimuth` is cyclic and is not normalized; use
/// [`LocalCoordinate::normalized_azimuth`] before comparing against a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalCoordinate {
    pub altitude_angle: f64,
    pub azimuth: f64,
    pub distance: f64,
}

impl LocalCoordinate {
    pub fn new(altitude_angle: f64, azimuth: f64, distance: f64) -> Self {
        Self {
            altitude_angle,
            azimuth,
            distance,
        }
    }

    /// Azimuth folded into `[0, 2π)`.
    pub fn normalized_azimuth(&self) -> f64 {
        normalize_angle(self.azimuth)
    }

    /// Returns a copy whose azimuth lies in `[0, 2π)`.
    pub fn normalized(&self) -> Self {
        Self::new(self.altitude_angle, self.normalized_azimuth(), self.distance)
    }

    /// True when observer and target coincide; the altitude angle is NaN then.
    pub fn is_degenerate(&self) -> bool {
        self.distance == 0.0
    }
}

/// Folds an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let folded = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if folded >= TAU {
        0.0
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn degrees_are_converted_to_radians() {
        let coord = GeodeticCoordinate::from_degrees(58.4, 15.6, 300.0);
        assert_approx_eq!(coord.latitude, 58.4_f64.to_radians(), 1e-12);
        assert_approx_eq!(coord.longitude_deg(), 15.6, 1e-9);
        assert_eq!(coord.altitude, 300.0);
    }

    #[test]
    fn normalize_angle_folds_into_range() {
        assert_approx_eq!(normalize_angle(-PI / 2.0), 3.0 * PI / 2.0, 1e-12);
        assert_approx_eq!(normalize_angle(5.0 * PI / 2.0), PI / 2.0, 1e-12);
        assert_eq!(normalize_angle(TAU), 0.0);
        let tiny = normalize_angle(-1e-18);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn ecef_vector_helpers() {
        let a = Ecef::new(3.0, 4.0, 0.0);
        let b = Ecef::new(1.0, 1.0, 1.0);
        assert_eq!(a.norm(), 5.0);
        assert_eq!(a.dot(&b), 7.0);
        assert_eq!(a - b, Ecef::new(2.0, 3.0, -1.0));
        assert_eq!(-b, Ecef::new(-1.0, -1.0, -1.0));
    }
}
