use crate::geo::coordinate::{Ecef, GeodeticCoordinate, LocalCoordinate};
use std::f64::consts::{FRAC_PI_2, PI};

/// Equatorial radius of the reference spheroid, in feet.
pub const EQUATORIAL_RADIUS_FT: f64 = 20_925_646.3;
/// Polar radius of the reference spheroid, in feet.
pub const POLAR_RADIUS_FT: f64 = 20_855_486.5;

const AXIS_RATIO_SQ: f64 =
    (POLAR_RADIUS_FT * POLAR_RADIUS_FT) / (EQUATORIAL_RADIUS_FT * EQUATORIAL_RADIUS_FT);
const ECCENTRICITY_SQ: f64 = 1.0 - AXIS_RATIO_SQ;

/// Below this magnitude the north projection is treated as zero.
const NORTH_PROJECTION_EPSILON: f64 = 1e-8;

/// Prime vertical radius of curvature at geodetic latitude `phi`, in feet.
fn prime_vertical_radius(phi: f64) -> f64 {
    let sin_phi = phi.sin();
    EQUATORIAL_RADIUS_FT / (1.0 - ECCENTRICITY_SQ * sin_phi * sin_phi).sqrt()
}

/// Converts a geodetic coordinate into earth-centered, earth-fixed feet.
pub fn ecef(coordinate: &GeodeticCoordinate) -> Ecef {
    let n_phi = prime_vertical_radius(coordinate.latitude);
    let (sin_lat, cos_lat) = coordinate.latitude.sin_cos();
    let (sin_lon, cos_lon) = coordinate.longitude.sin_cos();
    let alt = coordinate.altitude;

    Ecef {
        x: (n_phi + alt) * cos_lat * cos_lon,
        y: (n_phi + alt) * cos_lat * sin_lon,
        z: (AXIS_RATIO_SQ * n_phi + alt) * sin_lat,
    }
}

/// Inverse of [`ecef`] on the same spheroid, solved by fixed-point iteration
/// on latitude.
pub fn geodetic_from_ecef(position: &Ecef) -> GeodeticCoordinate {
    let p = position.x.hypot(position.y);
    let longitude = position.y.atan2(position.x);
    let mut latitude = position.z.atan2(p * AXIS_RATIO_SQ);
    let mut altitude = 0.0;

    for _ in 0..20 {
        let n_phi = prime_vertical_radius(latitude);
        let cos_lat = latitude.cos();
        altitude = if cos_lat.abs() > 1e-10 {
            p / cos_lat - n_phi
        } else {
            position.z.abs() - AXIS_RATIO_SQ * n_phi
        };
        let next = position
            .z
            .atan2(p * (1.0 - ECCENTRICITY_SQ * n_phi / (n_phi + altitude)));
        let converged = (next - latitude).abs() < 1e-14;
        latitude = next;
        if converged {
            break;
        }
    }

    GeodeticCoordinate::new(latitude, longitude, altitude)
}

/// Angles and distance from `observer` to `target`.
///
/// The altitude angle is in `[0, π]` with 0 on the observer's zenith line.
/// The azimuth comes from `atan(east / north)` of the separation vector and is
/// pushed into the opposite half plane when the target lies at a higher
/// latitude than the observer. That places due south at 0 and due north at π,
/// with values in `(-π/2, 3π/2)`. A vanishing north component yields π/2 for
/// both east and west targets. Distance is in feet.
///
/// When observer and target coincide the distance is 0, the altitude angle
/// is NaN and the azimuth falls back to π/2.
pub fn to_local(observer: &GeodeticCoordinate, target: &GeodeticCoordinate) -> LocalCoordinate {
    let own = ecef(observer);
    let delta = own - ecef(target);
    let distance = delta.norm();

    let line_of_sight = -delta;
    let altitude_angle = (own.dot(&line_of_sight) / (own.norm() * distance))
        .clamp(-1.0, 1.0)
        .acos();

    let level_north = Ecef::new(-own.x * own.z, -own.y * own.z, own.x * own.x + own.y * own.y);
    let level_east = Ecef::new(-own.y, own.x, 0.0);

    let north_projection = level_north.dot(&delta) / level_north.norm();
    let east_projection = level_east.dot(&delta) / level_east.norm();

    let mut azimuth = if north_projection.abs() <= NORTH_PROJECTION_EPSILON {
        FRAC_PI_2
    } else {
        (east_projection / north_projection).atan()
    };
    if observer.latitude < target.latitude {
        azimuth += PI;
    }

    LocalCoordinate::new(altitude_angle, azimuth, distance)
}
