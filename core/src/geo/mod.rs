pub mod coordinate;
pub mod transform;

pub use coordinate::{normalize_angle, Ecef, GeodeticCoordinate, LocalCoordinate};
pub use transform::{ecef, geodetic_from_ecef, to_local};
