//! Geometry and prediction core for the SkySense aircraft-tracking camera.
//!
//! Telemetry flows through the per-aircraft predictor, the estimated position
//! is converted into the camera's local angular frame, tested against the
//! camera's view window and finally mapped onto pan/tilt servo angles.

pub mod camera;
pub mod geo;
pub mod prelude;
pub mod telemetry;
pub mod tracking;
pub mod view;

pub use camera::{CameraController, CameraSettings, PointingSolution, ServoAngles};
pub use geo::{Ecef, GeodeticCoordinate, LocalCoordinate};
pub use prelude::{TrackError, TrackResult, TrackerConfig};
pub use tracking::{AircraftId, AircraftRegistry, TrackedAircraft};
pub use view::ViewWindow;
