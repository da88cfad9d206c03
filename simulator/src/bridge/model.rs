use serde::{Deserialize, Serialize};
use skysensecore::camera::PointingSolution;
use skysensecore::telemetry::MetricsSnapshot;
use skysensecore::tracking::AircraftId;

/// Snapshot handed to the servo driver on each poll.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PointingModel {
    pub at: f64,
    pub target: Option<PointingSolution>,
    pub visible: Vec<AircraftId>,
    pub tracked: usize,
    pub metrics: MetricsSnapshot,
}
