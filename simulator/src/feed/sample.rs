use serde::{Deserialize, Serialize};
use skysensecore::geo::GeodeticCoordinate;
use skysensecore::tracking::AircraftId;

/// One position report as produced by the telemetry source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub id: String,
    pub timestamp: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_ft: f64,
}

impl TelemetrySample {
    pub fn aircraft_id(&self) -> AircraftId {
        AircraftId::new(self.id.clone())
    }

    pub fn position(&self) -> GeodeticCoordinate {
        GeodeticCoordinate::from_degrees(self.latitude_deg, self.longitude_deg, self.altitude_ft)
    }
}
