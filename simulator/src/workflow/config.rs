use anyhow::Context;
use serde::{Deserialize, Serialize};
use skysensecore::camera::CameraSettings;
use skysensecore::geo::GeodeticCoordinate;
use skysensecore::prelude::TrackerConfig;
use skysensecore::view::ViewWindow;
use std::fs;
use std::path::Path;

/// View window bounds in degrees, as written in the camera YAML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewConfig {
    pub upper_deg: f64,
    pub lower_deg: f64,
    pub left_deg: f64,
    pub right_deg: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            upper_deg: 0.0,
            lower_deg: 90.0,
            left_deg: 0.0,
            right_deg: 360.0,
        }
    }
}

/// Camera mount and tracker settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_ft: f64,
    pub direction_deg: f64,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl CameraConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading camera config {}", path_ref.display()))?;
        let config: CameraConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing camera config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_ft: f64,
        direction_deg: f64,
    ) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_ft,
            direction_deg,
            view: ViewConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }

    pub fn to_settings(&self) -> anyhow::Result<CameraSettings> {
        let view = ViewWindow::from_degrees(
            self.view.upper_deg,
            self.view.lower_deg,
            self.view.left_deg,
            self.view.right_deg,
        )
        .context("validating camera view")?;
        Ok(CameraSettings {
            position: GeodeticCoordinate::from_degrees(
                self.latitude_deg,
                self.longitude_deg,
                self.altitude_ft,
            ),
            direction: self.direction_deg.to_radians(),
            view,
        })
    }
}
