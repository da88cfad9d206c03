use crate::geo::{normalize_angle, to_local, GeodeticCoordinate, LocalCoordinate};
use crate::prelude::{TrackError, TrackResult, TrackerConfig};
use crate::telemetry::LogManager;
use crate::tracking::{AircraftId, AircraftRegistry, TrackedAircraft};
use crate::view::ViewWindow;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Mount parameters supplied by the external configuration loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub position: GeodeticCoordinate,
    /// Compass angle, in radians, that the pan/tilt platform's reference side faces.
    pub direction: f64,
    pub view: ViewWindow,
}

/// Pan and tilt in radians, in the pan/tilt platform's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServoAngles {
    pub pan: f64,
    pub tilt: f64,
}

/// Everything the servo driver needs for one aircraft at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointingSolution {
    pub aircraft: AircraftId,
    pub at: f64,
    pub pan: f64,
    pub tilt: f64,
    pub visible: bool,
    pub local: LocalCoordinate,
}

/// Maps a local coordinate onto servo angles for a platform facing `direction`.
///
/// Pan lands in `[0, 2π)`. Tilt is 0 at the horizon and π/2 at the zenith and
/// is not clamped to any physical travel.
pub fn servo_angles(direction: f64, local: &LocalCoordinate) -> ServoAngles {
    ServoAngles {
        pan: normalize_angle(direction - local.azimuth),
        tilt: FRAC_PI_2 - local.altitude_angle,
    }
}

/// The camera's own mount plus the registry of aircraft it knows about.
#[derive(Debug)]
pub struct CameraController {
    position: Option<GeodeticCoordinate>,
    direction: Option<f64>,
    view: Option<ViewWindow>,
    registry: AircraftRegistry,
    logger: LogManager,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    /// A controller whose mount has not been configured yet.
    pub fn new() -> Self {
        Self::with_registry(AircraftRegistry::new())
    }

    pub fn with_registry(registry: AircraftRegistry) -> Self {
        Self {
            position: None,
            direction: None,
            view: None,
            registry,
            logger: LogManager::new("skysense::camera"),
        }
    }

    pub fn from_settings(settings: CameraSettings, config: TrackerConfig) -> Self {
        let mut controller = Self::with_registry(AircraftRegistry::with_config(config));
        controller.apply_settings(settings);
        controller
    }

    pub fn apply_settings(&mut self, settings: CameraSettings) {
        self.position = Some(settings.position);
        self.direction = Some(settings.direction);
        self.view = Some(settings.view);
        self.logger.record(&format!(
            "camera mounted at lat {:.5} lon {:.5} alt {:.0} facing {:.1} deg",
            settings.position.latitude_deg(),
            settings.position.longitude_deg(),
            settings.position.altitude,
            settings.direction.to_degrees()
        ));
    }

    pub fn set_position(&mut self, position: GeodeticCoordinate) {
        self.position = Some(position);
    }

    pub fn set_view(&mut self, view: ViewWindow) {
        self.view = Some(view);
    }

    pub fn position(&self) -> TrackResult<GeodeticCoordinate> {
        self.position
            .ok_or_else(|| TrackError::UninitializedState("camera position".into()))
    }

    pub fn direction(&self) -> TrackResult<f64> {
        self.direction
            .ok_or_else(|| TrackError::UninitializedState("camera direction".into()))
    }

    pub fn view(&self) -> TrackResult<ViewWindow> {
        self.view
            .ok_or_else(|| TrackError::UninitializedState("camera view".into()))
    }

    pub fn registry(&self) -> &AircraftRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AircraftRegistry {
        &mut self.registry
    }

    /// Ingestion entry point for the telemetry collaborator.
    pub fn append_sample(
        &mut self,
        id: impl Into<AircraftId>,
        timestamp: f64,
        position: GeodeticCoordinate,
    ) -> TrackResult<()> {
        self.registry.append_sample(id, timestamp, position)
    }

    pub fn estimate_position(&self, id: &AircraftId, at: f64) -> TrackResult<GeodeticCoordinate> {
        self.registry.estimate_position(id, at)
    }

    pub fn select_target(&mut self, id: &AircraftId) -> TrackResult<()> {
        self.registry.select_target(id)?;
        self.logger.record(&format!("now tracking {}", id));
        Ok(())
    }

    pub fn current_target(&self) -> Option<&AircraftId> {
        self.registry.current_target()
    }

    pub fn to_servo_angles(&self, local: &LocalCoordinate) -> TrackResult<ServoAngles> {
        Ok(servo_angles(self.direction()?, local))
    }

    /// Estimated position of `aircraft` at `at`, relative to the camera, with
    /// the azimuth normalized to `[0, 2π)`.
    pub fn locate(&self, aircraft: &TrackedAircraft, at: f64) -> TrackResult<LocalCoordinate> {
        let own = self.position()?;
        let estimate = aircraft.estimate_position(at)?;
        Ok(to_local(&own, &estimate).normalized())
    }

    pub fn can_see(&self, aircraft: &TrackedAircraft, at: f64) -> TrackResult<bool> {
        let view = self.view()?;
        let local = self.locate(aircraft, at)?;
        Ok(view.contains(&local))
    }

    pub fn can_see_id(&self, id: &AircraftId, at: f64) -> TrackResult<bool> {
        self.can_see(self.registry.require(id)?, at)
    }

    /// Identifiers of all known aircraft inside the view at `at`, sorted.
    pub fn visible_aircraft(&self, at: f64) -> TrackResult<Vec<AircraftId>> {
        let mut visible = Vec::new();
        for id in self.registry.ids() {
            if self.can_see_id(&id, at)? {
                visible.push(id);
            }
        }
        Ok(visible)
    }

    pub fn point_at(&self, id: &AircraftId, at: f64) -> TrackResult<PointingSolution> {
        let view = self.view()?;
        let direction = self.direction()?;
        let local = self.locate(self.registry.require(id)?, at)?;
        let angles = servo_angles(direction, &local);
        let visible = view.contains(&local);
        self.logger.trace_detail(&format!(
            "{} @ {:.2}: pan {:.4} tilt {:.4} visible {}",
            id, at, angles.pan, angles.tilt, visible
        ));
        Ok(PointingSolution {
            aircraft: id.clone(),
            at,
            pan: angles.pan,
            tilt: angles.tilt,
            visible,
            local,
        })
    }

    /// Pointing solution for the current target, if one is selected.
    pub fn point_at_target(&self, at: f64) -> TrackResult<Option<PointingSolution>> {
        match self.registry.current_target() {
            Some(id) => self.point_at(id, at).map(Some),
            None => Ok(None),
        }
    }
}
