use crate::geo::LocalCoordinate;
use crate::prelude::{TrackError, TrackResult};
use serde::{Deserialize, Serialize};

/// Angular window of the camera's field of view, all bounds in radians.
///
/// The altitude band `[upper, lower]` never wraps (upper is nearer the
/// zenith). The azimuth band wraps across the 0/2π seam when `left > right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewBounds", into = "ViewBounds")]
pub struct ViewWindow {
    upper: f64,
    lower: f64,
    left: f64,
    right: f64,
}

/// Unchecked form of [`ViewWindow`] used on the serde boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewBounds {
    pub upper: f64,
    pub lower: f64,
    pub left: f64,
    pub right: f64,
}

impl ViewWindow {
    pub fn new(upper: f64, lower: f64, left: f64, right: f64) -> TrackResult<Self> {
        if ![upper, lower, left, right].iter().all(|b| b.is_finite()) {
            return Err(TrackError::InvalidView("non-finite bound".into()));
        }
        if upper > lower {
            return Err(TrackError::InvalidView(format!(
                "upper bound {:.4} lies below lower bound {:.4}",
                upper, lower
            )));
        }
        Ok(Self {
            upper,
            lower,
            left,
            right,
        })
    }

    pub fn from_degrees(upper: f64, lower: f64, left: f64, right: f64) -> TrackResult<Self> {
        Self::new(
            upper.to_radians(),
            lower.to_radians(),
            left.to_radians(),
            right.to_radians(),
        )
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn is_wrapping(&self) -> bool {
        self.left > self.right
    }

    /// Containment test. The azimuth of `position` must already be
    /// normalized to the window's domain.
    pub fn contains(&self, position: &LocalCoordinate) -> bool {
        if !(self.upper <= position.altitude_angle && position.altitude_angle <= self.lower) {
            return false;
        }
        let azimuth = position.azimuth;
        if self.is_wrapping() {
            azimuth >= self.left || azimuth <= self.right
        } else {
            self.left <= azimuth && azimuth <= self.right
        }
    }
}

impl TryFrom<ViewBounds> for ViewWindow {
    type Error = TrackError;

    fn try_from(bounds: ViewBounds) -> TrackResult<Self> {
        Self::new(bounds.upper, bounds.lower, bounds.left, bounds.right)
    }
}

impl From<ViewWindow> for ViewBounds {
    fn from(window: ViewWindow) -> Self {
        Self {
            upper: window.upper,
            lower: window.lower,
            left: window.left,
            right: window.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn at(altitude_angle: f64, azimuth: f64) -> LocalCoordinate {
        LocalCoordinate::new(altitude_angle, azimuth, 1_000.0)
    }

    #[test]
    fn plain_window_contains_center() {
        let view = ViewWindow::new(0.0, PI, 0.0, PI).unwrap();
        assert!(view.contains(&at(FRAC_PI_4, FRAC_PI_2)));
        assert!(view.contains(&at(0.0, 0.0)));
        assert!(view.contains(&at(PI, PI)));
        assert!(!view.contains(&at(FRAC_PI_4, 1.5 * PI)));
    }

    #[test]
    fn altitude_band_gates_azimuth() {
        let view = ViewWindow::new(0.2, 1.2, 0.0, PI).unwrap();
        assert!(!view.contains(&at(0.1, FRAC_PI_2)));
        assert!(!view.contains(&at(1.3, FRAC_PI_2)));
        assert!(view.contains(&at(1.0, FRAC_PI_2)));
    }

    #[test]
    fn wrapping_window_crosses_seam() {
        let view = ViewWindow::new(0.0, PI, 1.5 * PI, FRAC_PI_2).unwrap();
        assert!(view.is_wrapping());
        assert!(view.contains(&at(FRAC_PI_4, 0.0)));
        assert!(view.contains(&at(FRAC_PI_4, 1.75 * PI)));
        assert!(view.contains(&at(FRAC_PI_4, FRAC_PI_2)));
        assert!(!view.contains(&at(FRAC_PI_4, PI)));
    }

    #[test]
    fn inverted_altitude_band_is_rejected() {
        let err = ViewWindow::new(1.0, 0.5, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, TrackError::InvalidView(_)));
        assert!(ViewWindow::new(f64::NAN, 0.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn serde_validates_bounds() {
        let ok: ViewWindow =
            serde_json::from_str(r#"{"upper":0.1,"lower":1.5,"left":5.5,"right":0.8}"#).unwrap();
        assert!(ok.is_wrapping());
        let bad: Result<ViewWindow, _> =
            serde_json::from_str(r#"{"upper":1.5,"lower":0.1,"left":0.0,"right":0.8}"#);
        assert!(bad.is_err());
    }
}
