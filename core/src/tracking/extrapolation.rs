//! Continuous-time position estimates fitted to a short sample history.
//!
//! Each axis (latitude, longitude, altitude) is fitted independently with the
//! interpolating polynomial through the buffered samples, stored in Newton
//! form. Time is shifted by the aircraft's creation time before fitting so the
//! independent variable stays small.

use crate::geo::GeodeticCoordinate;
use crate::prelude::TrackError;
use crate::tracking::history::Sample;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

const AXES: usize = 3;

/// The current position estimate of an aircraft, as a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Extrapolation {
    /// A single distinct sample: every query returns its position.
    Constant {
        timestamp: f64,
        position: GeodeticCoordinate,
    },
    Polynomial(PolynomialFit),
}

impl Extrapolation {
    /// Fits the samples (in arrival order). Returns `None` for an empty slice.
    ///
    /// A later sample with the same timestamp as an earlier one replaces it.
    /// Only the most recent `max_degree + 1` distinct timestamps are used.
    pub fn fit(samples: &[Sample], origin: f64, max_degree: usize) -> Option<Self> {
        let mut nodes: Vec<Sample> = Vec::with_capacity(samples.len());
        for sample in samples {
            if let Some(existing) = nodes.iter_mut().find(|n| n.timestamp == sample.timestamp) {
                *existing = *sample;
            } else {
                nodes.push(*sample);
            }
        }

        let keep = max_degree.saturating_add(1);
        if nodes.len() > keep {
            nodes.drain(..nodes.len() - keep);
        }

        match nodes.as_slice() {
            [] => None,
            [only] => Some(Extrapolation::Constant {
                timestamp: only.timestamp,
                position: only.position,
            }),
            _ => Some(Extrapolation::Polynomial(PolynomialFit::new(&nodes, origin))),
        }
    }

    pub fn evaluate(&self, at: f64) -> GeodeticCoordinate {
        match self {
            Extrapolation::Constant { position, .. } => *position,
            Extrapolation::Polynomial(fit) => fit.evaluate(at),
        }
    }

    /// Absolute time span covered by the fitted samples.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Extrapolation::Constant { timestamp, .. } => (*timestamp, *timestamp),
            Extrapolation::Polynomial(fit) => fit.domain(),
        }
    }

    /// True when `at` lies outside the span of the fitted samples.
    pub fn is_extrapolating(&self, at: f64) -> bool {
        let (start, end) = self.domain();
        at < start || at > end
    }

    pub fn degree(&self) -> usize {
        match self {
            Extrapolation::Constant { .. } => 0,
            Extrapolation::Polynomial(fit) => fit.nodes.len() - 1,
        }
    }
}

/// Per-axis Newton-form interpolating polynomials over shifted time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolynomialFitParts", into = "PolynomialFitParts")]
pub struct PolynomialFit {
    origin: f64,
    nodes: Vec<f64>,
    /// Recorded positions at the nodes, one row per axis.
    node_values: Array2<f64>,
    /// Divided-difference coefficients, one row per axis.
    coefficients: Array2<f64>,
}

impl PolynomialFit {
    fn new(samples: &[Sample], origin: f64) -> Self {
        let n = samples.len();
        let nodes: Vec<f64> = samples.iter().map(|s| s.timestamp - origin).collect();
        let mut node_values = Array2::<f64>::zeros((AXES, n));
        for (i, sample) in samples.iter().enumerate() {
            for (axis, value) in axis_values(&sample.position).into_iter().enumerate() {
                node_values[[axis, i]] = value;
            }
        }

        let mut coefficients = node_values.clone();
        for mut row in coefficients.rows_mut() {
            for j in 1..n {
                for i in (j..n).rev() {
                    row[i] = (row[i] - row[i - 1]) / (nodes[i] - nodes[i - j]);
                }
            }
        }

        Self {
            origin,
            nodes,
            node_values,
            coefficients,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        let (min, max) = self
            .nodes
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        (min + self.origin, max + self.origin)
    }

    pub fn evaluate(&self, at: f64) -> GeodeticCoordinate {
        let elapsed = at - self.origin;

        // node hits return the recorded sample verbatim
        if let Some(i) = self.nodes.iter().position(|&t| t == elapsed) {
            let column = self.node_values.column(i);
            return GeodeticCoordinate::new(column[0], column[1], column[2]);
        }

        let mut axes = [0.0; AXES];
        for (axis, row) in self.coefficients.rows().into_iter().enumerate() {
            let last = self.nodes.len() - 1;
            let mut value = row[last];
            for k in (0..last).rev() {
                value = value * (elapsed - self.nodes[k]) + row[k];
            }
            axes[axis] = value;
        }
        GeodeticCoordinate::new(axes[0], axes[1], axes[2])
    }
}

/// Unchecked form of [`PolynomialFit`] used on the serde boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialFitParts {
    pub origin: f64,
    pub nodes: Vec<f64>,
    pub node_values: Array2<f64>,
    pub coefficients: Array2<f64>,
}

impl TryFrom<PolynomialFitParts> for PolynomialFit {
    type Error = TrackError;

    fn try_from(parts: PolynomialFitParts) -> Result<Self, Self::Error> {
        let n = parts.nodes.len();
        if n < 2 {
            return Err(TrackError::InvalidFit(format!(
                "polynomial needs at least 2 nodes, got {}",
                n
            )));
        }
        let all_finite = parts.origin.is_finite()
            && parts.nodes.iter().all(|t| t.is_finite())
            && parts.node_values.iter().all(|v| v.is_finite())
            && parts.coefficients.iter().all(|v| v.is_finite());
        if !all_finite {
            return Err(TrackError::InvalidFit("non-finite value".into()));
        }
        for (i, t) in parts.nodes.iter().enumerate() {
            if parts.nodes[..i].contains(t) {
                return Err(TrackError::InvalidFit(format!("repeated node {}", t)));
            }
        }
        for (name, table) in [
            ("node_values", &parts.node_values),
            ("coefficients", &parts.coefficients),
        ] {
            if table.dim() != (AXES, n) {
                return Err(TrackError::InvalidFit(format!(
                    "{} has shape {:?}, expected {:?}",
                    name,
                    table.dim(),
                    (AXES, n)
                )));
            }
        }
        Ok(Self {
            origin: parts.origin,
            nodes: parts.nodes,
            node_values: parts.node_values,
            coefficients: parts.coefficients,
        })
    }
}

impl From<PolynomialFit> for PolynomialFitParts {
    fn from(fit: PolynomialFit) -> Self {
        Self {
            origin: fit.origin,
            nodes: fit.nodes,
            node_values: fit.node_values,
            coefficients: fit.coefficients,
        }
    }
}

fn axis_values(position: &GeodeticCoordinate) -> [f64; AXES] {
    [position.latitude, position.longitude, position.altitude]
}
