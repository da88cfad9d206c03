use crate::geo::GeodeticCoordinate;
use crate::prelude::{TrackError, TrackResult, TrackerConfig, SAMPLE_CAPACITY};
use crate::tracking::extrapolation::Extrapolation;
use crate::tracking::history::{Sample, SampleHistory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of a tracked aircraft, e.g. an ICAO address or callsign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AircraftId(String);

impl AircraftId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AircraftId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AircraftId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Rejects samples that would poison the fit.
pub fn validate_sample(timestamp: f64, position: &GeodeticCoordinate) -> TrackResult<()> {
    if !timestamp.is_finite() {
        return Err(TrackError::InvalidSample(format!(
            "non-finite timestamp {}",
            timestamp
        )));
    }
    if !position.is_finite() {
        return Err(TrackError::InvalidSample(format!(
            "non-finite position {:?}",
            position
        )));
    }
    Ok(())
}

/// Seconds since the Unix epoch according to the system clock.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// An aircraft with its recent sample history and current extrapolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedAircraft {
    id: AircraftId,
    created_at: f64,
    last_seen: f64,
    history: SampleHistory,
    extrapolation: Option<Extrapolation>,
    max_degree: usize,
}

impl TrackedAircraft {
    /// Creates an aircraft with no samples. `created_at` is the time origin of
    /// every fit.
    pub fn new(id: AircraftId, created_at: f64) -> Self {
        Self::with_config(id, created_at, &TrackerConfig::default())
    }

    pub fn with_config(id: AircraftId, created_at: f64, config: &TrackerConfig) -> Self {
        Self {
            id,
            created_at,
            last_seen: created_at,
            history: SampleHistory::with_capacity(SAMPLE_CAPACITY),
            extrapolation: None,
            max_degree: config.max_degree,
        }
    }

    pub fn id(&self) -> &AircraftId {
        &self.id
    }

    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }

    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.history.iter()
    }

    pub fn extrapolation(&self) -> Option<&Extrapolation> {
        self.extrapolation.as_ref()
    }

    /// Records a position report and refits the extrapolation.
    pub fn append_sample(
        &mut self,
        timestamp: f64,
        position: GeodeticCoordinate,
    ) -> TrackResult<()> {
        validate_sample(timestamp, &position)?;
        self.history.push(Sample::new(timestamp, position));
        self.last_seen = self.last_seen.max(timestamp);
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        let samples: Vec<Sample> = self.history.iter().copied().collect();
        self.extrapolation = Extrapolation::fit(&samples, self.created_at, self.max_degree);
    }

    /// Estimated position at absolute time `at`.
    pub fn estimate_position(&self, at: f64) -> TrackResult<GeodeticCoordinate> {
        self.extrapolation
            .as_ref()
            .map(|extrapolation| extrapolation.evaluate(at))
            .ok_or_else(|| TrackError::EmptyHistory(self.id.to_string()))
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.last_seen
    }

    pub fn is_stale(&self, now: f64, max_age: f64) -> bool {
        self.age(now) > max_age
    }
}
