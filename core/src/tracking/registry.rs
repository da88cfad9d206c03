use crate::geo::GeodeticCoordinate;
use crate::prelude::{TrackError, TrackResult, TrackerConfig};
use crate::telemetry::{LogManager, MetricsSnapshot, TrackingMetrics};
use crate::tracking::aircraft::{validate_sample, AircraftId, TrackedAircraft};
use std::collections::HashMap;

/// Known aircraft keyed by identifier, plus the optional current target.
///
/// Aircraft are created on their first sample. Removal is left to the
/// caller's eviction policy through [`AircraftRegistry::remove`] and
/// [`AircraftRegistry::prune_stale`].
#[derive(Debug)]
pub struct AircraftRegistry {
    aircraft: HashMap<AircraftId, TrackedAircraft>,
    current_target: Option<AircraftId>,
    config: TrackerConfig,
    metrics: TrackingMetrics,
    logger: LogManager,
}

impl Default for AircraftRegistry {
    fn default() -> Self {
        Self::with_config(TrackerConfig::default())
    }
}

impl AircraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            aircraft: HashMap::new(),
            current_target: None,
            config,
            metrics: TrackingMetrics::new(),
            logger: LogManager::new("skysense::tracking"),
        }
    }

    /// Ingests one position report, creating the aircraft on first sighting.
    pub fn append_sample(
        &mut self,
        id: impl Into<AircraftId>,
        timestamp: f64,
        position: GeodeticCoordinate,
    ) -> TrackResult<()> {
        let id = id.into();
        if let Err(err) = validate_sample(timestamp, &position) {
            self.metrics.record_rejected();
            self.logger.warn(&format!("dropping sample for {}: {}", id, err));
            return Err(err);
        }

        let config = &self.config;
        let metrics = &self.metrics;
        let logger = &self.logger;
        let aircraft = self.aircraft.entry(id.clone()).or_insert_with(|| {
            metrics.record_created();
            logger.record(&format!("tracking new aircraft {}", id));
            TrackedAircraft::with_config(id.clone(), timestamp, config)
        });
        aircraft.append_sample(timestamp, position)?;
        self.metrics.record_sample();
        self.logger.trace_detail(&format!(
            "{} @ {:.3}: lat {:.5} lon {:.5} alt {:.0}",
            id,
            timestamp,
            position.latitude_deg(),
            position.longitude_deg(),
            position.altitude
        ));
        Ok(())
    }

    /// Estimated position of aircraft `id` at absolute time `at`.
    pub fn estimate_position(&self, id: &AircraftId, at: f64) -> TrackResult<GeodeticCoordinate> {
        let position = self.require(id)?.estimate_position(at)?;
        self.metrics.record_estimate();
        Ok(position)
    }

    pub fn get(&self, id: &AircraftId) -> Option<&TrackedAircraft> {
        self.aircraft.get(id)
    }

    pub fn require(&self, id: &AircraftId) -> TrackResult<&TrackedAircraft> {
        self.aircraft
            .get(id)
            .ok_or_else(|| TrackError::UnknownAircraft(id.to_string()))
    }

    pub fn contains(&self, id: &AircraftId) -> bool {
        self.aircraft.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Identifiers of all known aircraft in sorted order.
    pub fn ids(&self) -> Vec<AircraftId> {
        let mut ids: Vec<AircraftId> = self.aircraft.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedAircraft> {
        self.aircraft.values()
    }

    pub fn remove(&mut self, id: &AircraftId) -> Option<TrackedAircraft> {
        if self.current_target.as_ref() == Some(id) {
            self.current_target = None;
        }
        self.aircraft.remove(id)
    }

    /// Drops every aircraft not heard from within `stale_after_secs` of `now`.
    pub fn prune_stale(&mut self, now: f64) -> Vec<AircraftId> {
        let max_age = self.config.stale_after_secs;
        let mut stale: Vec<AircraftId> = self
            .aircraft
            .values()
            .filter(|aircraft| aircraft.is_stale(now, max_age))
            .map(|aircraft| aircraft.id().clone())
            .collect();
        stale.sort();
        for id in &stale {
            self.remove(id);
            self.logger.record(&format!("pruned stale aircraft {}", id));
        }
        stale
    }

    pub fn select_target(&mut self, id: &AircraftId) -> TrackResult<()> {
        self.require(id)?;
        self.current_target = Some(id.clone());
        Ok(())
    }

    pub fn clear_target(&mut self) {
        self.current_target = None;
    }

    pub fn current_target(&self) -> Option<&AircraftId> {
        self.current_target.as_ref()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(lat_deg: f64) -> GeodeticCoordinate {
        GeodeticCoordinate::from_degrees(lat_deg, 15.0, 5_000.0)
    }

    #[test]
    fn first_sample_creates_aircraft() {
        let mut registry = AircraftRegistry::new();
        registry.append_sample("a1", 100.0, position(58.0)).unwrap();
        registry.append_sample("a1", 101.0, position(58.01)).unwrap();
        registry.append_sample("b2", 100.5, position(57.0)).unwrap();

        assert_eq!(registry.len(), 2);
        let a1 = registry.get(&AircraftId::new("a1")).unwrap();
        assert_eq!(a1.created_at(), 100.0);
        assert_eq!(a1.sample_count(), 2);

        let snapshot = registry.metrics();
        assert_eq!(snapshot.samples, 3);
        assert_eq!(snapshot.aircraft_created, 2);
    }

    #[test]
    fn unknown_aircraft_is_an_error() {
        let registry = AircraftRegistry::new();
        let err = registry
            .estimate_position(&AircraftId::new("ghost"), 0.0)
            .unwrap_err();
        assert_eq!(err, TrackError::UnknownAircraft("ghost".into()));
    }

    #[test]
    fn rejected_first_sample_does_not_register() {
        let mut registry = AircraftRegistry::new();
        assert!(registry
            .append_sample("a1", f64::NAN, position(58.0))
            .is_err());
        assert!(registry.is_empty());
        assert_eq!(registry.metrics().rejected, 1);
    }

    #[test]
    fn estimate_goes_through_extrapolation() {
        let mut registry = AircraftRegistry::new();
        registry.append_sample("a1", 0.0, position(58.0)).unwrap();
        let id = AircraftId::new("a1");
        assert_eq!(registry.estimate_position(&id, 42.0).unwrap(), position(58.0));
        assert_eq!(registry.metrics().estimates, 1);
    }

    #[test]
    fn target_selection_and_removal() {
        let mut registry = AircraftRegistry::new();
        registry.append_sample("a1", 0.0, position(58.0)).unwrap();
        let id = AircraftId::new("a1");

        assert!(registry.select_target(&AircraftId::new("zz")).is_err());
        registry.select_target(&id).unwrap();
        assert_eq!(registry.current_target(), Some(&id));

        registry.remove(&id);
        assert!(registry.current_target().is_none());
    }

    #[test]
    fn prune_stale_uses_configured_age() {
        let mut registry = AircraftRegistry::with_config(TrackerConfig {
            stale_after_secs: 30.0,
            ..Default::default()
        });
        registry.append_sample("old", 0.0, position(58.0)).unwrap();
        registry.append_sample("new", 50.0, position(57.0)).unwrap();
        registry.select_target(&AircraftId::new("old")).unwrap();

        let pruned = registry.prune_stale(60.0);
        assert_eq!(pruned, vec![AircraftId::new("old")]);
        assert_eq!(registry.ids(), vec![AircraftId::new("new")]);
        assert!(registry.current_target().is_none());
    }
}
