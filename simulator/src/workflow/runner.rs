use crate::feed::sample::TelemetrySample;
use crate::workflow::config::CameraConfig;
use anyhow::Context;
use log::warn;
use skysensecore::camera::{CameraController, PointingSolution};
use skysensecore::telemetry::MetricsSnapshot;

pub struct WorkflowResult {
    pub solutions: Vec<PointingSolution>,
    pub ticks: usize,
    pub visible_ticks: usize,
    pub aircraft_seen: usize,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: CameraConfig,
    tick_secs: f64,
}

impl Runner {
    pub fn new(config: CameraConfig, tick_secs: f64) -> Self {
        Self { config, tick_secs }
    }

    pub fn build_controller(&self) -> anyhow::Result<CameraController> {
        let settings = self.config.to_settings()?;
        Ok(CameraController::from_settings(
            settings,
            self.config.tracker.clone(),
        ))
    }

    /// Replays `samples` (sorted by timestamp) against a fresh controller,
    /// producing one pointing solution per tick while a target is selected.
    pub fn execute(
        &self,
        samples: &[TelemetrySample],
        duration_secs: f64,
    ) -> anyhow::Result<WorkflowResult> {
        anyhow::ensure!(self.tick_secs > 0.0, "tick interval must be positive");
        let mut controller = self.build_controller()?;

        let start = samples.first().map(|s| s.timestamp).unwrap_or(0.0);
        let end = start + duration_secs;
        let mut pending = samples.iter().peekable();
        let mut solutions = Vec::new();
        let mut ticks = 0;
        let mut visible_ticks = 0;
        let mut aircraft_seen = 0;

        let mut now = start;
        while now <= end {
            while let Some(sample) = pending.next_if(|s| s.timestamp <= now) {
                if let Err(err) = controller.append_sample(
                    sample.aircraft_id(),
                    sample.timestamp,
                    sample.position(),
                ) {
                    warn!("skipping sample for {}: {}", sample.id, err);
                }
            }
            aircraft_seen = aircraft_seen.max(controller.registry().len());
            controller.registry_mut().prune_stale(now);

            retarget(&mut controller, now).context("selecting target")?;
            if let Some(solution) = controller
                .point_at_target(now)
                .context("computing pointing solution")?
            {
                if solution.visible {
                    visible_ticks += 1;
                }
                solutions.push(solution);
            }

            ticks += 1;
            now = start + self.tick_secs * ticks as f64;
        }

        Ok(WorkflowResult {
            solutions,
            ticks,
            visible_ticks,
            aircraft_seen,
            metrics: controller.registry().metrics(),
        })
    }
}

/// Keeps the current target while it stays in view, otherwise switches to
/// the first visible aircraft.
pub fn retarget(controller: &mut CameraController, now: f64) -> skysensecore::TrackResult<()> {
    if let Some(current) = controller.current_target().cloned() {
        if controller.can_see_id(&current, now)? {
            return Ok(());
        }
    }
    match controller.visible_aircraft(now)?.first() {
        Some(id) => controller.select_target(id),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::flight::{build_flight, FlightConfig};

    #[test]
    fn runner_tracks_passing_flight() {
        let cfg = CameraConfig::from_args(58.4, 15.58, 300.0, 0.0);
        let runner = Runner::new(cfg, 1.0);
        let flight = build_flight(&FlightConfig::passing(58.4, 15.58, 1)).unwrap();
        let result = runner.execute(&flight, 200.0).unwrap();

        assert_eq!(result.ticks, 201);
        assert_eq!(result.aircraft_seen, 1);
        assert_eq!(result.metrics.samples, flight.len());
        assert!(result.visible_ticks > 0);
        assert!(result
            .solutions
            .iter()
            .all(|s| (0.0..std::f64::consts::TAU).contains(&s.pan)));
    }

    #[test]
    fn runner_without_traffic_produces_no_solutions() {
        let cfg = CameraConfig::from_args(58.4, 15.58, 300.0, 0.0);
        let result = Runner::new(cfg, 5.0).execute(&[], 20.0).unwrap();
        assert_eq!(result.ticks, 5);
        assert!(result.solutions.is_empty());
    }
}
