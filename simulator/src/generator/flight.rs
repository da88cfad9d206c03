use crate::feed::sample::TelemetrySample;
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use skysensecore::geo::transform::EQUATORIAL_RADIUS_FT;

const FEET_PER_NAUTICAL_MILE: f64 = 6_076.115;

/// Configuration for generating a synthetic straight-line flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub id: String,
    pub start_latitude_deg: f64,
    pub start_longitude_deg: f64,
    pub start_altitude_ft: f64,
    /// Compass heading, degrees clockwise from north.
    pub heading_deg: f64,
    pub ground_speed_kts: f64,
    pub climb_rate_fpm: f64,
    pub start_time: f64,
    pub interval_secs: f64,
    pub count: usize,
    /// Half-width of the uniform positional jitter, in feet.
    pub noise_ft: f64,
    pub seed: u64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            id: "synthetic".into(),
            start_latitude_deg: 58.3,
            start_longitude_deg: 15.58,
            start_altitude_ft: 8_000.0,
            heading_deg: 0.0,
            ground_speed_kts: 250.0,
            climb_rate_fpm: 0.0,
            start_time: 0.0,
            interval_secs: 5.0,
            count: 40,
            noise_ft: 0.0,
            seed: 0,
        }
    }
}

impl FlightConfig {
    /// A northbound flight starting a few miles south of `latitude_deg`.
    pub fn passing(latitude_deg: f64, longitude_deg: f64, seed: u64) -> Self {
        Self {
            start_latitude_deg: latitude_deg - 0.1,
            start_longitude_deg: longitude_deg,
            seed,
            ..Default::default()
        }
    }
}

pub fn build_flight(config: &FlightConfig) -> anyhow::Result<Vec<TelemetrySample>> {
    let interval = config.interval_secs;
    anyhow::ensure!(
        interval.is_finite() && interval > 0.0,
        "flight interval must be positive, got {}",
        interval
    );
    let cos_start = config.start_latitude_deg.to_radians().cos();
    anyhow::ensure!(cos_start.abs() > 1e-6, "flight cannot start at a pole");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut samples = Vec::with_capacity(config.count);
    let speed_fps = config.ground_speed_kts * FEET_PER_NAUTICAL_MILE / 3_600.0;
    let (sin_heading, cos_heading) = config.heading_deg.to_radians().sin_cos();

    for index in 0..config.count {
        let elapsed = interval * index as f64;
        let mut north_ft = speed_fps * cos_heading * elapsed;
        let mut east_ft = speed_fps * sin_heading * elapsed;
        let mut altitude_ft = config.start_altitude_ft + config.climb_rate_fpm * elapsed / 60.0;
        if config.noise_ft > 0.0 {
            north_ft += rng.gen_range(-config.noise_ft..config.noise_ft);
            east_ft += rng.gen_range(-config.noise_ft..config.noise_ft);
            altitude_ft += rng.gen_range(-config.noise_ft..config.noise_ft);
        }

        let latitude_deg =
            config.start_latitude_deg + (north_ft / EQUATORIAL_RADIUS_FT).to_degrees();
        let longitude_deg = config.start_longitude_deg
            + (east_ft / (EQUATORIAL_RADIUS_FT * cos_start)).to_degrees();

        samples.push(TelemetrySample {
            id: config.id.clone(),
            timestamp: config.start_time + elapsed,
            latitude_deg,
            longitude_deg,
            altitude_ft,
        });
    }

    Ok(samples)
}

/// Builds several flights and merges them into one time-ordered feed.
pub fn build_traffic(configs: &[FlightConfig]) -> anyhow::Result<Vec<TelemetrySample>> {
    let mut samples = Vec::new();
    for config in configs {
        let flight =
            build_flight(config).with_context(|| format!("building flight {}", config.id))?;
        samples.extend(flight);
    }
    samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn northbound_flight_gains_latitude() {
        let config = FlightConfig {
            count: 5,
            ..Default::default()
        };
        let samples = build_flight(&config).unwrap();
        assert_eq!(samples.len(), 5);
        assert!(samples
            .windows(2)
            .all(|pair| pair[1].latitude_deg > pair[0].latitude_deg));
        assert!(samples
            .iter()
            .all(|s| (s.longitude_deg - config.start_longitude_deg).abs() < 1e-9));
        assert_eq!(samples[4].timestamp, 20.0);
    }

    #[test]
    fn climb_rate_is_applied_per_minute() {
        let config = FlightConfig {
            climb_rate_fpm: 600.0,
            interval_secs: 30.0,
            count: 3,
            ..Default::default()
        };
        let samples = build_flight(&config).unwrap();
        assert!((samples[2].altitude_ft - (config.start_altitude_ft + 600.0)).abs() < 1e-9);
    }

    #[test]
    fn noisy_flights_are_reproducible() {
        let config = FlightConfig {
            noise_ft: 50.0,
            seed: 7,
            count: 10,
            ..Default::default()
        };
        assert_eq!(build_flight(&config).unwrap(), build_flight(&config).unwrap());
    }

    #[test]
    fn traffic_is_time_ordered() {
        let first = FlightConfig {
            id: "a".into(),
            count: 3,
            ..Default::default()
        };
        let second = FlightConfig {
            id: "b".into(),
            start_time: 2.5,
            count: 3,
            ..Default::default()
        };
        let samples = build_traffic(&[first, second]).unwrap();
        assert_eq!(samples.len(), 6);
        assert!(samples
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = FlightConfig {
            interval_secs: 0.0,
            ..Default::default()
        };
        assert!(build_flight(&config).is_err());
    }
}
