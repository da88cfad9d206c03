use serde::{Deserialize, Serialize};

/// Default number of samples kept per tracked aircraft.
pub const SAMPLE_CAPACITY: usize = 3;

/// Shared configuration for the tracking subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Highest polynomial degree used when fitting the sample history.
    pub max_degree: usize,
    /// Age after which an aircraft counts as stale for `prune_stale`.
    pub stale_after_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_degree: SAMPLE_CAPACITY - 1,
            stale_after_secs: 60.0,
        }
    }
}

/// Common error type for the tracking core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("uninitialized state: {0}")]
    UninitializedState(String),
    #[error("empty history for aircraft {0}")]
    EmptyHistory(String),
    #[error("unknown aircraft {0}")]
    UnknownAircraft(String),
    #[error("invalid view: {0}")]
    InvalidView(String),
    #[error("invalid sample: {0}")]
    InvalidSample(String),
    #[error("invalid fit: {0}")]
    InvalidFit(String),
}

pub type TrackResult<T> = Result<T, TrackError>;
