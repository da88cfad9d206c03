use crate::geo::GeodeticCoordinate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A timestamped position report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub position: GeodeticCoordinate,
}

impl Sample {
    pub fn new(timestamp: f64, position: GeodeticCoordinate) -> Self {
        Self {
            timestamp,
            position,
        }
    }
}

/// Fixed-capacity FIFO of samples in arrival order. Pushing into a full
/// history silently evicts the oldest sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleHistory {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample and returns the evicted one, if any.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: f64) -> Sample {
        Sample::new(timestamp, GeodeticCoordinate::new(0.0, 0.0, timestamp))
    }

    #[test]
    fn history_evicts_oldest_when_full() {
        let mut history = SampleHistory::with_capacity(3);
        assert!(history.push(sample(1.0)).is_none());
        assert!(history.push(sample(2.0)).is_none());
        assert!(history.push(sample(3.0)).is_none());

        let evicted = history.push(sample(4.0)).unwrap();
        assert_eq!(evicted.timestamp, 1.0);
        assert_eq!(history.len(), 3);

        let times: Vec<f64> = history.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.latest().unwrap().timestamp, 4.0);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = SampleHistory::with_capacity(0);
        history.push(sample(1.0));
        history.push(sample(2.0));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.latest().unwrap().timestamp, 2.0);
    }
}
