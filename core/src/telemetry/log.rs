use log::{debug, info, warn};

const DEFAULT_TARGET: &str = "skysense";

/// Thin wrapper over the `log` facade that tags every record with a component target.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn trace_detail(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_crate_wide() {
        assert_eq!(LogManager::default().target(), "skysense");
        assert_eq!(LogManager::new("skysense::camera").target(), "skysense::camera");
    }
}
