// Wait time estimation

use crate::domain::ServiceHistory;

/// Assumed service time before any real interval has been observed
pub const DEFAULT_SERVICE_SECS: f64 = 10.0;

/// Strategy for projecting how long a new joiner would wait
pub trait WaitEstimator: Send + Sync {
    /// Expected seconds to serve one person
    fn average_service_secs(&self, history: &ServiceHistory) -> f64;

    /// Expected seconds until someone joining behind `waiting` people is served
    fn estimate_wait_secs(&self, waiting: usize, history: &ServiceHistory) -> f64 {
        waiting as f64 * self.average_service_secs(history)
    }
}

/// Mean of the trailing service window, with a fixed fallback when empty.
///
/// Sensitive to a single outlier in the window.
#[derive(Debug, Clone)]
pub struct TrailingMeanEstimator {
    default_service_secs: f64,
}

impl TrailingMeanEstimator {
    pub fn new(default_service_secs: f64) -> Self {
        Self {
            default_service_secs,
        }
    }
}

impl Default for TrailingMeanEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_SECS)
    }
}

impl WaitEstimator for TrailingMeanEstimator {
    fn average_service_secs(&self, history: &ServiceHistory) -> f64 {
        history.mean().unwrap_or(self.default_service_secs)
    }
}
