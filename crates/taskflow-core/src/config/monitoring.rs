//! Call interception configuration.

use serde::{Deserialize, Serialize};

/// Settings for the service-call interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Calls slower than this many milliseconds are logged as slow.
    #[serde(default = "default_slow_threshold")]
    pub slow_threshold_ms: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: default_slow_threshold(),
        }
    }
}

fn default_slow_threshold() -> u64 {
    1000
}
