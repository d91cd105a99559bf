//! Periodic sweep configuration.

use serde::{Deserialize, Serialize};

/// Overdue / SLA-breach sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Whether the sweep is scheduled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweep ticks.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    300
}
