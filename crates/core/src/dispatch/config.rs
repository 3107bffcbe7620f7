//! Dispatch configuration.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Configuration for the delivery orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Shortest simulated transit (milliseconds).
    #[serde(default = "default_transit_min")]
    pub transit_min_ms: u64,

    /// Longest simulated transit (milliseconds).
    #[serde(default = "default_transit_max")]
    pub transit_max_ms: u64,
}

fn default_transit_min() -> u64 {
    1000 // 1 second
}

fn default_transit_max() -> u64 {
    5000 // 5 seconds
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            transit_min_ms: default_transit_min(),
            transit_max_ms: default_transit_max(),
        }
    }
}

impl DispatchConfig {
    /// Fixed transit time, handy for tests.
    pub fn with_fixed_transit(transit: Duration) -> Self {
        let ms = u64::try_from(transit.as_millis()).unwrap_or(u64::MAX);
        Self {
            transit_min_ms: ms,
            transit_max_ms: ms,
        }
    }

    /// Inclusive transit range in milliseconds. Bounds given in the wrong
    /// order are swapped.
    pub fn transit_range(&self) -> RangeInclusive<u64> {
        let low = self.transit_min_ms.min(self.transit_max_ms);
        let high = self.transit_min_ms.max(self.transit_max_ms);
        low..=high
    }

    /// Draw a transit time uniformly from [`transit_range`](Self::transit_range).
    pub fn sample_transit(&self) -> Duration {
        Duration::from_millis(rand::thread_rng().gen_range(self.transit_range()))
    }
}
