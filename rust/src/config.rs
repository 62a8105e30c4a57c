//! Configuration for the timeline engine.

use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// Engine-wide knobs shared by the `*_with_config` entry points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Discount applied to expedited tasks when a scenario is seeded from this config.
    pub default_expedite_factor: f64,
    /// Number of tasks returned by `next_tasks_with_config`.
    pub default_next_tasks_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            default_expedite_factor: 0.7,
            default_next_tasks_limit: 5,
        }
    }
}

impl EngineConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// An identity scenario carrying this config's expedite factor.
    pub fn scenario(&self) -> Scenario {
        Scenario {
            expedite_factor: self.default_expedite_factor,
            ..Scenario::default()
        }
    }
}
