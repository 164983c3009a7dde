//! Simulation and sweep configuration
//!
//! `SimulationConfig` holds what is fixed for every run (agent count, step
//! count, noise). `SweepConfig` adds the five sweep dimensions; any dimension
//! left unset falls back to the built-in tables in [`constants`].
//!
//! Sweep configurations round-trip through YAML:
//!
//! ```ignore
//! use trinity_core::config::SweepConfig;
//!
//! let config = SweepConfig::from_yaml(
//!     "simulation:\n  steps: 500\nscaling_factors: [1.0, 1.01]\nseeds: [1, 2, 3]\n",
//! )?;
//! let grid = config.grid()?;
//! assert_eq!(grid.len(), 4 * 4 * 4 * 2 * 3);
//! ```

pub mod constants;

pub use constants::*;

use serde::{Deserialize, Serialize};

use crate::analysis::{GridBuilder, ParameterGrid};
use crate::dynamics::NoiseModel;
use crate::error::{ConfigError, PreconditionError};
use crate::model::InteractionMatrix;

fn default_n_agents() -> usize {
    3
}

fn default_steps() -> usize {
    STEPS
}

fn default_noise_level() -> f64 {
    NOISE_LEVEL
}

/// Settings shared by every run of a simulation or sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of agents (state dimension)
    #[serde(default = "default_n_agents")]
    pub n_agents: usize,

    /// Rows per trajectory
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Standard deviation of the injected Gaussian noise; `0.0` disables noise
    #[serde(default = "default_noise_level")]
    pub noise_level: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_agents: default_n_agents(),
            steps: default_steps(),
            noise_level: default_noise_level(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    #[must_use]
    pub fn with_n_agents(mut self, n_agents: usize) -> Self {
        self.n_agents = n_agents;
        self
    }

    #[must_use]
    pub fn with_noise_level(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    /// Noise model implied by `noise_level`
    #[must_use]
    pub fn noise(&self) -> NoiseModel {
        if self.noise_level == 0.0 {
            NoiseModel::None
        } else {
            NoiseModel::Gaussian {
                std_dev: self.noise_level,
            }
        }
    }
}

/// Everything needed to build and run a sweep.
///
/// Every list is optional; `None` selects the built-in default list for
/// that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_states: Option<Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrices: Option<Vec<InteractionMatrix>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dts: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_factors: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<Vec<u64>>,
}

impl SweepConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_saphyr::to_string(self)?)
    }

    /// Grid builder seeded with this configuration's lists
    #[must_use]
    pub fn grid_builder(&self) -> GridBuilder {
        let mut builder = GridBuilder::new();
        if let Some(x0s) = &self.initial_states {
            builder = builder.initial_states(x0s.clone());
        }
        if let Some(matrices) = &self.matrices {
            builder = builder.matrices(matrices.clone());
        }
        if let Some(dts) = &self.dts {
            builder = builder.dts(dts.clone());
        }
        if let Some(ss) = &self.scaling_factors {
            builder = builder.scaling_factors(ss.clone());
        }
        if let Some(seeds) = &self.seeds {
            builder = builder.seeds(seeds.clone());
        }
        builder
    }

    /// Build the parameter grid, validating shapes against `simulation.n_agents`
    pub fn grid(&self) -> Result<ParameterGrid, PreconditionError> {
        let grid = self.grid_builder().build()?;
        if grid.n_agents() != self.simulation.n_agents {
            return Err(PreconditionError::AgentCountMismatch {
                grid: grid.n_agents(),
                requested: self.simulation.n_agents,
            });
        }
        Ok(grid)
    }
}
