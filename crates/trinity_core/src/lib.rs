//! N-agent replicator dynamics simulation library
//!
//! This crate integrates discrete-time replicator dynamics on the probability
//! simplex and summarizes each trajectory. It supports:
//! - A replicator update rule with seeded Gaussian noise injection
//! - Explicit Euler integration with per-row simplex normalization
//! - Trajectory metrics: convergence time, entropy, oscillation frequency,
//!   tail stability and path-length energy
//! - Cartesian parameter grids over initial states, interaction matrices,
//!   time steps, scaling factors and seeds
//! - Sensitivity sweeps producing CSV-exportable result tables
//! - A baseline comparison of the default system with and without the
//!   κ/π scaling correction
//!
//! # Example
//!
//! ```ignore
//! use trinity_core::config::{SimulationConfig, DEFAULT_X0, DT_BASE, S_FACTOR, default_matrix};
//! use trinity_core::metrics::extract_metrics;
//! use trinity_core::simulation::simulate;
//!
//! let config = SimulationConfig::default();
//! let outcome = simulate(&config, &DEFAULT_X0, &default_matrix(), S_FACTOR, DT_BASE, 42)?;
//! let metrics = extract_metrics(outcome.trajectory(), DT_BASE);
//! println!("entropy: {:.4} bits", metrics.entropy);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod dynamics;
pub mod error;
pub mod metrics;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{
    BaselineComparison, GridBuilder, ParameterGrid, ParameterPoint, ResultRow, ResultTable,
    build_grid, compare_baseline, run_sweep,
};
pub use config::{SimulationConfig, SweepConfig};
pub use dynamics::{NoiseModel, update_rule};
pub use error::{NumericalFailure, PreconditionError};
pub use metrics::{Metric, MetricsRecord, extract_metrics};
pub use model::{InteractionMatrix, Trajectory};
pub use simulation::{IntegrationOutcome, integrate, simulate};
