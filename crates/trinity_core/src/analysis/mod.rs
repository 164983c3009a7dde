//! Parameter sweep sensitivity analysis module.
//!
//! A sweep expands five parameter lists (initial states, interaction
//! matrices, time steps, scaling factors, seeds) into their Cartesian
//! product, integrates every point with its own seeded generator, and joins
//! each point's scalar parameters with its trajectory metrics.
//!
//! ```ignore
//! use trinity_core::analysis::{GridBuilder, run_sweep};
//! use trinity_core::config::SimulationConfig;
//! use trinity_core::metrics::Metric;
//!
//! let grid = GridBuilder::new()
//!     .scaling_factors(vec![1.0, 1.01])
//!     .seeds(vec![1, 2, 3])
//!     .build()?;
//!
//! let table = run_sweep(&grid, &SimulationConfig::default())?;
//! for (s, energy) in table.mean_by_scaling(Metric::Energy) {
//!     println!("s={s}: mean energy {energy:.4}");
//! }
//! table.write_csv(std::fs::File::create("sensitivity_results.csv")?)?;
//! ```
//!
//! Points whose integration fails numerically are dropped from the table;
//! the sweep itself only fails on inconsistent input (see
//! [`run_sweep_with_progress`]).

mod baseline;
mod evaluator;
mod grid;
mod table;

pub use baseline::*;
pub use evaluator::*;
pub use grid::*;
pub use table::*;
