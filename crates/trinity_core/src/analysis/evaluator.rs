//! Sweep evaluator - runs one integration per grid point and tabulates metrics.
//!
//! Every point owns a generator seeded from the point's seed, so a point's
//! trajectory is the same whether it runs alone, first, last, or on another
//! thread. With the `parallel` feature points are evaluated on the rayon pool
//! and reassembled in grid order.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::{NumericalFailure, PreconditionError};
use crate::metrics::extract_metrics;
use crate::simulation::{IntegrationOutcome, simulate};

use super::{ParameterGrid, ParameterPoint, ResultRow, ResultTable};

/// Progress tracking for sweep analysis
#[derive(Debug, Clone)]
pub struct SweepProgress {
    /// Completed points counter
    completed: Arc<AtomicUsize>,
    /// Total points
    total: Arc<AtomicUsize>,
}

impl SweepProgress {
    /// Create a new progress tracker
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
        }
    }

    /// Get the number of completed points
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get the total number of points
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Fraction of points done, in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    /// Increment the completed counter
    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset the progress
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }
}

impl Default for SweepProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// What happened at a single grid point
#[derive(Debug, Clone, PartialEq)]
pub enum PointOutcome {
    Row(ResultRow),
    Failed(NumericalFailure),
}

/// Integrate one point with its own seed and summarize it
///
/// # Errors
/// Returns the precondition error for a point that bypassed grid
/// validation, such as a hand-built point with `dt` outside `(0, 1]`.
pub fn evaluate_point(
    point: &ParameterPoint,
    config: &SimulationConfig,
) -> Result<PointOutcome, PreconditionError> {
    let outcome = match simulate(config, &point.x0, &point.matrix, point.s, point.dt, point.seed)? {
        IntegrationOutcome::Completed(traj) => {
            let metrics = extract_metrics(Some(&traj), point.dt);
            PointOutcome::Row(ResultRow::new(point, &metrics))
        }
        IntegrationOutcome::Failed(reason) => PointOutcome::Failed(reason),
    };
    Ok(outcome)
}

/// Run every grid point and collect the completed ones into a table.
///
/// See [`run_sweep_with_progress`].
pub fn run_sweep(
    grid: &ParameterGrid,
    config: &SimulationConfig,
) -> Result<ResultTable, PreconditionError> {
    run_sweep_with_progress(grid, config, None)
}

/// Run every grid point, updating `progress` as points finish.
///
/// # Errors
/// Fails before any point runs if `config.n_agents` differs from the grid's
/// agent count, `config.steps` is zero, or the noise level is invalid. A
/// precondition error from any point aborts the sweep. Points that fail
/// numerically are counted and skipped.
pub fn run_sweep_with_progress(
    grid: &ParameterGrid,
    config: &SimulationConfig,
    progress: Option<&SweepProgress>,
) -> Result<ResultTable, PreconditionError> {
    if grid.n_agents() != config.n_agents {
        return Err(PreconditionError::AgentCountMismatch {
            grid: grid.n_agents(),
            requested: config.n_agents,
        });
    }
    if config.steps == 0 {
        return Err(PreconditionError::InvalidParameters {
            dt: grid.points().first().map_or(0.0, |p| p.dt),
            steps: 0,
        });
    }
    config.noise().validate()?;

    if let Some(p) = progress {
        p.reset(grid.len());
    }
    tracing::info!(
        "running sensitivity sweep ({} points, {} steps, {} agents)",
        grid.len(),
        config.steps,
        config.n_agents
    );

    let run = |point: &ParameterPoint| {
        let outcome = evaluate_point(point, config);
        if let Some(p) = progress {
            p.increment();
        }
        outcome
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<PointOutcome> = grid
        .points()
        .par_iter()
        .map(run)
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<PointOutcome> = grid
        .points()
        .iter()
        .map(run)
        .collect::<Result<_, _>>()?;

    let mut table = ResultTable::new();
    for (point, outcome) in grid.points().iter().zip(outcomes) {
        match outcome {
            PointOutcome::Row(row) => table.push_row(row),
            PointOutcome::Failed(reason) => {
                tracing::debug!(
                    "dropping point (dt={}, s={}, seed={}): {reason}",
                    point.dt,
                    point.s,
                    point.seed
                );
                table.record_failure();
            }
        }
    }

    tracing::info!(
        "sensitivity sweep finished: {} rows, {} failed",
        table.len(),
        table.failed()
    );

    Ok(table)
}
