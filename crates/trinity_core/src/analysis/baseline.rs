//! Baseline comparison: the default system with and without the κ/π correction.

use crate::config::{DEFAULT_X0, DT_BASE, S_FACTOR, SEED, SimulationConfig, default_matrix};
use crate::error::PreconditionError;
use crate::metrics::{MetricsRecord, extract_metrics};
use crate::simulation::{IntegrationOutcome, simulate};

/// One side of the comparison
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRun {
    pub s: f64,
    pub outcome: IntegrationOutcome,
    /// Sentinel record when the integration failed
    pub metrics: MetricsRecord,
}

impl BaselineRun {
    fn run(config: &SimulationConfig, s: f64) -> Result<Self, PreconditionError> {
        let outcome = simulate(config, &DEFAULT_X0, &default_matrix(), s, DT_BASE, SEED)?;
        let metrics = extract_metrics(outcome.trajectory(), DT_BASE);
        Ok(Self {
            s,
            outcome,
            metrics,
        })
    }
}

/// Differences `with - without` for the headline metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineDeltas {
    pub conv_time: f64,
    pub entropy: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineComparison {
    /// `s = 1.0`
    pub without: BaselineRun,
    /// `s = κ/π`
    pub with: BaselineRun,
}

impl BaselineComparison {
    /// Both sides completed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.without.outcome.is_completed() && self.with.outcome.is_completed()
    }

    #[must_use]
    pub fn deltas(&self) -> BaselineDeltas {
        BaselineDeltas {
            conv_time: self.with.metrics.conv_time - self.without.metrics.conv_time,
            entropy: self.with.metrics.entropy - self.without.metrics.entropy,
            energy: self.with.metrics.energy - self.without.metrics.energy,
        }
    }
}

/// Run the default initial state and matrix at `DT_BASE` with seed `SEED`,
/// once with `s = 1.0` and once with `s = S_FACTOR`.
///
/// Step count and noise come from `config`; `config.n_agents` must be 3.
pub fn compare_baseline(config: &SimulationConfig) -> Result<BaselineComparison, PreconditionError> {
    let without = BaselineRun::run(config, 1.0)?;
    let with = BaselineRun::run(config, S_FACTOR)?;
    Ok(BaselineComparison { without, with })
}
