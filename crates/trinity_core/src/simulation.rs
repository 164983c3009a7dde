//! Explicit Euler integration of the replicator dynamics

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::dynamics::{add_noise, check_dimensions, replicator_drift};
use crate::error::{NumericalFailure, PreconditionError};
use crate::model::{InteractionMatrix, Trajectory};

/// Result of one integration run.
///
/// Numerical breakdowns are a normal outcome, not an error: sweeps record
/// them and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationOutcome {
    Completed(Trajectory),
    Failed(NumericalFailure),
}

impl IntegrationOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, IntegrationOutcome::Completed(_))
    }

    #[must_use]
    pub fn trajectory(&self) -> Option<&Trajectory> {
        match self {
            IntegrationOutcome::Completed(traj) => Some(traj),
            IntegrationOutcome::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<NumericalFailure> {
        match self {
            IntegrationOutcome::Completed(_) => None,
            IntegrationOutcome::Failed(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<Trajectory, NumericalFailure> {
        match self {
            IntegrationOutcome::Completed(traj) => Ok(traj),
            IntegrationOutcome::Failed(reason) => Err(reason),
        }
    }
}

/// Integrate from `x0` for `config.steps` rows with time step `dt`.
///
/// Row 0 is `x0`; row `t` is `row[t-1] + dt * dx` where `dx` is the
/// replicator drift plus noise drawn from `rng`. After the loop every row is
/// replaced by `|row| / sum(|row|)`.
///
/// # Errors
/// Returns a [`PreconditionError`] when there are no agents, dimensions disagree with
/// `config.n_agents`, `dt` is outside `(0, 1]`, `steps` is zero, `s` is not
/// finite or the noise level is invalid. Overflow or a row that cannot be
/// normalized produce [`IntegrationOutcome::Failed`] instead.
pub fn integrate<R: Rng + ?Sized>(
    x0: &[f64],
    a: &InteractionMatrix,
    s: f64,
    dt: f64,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<IntegrationOutcome, PreconditionError> {
    let n = config.n_agents;
    let steps = config.steps;

    check_dimensions(x0, a, n)?;
    if !(dt > 0.0 && dt <= 1.0) || steps == 0 {
        return Err(PreconditionError::InvalidParameters { dt, steps });
    }
    if !s.is_finite() {
        return Err(PreconditionError::InvalidScaling(s));
    }
    let sampler = config.noise().sampler()?;

    let mut traj = Trajectory::zeros(steps, n);
    traj.row_mut(0).copy_from_slice(x0);

    let mut prev = x0.to_vec();
    for t in 1..steps {
        let mut dx = replicator_drift(&prev, a, s);
        if let Some(normal) = &sampler {
            add_noise(&mut dx, normal, rng);
        }

        let next = traj.row_mut(t);
        for ((out, p), d) in next.iter_mut().zip(&prev).zip(&dx) {
            *out = p + dt * d;
        }
        if next.iter().any(|v| !v.is_finite()) {
            let failure = NumericalFailure::NonFinite { step: t };
            tracing::warn!("integration failed (s={s}, dt={dt}): {failure}");
            return Ok(IntegrationOutcome::Failed(failure));
        }
        prev.copy_from_slice(next);
    }

    if let Err(failure) = normalize_rows(&mut traj) {
        tracing::warn!("integration failed (s={s}, dt={dt}): {failure}");
        return Ok(IntegrationOutcome::Failed(failure));
    }

    Ok(IntegrationOutcome::Completed(traj))
}

/// Seeded entry point: same inputs and seed give a bit-identical trajectory
pub fn simulate(
    config: &SimulationConfig,
    x0: &[f64],
    a: &InteractionMatrix,
    s: f64,
    dt: f64,
    seed: u64,
) -> Result<IntegrationOutcome, PreconditionError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    integrate(x0, a, s, dt, config, &mut rng)
}

/// Replace every row by `|row| / sum(|row|)`
pub fn normalize_rows(traj: &mut Trajectory) -> Result<(), NumericalFailure> {
    for t in 0..traj.len() {
        let row = traj.row_mut(t);
        let total: f64 = row.iter().map(|v| v.abs()).sum();
        if total == 0.0 || !total.is_finite() {
            return Err(NumericalFailure::DegenerateRow { row: t });
        }
        for v in row.iter_mut() {
            *v = v.abs() / total;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_A, DEFAULT_X0};

    fn noiseless(steps: usize) -> SimulationConfig {
        SimulationConfig::default()
            .with_steps(steps)
            .with_noise_level(0.0)
    }

    #[test]
    fn test_rejects_bad_dt_and_steps() {
        let a = InteractionMatrix::identity(3);
        let x0 = [0.2, 0.3, 0.5];
        for dt in [0.0, -0.01, 1.5, f64::NAN] {
            let err = simulate(&noiseless(10), &x0, &a, 1.0, dt, 0).unwrap_err();
            assert!(matches!(err, PreconditionError::InvalidParameters { .. }));
        }
        assert_eq!(
            simulate(&noiseless(0), &x0, &a, 1.0, 0.01, 0).unwrap_err(),
            PreconditionError::InvalidParameters {
                dt: 0.01,
                steps: 0
            }
        );
        assert!(simulate(&noiseless(10), &x0, &a, 1.0, 1.0, 0).is_ok());
    }

    #[test]
    fn test_rejects_dimension_mismatch_and_bad_scaling() {
        let a = InteractionMatrix::identity(3);
        assert!(matches!(
            simulate(&noiseless(10), &[0.5, 0.5], &a, 1.0, 0.01, 0),
            Err(PreconditionError::DimensionMismatch { .. })
        ));
        assert_eq!(
            simulate(&noiseless(10), &[0.2, 0.3, 0.5], &a, f64::INFINITY, 0.01, 0).unwrap_err(),
            PreconditionError::InvalidScaling(f64::INFINITY)
        );
    }

    #[test]
    fn test_rejects_zero_agents() {
        let config = noiseless(10).with_n_agents(0);
        assert_eq!(
            simulate(&config, &[], &InteractionMatrix::identity(0), 1.0, 0.01, 0).unwrap_err(),
            PreconditionError::NoAgents
        );
    }

    #[test]
    fn test_single_step_is_normalized_x0() {
        let a = InteractionMatrix::identity(3);
        let outcome = simulate(&noiseless(1), &[1.0, 1.0, 2.0], &a, 1.0, 0.01, 0).unwrap();
        let traj = outcome.into_result().unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.row(0), &[0.25, 0.25, 0.5]);
    }

    #[test]
    fn test_zero_initial_state_is_degenerate() {
        let a = InteractionMatrix::identity(3);
        let outcome = simulate(&noiseless(5), &[0.0, 0.0, 0.0], &a, 1.0, 0.01, 0).unwrap();
        assert_eq!(
            outcome.failure(),
            Some(NumericalFailure::DegenerateRow { row: 0 })
        );
        assert!(outcome.trajectory().is_none());
    }

    #[test]
    fn test_overflow_is_reported_not_raised() {
        let a = InteractionMatrix::from_array([[1e300, 0.0], [0.0, 1e300]]);
        let config = noiseless(50).with_n_agents(2);
        let outcome = simulate(&config, &[1e10, 1.0], &a, 1e300, 1.0, 0).unwrap();
        assert!(matches!(
            outcome,
            IntegrationOutcome::Failed(NumericalFailure::NonFinite { .. })
        ));
    }

    #[test]
    fn test_default_system_rows_on_simplex() {
        let a = InteractionMatrix::from_array(DEFAULT_A);
        let config = SimulationConfig::default().with_steps(500);
        let traj = simulate(&config, &DEFAULT_X0, &a, 1.0, 0.01, 42)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(traj.len(), 500);
        for row in traj.rows() {
            assert!(row.iter().all(|v| *v >= 0.0));
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}
