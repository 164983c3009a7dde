//! Replicator update rule
//!
//! `dx_i = s * x_i * ((A·x)_i - x·A·x) + noise_i`
//!
//! Each agent grows in proportion to its share times its feedback advantage
//! over the population-average feedback. Gaussian noise is added to every
//! component so repeated runs explore the neighbourhood of the deterministic
//! flow.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::config::NOISE_LEVEL;
use crate::error::PreconditionError;
use crate::model::InteractionMatrix;

/// Stochastic perturbation added to each rate-of-change component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseModel {
    /// Deterministic dynamics. Draws nothing from the RNG.
    None,
    /// Independent `N(0, std_dev)` per component
    Gaussian { std_dev: f64 },
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel::Gaussian {
            std_dev: NOISE_LEVEL,
        }
    }
}

impl NoiseModel {
    /// Check the model's parameters
    pub fn validate(&self) -> Result<(), PreconditionError> {
        match self {
            NoiseModel::None => Ok(()),
            NoiseModel::Gaussian { std_dev } => {
                if std_dev.is_finite() && *std_dev >= 0.0 {
                    Ok(())
                } else {
                    Err(PreconditionError::InvalidNoise(*std_dev))
                }
            }
        }
    }

    /// Build a sampler for this model. `None` for the noiseless model.
    pub fn sampler(&self) -> Result<Option<Normal<f64>>, PreconditionError> {
        self.validate()?;
        match self {
            NoiseModel::None => Ok(None),
            NoiseModel::Gaussian { std_dev } => Normal::new(0.0, *std_dev)
                .map(Some)
                .map_err(|_| PreconditionError::InvalidNoise(*std_dev)),
        }
    }
}

/// Check that `x` and `a` both describe `n_agents` agents, with `n_agents > 0`
pub fn check_dimensions(
    x: &[f64],
    a: &InteractionMatrix,
    n_agents: usize,
) -> Result<(), PreconditionError> {
    if n_agents == 0 {
        return Err(PreconditionError::NoAgents);
    }
    if x.len() != n_agents || a.n() != n_agents {
        return Err(PreconditionError::DimensionMismatch {
            expected: n_agents,
            x_len: x.len(),
            rows: a.n(),
            cols: a.n(),
        });
    }
    Ok(())
}

/// Deterministic part of the rate of change (no noise)
#[must_use]
pub fn replicator_drift(x: &[f64], a: &InteractionMatrix, s: f64) -> Vec<f64> {
    let ax = a.mul_vec(x);
    let mean_feedback: f64 = x.iter().zip(&ax).map(|(xi, axi)| xi * axi).sum();
    x.iter()
        .zip(&ax)
        .map(|(xi, axi)| s * xi * (axi - mean_feedback))
        .collect()
}

/// Rate of change of `x` under interaction matrix `a` and scaling factor `s`.
///
/// Noise is sampled from `rng` according to `noise`, one draw per agent in
/// index order.
pub fn update_rule<R: Rng + ?Sized>(
    x: &[f64],
    a: &InteractionMatrix,
    s: f64,
    n_agents: usize,
    noise: &NoiseModel,
    rng: &mut R,
) -> Result<Vec<f64>, PreconditionError> {
    check_dimensions(x, a, n_agents)?;
    let sampler = noise.sampler()?;
    let mut dx = replicator_drift(x, a, s);
    if let Some(normal) = sampler {
        add_noise(&mut dx, &normal, rng);
    }
    Ok(dx)
}

/// Add one independent draw to each component
pub(crate) fn add_noise<R: Rng + ?Sized>(dx: &mut [f64], normal: &Normal<f64>, rng: &mut R) {
    for v in dx.iter_mut() {
        *v += normal.sample(rng);
    }
}
