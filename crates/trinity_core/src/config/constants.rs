//! Built-in constant tables
//!
//! Defaults for single runs and the lists each sweep dimension falls back to
//! when no explicit values are supplied.

use crate::model::InteractionMatrix;

pub const PI: f64 = std::f64::consts::PI;
pub const KAPPA: f64 = 3.1730059;
/// κ/π ≈ 1.01005, a ~1% correction to the unit scaling factor
pub const S_FACTOR: f64 = KAPPA / PI;

pub const STEPS: usize = 2000;
pub const DT_BASE: f64 = 0.01;
pub const SEED: u64 = 42;
/// Standard deviation of the per-component Gaussian noise
pub const NOISE_LEVEL: f64 = 0.001;

/// Near-equal starting proportions
pub const DEFAULT_X0: [f64; 3] = [0.33, 0.33, 0.34];
pub const DEFAULT_A: [[f64; 3]; 3] = [[1.0, 0.5, 0.3], [0.5, 1.0, 0.4], [0.3, 0.4, 1.0]];

pub const X0_LIST: [[f64; 3]; 4] = [
    [0.33, 0.33, 0.34],
    [0.1, 0.1, 0.8],
    [0.5, 0.3, 0.2],
    [0.4, 0.4, 0.2],
];

pub const A_LIST: [[[f64; 3]; 3]; 4] = [
    [[1.0, 0.5, 0.3], [0.5, 1.0, 0.4], [0.3, 0.4, 1.0]],
    [[1.0, 0.7, 0.3], [0.7, 1.0, 0.4], [0.3, 0.4, 1.0]],
    [[1.0, 0.3, 0.3], [0.3, 1.0, 0.4], [0.3, 0.4, 1.0]],
    [[1.0, 0.6, 0.2], [0.6, 1.0, 0.5], [0.2, 0.5, 1.0]],
];

pub const DT_LIST: [f64; 4] = [0.01, 0.005, 0.02, 0.015];
pub const S_LIST: [f64; 6] = [1.0, 1.005, 1.01, 1.015, S_FACTOR, 1.02];
pub const SEEDS: [u64; 5] = [SEED, SEED + 1, SEED + 2, SEED + 3, SEED + 4];

#[must_use]
pub fn default_matrix() -> InteractionMatrix {
    InteractionMatrix::from_array(DEFAULT_A)
}

#[must_use]
pub fn default_initial_states() -> Vec<Vec<f64>> {
    X0_LIST.iter().map(|x| x.to_vec()).collect()
}

#[must_use]
pub fn default_matrices() -> Vec<InteractionMatrix> {
    A_LIST.iter().map(|a| InteractionMatrix::from_array(*a)).collect()
}

#[must_use]
pub fn default_dts() -> Vec<f64> {
    DT_LIST.to_vec()
}

#[must_use]
pub fn default_scaling_factors() -> Vec<f64> {
    S_LIST.to_vec()
}

#[must_use]
pub fn default_seeds() -> Vec<u64> {
    SEEDS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s_factor_is_about_one_percent() {
        assert!((S_FACTOR - 1.01005).abs() < 1e-4);
    }

    #[test]
    fn test_default_tables_are_consistent() {
        for x in default_initial_states() {
            assert_eq!(x.len(), 3);
            assert!((x.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        for a in default_matrices() {
            assert_eq!(a.n(), 3);
            assert!(a.is_symmetric());
        }
        assert_eq!(default_seeds(), vec![42, 43, 44, 45, 46]);
        assert!(default_dts().iter().all(|dt| *dt > 0.0 && *dt <= 1.0));
    }
}
