//! Cartesian parameter grids for sensitivity sweeps.

use serde::{Deserialize, Serialize};

use crate::config::constants;
use crate::error::PreconditionError;
use crate::model::InteractionMatrix;

/// Number of sweep dimensions: initial state, matrix, dt, s, seed
pub const GRID_DIMS: usize = 5;

/// Dimension names in nesting order (outermost first)
pub const DIMENSION_LABELS: [&str; GRID_DIMS] = ["x0", "A", "dt", "s", "seed"];

/// One combination of sweep parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterPoint {
    pub x0: Vec<f64>,
    pub matrix: InteractionMatrix,
    pub dt: f64,
    pub s: f64,
    pub seed: u64,
}

/// Full Cartesian product of the five sweep dimensions.
///
/// Points are stored in row-major order: the initial state varies slowest
/// and the seed fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    points: Vec<ParameterPoint>,
    shape: [usize; GRID_DIMS],
    n_agents: usize,
}

impl ParameterGrid {
    /// Total number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of each dimension, outermost first
    #[must_use]
    pub fn shape(&self) -> [usize; GRID_DIMS] {
        self.shape
    }

    /// Agent count shared by every point
    #[must_use]
    pub fn n_agents(&self) -> usize {
        self.n_agents
    }

    #[must_use]
    pub fn points(&self) -> &[ParameterPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterPoint> {
        self.points.iter()
    }

    /// Point at per-dimension indices
    #[must_use]
    pub fn get(&self, indices: [usize; GRID_DIMS]) -> Option<&ParameterPoint> {
        self.flat_index(indices).map(|i| &self.points[i])
    }

    /// Convert per-dimension indices to a flat index
    #[must_use]
    pub fn flat_index(&self, indices: [usize; GRID_DIMS]) -> Option<usize> {
        let strides = compute_strides(&self.shape);
        let mut flat = 0;
        for ((&idx, &size), stride) in indices.iter().zip(&self.shape).zip(strides) {
            if idx >= size {
                return None;
            }
            flat += idx * stride;
        }
        Some(flat)
    }

    /// Convert a flat index to per-dimension indices
    #[must_use]
    pub fn multi_index(&self, flat: usize) -> Option<[usize; GRID_DIMS]> {
        if flat >= self.points.len() {
            return None;
        }
        let mut indices = [0; GRID_DIMS];
        let mut remaining = flat;
        for (slot, stride) in indices.iter_mut().zip(compute_strides(&self.shape)) {
            *slot = remaining / stride;
            remaining %= stride;
        }
        Some(indices)
    }
}

impl<'a> IntoIterator for &'a ParameterGrid {
    type Item = &'a ParameterPoint;
    type IntoIter = std::slice::Iter<'a, ParameterPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Compute strides for row-major order
fn compute_strides(shape: &[usize; GRID_DIMS]) -> [usize; GRID_DIMS] {
    let mut strides = [1; GRID_DIMS];
    for i in (0..GRID_DIMS - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Builder for [`ParameterGrid`].
///
/// Dimensions left unset use the built-in lists from
/// [`config::constants`](crate::config::constants).
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    initial_states: Option<Vec<Vec<f64>>>,
    matrices: Option<Vec<InteractionMatrix>>,
    dts: Option<Vec<f64>>,
    scaling_factors: Option<Vec<f64>>,
    seeds: Option<Vec<u64>>,
}

impl GridBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_states(mut self, x0s: Vec<Vec<f64>>) -> Self {
        self.initial_states = Some(x0s);
        self
    }

    #[must_use]
    pub fn matrices(mut self, matrices: Vec<InteractionMatrix>) -> Self {
        self.matrices = Some(matrices);
        self
    }

    #[must_use]
    pub fn dts(mut self, dts: Vec<f64>) -> Self {
        self.dts = Some(dts);
        self
    }

    #[must_use]
    pub fn scaling_factors(mut self, ss: Vec<f64>) -> Self {
        self.scaling_factors = Some(ss);
        self
    }

    #[must_use]
    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = Some(seeds);
        self
    }

    /// Expand into the full product.
    ///
    /// # Errors
    /// Fails when any dimension is empty, initial states are empty or differ
    /// in length, a matrix does not match the initial states' dimension, a
    /// time step lies outside `(0, 1]`, or a scaling factor is not finite.
    pub fn build(self) -> Result<ParameterGrid, PreconditionError> {
        let x0s = self
            .initial_states
            .unwrap_or_else(constants::default_initial_states);
        let matrices = self.matrices.unwrap_or_else(constants::default_matrices);
        let dts = self.dts.unwrap_or_else(constants::default_dts);
        let ss = self
            .scaling_factors
            .unwrap_or_else(constants::default_scaling_factors);
        let seeds = self.seeds.unwrap_or_else(constants::default_seeds);

        let shape = [x0s.len(), matrices.len(), dts.len(), ss.len(), seeds.len()];
        if let Some(dim) = shape.iter().position(|&len| len == 0) {
            return Err(PreconditionError::EmptyGridDimension(DIMENSION_LABELS[dim]));
        }

        let n_agents = x0s[0].len();
        if n_agents == 0 {
            return Err(PreconditionError::NoAgents);
        }
        for x0 in &x0s {
            if x0.len() != n_agents {
                return Err(PreconditionError::DimensionMismatch {
                    expected: n_agents,
                    x_len: x0.len(),
                    rows: n_agents,
                    cols: n_agents,
                });
            }
        }
        for matrix in &matrices {
            if matrix.n() != n_agents {
                return Err(PreconditionError::DimensionMismatch {
                    expected: n_agents,
                    x_len: n_agents,
                    rows: matrix.n(),
                    cols: matrix.n(),
                });
            }
        }

        if let Some(&dt) = dts.iter().find(|dt| !(**dt > 0.0 && **dt <= 1.0)) {
            return Err(PreconditionError::InvalidTimeStep(dt));
        }
        if let Some(&s) = ss.iter().find(|s| !s.is_finite()) {
            return Err(PreconditionError::InvalidScaling(s));
        }

        let mut points = Vec::with_capacity(shape.iter().product());
        for x0 in &x0s {
            for matrix in &matrices {
                for &dt in &dts {
                    for &s in &ss {
                        for &seed in &seeds {
                            points.push(ParameterPoint {
                                x0: x0.clone(),
                                matrix: matrix.clone(),
                                dt,
                                s,
                                seed,
                            });
                        }
                    }
                }
            }
        }

        Ok(ParameterGrid {
            points,
            shape,
            n_agents,
        })
    }
}

/// Cartesian product of the five sweep dimensions; `None` selects the
/// built-in list for that dimension.
pub fn build_grid(
    x0s: Option<Vec<Vec<f64>>>,
    matrices: Option<Vec<InteractionMatrix>>,
    dts: Option<Vec<f64>>,
    ss: Option<Vec<f64>>,
    seeds: Option<Vec<u64>>,
) -> Result<ParameterGrid, PreconditionError> {
    GridBuilder {
        initial_states: x0s,
        matrices,
        dts,
        scaling_factors: ss,
        seeds,
    }
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_size() {
        let grid = build_grid(None, None, None, None, None).unwrap();
        assert_eq!(grid.shape(), [4, 4, 4, 6, 5]);
        assert_eq!(grid.len(), 1920);
        assert_eq!(grid.n_agents(), 3);
    }

    #[test]
    fn test_index_round_trip() {
        let grid = GridBuilder::new()
            .dts(vec![0.01])
            .scaling_factors(vec![1.0, 1.01])
            .seeds(vec![1, 2, 3])
            .build()
            .unwrap();
        assert_eq!(grid.shape(), [4, 4, 1, 2, 3]);

        for flat in 0..grid.len() {
            let idx = grid.multi_index(flat).unwrap();
            assert_eq!(grid.flat_index(idx), Some(flat));
        }
        assert_eq!(grid.multi_index(grid.len()), None);
        assert_eq!(grid.flat_index([0, 0, 1, 0, 0]), None);

        let p = grid.get([1, 0, 0, 1, 2]).unwrap();
        assert_eq!(p.x0, vec![0.1, 0.1, 0.8]);
        assert_eq!(p.s, 1.01);
        assert_eq!(p.seed, 3);
    }

    #[test]
    fn test_empty_dimension_rejected() {
        let err = GridBuilder::new().scaling_factors(vec![]).build().unwrap_err();
        assert_eq!(err, PreconditionError::EmptyGridDimension("s"));
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let err = GridBuilder::new()
            .initial_states(vec![vec![0.5, 0.5], vec![0.2, 0.3, 0.5]])
            .build()
            .unwrap_err();
        assert!(matches!(err, PreconditionError::DimensionMismatch { .. }));

        let err = GridBuilder::new()
            .matrices(vec![InteractionMatrix::identity(2)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            PreconditionError::DimensionMismatch {
                expected: 3,
                x_len: 3,
                rows: 2,
                cols: 2
            }
        );
    }

    #[test]
    fn test_empty_initial_state_rejected() {
        let err = GridBuilder::new()
            .initial_states(vec![vec![]])
            .build()
            .unwrap_err();
        assert_eq!(err, PreconditionError::NoAgents);
    }

    #[test]
    fn test_time_step_outside_unit_interval_rejected() {
        for dt in [0.0, -0.01, 1.5] {
            let err = GridBuilder::new().dts(vec![0.01, dt]).build().unwrap_err();
            assert_eq!(err, PreconditionError::InvalidTimeStep(dt));
        }
        let err = GridBuilder::new().dts(vec![f64::NAN]).build().unwrap_err();
        assert!(matches!(err, PreconditionError::InvalidTimeStep(dt) if dt.is_nan()));

        // The closed upper bound is allowed
        assert!(GridBuilder::new().dts(vec![1.0]).seeds(vec![1]).build().is_ok());
    }

    #[test]
    fn test_non_finite_scaling_rejected() {
        let err = GridBuilder::new()
            .scaling_factors(vec![1.0, f64::INFINITY])
            .build()
            .unwrap_err();
        assert_eq!(err, PreconditionError::InvalidScaling(f64::INFINITY));
    }
}
