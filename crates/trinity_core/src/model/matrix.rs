//! Square interaction matrices

use serde::{Deserialize, Serialize};

use crate::error::PreconditionError;

/// N×N interaction matrix stored in row-major order.
///
/// Entry `(i, j)` is the feedback agent `i` receives from agent `j`.
/// Symmetry is not required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct InteractionMatrix {
    n: usize,
    data: Vec<f64>,
}

impl InteractionMatrix {
    /// Build a matrix from its rows. Every row must have as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, PreconditionError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(PreconditionError::RaggedMatrix {
                    row,
                    expected: n,
                    found: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self { n, data })
    }

    /// Build a matrix from fixed-size rows (used by the constant tables)
    #[must_use]
    pub fn from_array<const N: usize>(rows: [[f64; N]; N]) -> Self {
        Self {
            n: N,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    /// Number of agents (rows == columns)
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n || col >= self.n {
            return None;
        }
        Some(self.data[row * self.n + col])
    }

    /// Row `i` as a slice
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (0..i).all(|j| self.data[i * self.n + j] == self.data[j * self.n + i]))
    }

    /// Matrix-vector product `A·x`. Caller guarantees `x.len() == n`.
    #[must_use]
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| self.row(i).iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Entries rounded to `decimals` places, flattened row by row
    #[must_use]
    pub fn rounded_flat(&self, decimals: i32) -> Vec<f64> {
        super::rounded_state(&self.data, decimals)
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for InteractionMatrix {
    type Error = PreconditionError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<InteractionMatrix> for Vec<Vec<f64>> {
    fn from(matrix: InteractionMatrix) -> Self {
        matrix.to_rows()
    }
}
