//! Simulated time series

use serde::{Deserialize, Serialize};

/// `steps × n_agents` time series stored row-major.
///
/// Row `t` is the state at time `t * dt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    n_agents: usize,
    data: Vec<f64>,
}

impl Trajectory {
    /// Zero-filled trajectory with `steps` rows
    #[must_use]
    pub fn zeros(steps: usize, n_agents: usize) -> Self {
        Self {
            n_agents,
            data: vec![0.0; steps * n_agents],
        }
    }

    /// Build from rows. Returns `None` when rows differ in length.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let n_agents = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_agents) {
            return None;
        }
        Some(Self {
            n_agents,
            data: rows.iter().flatten().copied().collect(),
        })
    }

    /// Number of rows (time steps)
    #[must_use]
    pub fn len(&self) -> usize {
        if self.n_agents == 0 {
            0
        } else {
            self.data.len() / self.n_agents
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn n_agents(&self) -> usize {
        self.n_agents
    }

    #[must_use]
    pub fn row(&self, t: usize) -> &[f64] {
        &self.data[t * self.n_agents..(t + 1) * self.n_agents]
    }

    pub fn row_mut(&mut self, t: usize) -> &mut [f64] {
        &mut self.data[t * self.n_agents..(t + 1) * self.n_agents]
    }

    /// Iterate over rows in time order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.n_agents.max(1))
    }

    /// Last row, if any
    #[must_use]
    pub fn final_state(&self) -> Option<&[f64]> {
        self.len().checked_sub(1).map(|t| self.row(t))
    }

    /// Values of one agent across all rows
    #[must_use]
    pub fn agent_series(&self, agent: usize) -> Vec<f64> {
        self.rows().map(|r| r[agent]).collect()
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Write the trajectory as CSV with a `t` column followed by one column per agent
    pub fn write_csv<W: std::io::Write>(&self, writer: W, dt: f64) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["t".to_string()];
        header.extend((1..=self.n_agents).map(|i| format!("agent_{i}")));
        wtr.write_record(&header)?;
        for (t, row) in self.rows().enumerate() {
            let mut record = vec![(t as f64 * dt).to_string()];
            record.extend(row.iter().map(f64::to_string));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
