//! Trajectory summary metrics
//!
//! Every metric is derived from the trajectory array and its time step
//! alone; no metric depends on another metric's value.

use serde::{Deserialize, Serialize};

use crate::model::Trajectory;

/// Step size below which a trajectory counts as converged
pub const CONVERGENCE_THRESHOLD: f64 = 1e-4;
/// Probability floor applied before taking logarithms
pub const ENTROPY_EPSILON: f64 = 1e-12;
/// Minimum number of tail rows used for the stability variance
pub const MIN_TAIL_ROWS: usize = 100;

/// Scalar metrics computed for each trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Time of the first step smaller than the convergence threshold
    ConvTime,
    /// Shannon entropy (bits) of the final state
    Entropy,
    /// Peaks in the step-size series per unit time
    OscFreq,
    /// Mean per-agent variance over the trajectory tail
    Stability,
    /// Total path length travelled in state space
    Energy,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::ConvTime,
        Metric::Entropy,
        Metric::OscFreq,
        Metric::Stability,
        Metric::Energy,
    ];

    /// Column name used in result tables
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::ConvTime => "conv_time",
            Self::Entropy => "entropy",
            Self::OscFreq => "osc_freq",
            Self::Stability => "stability",
            Self::Energy => "energy",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConvTime => "Convergence Time",
            Self::Entropy => "Final-State Entropy",
            Self::OscFreq => "Oscillation Frequency",
            Self::Stability => "Tail Variance",
            Self::Energy => "Path Length",
        }
    }

    /// Parse a column name back into a metric
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Summary of one trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// `+inf` when the trajectory never converged within its horizon
    pub conv_time: f64,
    pub entropy: f64,
    pub osc_freq: f64,
    pub stability: f64,
    pub energy: f64,
    /// Last row of the trajectory; not part of result table rows
    pub final_state: Option<Vec<f64>>,
}

impl MetricsRecord {
    /// Record returned for a missing or too-short trajectory
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            conv_time: f64::INFINITY,
            entropy: 0.0,
            osc_freq: 0.0,
            stability: f64::INFINITY,
            energy: f64::INFINITY,
            final_state: None,
        }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.final_state.is_none()
    }

    #[must_use]
    pub fn converged(&self) -> bool {
        self.conv_time.is_finite()
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ConvTime => self.conv_time,
            Metric::Entropy => self.entropy,
            Metric::OscFreq => self.osc_freq,
            Metric::Stability => self.stability,
            Metric::Energy => self.energy,
        }
    }
}

/// Compute all metrics for a trajectory sampled every `dt`.
///
/// `None` or a trajectory with fewer than two rows yields
/// [`MetricsRecord::sentinel`].
#[must_use]
pub fn extract_metrics(trajectory: Option<&Trajectory>, dt: f64) -> MetricsRecord {
    let Some(traj) = trajectory.filter(|t| t.len() >= 2) else {
        return MetricsRecord::sentinel();
    };

    let steps = step_sizes(traj);
    let final_state = traj.final_state().map(<[f64]>::to_vec);

    MetricsRecord {
        conv_time: convergence_time(&steps, dt),
        entropy: final_state.as_deref().map_or(0.0, safe_entropy),
        osc_freq: oscillation_frequency(&steps, dt),
        stability: tail_variance(traj),
        energy: steps.iter().sum(),
        final_state,
    }
}

/// Euclidean norm of each consecutive-row difference
#[must_use]
pub fn step_sizes(traj: &Trajectory) -> Vec<f64> {
    traj.rows()
        .zip(traj.rows().skip(1))
        .map(|(prev, next)| {
            prev.iter()
                .zip(next)
                .map(|(a, b)| (b - a) * (b - a))
                .sum::<f64>()
                .sqrt()
        })
        .collect()
}

/// First-crossing time of the convergence threshold, `+inf` if never crossed
#[must_use]
pub fn convergence_time(step_sizes: &[f64], dt: f64) -> f64 {
    step_sizes
        .iter()
        .position(|s| *s < CONVERGENCE_THRESHOLD)
        .map_or(f64::INFINITY, |idx| idx as f64 * dt)
}

/// Shannon entropy in bits.
///
/// Entries are clamped to `[ENTROPY_EPSILON, 1]` and renormalized, so the
/// result is finite and lies in `[0, log2(n)]`.
#[must_use]
pub fn safe_entropy(p: &[f64]) -> f64 {
    let clamped: Vec<f64> = p
        .iter()
        .map(|v| if v.is_nan() { ENTROPY_EPSILON } else { v.clamp(ENTROPY_EPSILON, 1.0) })
        .collect();
    let total: f64 = clamped.iter().sum();
    let h: f64 = -clamped
        .iter()
        .map(|q| q / total)
        .map(|q| q * q.log2())
        .sum::<f64>();
    h.max(0.0)
}

/// Number of local maxima in `x`.
///
/// A sample is a peak when it is strictly greater than both neighbours. A
/// run of equal samples bordered by strictly smaller values counts as a single
/// peak. The first and last samples are never peaks.
#[must_use]
pub fn count_peaks(x: &[f64]) -> usize {
    let mut peaks = 0;
    let mut i = 1;
    let last = x.len().saturating_sub(1);
    while i < last {
        if x[i - 1] < x[i] {
            // Skip over a plateau
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks += 1;
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Peaks in the step-size series per unit simulated time
#[must_use]
pub fn oscillation_frequency(step_sizes: &[f64], dt: f64) -> f64 {
    if step_sizes.is_empty() {
        return 0.0;
    }
    count_peaks(step_sizes) as f64 / (step_sizes.len() as f64 * dt)
}

/// Mean per-agent population variance over the last `max(100, len / 10)` rows
#[must_use]
pub fn tail_variance(traj: &Trajectory) -> f64 {
    let len = traj.len();
    let tail_len = MIN_TAIL_ROWS.max(len / 10).min(len);
    let n = traj.n_agents();
    if tail_len == 0 || n == 0 {
        return f64::INFINITY;
    }

    let tail: Vec<&[f64]> = traj.rows().skip(len - tail_len).collect();
    let count = tail.len() as f64;
    let total_variance: f64 = (0..n)
        .map(|agent| {
            let mean = tail.iter().map(|r| r[agent]).sum::<f64>() / count;
            tail.iter()
                .map(|r| (r[agent] - mean) * (r[agent] - mean))
                .sum::<f64>()
                / count
        })
        .sum();
    total_variance / n as f64
}
